//! Hierarchy binding for header compilation.
//!
//! Takes parsed type declarations plus an environment of classes already
//! known to the compilation (source classes mid-binding and class-path
//! dependencies) and produces, per class, its resolved superclass and
//! interfaces, finalized access flags, and visibility.

pub mod access;
pub mod bind;
pub mod env;
pub mod error;
pub mod resolve;
pub mod scope;
pub mod sym;
pub mod tree;
