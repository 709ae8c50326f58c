use brim_class_file::error::ClassFileError;
use thiserror::Error;

/// An error which can occur while binding a class hierarchy.
///
/// Binding reports the first failure for a class and does not attempt
/// recovery within that class.
#[derive(Error, Debug)]
pub enum BindError {
    /// No scope could resolve the leading name of a type expression.
    #[error("could not resolve {0}")]
    Unresolved(String),

    /// A member step of a qualified type expression did not resolve.
    #[error("could not resolve {name} in {qualified}")]
    MissingMember { qualified: String, name: String },

    /// A class path dependency failed to parse.
    #[error(transparent)]
    ClassFile(#[from] ClassFileError),
}

pub type BindResult<T> = std::result::Result<T, BindError>;
