pub mod attributes;
pub mod constant_pool;
pub mod fields;
pub mod file;
pub mod methods;

use crate::{error, stream::ClassFileStream};

pub use self::constant_pool::ConstantPool;

/// A component of a class file.
pub trait ClassFileItem {
    /// Read this item from a class file stream.
    fn read_from_stream(
        s: &mut ClassFileStream<'_>,
        cp: Option<&ConstantPool>,
    ) -> error::Result<Self>
    where
        Self: std::marker::Sized;
}
