use thiserror::Error;

/// An error which can occur on deserialization of a class file.
#[derive(Error, Debug)]
pub enum ClassFileError {
    /// Returned when the class file ends in the middle of an item.
    #[error("class file truncated at offset {0}")]
    Truncated(usize),

    /// Returned when a class file has a bad magic number.
    #[error("bad magic number {0:#010x}")]
    BadMagic(u32),

    /// Returned when the major version is outside the supported range.
    #[error("unsupported class file major version {0}")]
    BadVersion(u16),

    /// Returned when an unknown element value tag is found.
    #[error("unknown element value tag {0:#04x}")]
    BadTag(u8),

    /// Returned when an unknown constant pool tag is found.
    #[error("unknown constant pool tag {0}")]
    UnknownConstantPoolTag(u8),

    /// Returned when a constant pool string is not valid modified UTF-8.
    #[error("malformed modified UTF-8 in constant pool")]
    InvalidModifiedUtf8,

    /// Returned when a constant pool index is zero or past the end of the pool.
    #[error("constant pool index {0} out of range")]
    BadPoolIndex(u16),

    /// Returned when a constant pool entry has an unexpected type.
    #[error("constant pool entry {0} has the wrong type")]
    WrongPoolEntry(u16),

    /// Returned when bad class access flags are found.
    #[error("bad class access flags {0:#06x}")]
    BadClassAccessFlags(u16),

    /// Returned when bad field access flags are found.
    #[error("bad field access flags {0:#06x}")]
    BadFieldAccessFlags(u16),

    /// Returned when bad method access flags are found.
    #[error("bad method access flags {0:#06x}")]
    BadMethodAccessFlags(u16),
}

pub type Result<T> = std::result::Result<T, ClassFileError>;
