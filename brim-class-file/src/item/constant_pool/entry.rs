use std::cell::OnceCell;

use crate::{
    error::{self, ClassFileError},
    stream::ClassFileStream,
};

use crate::item::ClassFileItem;

use super::ConstantPool;

/// The tag values for each type of constant pool entry.
mod tags {
    #![allow(non_upper_case_globals)]

    pub const CONSTANT_Class: u8 = 7;
    pub const CONSTANT_Fieldref: u8 = 9;
    pub const CONSTANT_Methodref: u8 = 10;
    pub const CONSTANT_InterfaceMethodref: u8 = 11;
    pub const CONSTANT_String: u8 = 8;
    pub const CONSTANT_Integer: u8 = 3;
    pub const CONSTANT_Float: u8 = 4;
    pub const CONSTANT_Long: u8 = 5;
    pub const CONSTANT_Double: u8 = 6;
    pub const CONSTANT_NameAndType: u8 = 12;
    pub const CONSTANT_Utf8: u8 = 1;
    pub const CONSTANT_MethodHandle: u8 = 15;
    pub const CONSTANT_MethodType: u8 = 16;
    pub const CONSTANT_InvokeDynamic: u8 = 18;
}

/// A constant pool entry.
///
/// Deserialization does not perform any index verification; indirections
/// are followed lazily at lookup time.
#[derive(Debug)]
pub enum ConstantPoolEntry {
    /// A class or an interface, named by a Utf8 entry holding its binary
    /// name in internal form.
    Class { name_index: u16 },
    Fieldref {
        class_index: u16,
        name_and_type_index: u16,
    },
    Methodref {
        class_index: u16,
        name_and_type_index: u16,
    },
    InterfaceMethodref {
        class_index: u16,
        name_and_type_index: u16,
    },
    /// A constant object of type String.
    String { string_index: u16 },
    /// A 4-byte int constant.
    Integer { bytes: i32 },
    /// A 4-byte float constant, kept as its IEEE 754 bit pattern.
    Float { bytes: u32 },
    /// An 8-byte long constant. Occupies two pool slots.
    Long { bytes: i64 },
    /// An 8-byte double constant, kept as its bit pattern. Occupies two
    /// pool slots.
    Double { bytes: u64 },
    /// A field or method name and descriptor, without the owning class.
    NameAndType {
        name_index: u16,
        descriptor_index: u16,
    },
    /// A constant string value in modified UTF-8, decoded on first lookup.
    Utf8 {
        bytes: Vec<u8>,
        text: OnceCell<String>,
    },
    /// A method handle. The reference kind is kept raw; header
    /// compilation never interprets it.
    MethodHandle {
        reference_kind: u8,
        reference_index: u16,
    },
    /// A method type.
    MethodType { descriptor_index: u16 },
    /// An invokedynamic call site.
    InvokeDynamic {
        bootstrap_method_attr_index: u16,
        name_and_type_index: u16,
    },
    /// The unused second slot of an 8-byte constant.
    Unused,
}

impl ClassFileItem for ConstantPoolEntry {
    fn read_from_stream(
        s: &mut ClassFileStream<'_>,
        _cp: Option<&ConstantPool>,
    ) -> error::Result<Self>
    where
        Self: Sized,
    {
        match s.read_u1()? {
            tags::CONSTANT_Class => Ok(Self::Class {
                name_index: s.read_u2()?,
            }),
            tags::CONSTANT_Fieldref => Ok(Self::Fieldref {
                class_index: s.read_u2()?,
                name_and_type_index: s.read_u2()?,
            }),
            tags::CONSTANT_Methodref => Ok(Self::Methodref {
                class_index: s.read_u2()?,
                name_and_type_index: s.read_u2()?,
            }),
            tags::CONSTANT_InterfaceMethodref => Ok(Self::InterfaceMethodref {
                class_index: s.read_u2()?,
                name_and_type_index: s.read_u2()?,
            }),
            tags::CONSTANT_String => Ok(Self::String {
                string_index: s.read_u2()?,
            }),
            tags::CONSTANT_Integer => Ok(Self::Integer {
                bytes: s.read_u4()? as i32,
            }),
            tags::CONSTANT_Float => Ok(Self::Float {
                bytes: s.read_u4()?,
            }),
            tags::CONSTANT_Long => Ok(Self::Long {
                bytes: i64::from_be_bytes(s.read::<8>()?),
            }),
            tags::CONSTANT_Double => Ok(Self::Double {
                bytes: u64::from_be_bytes(s.read::<8>()?),
            }),
            tags::CONSTANT_NameAndType => Ok(Self::NameAndType {
                name_index: s.read_u2()?,
                descriptor_index: s.read_u2()?,
            }),
            tags::CONSTANT_Utf8 => {
                let length = s.read_u2()?;
                let bytes = s.read_dynamic(length as usize)?;
                Ok(Self::Utf8 {
                    bytes,
                    text: OnceCell::new(),
                })
            }
            tags::CONSTANT_MethodHandle => Ok(Self::MethodHandle {
                reference_kind: s.read_u1()?,
                reference_index: s.read_u2()?,
            }),
            tags::CONSTANT_MethodType => Ok(Self::MethodType {
                descriptor_index: s.read_u2()?,
            }),
            tags::CONSTANT_InvokeDynamic => Ok(Self::InvokeDynamic {
                bootstrap_method_attr_index: s.read_u2()?,
                name_and_type_index: s.read_u2()?,
            }),
            v => Err(ClassFileError::UnknownConstantPoolTag(v)),
        }
    }
}
