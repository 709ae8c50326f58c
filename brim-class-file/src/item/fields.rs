use crate::{
    error::{self, ClassFileError},
    stream::ClassFileStream,
};

use super::{attributes::attrtype, constant_pool::Const, ClassFileItem, ConstantPool};

bitflags::bitflags! {
    pub struct FieldAccessFlags: u16 {
        /// Declared public; may be accessed from outside its package.
        const ACC_PUBLIC = 0x0001;
        /// Declared private; usable only within the defining class.
        const ACC_PRIVATE = 0x0002;
        /// Declared protected; may be accessed within subclasses.
        const ACC_PROTECTED = 0x0004;
        /// Declared static.
        const ACC_STATIC = 0x0008;
        /// Declared final; never directly assigned to after object construction.
        const ACC_FINAL = 0x0010;
        /// Declared volatile; cannot be cached.
        const ACC_VOLATILE = 0x0040;
        /// Declared transient; not written or read by a persistent object manager.
        const ACC_TRANSIENT = 0x0080;
        /// Declared synthetic; not present in the source code.
        const ACC_SYNTHETIC = 0x1000;
        /// Declared as an element of an enum.
        const ACC_ENUM = 0x4000;
    }
}

/// One field of the class being parsed.
#[derive(Debug)]
pub struct FieldInfo {
    pub access_flags: FieldAccessFlags,
    /// The unqualified field name.
    pub name: String,
    /// The field descriptor.
    pub descriptor: String,
    /// The generic signature, when the field's type mentions type variables.
    pub signature: Option<String>,
    /// The ConstantValue attribute, for constant fields.
    pub constant_value: Option<Const>,
}

impl ClassFileItem for FieldInfo {
    fn read_from_stream(
        s: &mut ClassFileStream<'_>,
        cp: Option<&ConstantPool>,
    ) -> error::Result<Self>
    where
        Self: Sized,
    {
        let cp = cp.expect("constant pool should exist at the time of field deserialization");

        let bits = s.read_u2()?;
        let access_flags =
            FieldAccessFlags::from_bits(bits).ok_or(ClassFileError::BadFieldAccessFlags(bits))?;
        let name = cp.utf8(s.read_u2()?)?.to_string();
        let descriptor = cp.utf8(s.read_u2()?)?.to_string();

        let mut signature = None;
        let mut constant_value = None;
        let attributes_count = s.read_u2()?;
        for _ in 0..attributes_count {
            let attribute_name = cp.utf8(s.read_u2()?)?;
            let attribute_length = s.read_u4()?;
            match attribute_name {
                attrtype::ConstantValue => constant_value = Some(cp.constant(s.read_u2()?)?),
                attrtype::Signature => signature = Some(cp.utf8(s.read_u2()?)?.to_string()),
                _ => s.skip(attribute_length as usize)?,
            }
        }

        Ok(Self {
            access_flags,
            name,
            descriptor,
            signature,
            constant_value,
        })
    }
}
