use crate::{
    error::{self, ClassFileError},
    stream::ClassFileStream,
};

use super::{attributes::attrtype, ClassFileItem, ConstantPool};

bitflags::bitflags! {
    pub struct MethodAccessFlags: u16 {
        /// Declared public; may be accessed from outside its package.
        const ACC_PUBLIC = 0x0001;
        /// Declared private; usable only within the defining class.
        const ACC_PRIVATE = 0x0002;
        /// Declared protected; may be accessed within subclasses.
        const ACC_PROTECTED = 0x0004;
        /// Declared static.
        const ACC_STATIC = 0x0008;
        /// Declared final; must not be overridden.
        const ACC_FINAL = 0x0010;
        /// Declared synchronized; invocation is wrapped by a monitor use.
        const ACC_SYNCHRONIZED = 0x0020;
        /// A bridge method, generated by the compiler.
        const ACC_BRIDGE = 0x0040;
        /// Declared with a variable number of arguments.
        const ACC_VARARGS = 0x0080;
        /// Declared native; implemented in a language other than the source language.
        const ACC_NATIVE = 0x0100;
        /// Declared abstract; no implementation is provided.
        const ACC_ABSTRACT = 0x0400;
        /// Declared strictfp; floating-point mode is FP-strict.
        const ACC_STRICT = 0x0800;
        /// Declared synthetic; not present in the source code.
        const ACC_SYNTHETIC = 0x1000;
    }
}

/// One method of the class being parsed.
#[derive(Debug)]
pub struct MethodInfo {
    pub access_flags: MethodAccessFlags,
    /// The unqualified method name, or `<init>`/`<clinit>`.
    pub name: String,
    /// The method descriptor.
    pub descriptor: String,
    /// The generic signature, when the declaration mentions type variables.
    pub signature: Option<String>,
    /// Internal-form names of the declared thrown exceptions, in order.
    pub exceptions: Vec<String>,
}

impl ClassFileItem for MethodInfo {
    fn read_from_stream(
        s: &mut ClassFileStream<'_>,
        cp: Option<&ConstantPool>,
    ) -> error::Result<Self>
    where
        Self: Sized,
    {
        let cp = cp.expect("constant pool should exist at the time of method deserialization");

        let bits = s.read_u2()?;
        let access_flags =
            MethodAccessFlags::from_bits(bits).ok_or(ClassFileError::BadMethodAccessFlags(bits))?;
        let name = cp.utf8(s.read_u2()?)?.to_string();
        let descriptor = cp.utf8(s.read_u2()?)?.to_string();

        let mut signature = None;
        let mut exceptions = Vec::new();
        let attributes_count = s.read_u2()?;
        for _ in 0..attributes_count {
            let attribute_name = cp.utf8(s.read_u2()?)?;
            let attribute_length = s.read_u4()?;
            match attribute_name {
                attrtype::Exceptions => {
                    let number_of_exceptions = s.read_u2()?;
                    let indices =
                        s.read_sequence::<u16>(Some(cp), number_of_exceptions as usize)?;
                    exceptions = Vec::with_capacity(indices.len());
                    for index in indices {
                        exceptions.push(cp.class_info(index)?.to_string());
                    }
                }
                attrtype::Signature => signature = Some(cp.utf8(s.read_u2()?)?.to_string()),
                _ => s.skip(attribute_length as usize)?,
            }
        }

        Ok(Self {
            access_flags,
            name,
            descriptor,
            signature,
            exceptions,
        })
    }
}
