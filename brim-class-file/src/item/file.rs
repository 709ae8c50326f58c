use std::ops::RangeInclusive;

use crate::{
    error::{self, ClassFileError},
    stream::ClassFileStream,
};

use super::{
    attributes::{attrtype, read_annotations, Annotation, InnerClass},
    fields::FieldInfo,
    methods::MethodInfo,
    ClassFileItem, ConstantPool,
};

/// The magic number of a class file.
pub const CLASS_MAGIC: u32 = 0xCAFEBABE;

/// The major versions this reader accepts.
pub const SUPPORTED_MAJORS: RangeInclusive<u16> = 45..=52;

bitflags::bitflags! {
    pub struct ClassAccessFlags: u16 {
        /// Declared public; may be accessed from outside its package.
        const ACC_PUBLIC = 0x0001;
        /// Declared private. Only appears in InnerClasses records.
        const ACC_PRIVATE = 0x0002;
        /// Declared protected. Only appears in InnerClasses records.
        const ACC_PROTECTED = 0x0004;
        /// Declared static. Only appears in InnerClasses records.
        const ACC_STATIC = 0x0008;
        /// Declared final; no subclasses allowed.
        const ACC_FINAL = 0x0010;
        /// Treat superclass methods specially when invoked by the
        /// invokespecial instruction.
        const ACC_SUPER = 0x0020;
        /// Is an interface, not a class.
        const ACC_INTERFACE = 0x0200;
        /// Declared abstract; must not be instantiated.
        const ACC_ABSTRACT = 0x0400;
        /// Declared synthetic; not present in the source code.
        const ACC_SYNTHETIC = 0x1000;
        /// Declared as an annotation type.
        const ACC_ANNOTATION = 0x2000;
        /// Declared as an enum type.
        const ACC_ENUM = 0x4000;
    }
}

/// The header view of one class file.
///
/// All constant pool indirections are resolved to names during parsing.
#[derive(Debug)]
pub struct ClassFile {
    /// The class file's version (major, minor).
    pub version: (u16, u16),
    /// This class's access flags.
    pub access_flags: ClassAccessFlags,
    /// The name of this class, in internal form.
    pub name: String,
    /// The generic signature of the class declaration, if any.
    pub signature: Option<String>,
    /// The internal-form name of the direct superclass. Absent only for
    /// the root of the hierarchy.
    pub super_class: Option<String>,
    /// Direct superinterface names, in the order given in source.
    pub interfaces: Vec<String>,
    /// The fields declared by this class.
    pub fields: Vec<FieldInfo>,
    /// The methods declared by this class.
    pub methods: Vec<MethodInfo>,
    /// InnerClasses records that mention this class.
    pub inner_classes: Vec<InnerClass>,
    /// Retained annotations. Empty unless this class is an annotation
    /// declaration carrying `@Retention`.
    pub annotations: Vec<Annotation>,
}

impl ClassFile {
    /// Parse a complete class file from its raw bytes.
    pub fn read(data: &[u8]) -> error::Result<Self> {
        Self::read_from_stream(&mut ClassFileStream::new(data), None)
    }
}

impl ClassFileItem for ClassFile {
    fn read_from_stream(
        s: &mut ClassFileStream<'_>,
        _cp: Option<&ConstantPool>,
    ) -> error::Result<Self>
    where
        Self: Sized,
    {
        // check magic number
        let magic = s.read_u4()?;
        if magic != CLASS_MAGIC {
            return Err(ClassFileError::BadMagic(magic));
        }

        // read file version
        let minor_version = s.read_u2()?;
        let major_version = s.read_u2()?;
        if !SUPPORTED_MAJORS.contains(&major_version) {
            return Err(ClassFileError::BadVersion(major_version));
        }

        // read constant pool
        let constant_pool = ConstantPool::read_from_stream(s, None)?;

        // read access flags
        let bits = s.read_u2()?;
        let access_flags =
            ClassAccessFlags::from_bits(bits).ok_or(ClassFileError::BadClassAccessFlags(bits))?;

        // read this class & super class
        let name = constant_pool.class_info(s.read_u2()?)?.to_string();
        let super_class = match s.read_u2()? {
            0 => None,
            i => Some(constant_pool.class_info(i)?.to_string()),
        };

        // read interfaces
        let interfaces_count = s.read_u2()?;
        let indices = s.read_sequence::<u16>(Some(&constant_pool), interfaces_count as usize)?;
        let mut interfaces = Vec::with_capacity(indices.len());
        for index in indices {
            interfaces.push(constant_pool.class_info(index)?.to_string());
        }

        // read fields
        let fields_count = s.read_u2()?;
        let fields = s.read_sequence(Some(&constant_pool), fields_count as usize)?;

        // read methods
        let methods_count = s.read_u2()?;
        let methods = s.read_sequence(Some(&constant_pool), methods_count as usize)?;

        // read class attributes
        let mut signature = None;
        let mut inner_classes = Vec::new();
        let mut annotations = Vec::new();
        let attributes_count = s.read_u2()?;
        for _ in 0..attributes_count {
            let attribute_name = constant_pool.utf8(s.read_u2()?)?;
            let attribute_length = s.read_u4()?;
            match attribute_name {
                attrtype::Signature => {
                    signature = Some(constant_pool.utf8(s.read_u2()?)?.to_string());
                }
                attrtype::InnerClasses => {
                    let number_of_classes = s.read_u2()?;
                    for _ in 0..number_of_classes {
                        let record = InnerClass::read_from_stream(s, Some(&constant_pool))?;
                        // keep only records that mention this class
                        if record.inner_class == name
                            || record.outer_class.as_deref() == Some(name.as_str())
                        {
                            inner_classes.push(record);
                        }
                    }
                }
                // Retention only matters when applied to an annotation
                // declaration, so any other class skips its annotations
                // wholesale.
                attrtype::RuntimeVisibleAnnotations
                    if access_flags.contains(ClassAccessFlags::ACC_ANNOTATION) =>
                {
                    annotations = read_annotations(s, &constant_pool)?;
                }
                _ => s.skip(attribute_length as usize)?,
            }
        }

        Ok(Self {
            version: (major_version, minor_version),
            access_flags,
            name,
            signature,
            super_class,
            interfaces,
            fields,
            methods,
            inner_classes,
            annotations,
        })
    }
}
