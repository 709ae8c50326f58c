use log::debug;

use crate::{
    error::{self, ClassFileError},
    stream::ClassFileStream,
};

use super::{file::ClassAccessFlags, ClassFileItem, ConstantPool};

/// Names of the attributes consumed during header parsing. Every other
/// attribute is skipped by its length.
pub mod attrtype {
    #![allow(non_upper_case_globals)]

    pub const ConstantValue: &str = "ConstantValue";
    pub const Signature: &str = "Signature";
    pub const Exceptions: &str = "Exceptions";
    pub const InnerClasses: &str = "InnerClasses";
    pub const RuntimeVisibleAnnotations: &str = "RuntimeVisibleAnnotations";
}

/// The one annotation type whose value matters to header compilation.
pub const RETENTION: &str = "Ljava/lang/annotation/Retention;";
/// The enum type of `RETENTION`'s `value` element.
pub const RETENTION_POLICY: &str = "Ljava/lang/annotation/RetentionPolicy;";

/// The tag characters of the element value encoding.
mod elemtag {
    pub const BYTE: u8 = b'B';
    pub const CHAR: u8 = b'C';
    pub const DOUBLE: u8 = b'D';
    pub const FLOAT: u8 = b'F';
    pub const INT: u8 = b'I';
    pub const LONG: u8 = b'J';
    pub const SHORT: u8 = b'S';
    pub const BOOLEAN: u8 = b'Z';
    pub const STRING: u8 = b's';
    pub const ENUM: u8 = b'e';
    pub const CLASS: u8 = b'c';
    pub const ANNOTATION: u8 = b'@';
    pub const ARRAY: u8 = b'[';
}

/// One record of the InnerClasses attribute.
///
/// The reader keeps only records that mention the class being parsed, as
/// either the inner or the outer class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerClass {
    /// Internal-form name of the nested class.
    pub inner_class: String,
    /// Internal-form name of the enclosing class, when the record carries
    /// one. Absent for local and anonymous classes.
    pub outer_class: Option<String>,
    /// The simple source name. Absent for anonymous classes.
    pub inner_name: Option<String>,
    /// The access flags of the nested class as declared in source.
    pub access_flags: ClassAccessFlags,
}

impl ClassFileItem for InnerClass {
    fn read_from_stream(
        s: &mut ClassFileStream<'_>,
        cp: Option<&ConstantPool>,
    ) -> error::Result<Self>
    where
        Self: Sized,
    {
        let cp = cp.expect("constant pool should exist at the time of attribute deserialization");
        let inner_class = cp.class_info(s.read_u2()?)?.to_string();
        let outer_class = match s.read_u2()? {
            0 => None,
            i => Some(cp.class_info(i)?.to_string()),
        };
        let inner_name = match s.read_u2()? {
            0 => None,
            i => Some(cp.utf8(i)?.to_string()),
        };
        let bits = s.read_u2()?;
        let access_flags =
            ClassAccessFlags::from_bits(bits).ok_or(ClassFileError::BadClassAccessFlags(bits))?;
        Ok(Self {
            inner_class,
            outer_class,
            inner_name,
            access_flags,
        })
    }
}

/// A retained annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// The annotation type, as a field descriptor.
    pub type_descriptor: String,
    /// Whether the annotation is visible at run time.
    pub visible: bool,
    /// The retained element-value bindings.
    pub pairs: Vec<(String, ElementValue)>,
}

/// The value of a retained element-value pair.
///
/// Only the enum constant of `@Retention`'s `value` element survives
/// header parsing; every other tagged form is consumed and discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementValue {
    EnumConst {
        /// The enum type, as a field descriptor.
        type_name: String,
        /// The simple name of the constant.
        const_name: String,
    },
}

/// Read a RuntimeVisibleAnnotations attribute body, keeping only the
/// retention annotation.
pub(crate) fn read_annotations(
    s: &mut ClassFileStream<'_>,
    cp: &ConstantPool,
) -> error::Result<Vec<Annotation>> {
    let num_annotations = s.read_u2()?;
    let mut annotations = Vec::new();
    for _ in 0..num_annotations {
        if let Some(annotation) = read_annotation(s, cp)? {
            annotations.push(annotation);
        }
    }
    Ok(annotations)
}

/// Read one annotation structure. Returns a record only for `@Retention`
/// with a retained `value` binding.
fn read_annotation(
    s: &mut ClassFileStream<'_>,
    cp: &ConstantPool,
) -> error::Result<Option<Annotation>> {
    let type_descriptor = cp.utf8(s.read_u2()?)?.to_string();
    let is_retention = type_descriptor == RETENTION;
    let num_element_value_pairs = s.read_u2()?;
    let mut retained = None;
    for _ in 0..num_element_value_pairs {
        let key = cp.utf8(s.read_u2()?)?;
        let keep = is_retention && key == "value";
        let key = key.to_string();
        if let Some(value) = read_element_value(s, cp, keep)? {
            if retained.is_some() {
                debug!("duplicate retention value element on {type_descriptor}; keeping the last");
            }
            retained = Some((key, value));
        }
    }
    Ok(retained.map(|pair| Annotation {
        type_descriptor,
        visible: true,
        pairs: vec![pair],
    }))
}

/// Read one tagged element value. `keep` is set only while reading the
/// `value` element of `@Retention`; everything else is consumed and
/// discarded, including nested annotations and arrays.
fn read_element_value(
    s: &mut ClassFileStream<'_>,
    cp: &ConstantPool,
    keep: bool,
) -> error::Result<Option<ElementValue>> {
    match s.read_u1()? {
        elemtag::BYTE
        | elemtag::CHAR
        | elemtag::DOUBLE
        | elemtag::FLOAT
        | elemtag::INT
        | elemtag::LONG
        | elemtag::SHORT
        | elemtag::BOOLEAN
        | elemtag::STRING => {
            // constant index
            s.skip(2)?;
            Ok(None)
        }
        elemtag::ENUM => {
            let type_name_index = s.read_u2()?;
            let const_name_index = s.read_u2()?;
            if keep {
                let type_name = cp.utf8(type_name_index)?;
                if type_name == RETENTION_POLICY {
                    return Ok(Some(ElementValue::EnumConst {
                        type_name: type_name.to_string(),
                        const_name: cp.utf8(const_name_index)?.to_string(),
                    }));
                }
            }
            Ok(None)
        }
        elemtag::CLASS => {
            // class-info index
            s.skip(2)?;
            Ok(None)
        }
        elemtag::ANNOTATION => {
            read_annotation(s, cp)?;
            Ok(None)
        }
        elemtag::ARRAY => {
            let num_values = s.read_u2()?;
            for _ in 0..num_values {
                read_element_value(s, cp, false)?;
            }
            Ok(None)
        }
        v => Err(ClassFileError::BadTag(v)),
    }
}
