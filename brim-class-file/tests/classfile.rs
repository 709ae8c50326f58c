use brim_class_file::error::ClassFileError;
use brim_class_file::item::attributes::ElementValue;
use brim_class_file::item::constant_pool::Const;
use brim_class_file::item::file::{ClassAccessFlags, ClassFile};

/// Builds constant pool bytes, tracking 1-based slot indices.
struct Pool {
    bytes: Vec<u8>,
    count: u16,
}

impl Pool {
    fn new() -> Self {
        Self {
            bytes: Vec::new(),
            count: 0,
        }
    }

    fn utf8(&mut self, s: &str) -> u16 {
        self.bytes.push(0x01);
        self.bytes.extend_from_slice(&(s.len() as u16).to_be_bytes());
        self.bytes.extend_from_slice(s.as_bytes());
        self.bump(1)
    }

    fn class(&mut self, name: &str) -> u16 {
        let name_index = self.utf8(name);
        self.bytes.push(0x07);
        self.bytes.extend_from_slice(&name_index.to_be_bytes());
        self.bump(1)
    }

    fn integer(&mut self, value: i32) -> u16 {
        self.bytes.push(0x03);
        self.bytes.extend_from_slice(&value.to_be_bytes());
        self.bump(1)
    }

    fn long(&mut self, value: i64) -> u16 {
        self.bytes.push(0x05);
        self.bytes.extend_from_slice(&value.to_be_bytes());
        self.bump(2)
    }

    fn bump(&mut self, slots: u16) -> u16 {
        let index = self.count + 1;
        self.count += slots;
        index
    }
}

fn attribute(name_index: u16, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&name_index.to_be_bytes());
    out.extend_from_slice(&(body.len() as u32).to_be_bytes());
    out.extend_from_slice(body);
    out
}

/// A field_info or method_info structure; the two share a layout.
fn member(access: u16, name_index: u16, descriptor_index: u16, attributes: &[Vec<u8>]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&access.to_be_bytes());
    out.extend_from_slice(&name_index.to_be_bytes());
    out.extend_from_slice(&descriptor_index.to_be_bytes());
    out.extend_from_slice(&(attributes.len() as u16).to_be_bytes());
    for attribute in attributes {
        out.extend_from_slice(attribute);
    }
    out
}

fn assemble(
    pool: &Pool,
    access: u16,
    this_class: u16,
    super_class: u16,
    interfaces: &[u16],
    fields: &[Vec<u8>],
    methods: &[Vec<u8>],
    attributes: &[Vec<u8>],
) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&0xCAFE_BABE_u32.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes()); // minor
    out.extend_from_slice(&52u16.to_be_bytes()); // major
    out.extend_from_slice(&(pool.count + 1).to_be_bytes());
    out.extend_from_slice(&pool.bytes);
    out.extend_from_slice(&access.to_be_bytes());
    out.extend_from_slice(&this_class.to_be_bytes());
    out.extend_from_slice(&super_class.to_be_bytes());
    out.extend_from_slice(&(interfaces.len() as u16).to_be_bytes());
    for interface in interfaces {
        out.extend_from_slice(&interface.to_be_bytes());
    }
    for section in [fields, methods] {
        out.extend_from_slice(&(section.len() as u16).to_be_bytes());
        for item in section {
            out.extend_from_slice(item);
        }
    }
    out.extend_from_slice(&(attributes.len() as u16).to_be_bytes());
    for attribute in attributes {
        out.extend_from_slice(attribute);
    }
    out
}

#[test]
fn reads_the_header_and_interface_order() {
    let mut pool = Pool::new();
    let this_class = pool.class("p/Main");
    let super_class = pool.class("java/lang/Object");
    let first = pool.class("p/First");
    let second = pool.class("p/Second");
    let bytes = assemble(
        &pool,
        0x0021,
        this_class,
        super_class,
        &[first, second],
        &[],
        &[],
        &[],
    );
    let class_file = ClassFile::read(&bytes).unwrap();
    assert_eq!(class_file.name, "p/Main");
    assert_eq!(class_file.version, (52, 0));
    assert_eq!(class_file.super_class.as_deref(), Some("java/lang/Object"));
    assert_eq!(class_file.interfaces, ["p/First", "p/Second"]);
    assert!(class_file
        .access_flags
        .contains(ClassAccessFlags::ACC_PUBLIC | ClassAccessFlags::ACC_SUPER));
    assert!(class_file.annotations.is_empty());
    assert!(class_file.inner_classes.is_empty());
}

#[test]
fn rejects_bad_magic() {
    let mut pool = Pool::new();
    let this_class = pool.class("p/Main");
    let super_class = pool.class("java/lang/Object");
    let mut bytes = assemble(&pool, 0x0021, this_class, super_class, &[], &[], &[], &[]);
    bytes[0] = 0xde;
    assert!(matches!(
        ClassFile::read(&bytes),
        Err(ClassFileError::BadMagic(_))
    ));
}

#[test]
fn rejects_majors_outside_the_supported_range() {
    let mut pool = Pool::new();
    let this_class = pool.class("p/Main");
    let super_class = pool.class("java/lang/Object");
    let mut bytes = assemble(&pool, 0x0021, this_class, super_class, &[], &[], &[], &[]);
    bytes[7] = 53;
    assert!(matches!(
        ClassFile::read(&bytes),
        Err(ClassFileError::BadVersion(53))
    ));
    bytes[7] = 45;
    assert!(ClassFile::read(&bytes).is_ok());
}

#[test]
fn rejects_truncated_files() {
    let mut pool = Pool::new();
    let this_class = pool.class("p/Main");
    let super_class = pool.class("java/lang/Object");
    let bytes = assemble(&pool, 0x0021, this_class, super_class, &[], &[], &[], &[]);
    assert!(matches!(
        ClassFile::read(&bytes[..bytes.len() - 3]),
        Err(ClassFileError::Truncated(_))
    ));
}

#[test]
fn the_hierarchy_root_has_no_superclass() {
    let mut pool = Pool::new();
    let this_class = pool.class("java/lang/Object");
    let bytes = assemble(&pool, 0x0021, this_class, 0, &[], &[], &[], &[]);
    assert_eq!(ClassFile::read(&bytes).unwrap().super_class, None);
}

#[test]
fn fields_keep_constants_and_signatures() {
    let mut pool = Pool::new();
    let this_class = pool.class("p/Consts");
    let super_class = pool.class("java/lang/Object");
    let answer = pool.long(42); // occupies two slots
    let name = pool.utf8("ANSWER");
    let descriptor = pool.utf8("J");
    let constant_value = pool.utf8("ConstantValue");
    let limit = pool.integer(7);
    let limit_name = pool.utf8("LIMIT");
    let int_descriptor = pool.utf8("I");
    let fields = [
        member(
            0x0019,
            name,
            descriptor,
            &[attribute(constant_value, &answer.to_be_bytes())],
        ),
        member(
            0x0019,
            limit_name,
            int_descriptor,
            &[attribute(constant_value, &limit.to_be_bytes())],
        ),
    ];
    let bytes = assemble(
        &pool, 0x0021, this_class, super_class, &[], &fields, &[], &[],
    );
    let class_file = ClassFile::read(&bytes).unwrap();
    assert_eq!(class_file.fields[0].name, "ANSWER");
    assert_eq!(class_file.fields[0].descriptor, "J");
    assert_eq!(class_file.fields[0].constant_value, Some(Const::Long(42)));
    assert_eq!(class_file.fields[0].signature, None);
    assert_eq!(class_file.fields[1].constant_value, Some(Const::Integer(7)));
}

#[test]
fn fields_keep_generic_signatures() {
    let mut pool = Pool::new();
    let this_class = pool.class("p/Holder");
    let super_class = pool.class("java/lang/Object");
    let name = pool.utf8("value");
    let descriptor = pool.utf8("Ljava/lang/Object;");
    let signature = pool.utf8("Signature");
    let signature_text = pool.utf8("TT;");
    let field = member(
        0x0002,
        name,
        descriptor,
        &[attribute(signature, &signature_text.to_be_bytes())],
    );
    let bytes = assemble(
        &pool, 0x0021, this_class, super_class, &[], &[field], &[], &[],
    );
    let class_file = ClassFile::read(&bytes).unwrap();
    assert_eq!(class_file.fields[0].signature.as_deref(), Some("TT;"));
    assert_eq!(class_file.fields[0].constant_value, None);
}

#[test]
fn methods_keep_thrown_exceptions() {
    let mut pool = Pool::new();
    let this_class = pool.class("p/Thrower");
    let super_class = pool.class("java/lang/Object");
    let name = pool.utf8("run");
    let descriptor = pool.utf8("()V");
    let exceptions = pool.utf8("Exceptions");
    let io = pool.class("java/io/IOException");
    let app = pool.class("p/AppException");
    let mut body = Vec::new();
    body.extend_from_slice(&2u16.to_be_bytes());
    body.extend_from_slice(&io.to_be_bytes());
    body.extend_from_slice(&app.to_be_bytes());
    let method = member(0x0001, name, descriptor, &[attribute(exceptions, &body)]);
    let bytes = assemble(
        &pool, 0x0021, this_class, super_class, &[], &[], &[method], &[],
    );
    let class_file = ClassFile::read(&bytes).unwrap();
    assert_eq!(class_file.methods[0].name, "run");
    assert_eq!(
        class_file.methods[0].exceptions,
        ["java/io/IOException", "p/AppException"]
    );
}

#[test]
fn unknown_attributes_are_skipped_by_length() {
    let mut pool = Pool::new();
    let this_class = pool.class("p/Odd");
    let super_class = pool.class("java/lang/Object");
    let foo = pool.utf8("Foo");
    let signature = pool.utf8("Signature");
    let signature_text = pool.utf8("<T:Ljava/lang/Object;>Ljava/lang/Object;");
    let attributes = [
        attribute(foo, &[0xde, 0xad, 0xbe, 0xef, 0x00]),
        attribute(signature, &signature_text.to_be_bytes()),
    ];
    let bytes = assemble(
        &pool,
        0x0021,
        this_class,
        super_class,
        &[],
        &[],
        &[],
        &attributes,
    );
    // the Signature after Foo only parses if the skip consumed exactly
    // the declared length
    let class_file = ClassFile::read(&bytes).unwrap();
    assert_eq!(
        class_file.signature.as_deref(),
        Some("<T:Ljava/lang/Object;>Ljava/lang/Object;")
    );
}

#[test]
fn keeps_only_inner_class_records_that_mention_this_class() {
    let mut pool = Pool::new();
    let this_class = pool.class("p/Outer");
    let super_class = pool.class("java/lang/Object");
    let inner = pool.class("p/Outer$In");
    let inner_simple = pool.utf8("In");
    let unrelated = pool.class("q/Other$Nested");
    let unrelated_outer = pool.class("q/Other");
    let unrelated_simple = pool.utf8("Nested");
    let inner_classes = pool.utf8("InnerClasses");
    let mut body = Vec::new();
    body.extend_from_slice(&2u16.to_be_bytes());
    // p/Outer$In, a member of this class
    body.extend_from_slice(&inner.to_be_bytes());
    body.extend_from_slice(&this_class.to_be_bytes());
    body.extend_from_slice(&inner_simple.to_be_bytes());
    body.extend_from_slice(&0x0002u16.to_be_bytes());
    // q/Other$Nested, unrelated
    body.extend_from_slice(&unrelated.to_be_bytes());
    body.extend_from_slice(&unrelated_outer.to_be_bytes());
    body.extend_from_slice(&unrelated_simple.to_be_bytes());
    body.extend_from_slice(&0x0001u16.to_be_bytes());
    let bytes = assemble(
        &pool,
        0x0021,
        this_class,
        super_class,
        &[],
        &[],
        &[],
        &[attribute(inner_classes, &body)],
    );
    let class_file = ClassFile::read(&bytes).unwrap();
    assert_eq!(class_file.inner_classes.len(), 1);
    let record = &class_file.inner_classes[0];
    assert_eq!(record.inner_class, "p/Outer$In");
    assert_eq!(record.outer_class.as_deref(), Some("p/Outer"));
    assert_eq!(record.inner_name.as_deref(), Some("In"));
    assert!(record.access_flags.contains(ClassAccessFlags::ACC_PRIVATE));
}

#[test]
fn anonymous_inner_records_have_unset_names() {
    let mut pool = Pool::new();
    let this_class = pool.class("p/Outer$1");
    let super_class = pool.class("java/lang/Object");
    let inner_classes = pool.utf8("InnerClasses");
    let mut body = Vec::new();
    body.extend_from_slice(&1u16.to_be_bytes());
    body.extend_from_slice(&this_class.to_be_bytes());
    body.extend_from_slice(&0u16.to_be_bytes()); // no outer
    body.extend_from_slice(&0u16.to_be_bytes()); // no simple name
    body.extend_from_slice(&0u16.to_be_bytes());
    let bytes = assemble(
        &pool,
        0x0020,
        this_class,
        super_class,
        &[],
        &[],
        &[],
        &[attribute(inner_classes, &body)],
    );
    let class_file = ClassFile::read(&bytes).unwrap();
    let record = &class_file.inner_classes[0];
    assert_eq!(record.outer_class, None);
    assert_eq!(record.inner_name, None);
}

/// Pool indices for the retention annotation body.
struct RetentionPool {
    pool: Pool,
    this_class: u16,
    super_class: u16,
    annotation_iface: u16,
    runtime_visible: u16,
    retention: u16,
    value: u16,
    policy: u16,
    runtime: u16,
}

fn retention_pool(type_descriptor: &str) -> RetentionPool {
    let mut pool = Pool::new();
    let this_class = pool.class("p/Anno");
    let super_class = pool.class("java/lang/Object");
    let annotation_iface = pool.class("java/lang/annotation/Annotation");
    let runtime_visible = pool.utf8("RuntimeVisibleAnnotations");
    let retention = pool.utf8(type_descriptor);
    let value = pool.utf8("value");
    let policy = pool.utf8("Ljava/lang/annotation/RetentionPolicy;");
    let runtime = pool.utf8("RUNTIME");
    RetentionPool {
        pool,
        this_class,
        super_class,
        annotation_iface,
        runtime_visible,
        retention,
        value,
        policy,
        runtime,
    }
}

fn retention_body(p: &RetentionPool) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&1u16.to_be_bytes()); // one annotation
    body.extend_from_slice(&p.retention.to_be_bytes());
    body.extend_from_slice(&1u16.to_be_bytes()); // one pair
    body.extend_from_slice(&p.value.to_be_bytes());
    body.push(b'e');
    body.extend_from_slice(&p.policy.to_be_bytes());
    body.extend_from_slice(&p.runtime.to_be_bytes());
    body
}

#[test]
fn retention_survives_on_annotation_declarations() {
    let p = retention_pool("Ljava/lang/annotation/Retention;");
    let body = retention_body(&p);
    let bytes = assemble(
        &p.pool,
        0x2601, // PUBLIC | INTERFACE | ABSTRACT | ANNOTATION
        p.this_class,
        p.super_class,
        &[p.annotation_iface],
        &[],
        &[],
        &[attribute(p.runtime_visible, &body)],
    );
    let class_file = ClassFile::read(&bytes).unwrap();
    assert_eq!(class_file.annotations.len(), 1);
    let annotation = &class_file.annotations[0];
    assert_eq!(
        annotation.type_descriptor,
        "Ljava/lang/annotation/Retention;"
    );
    assert!(annotation.visible);
    assert_eq!(
        annotation.pairs,
        [(
            "value".to_string(),
            ElementValue::EnumConst {
                type_name: "Ljava/lang/annotation/RetentionPolicy;".to_string(),
                const_name: "RUNTIME".to_string(),
            }
        )]
    );
}

#[test]
fn annotations_on_plain_classes_are_skipped() {
    let p = retention_pool("Ljava/lang/annotation/Retention;");
    let body = retention_body(&p);
    let bytes = assemble(
        &p.pool,
        0x0021,
        p.this_class,
        p.super_class,
        &[],
        &[],
        &[],
        &[attribute(p.runtime_visible, &body)],
    );
    let class_file = ClassFile::read(&bytes).unwrap();
    assert!(class_file.annotations.is_empty());
}

#[test]
fn other_annotation_types_are_discarded() {
    let p = retention_pool("Lp/SomethingElse;");
    let body = retention_body(&p);
    let bytes = assemble(
        &p.pool,
        0x2601,
        p.this_class,
        p.super_class,
        &[p.annotation_iface],
        &[],
        &[],
        &[attribute(p.runtime_visible, &body)],
    );
    let class_file = ClassFile::read(&bytes).unwrap();
    assert!(class_file.annotations.is_empty());
}

#[test]
fn non_value_elements_and_other_tags_are_discarded() {
    let mut p = retention_pool("Ljava/lang/annotation/Retention;");
    let other_key = p.pool.utf8("other");
    let constant = p.pool.integer(3);
    let mut body = Vec::new();
    body.extend_from_slice(&1u16.to_be_bytes()); // one annotation
    body.extend_from_slice(&p.retention.to_be_bytes());
    body.extend_from_slice(&2u16.to_be_bytes()); // two pairs
    // "other" -> enum constant: wrong key, discarded
    body.extend_from_slice(&other_key.to_be_bytes());
    body.push(b'e');
    body.extend_from_slice(&p.policy.to_be_bytes());
    body.extend_from_slice(&p.runtime.to_be_bytes());
    // "value" -> array of an int constant and a nested annotation: wrong
    // tags, consumed and discarded
    body.extend_from_slice(&p.value.to_be_bytes());
    body.push(b'[');
    body.extend_from_slice(&2u16.to_be_bytes());
    body.push(b'I');
    body.extend_from_slice(&constant.to_be_bytes());
    body.push(b'@');
    body.extend_from_slice(&p.retention.to_be_bytes());
    body.extend_from_slice(&0u16.to_be_bytes());
    let bytes = assemble(
        &p.pool,
        0x2601,
        p.this_class,
        p.super_class,
        &[p.annotation_iface],
        &[],
        &[],
        &[attribute(p.runtime_visible, &body)],
    );
    let class_file = ClassFile::read(&bytes).unwrap();
    assert!(class_file.annotations.is_empty());
}

#[test]
fn unknown_element_tags_fail() {
    let p = retention_pool("Ljava/lang/annotation/Retention;");
    let mut body = Vec::new();
    body.extend_from_slice(&1u16.to_be_bytes());
    body.extend_from_slice(&p.retention.to_be_bytes());
    body.extend_from_slice(&1u16.to_be_bytes());
    body.extend_from_slice(&p.value.to_be_bytes());
    body.push(b'X');
    body.extend_from_slice(&p.runtime.to_be_bytes());
    let bytes = assemble(
        &p.pool,
        0x2601,
        p.this_class,
        p.super_class,
        &[p.annotation_iface],
        &[],
        &[],
        &[attribute(p.runtime_visible, &body)],
    );
    assert!(matches!(
        ClassFile::read(&bytes),
        Err(ClassFileError::BadTag(b'X'))
    ));
}
