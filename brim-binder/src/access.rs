use brim_class_file::item::file::ClassAccessFlags;

bitflags::bitflags! {
    /// Access and property flags of a source-level class, widened past the
    /// class file's 16 bits to make room for source-only markers.
    pub struct Access: u32 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const SUPER = 0x0020;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
        /// Marks an enum constant declared with a class body. Never
        /// written to class files.
        const ENUM_IMPL = 0x0001_0000;
    }
}

impl From<ClassAccessFlags> for Access {
    fn from(flags: ClassAccessFlags) -> Self {
        Access::from_bits_truncate(u32::from(flags.bits()))
    }
}

/// The visibility of a declaration, derived from its access flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Package,
    Private,
}

impl Visibility {
    pub fn from_access(access: Access) -> Self {
        if access.contains(Access::PUBLIC) {
            Visibility::Public
        } else if access.contains(Access::PROTECTED) {
            Visibility::Protected
        } else if access.contains(Access::PRIVATE) {
            Visibility::Private
        } else {
            Visibility::Package
        }
    }
}
