use std::cell::RefCell;
use std::rc::Rc;

use brim_class_file::{error::ClassFileError, item::file::ClassFile};
use fxhash::FxHashMap;
use log::trace;

use crate::{
    access::Access,
    scope::CompoundScope,
    sym::{ClassSymbol, SymbolTable},
    tree::{TyDecl, TypeKind},
};

/// The header-level view of a class, as stored in an environment.
pub trait HeaderBound {
    fn kind(&self) -> TypeKind;
    /// The enclosing class, when this is a member type.
    fn owner(&self) -> Option<ClassSymbol>;
    fn access(&self) -> Access;
    /// Absent until hierarchy binding has run, and for the hierarchy root.
    fn superclass(&self) -> Option<ClassSymbol>;
    fn interfaces(&self) -> &[ClassSymbol];
    /// Look up a direct member type by simple name.
    fn member(&self, name: &str) -> Option<ClassSymbol>;
}

/// A read-only mapping from class symbol to bound class.
///
/// Lookup is expected to be total for every symbol the binder encounters;
/// an absent entry ends the search that asked for it. Entries materialized
/// from class-file bytes can fail to parse, and those errors surface to
/// the caller unchanged.
pub trait Env {
    fn entry(&self, sym: ClassSymbol) -> Result<Option<Rc<dyn HeaderBound>>, ClassFileError>;
}

/// A source class before hierarchy binding: the declaration, its owner,
/// its member-type map, and the scope of its compilation unit.
///
/// Member maps come from an earlier pass over lexical containment alone,
/// so this partial view exists before any supertype has been resolved.
pub struct SourceClass {
    pub sym: ClassSymbol,
    pub owner: Option<ClassSymbol>,
    pub decl: Rc<TyDecl>,
    pub members: FxHashMap<String, ClassSymbol>,
    pub scope: CompoundScope,
}

impl HeaderBound for SourceClass {
    fn kind(&self) -> TypeKind {
        self.decl.kind
    }

    fn owner(&self) -> Option<ClassSymbol> {
        self.owner
    }

    fn access(&self) -> Access {
        self.decl.mods
    }

    fn superclass(&self) -> Option<ClassSymbol> {
        None
    }

    fn interfaces(&self) -> &[ClassSymbol] {
        &[]
    }

    fn member(&self, name: &str) -> Option<ClassSymbol> {
        self.members.get(name).copied()
    }
}

/// A dependency class bound from a parsed class file.
pub struct BinaryClass {
    kind: TypeKind,
    owner: Option<ClassSymbol>,
    access: Access,
    superclass: Option<ClassSymbol>,
    interfaces: Vec<ClassSymbol>,
    members: FxHashMap<String, ClassSymbol>,
}

impl BinaryClass {
    pub fn new(class_file: &ClassFile, symbols: &mut SymbolTable) -> Self {
        let mut access = Access::from(class_file.access_flags);
        let mut owner = None;
        let mut members = FxHashMap::default();
        for record in &class_file.inner_classes {
            if record.inner_class == class_file.name {
                // the class's own record carries its source-level flags
                access = Access::from(record.access_flags);
                if let Some(outer) = &record.outer_class {
                    owner = Some(symbols.intern(outer));
                }
            } else if record.outer_class.as_deref() == Some(class_file.name.as_str()) {
                if let Some(simple) = &record.inner_name {
                    members.insert(simple.clone(), symbols.intern(&record.inner_class));
                }
            }
        }
        let kind = if access.contains(Access::ANNOTATION) {
            TypeKind::Annotation
        } else if access.contains(Access::INTERFACE) {
            TypeKind::Interface
        } else if access.contains(Access::ENUM) {
            TypeKind::Enum
        } else {
            TypeKind::Class
        };
        let superclass = class_file.super_class.as_deref().map(|n| symbols.intern(n));
        let interfaces = class_file
            .interfaces
            .iter()
            .map(|n| symbols.intern(n))
            .collect();
        Self {
            kind,
            owner,
            access,
            superclass,
            interfaces,
            members,
        }
    }
}

impl HeaderBound for BinaryClass {
    fn kind(&self) -> TypeKind {
        self.kind
    }

    fn owner(&self) -> Option<ClassSymbol> {
        self.owner
    }

    fn access(&self) -> Access {
        self.access
    }

    fn superclass(&self) -> Option<ClassSymbol> {
        self.superclass
    }

    fn interfaces(&self) -> &[ClassSymbol] {
        &self.interfaces
    }

    fn member(&self, name: &str) -> Option<ClassSymbol> {
        self.members.get(name).copied()
    }
}

/// A fixed store of already-constructed bound classes.
#[derive(Default)]
pub struct SimpleEnv {
    classes: FxHashMap<ClassSymbol, Rc<dyn HeaderBound>>,
}

impl SimpleEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sym: ClassSymbol, class: Rc<dyn HeaderBound>) {
        self.classes.insert(sym, class);
    }
}

impl Env for SimpleEnv {
    fn entry(&self, sym: ClassSymbol) -> Result<Option<Rc<dyn HeaderBound>>, ClassFileError> {
        Ok(self.classes.get(&sym).cloned())
    }
}

/// Class-path entries, materialized into bound classes on first access.
///
/// Bytes are registered up front by an external loader; parsing and
/// binding happen lazily and are memoized. The symbol table is shared
/// because materialization interns the names a class file mentions.
pub struct ClassPathEnv {
    bytes: FxHashMap<ClassSymbol, Vec<u8>>,
    cache: RefCell<FxHashMap<ClassSymbol, Rc<dyn HeaderBound>>>,
    symbols: Rc<RefCell<SymbolTable>>,
}

impl ClassPathEnv {
    pub fn new(symbols: Rc<RefCell<SymbolTable>>) -> Self {
        Self {
            bytes: FxHashMap::default(),
            cache: RefCell::new(FxHashMap::default()),
            symbols,
        }
    }

    /// Register the bytes of one class-path entry.
    pub fn put(&mut self, sym: ClassSymbol, data: Vec<u8>) {
        self.bytes.insert(sym, data);
    }
}

impl Env for ClassPathEnv {
    fn entry(&self, sym: ClassSymbol) -> Result<Option<Rc<dyn HeaderBound>>, ClassFileError> {
        if let Some(bound) = self.cache.borrow().get(&sym) {
            return Ok(Some(bound.clone()));
        }
        let Some(data) = self.bytes.get(&sym) else {
            return Ok(None);
        };
        let class_file = ClassFile::read(data)?;
        trace!("materialized {} from the class path", class_file.name);
        let bound: Rc<dyn HeaderBound> =
            Rc::new(BinaryClass::new(&class_file, &mut self.symbols.borrow_mut()));
        self.cache.borrow_mut().insert(sym, bound.clone());
        Ok(Some(bound))
    }
}

/// Two environments composed into one view; the base answers first.
pub struct CompoundEnv<A, B> {
    base: A,
    next: B,
}

impl<A: Env, B: Env> CompoundEnv<A, B> {
    pub fn new(base: A, next: B) -> Self {
        Self { base, next }
    }
}

impl<A: Env, B: Env> Env for CompoundEnv<A, B> {
    fn entry(&self, sym: ClassSymbol) -> Result<Option<Rc<dyn HeaderBound>>, ClassFileError> {
        if let Some(bound) = self.base.entry(sym)? {
            return Ok(Some(bound));
        }
        self.next.entry(sym)
    }
}
