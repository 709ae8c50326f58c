use std::rc::Rc;

use fxhash::FxHashMap;
use log::trace;

use crate::{
    access::{Access, Visibility},
    env::{Env, HeaderBound, SourceClass},
    error::{BindError, BindResult},
    resolve::resolve,
    scope::{LookupKey, LookupResult, Scope},
    sym::ClassSymbol,
    tree::{ClassTy, Member, TyDecl, TypeKind},
};

/// The result of hierarchy-binding one source class: the underlying
/// declaration plus everything this pass resolved.
#[derive(Clone, Debug)]
pub struct SourceHeaderBoundClass {
    pub decl: Rc<TyDecl>,
    pub owner: Option<ClassSymbol>,
    /// The finalized access flags, with every implicit bit applied.
    pub access: Access,
    pub visibility: Visibility,
    pub superclass: Option<ClassSymbol>,
    /// Resolved interfaces, in the order written in source.
    pub interfaces: Vec<ClassSymbol>,
    members: FxHashMap<String, ClassSymbol>,
}

impl HeaderBound for SourceHeaderBoundClass {
    fn kind(&self) -> TypeKind {
        self.decl.kind
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

/// Computes finalized access flags, visibility, superclass, and
/// interfaces for one source class.
///
/// Binding only reads the environment, so classes may be bound in any
/// order once every member-type map is in place. Compiling the hierarchy
/// root itself is unsupported: a declaration without an extends clause
/// always gets a superclass.
pub struct HierarchyBinder<'a> {
    env: &'a dyn Env,
    base: &'a SourceClass,
}

impl<'a> HierarchyBinder<'a> {
    pub fn new(env: &'a dyn Env, base: &'a SourceClass) -> Self {
        Self { env, base }
    }

    pub fn bind(&self) -> BindResult<SourceHeaderBoundClass> {
        let decl = &self.base.decl;
        trace!("hierarchy binding {}", decl.name);

        let mut access = decl.mods;
        access |= match decl.kind {
            TypeKind::Class => Access::SUPER,
            TypeKind::Interface => Access::ABSTRACT | Access::INTERFACE,
            TypeKind::Enum => Access::ENUM | Access::SUPER,
            TypeKind::Annotation => Access::ABSTRACT | Access::INTERFACE | Access::ANNOTATION,
        };

        // member types of interfaces and annotations are public, whatever
        // the source says
        let enclosed = self.enclosed_by_interface()?;
        let visibility = if enclosed {
            access |= Access::PUBLIC;
            Visibility::Public
        } else {
            Visibility::from_access(access)
        };
        if !access.contains(Access::STATIC) && (decl.kind == TypeKind::Enum || enclosed) {
            access |= Access::STATIC;
        }

        let superclass = match &decl.xtends {
            Some(ty) => Some(self.resolve_class(ty)?),
            None => match decl.kind {
                TypeKind::Enum => {
                    // a constant with a body forces a subclass per constant
                    if self.has_specialized_constant() {
                        access |= Access::ABSTRACT;
                    } else {
                        access |= Access::FINAL;
                    }
                    Some(ClassSymbol::ENUM)
                }
                _ => Some(ClassSymbol::OBJECT),
            },
        };

        let mut interfaces = Vec::with_capacity(decl.impls.len());
        for ty in &decl.impls {
            interfaces.push(self.resolve_class(ty)?);
        }
        if decl.kind == TypeKind::Annotation && interfaces.is_empty() {
            interfaces.push(ClassSymbol::ANNOTATION);
        }

        Ok(SourceHeaderBoundClass {
            decl: Rc::clone(&self.base.decl),
            owner: self.base.owner,
            access,
            visibility,
            superclass,
            interfaces,
            members: self.base.members.clone(),
        })
    }

    /// True when any constant of this enum declares a class body.
    fn has_specialized_constant(&self) -> bool {
        self.base.decl.members.iter().any(|member| {
            matches!(member, Member::Field(field) if field.mods.contains(Access::ENUM_IMPL))
        })
    }

    /// True when some lexically enclosing class is an interface or an
    /// annotation. The declaration's own kind does not count.
    fn enclosed_by_interface(&self) -> BindResult<bool> {
        let mut curr = self.base.owner;
        while let Some(sym) = curr {
            let Some(info) = self.env.entry(sym)? else {
                break;
            };
            if matches!(info.kind(), TypeKind::Interface | TypeKind::Annotation) {
                return Ok(true);
            }
            curr = info.owner();
        }
        Ok(false)
    }

    /// Resolve a qualified type expression to a class symbol: find the
    /// base, then walk the remaining names as member accesses.
    fn resolve_class(&self, ty: &ClassTy) -> BindResult<ClassSymbol> {
        let key = LookupKey::new(ty.flatten());
        let Some(result) = self.lookup(&key)? else {
            return Err(BindError::Unresolved(ty.qualified_name()));
        };
        let mut sym = result.sym;
        for name in result.remaining.iter() {
            sym = match resolve(self.env, sym, name)? {
                Some(next) => next,
                None => {
                    return Err(BindError::MissingMember {
                        qualified: ty.qualified_name(),
                        name: name.to_string(),
                    })
                }
            };
        }
        Ok(sym)
    }

    /// Find the base of a qualified name. Member types visible from the
    /// class being bound and its enclosing classes shadow the compilation
    /// unit's scopes.
    fn lookup(&self, key: &LookupKey) -> BindResult<Option<LookupResult>> {
        let mut curr = Some(self.base.sym);
        while let Some(sym) = curr {
            if let Some(hit) = resolve(self.env, sym, key.first())? {
                return Ok(Some(LookupResult::new(hit, key)));
            }
            curr = match self.env.entry(sym)? {
                Some(info) => info.owner(),
                None => None,
            };
        }
        Ok(self.base.scope.lookup(key))
    }
}

/// Hierarchy-bind one source class against an environment.
pub fn bind(env: &dyn Env, class: &SourceClass) -> BindResult<SourceHeaderBoundClass> {
    HierarchyBinder::new(env, class).bind()
}
