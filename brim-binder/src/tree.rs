use crate::access::Access;

/// The kind of a type declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

/// A possibly-qualified type expression, as a left-recursive chain:
/// `A.B.C` is the node for `C` whose base is the node for `A.B`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassTy {
    pub base: Option<Box<ClassTy>>,
    pub name: String,
}

impl ClassTy {
    /// A single simple name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            base: None,
            name: name.into(),
        }
    }

    /// Extend this expression with a member selection.
    pub fn select(self, name: impl Into<String>) -> Self {
        Self {
            base: Some(Box::new(self)),
            name: name.into(),
        }
    }

    /// The simple names of the chain, outermost first.
    pub fn flatten(&self) -> Vec<String> {
        let mut names = Vec::new();
        let mut curr = Some(self);
        while let Some(ty) = curr {
            names.push(ty.name.clone());
            curr = ty.base.as_deref();
        }
        names.reverse();
        names
    }

    /// The dotted source form, for diagnostics.
    pub fn qualified_name(&self) -> String {
        self.flatten().join(".")
    }
}

/// One type declaration, as handed over by the parser.
#[derive(Clone, Debug)]
pub struct TyDecl {
    /// The simple name of the declaration.
    pub name: String,
    pub kind: TypeKind,
    /// The declared modifiers. Enum constants with class bodies arrive
    /// marked `ENUM_IMPL`.
    pub mods: Access,
    /// The extends clause, when one was written.
    pub xtends: Option<ClassTy>,
    /// The implements (or interface extends) clause, in source order.
    pub impls: Vec<ClassTy>,
    /// The declared members.
    pub members: Vec<Member>,
}

/// A member of a type declaration.
#[derive(Clone, Debug)]
pub enum Member {
    Field(FieldDecl),
    Method(MethodDecl),
    Type(TyDecl),
}

/// A variable declaration. Enum constants are fields of their enum.
#[derive(Clone, Debug)]
pub struct FieldDecl {
    pub mods: Access,
    pub name: String,
}

/// A method declaration. Bodies are not represented at the header level.
#[derive(Clone, Debug)]
pub struct MethodDecl {
    pub mods: Access,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chains_flatten_outermost_first() {
        let ty = ClassTy::named("Outer").select("Mid").select("Inner");
        assert_eq!(ty.flatten(), ["Outer", "Mid", "Inner"]);
        assert_eq!(ty.qualified_name(), "Outer.Mid.Inner");
    }

    #[test]
    fn simple_names_flatten_to_themselves() {
        assert_eq!(ClassTy::named("List").flatten(), ["List"]);
    }
}
