use crate::{env::Env, error::BindResult, sym::ClassSymbol};

/// Search a class and its supertypes for a member type.
///
/// Direct members first, then the superclass transitively, then each
/// interface in declaration order; the first match wins. Diagnosing
/// ambiguity between distinct matches belongs to a later pass. Supertypes
/// that are not yet in the environment simply end their branch of the
/// search.
pub fn resolve(env: &dyn Env, sym: ClassSymbol, name: &str) -> BindResult<Option<ClassSymbol>> {
    let Some(info) = env.entry(sym)? else {
        return Ok(None);
    };
    if let Some(member) = info.member(name) {
        return Ok(Some(member));
    }
    if let Some(superclass) = info.superclass() {
        if let Some(member) = resolve(env, superclass, name)? {
            return Ok(Some(member));
        }
    }
    for &interface in info.interfaces() {
        if let Some(member) = resolve(env, interface, name)? {
            return Ok(Some(member));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use fxhash::FxHashMap;

    use super::*;
    use crate::access::Access;
    use crate::env::{HeaderBound, SimpleEnv};
    use crate::tree::TypeKind;

    struct Fake {
        superclass: Option<ClassSymbol>,
        interfaces: Vec<ClassSymbol>,
        members: FxHashMap<String, ClassSymbol>,
    }

    impl Fake {
        fn new(
            superclass: Option<ClassSymbol>,
            interfaces: Vec<ClassSymbol>,
            members: &[(&str, ClassSymbol)],
        ) -> Rc<Self> {
            Rc::new(Self {
                superclass,
                interfaces,
                members: members.iter().map(|(n, s)| (n.to_string(), *s)).collect(),
            })
        }
    }

    impl HeaderBound for Fake {
        fn kind(&self) -> TypeKind {
            TypeKind::Class
        }
        fn owner(&self) -> Option<ClassSymbol> {
            None
        }
        fn access(&self) -> Access {
            Access::empty()
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

    #[test]
    fn direct_members_shadow_inherited_ones() {
        let (a, b) = (ClassSymbol(10), ClassSymbol(11));
        let (own, inherited) = (ClassSymbol(20), ClassSymbol(21));
        let mut env = SimpleEnv::new();
        env.insert(a, Fake::new(Some(b), vec![], &[("M", own)]));
        env.insert(b, Fake::new(None, vec![], &[("M", inherited), ("N", inherited)]));
        assert_eq!(resolve(&env, a, "M").unwrap(), Some(own));
        assert_eq!(resolve(&env, a, "N").unwrap(), Some(inherited));
    }

    #[test]
    fn the_superclass_wins_over_interfaces() {
        let (a, sup, iface) = (ClassSymbol(10), ClassSymbol(11), ClassSymbol(12));
        let (from_super, from_iface) = (ClassSymbol(20), ClassSymbol(21));
        let mut env = SimpleEnv::new();
        env.insert(a, Fake::new(Some(sup), vec![iface], &[]));
        env.insert(sup, Fake::new(None, vec![], &[("M", from_super)]));
        env.insert(iface, Fake::new(None, vec![], &[("M", from_iface), ("I", from_iface)]));
        assert_eq!(resolve(&env, a, "M").unwrap(), Some(from_super));
        assert_eq!(resolve(&env, a, "I").unwrap(), Some(from_iface));
    }

    #[test]
    fn unknown_names_resolve_to_none() {
        let a = ClassSymbol(10);
        let mut env = SimpleEnv::new();
        env.insert(a, Fake::new(None, vec![], &[]));
        assert_eq!(resolve(&env, a, "Nope").unwrap(), None);
        // symbols absent from the environment end the search quietly
        assert_eq!(resolve(&env, ClassSymbol(99), "Nope").unwrap(), None);
    }
}
