use std::rc::Rc;

use fxhash::FxHashMap;

use crate::sym::ClassSymbol;

/// An ordered sequence of simple names with a cursor over the part not
/// yet consumed. Built non-empty; becomes empty as names are consumed.
#[derive(Clone, Debug)]
pub struct LookupKey {
    names: Rc<[String]>,
    pos: usize,
}

impl LookupKey {
    pub fn new(names: Vec<String>) -> Self {
        debug_assert!(!names.is_empty());
        Self {
            names: names.into(),
            pos: 0,
        }
    }

    /// The next unconsumed name. Must not be called on an exhausted key.
    pub fn first(&self) -> &str {
        &self.names[self.pos]
    }

    /// The key with the first name consumed.
    pub fn rest(&self) -> Self {
        Self {
            names: self.names.clone(),
            pos: self.pos + 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.names.len()
    }

    /// The unconsumed names, in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.names[self.pos..].iter().map(String::as_str)
    }
}

/// A resolved base symbol plus the names still to be resolved against it
/// as member accesses.
#[derive(Clone, Debug)]
pub struct LookupResult {
    pub sym: ClassSymbol,
    pub remaining: LookupKey,
}

impl LookupResult {
    /// `key` is the key whose first name resolved to `sym`; the remainder
    /// excludes that consumed name.
    pub fn new(sym: ClassSymbol, key: &LookupKey) -> Self {
        Self {
            sym,
            remaining: key.rest(),
        }
    }
}

/// One name space consulted during base lookup.
pub trait Scope {
    fn lookup(&self, key: &LookupKey) -> Option<LookupResult>;
}

/// Simple names mapped directly to symbols: single-type imports and
/// same-package siblings.
#[derive(Default)]
pub struct MapScope {
    names: FxHashMap<String, ClassSymbol>,
}

impl MapScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, sym: ClassSymbol) {
        self.names.insert(name.into(), sym);
    }
}

impl Scope for MapScope {
    fn lookup(&self, key: &LookupKey) -> Option<LookupResult> {
        let sym = *self.names.get(key.first())?;
        Some(LookupResult::new(sym, key))
    }
}

/// Every known top-level class, keyed by binary name.
///
/// As a scope this consumes the shortest leading run of names that forms
/// a known class, leaving the rest to be walked as member accesses.
#[derive(Default)]
pub struct TopLevelIndex {
    classes: FxHashMap<String, ClassSymbol>,
}

impl TopLevelIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, binary_name: impl Into<String>, sym: ClassSymbol) {
        self.classes.insert(binary_name.into(), sym);
    }

    pub fn get(&self, binary_name: &str) -> Option<ClassSymbol> {
        self.classes.get(binary_name).copied()
    }
}

impl Scope for TopLevelIndex {
    fn lookup(&self, key: &LookupKey) -> Option<LookupResult> {
        let mut qualified = String::new();
        let mut curr = key.clone();
        loop {
            if !qualified.is_empty() {
                qualified.push('/');
            }
            qualified.push_str(curr.first());
            let rest = curr.rest();
            if let Some(&sym) = self.classes.get(qualified.as_str()) {
                return Some(LookupResult { sym, remaining: rest });
            }
            if rest.is_empty() {
                return None;
            }
            curr = rest;
        }
    }
}

/// An on-demand import of one package, answered through the top-level
/// index.
pub struct WildcardImportScope {
    package: String,
    index: Rc<TopLevelIndex>,
}

impl WildcardImportScope {
    pub fn new(package: impl Into<String>, index: Rc<TopLevelIndex>) -> Self {
        Self {
            package: package.into(),
            index,
        }
    }
}

impl Scope for WildcardImportScope {
    fn lookup(&self, key: &LookupKey) -> Option<LookupResult> {
        let sym = self.index.get(&format!("{}/{}", self.package, key.first()))?;
        Some(LookupResult::new(sym, key))
    }
}

/// An ordered stack of scopes; the first non-empty answer wins.
///
/// A compilation unit's scope stacks single-type imports over the current
/// package over on-demand imports over the implicit top level.
#[derive(Clone, Default)]
pub struct CompoundScope {
    scopes: Vec<Rc<dyn Scope>>,
}

impl CompoundScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scope below every scope already present.
    pub fn append(mut self, scope: Rc<dyn Scope>) -> Self {
        self.scopes.push(scope);
        self
    }
}

impl Scope for CompoundScope {
    fn lookup(&self, key: &LookupKey) -> Option<LookupResult> {
        self.scopes.iter().find_map(|scope| scope.lookup(key))
    }
}
