use fxhash::FxHashMap;

/// Opaque identity of a named class.
///
/// A symbol is an index into the [`SymbolTable`] it was interned by, so
/// equality of symbols is equality of fully-qualified binary names and
/// comparisons in lookup paths stay O(1).
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassSymbol(pub u32);

impl ClassSymbol {
    /// `java/lang/Object`.
    pub const OBJECT: ClassSymbol = ClassSymbol(0);
    /// `java/lang/Enum`.
    pub const ENUM: ClassSymbol = ClassSymbol(1);
    /// `java/lang/annotation/Annotation`.
    pub const ANNOTATION: ClassSymbol = ClassSymbol(2);
}

/// Interns fully-qualified binary class names.
pub struct SymbolTable {
    names: Vec<String>,
    lookup: FxHashMap<String, u32>,
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut table = Self {
            names: Vec::new(),
            lookup: FxHashMap::default(),
        };
        // reserved symbols, in ClassSymbol constant order
        table.intern("java/lang/Object");
        table.intern("java/lang/Enum");
        table.intern("java/lang/annotation/Annotation");
        table
    }

    /// Intern a binary name, returning the existing symbol when the name
    /// has been seen before.
    pub fn intern(&mut self, binary_name: &str) -> ClassSymbol {
        if let Some(&index) = self.lookup.get(binary_name) {
            return ClassSymbol(index);
        }
        let index = self.names.len() as u32;
        self.names.push(binary_name.to_string());
        self.lookup.insert(binary_name.to_string(), index);
        ClassSymbol(index)
    }

    /// The symbol of an already-interned name.
    pub fn get(&self, binary_name: &str) -> Option<ClassSymbol> {
        self.lookup.get(binary_name).map(|&index| ClassSymbol(index))
    }

    /// The binary name a symbol was interned from.
    pub fn binary_name(&self, sym: ClassSymbol) -> &str {
        &self.names[sym.0 as usize]
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
