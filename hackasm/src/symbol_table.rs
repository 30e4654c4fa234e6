//! Insertion-ordered symbol table mapping symbol names to addresses.
//!
//! Grounded in the teacher's `first_pass::symbol_table::SymbolTable`: a
//! single `Vec<(String, u16)>` rather than a `HashMap`, since a Hack
//! program's symbol count is the same order of magnitude as an LC-3
//! program's label count (a handful to a few dozen) and a linear scan is
//! simpler to reason about than hashing. Lives at the crate root rather
//! than nested under `first_pass` (as the teacher nests it) because Hack's
//! variable symbols are bound lazily by the encoder, during pass 2 — this
//! table is shared, mutable state between the two passes, not a first-pass
//! output alone.
pub struct SymbolTable {
    entries: Vec<(String, u16)>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

const PREDEFINED: &[(&str, u16)] = &[
    ("SP", 0),
    ("LCL", 1),
    ("ARG", 2),
    ("THIS", 3),
    ("THAT", 4),
    ("R0", 0),
    ("R1", 1),
    ("R2", 2),
    ("R3", 3),
    ("R4", 4),
    ("R5", 5),
    ("R6", 6),
    ("R7", 7),
    ("R8", 8),
    ("R9", 9),
    ("R10", 10),
    ("R11", 11),
    ("R12", 12),
    ("R13", 13),
    ("R14", 14),
    ("R15", 15),
    ("SCREEN", 16384),
    ("KBD", 24576),
];

impl SymbolTable {
    /// A table pre-seeded with the predefined Hack symbols.
    pub fn new() -> Self {
        let entries = PREDEFINED
            .iter()
            .map(|(name, addr)| (name.to_string(), *addr))
            .collect();
        Self { entries }
    }

    pub fn insert(&mut self, symbol: String, address: u16) {
        if let Some(entry) = self.entries.iter_mut().find(|(s, _)| s == &symbol) {
            entry.1 = address;
        } else {
            self.entries.push((symbol, address));
        }
    }

    pub fn get(&self, symbol: &str) -> Option<u16> {
        self.entries
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, addr)| *addr)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.get(symbol).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u16)> {
        self.entries.iter().map(|(s, a)| (s.as_str(), *a))
    }
}
