//! # Jack Symbol Table
//!
//! Two simultaneous scopes — class-level (`static`/`field`) and
//! subroutine-level (`arg`/`var`) — each an insertion-ordered
//! `Vec<(String, VarEntry)>`, grounded in `hackasm::SymbolTable`'s choice
//! of a linear scan over a `HashMap`: a Jack class's variable count is the
//! same small-N regime the teacher's comment calls out for Hack symbols.
//! Subroutine scope shadows class scope on lookup, matching the spec's
//! "subroutine scope first, then class scope" contract.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Static,
    Field,
    Arg,
    Var,
}

impl Kind {
    /// The VM memory segment each kind is stored in.
    pub fn segment(self) -> &'static str {
        match self {
            Kind::Static => "static",
            Kind::Field => "this",
            Kind::Arg => "argument",
            Kind::Var => "local",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarEntry {
    pub var_type: String,
    pub kind: Kind,
    pub index: u16,
}

#[derive(Default)]
pub struct SymbolTable {
    class_scope: Vec<(String, VarEntry)>,
    subroutine_scope: Vec<(String, VarEntry)>,
    static_count: u16,
    field_count: u16,
    arg_count: u16,
    var_count: u16,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the subroutine scope and resets the `arg`/`var` counters.
    /// Class scope (`static`/`field`) is untouched.
    pub fn start_subroutine(&mut self) {
        self.subroutine_scope.clear();
        self.arg_count = 0;
        self.var_count = 0;
    }

    /// Defines `name` in the scope implied by `kind`. Returns `false` if
    /// `name` is already defined in that same scope (a fatal
    /// `DuplicateSymbol` at the call site).
    pub fn define(&mut self, name: &str, var_type: &str, kind: Kind) -> bool {
        let scope = match kind {
            Kind::Static | Kind::Field => &mut self.class_scope,
            Kind::Arg | Kind::Var => &mut self.subroutine_scope,
        };
        if scope.iter().any(|(n, _)| n == name) {
            return false;
        }
        let index = match kind {
            Kind::Static => {
                let i = self.static_count;
                self.static_count += 1;
                i
            }
            Kind::Field => {
                let i = self.field_count;
                self.field_count += 1;
                i
            }
            Kind::Arg => {
                let i = self.arg_count;
                self.arg_count += 1;
                i
            }
            Kind::Var => {
                let i = self.var_count;
                self.var_count += 1;
                i
            }
        };
        let entry = VarEntry {
            var_type: var_type.to_string(),
            kind,
            index,
        };
        let scope = match kind {
            Kind::Static | Kind::Field => &mut self.class_scope,
            Kind::Arg | Kind::Var => &mut self.subroutine_scope,
        };
        scope.push((name.to_string(), entry));
        true
    }

    pub fn var_count(&self, kind: Kind) -> u16 {
        match kind {
            Kind::Static => self.static_count,
            Kind::Field => self.field_count,
            Kind::Arg => self.arg_count,
            Kind::Var => self.var_count,
        }
    }

    /// Looks up `name`, checking subroutine scope first so a local shadows
    /// a same-named field or static.
    pub fn lookup(&self, name: &str) -> Option<&VarEntry> {
        self.subroutine_scope
            .iter()
            .find(|(n, _)| n == name)
            .or_else(|| self.class_scope.iter().find(|(n, _)| n == name))
            .map(|(_, entry)| entry)
    }

    pub fn type_of(&self, name: &str) -> Option<&str> {
        self.lookup(name).map(|e| e.var_type.as_str())
    }

    pub fn kind_of(&self, name: &str) -> Option<Kind> {
        self.lookup(name).map(|e| e.kind)
    }

    pub fn index_of(&self, name: &str) -> Option<u16> {
        self.lookup(name).map(|e| e.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defines_and_looks_up_across_scopes() {
        let mut table = SymbolTable::new();
        assert!(table.define("x", "int", Kind::Field));
        assert!(table.define("y", "int", Kind::Field));
        table.start_subroutine();
        assert!(table.define("this", "Point", Kind::Arg));
        assert_eq!(table.index_of("x"), Some(0));
        assert_eq!(table.index_of("y"), Some(1));
        assert_eq!(table.index_of("this"), Some(0));
        assert_eq!(table.kind_of("x"), Some(Kind::Field));
        assert_eq!(table.var_count(Kind::Field), 2);
    }

    #[test]
    fn subroutine_scope_shadows_class_scope() {
        let mut table = SymbolTable::new();
        table.define("x", "int", Kind::Field);
        table.start_subroutine();
        table.define("x", "boolean", Kind::Var);
        assert_eq!(table.kind_of("x"), Some(Kind::Var));
        assert_eq!(table.type_of("x"), Some("boolean"));
    }

    #[test]
    fn start_subroutine_resets_counters_but_not_class_scope() {
        let mut table = SymbolTable::new();
        table.define("f", "int", Kind::Field);
        table.start_subroutine();
        table.define("a", "int", Kind::Arg);
        table.start_subroutine();
        assert_eq!(table.var_count(Kind::Arg), 0);
        assert_eq!(table.var_count(Kind::Field), 1);
        assert_eq!(table.kind_of("a"), None);
    }

    #[test]
    fn duplicate_definition_in_same_scope_is_rejected() {
        let mut table = SymbolTable::new();
        assert!(table.define("x", "int", Kind::Static));
        assert!(!table.define("x", "int", Kind::Static));
    }
}
