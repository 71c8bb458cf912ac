/**
 * Symbols tag tokens (terminals) and grammar rules (non-terminals). Two
 * symbols are the same symbol when their ids are equal.
 */

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolType {
    Terminal,
    NonTerminal,
}

#[derive(Debug, Clone, Copy)]
pub struct Symbol {
    ty: SymbolType,
    id: u32,
    name: &'static str,
}

impl Symbol {
    /// Ids of user symbols are normally offset from this.
    pub const START_ID: u32 = 10000;

    pub const START: Symbol = Symbol::non_terminal(Self::START_ID, "Start");
    pub const ERROR: Symbol = Symbol::terminal(Self::START_ID - 1, "Error");
    pub const EOF: Symbol = Symbol::terminal(Self::START_ID - 2, "EOF");
    pub const EPSILON: Symbol = Symbol::terminal(Self::START_ID - 3, "Epsilon");
    pub const SPACE: Symbol = Symbol::terminal(Self::START_ID - 4, "Space");
    pub const LF: Symbol = Symbol::terminal(Self::START_ID - 5, "LF");

    pub const fn terminal(id: u32, name: &'static str) -> Self {
        Self{ ty: SymbolType::Terminal, id, name }
    }

    pub const fn non_terminal(id: u32, name: &'static str) -> Self {
        Self{ ty: SymbolType::NonTerminal, id, name }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn symbol_type(&self) -> SymbolType {
        self.ty
    }

    pub fn is_terminal(&self) -> bool {
        self.ty == SymbolType::Terminal
    }

    pub fn is_non_terminal(&self) -> bool {
        self.ty == SymbolType::NonTerminal
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol { }

impl Hash for Symbol {
    fn hash<H : Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
