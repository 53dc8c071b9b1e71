//! Interned strings.
//!
//! Identifiers and string-literal payloads are interned so that AST nodes can
//! carry a cheap, `Copy` handle instead of an owned `String`. Interning is
//! process-global and append-only: strings are never evicted.

use std::fmt;
use std::sync::{OnceLock, RwLock};

use rustc_hash::FxHashMap;

/// A handle to an interned string. Cheap to copy and compare.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl Symbol {
    pub fn intern(s: &str) -> Self {
        table().intern(s)
    }

    pub fn as_str(self) -> &'static str {
        table().resolve(self)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct Table {
    inner: RwLock<TableInner>,
}

#[derive(Default)]
struct TableInner {
    index: FxHashMap<&'static str, u32>,
    strings: Vec<&'static str>,
}

impl Table {
    fn intern(&self, s: &str) -> Symbol {
        if let Some(&id) = self.inner.read().unwrap().index.get(s) {
            return Symbol(id);
        }
        let mut inner = self.inner.write().unwrap();
        if let Some(&id) = inner.index.get(s) {
            return Symbol(id);
        }
        let leaked: &'static str = Box::leak(s.to_string().into_boxed_str());
        let id = inner.strings.len() as u32;
        inner.strings.push(leaked);
        inner.index.insert(leaked, id);
        Symbol(id)
    }

    fn resolve(&self, sym: Symbol) -> &'static str {
        self.inner.read().unwrap().strings[sym.0 as usize]
    }
}

fn table() -> &'static Table {
    static TABLE: OnceLock<Table> = OnceLock::new();
    TABLE.get_or_init(|| Table { inner: RwLock::new(TableInner::default()) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_interns_to_same_symbol() {
        let a = Symbol::intern("fib");
        let b = Symbol::intern("fib");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "fib");
    }

    #[test]
    fn distinct_text_interns_distinctly() {
        let a = Symbol::intern("foo_unique_1");
        let b = Symbol::intern("bar_unique_1");
        assert_ne!(a, b);
    }
}
