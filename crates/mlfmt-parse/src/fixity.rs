//! Operator fixity: precedence and associativity of infix identifiers,
//! tracked as a scoped environment the parser pushes and pops at `let`,
//! `local ... in`, `struct ... end`, and `sig ... end` boundaries (spec
//! §4.3: fixity status is lexically scoped, not global).

use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fixity {
    pub precedence: u8,
    pub assoc: Assoc,
}

/// A scoped stack of fixity declarations. `push_frame`/`pop_frame` bracket
/// one lexical scope; declarations made inside a frame are discarded when
/// it's popped, restoring whatever was visible before it was entered.
#[derive(Clone, Debug, Default)]
pub struct FixityEnv {
    frames: Vec<HashMap<String, Status>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Status {
    Infix(Fixity),
    Nonfix,
}

impl FixityEnv {
    /// A fresh environment seeded with the standard library's initial
    /// fixities (spec §4.3).
    pub fn with_initial_fixities() -> Self {
        let mut env = Self { frames: vec![HashMap::new()] };
        let left = |p: u8| Fixity { precedence: p, assoc: Assoc::Left };
        let right = |p: u8| Fixity { precedence: p, assoc: Assoc::Right };
        env.declare_infix("*", left(7));
        env.declare_infix("/", left(7));
        env.declare_infix("div", left(7));
        env.declare_infix("mod", left(7));
        env.declare_infix("+", left(6));
        env.declare_infix("-", left(6));
        env.declare_infix("^", left(6));
        env.declare_infix("::", right(5));
        env.declare_infix("@", right(5));
        env.declare_infix("=", left(4));
        env.declare_infix("<>", left(4));
        env.declare_infix("<", left(4));
        env.declare_infix(">", left(4));
        env.declare_infix("<=", left(4));
        env.declare_infix(">=", left(4));
        env.declare_infix(":=", left(3));
        env.declare_infix("o", left(3));
        env.declare_infix("before", left(0));
        env
    }

    pub fn push_frame(&mut self) {
        self.frames.push(HashMap::new());
    }

    pub fn pop_frame(&mut self) {
        self.frames.pop();
        if self.frames.is_empty() {
            self.frames.push(HashMap::new());
        }
    }

    fn declare_infix(&mut self, vid: &str, fixity: Fixity) {
        self.frames.last_mut().unwrap().insert(vid.to_string(), Status::Infix(fixity));
    }

    pub fn declare(&mut self, vid: &str, fixity: Fixity) {
        self.declare_infix(vid, fixity);
    }

    pub fn declare_nonfix(&mut self, vid: &str) {
        self.frames.last_mut().unwrap().insert(vid.to_string(), Status::Nonfix);
    }

    /// Looks up `vid`'s fixity, searching from the innermost frame
    /// outward. `None` means the identifier is nonfix (including
    /// identifiers never declared infix, which are nonfix by default).
    pub fn lookup(&self, vid: &str) -> Option<Fixity> {
        for frame in self.frames.iter().rev() {
            if let Some(status) = frame.get(vid) {
                return match status {
                    Status::Infix(f) => Some(*f),
                    Status::Nonfix => None,
                };
            }
        }
        None
    }

    pub fn is_infix(&self, vid: &str) -> bool {
        self.lookup(vid).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_fixities_match_standard_basis() {
        let env = FixityEnv::with_initial_fixities();
        assert_eq!(env.lookup("+").unwrap().precedence, 6);
        assert_eq!(env.lookup("*").unwrap().precedence, 7);
        assert_eq!(env.lookup("::").unwrap().assoc, Assoc::Right);
        assert!(env.lookup("foo").is_none());
    }

    #[test]
    fn scoped_declaration_is_undone_on_pop() {
        let mut env = FixityEnv::with_initial_fixities();
        env.push_frame();
        env.declare("@@", Fixity { precedence: 6, assoc: Assoc::Left });
        assert!(env.is_infix("@@"));
        env.pop_frame();
        assert!(!env.is_infix("@@"));
    }

    #[test]
    fn nonfix_shadows_outer_infix_declaration() {
        let mut env = FixityEnv::with_initial_fixities();
        env.push_frame();
        env.declare_nonfix("+");
        assert!(!env.is_infix("+"));
        env.pop_frame();
        assert!(env.is_infix("+"));
    }
}
