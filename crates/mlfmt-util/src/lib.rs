//! Foundation types shared by the lexer, parser, and pretty-printer: source
//! positions, interned identifiers, and the diagnostic payload they report
//! errors with.

pub mod diagnostic;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use diagnostic::Diagnostic;
pub use index_vec::{Idx, IndexVec};
pub use span::{Pos, SourceFile, SourceId, SourceMap, Span};
pub use symbol::Symbol;
