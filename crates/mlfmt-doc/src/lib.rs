//! Layout-independent document algebra and its renderer (spec §4.4).
//!
//! A [`Doc`] describes what to print without committing to line breaks;
//! [`render`] decides those breaks in one linear pass over the tree. Each
//! node's *flat width* — how wide it would be if every break inside it
//! chose not to break — is computed once per node before rendering
//! begins, so the deciding pass never re-walks a subtree to ask "would
//! this fit".
//!
//! Eight primitives (spec §4.4):
//! - [`Doc::Empty`], [`Doc::Text`]: the zero-width and literal-text leaves.
//! - [`Doc::Space`]: a literal space that never becomes a line break.
//! - [`Doc::SoftSpace`]: a line-break candidate — a space when its
//!   enclosing [`Doc::Group`] lays out flat, a newline (at the current
//!   indent) when it doesn't. On its own, outside of any group, it always
//!   breaks.
//! - [`Doc::Beside`]: plain horizontal concatenation.
//! - [`Doc::AboveOrSpace`], [`Doc::AboveOrBeside`]: a pair of documents
//!   joined either by a space/nothing on one line, or stacked across two,
//!   whichever fits — each pair decides for itself, independently of any
//!   surrounding group. The translator reaches for these where neighbors
//!   in a list must each get to lay out on their own line once any one of
//!   them doesn't fit, regardless of whether the list as a whole is
//!   sitting inside a group that happens to fit flat: declaration
//!   sequences and `case`/`fn` match arms, specifically.
//! - [`Doc::Group`]: marks a subtree whose embedded bare `SoftSpace`
//!   leaves must all resolve the same way (all spaces, or all breaks).
//!   Most constructs use this instead, since most of the syntax (tuples,
//!   records, `if`/`while`/`let`/`struct`/`sig` blocks) has no neighbor
//!   whose layout needs to be decided independently of its own siblings.
//!
//! [`Doc::Nest`] is not one of the eight; it's the indentation bookkeeping
//! the translator layer needs wherever one of the eight introduces a
//! break that should land past column zero.

pub mod options;

pub use options::Options;

#[derive(Clone, Debug)]
pub enum Doc {
    Empty,
    Text(String),
    Space,
    SoftSpace,
    Beside(Box<Doc>, Box<Doc>),
    AboveOrSpace(Box<Doc>, Box<Doc>),
    AboveOrBeside(Box<Doc>, Box<Doc>),
    Group(Box<Doc>),
    Nest(u32, Box<Doc>),
}

pub fn empty() -> Doc {
    Doc::Empty
}

pub fn text(s: impl Into<String>) -> Doc {
    Doc::Text(s.into())
}

pub fn space() -> Doc {
    Doc::Space
}

pub fn softspace() -> Doc {
    Doc::SoftSpace
}

pub fn beside(a: Doc, b: Doc) -> Doc {
    Doc::Beside(Box::new(a), Box::new(b))
}

pub fn above_or_space(a: Doc, b: Doc) -> Doc {
    Doc::AboveOrSpace(Box::new(a), Box::new(b))
}

pub fn above_or_beside(a: Doc, b: Doc) -> Doc {
    Doc::AboveOrBeside(Box::new(a), Box::new(b))
}

pub fn group(d: Doc) -> Doc {
    Doc::Group(Box::new(d))
}

pub fn nest(levels: u32, d: Doc) -> Doc {
    Doc::Nest(levels, Box::new(d))
}

/// Concatenates `docs` left to right with [`beside`], with `Empty` for an
/// empty slice.
pub fn concat(docs: impl IntoIterator<Item = Doc>) -> Doc {
    docs.into_iter().fold(Doc::Empty, beside)
}

/// Joins `docs` with `sep` inserted between each pair via [`beside`].
pub fn join(docs: impl IntoIterator<Item = Doc>, sep: impl Fn() -> Doc) -> Doc {
    let mut iter = docs.into_iter();
    let Some(first) = iter.next() else { return Doc::Empty };
    iter.fold(first, |acc, next| beside(beside(acc, sep()), next))
}

impl std::ops::Add for Doc {
    type Output = Doc;
    fn add(self, rhs: Doc) -> Doc {
        beside(self, rhs)
    }
}

/// The width `doc` would occupy if every break inside it resolved to its
/// flat form. `None` means `doc` can never be printed flat — it embeds a
/// literal newline (carried-over comment text, typically), so any
/// enclosing group containing it must always choose to break.
fn flat_width(doc: &Doc) -> Option<u32> {
    match doc {
        Doc::Empty => Some(0),
        Doc::Text(s) => {
            if s.contains('\n') {
                None
            } else {
                Some(s.chars().count() as u32)
            }
        }
        Doc::Space | Doc::SoftSpace => Some(1),
        Doc::Beside(a, b) => combine(flat_width(a), flat_width(b), 0),
        Doc::AboveOrSpace(a, b) => combine(flat_width(a), flat_width(b), 1),
        Doc::AboveOrBeside(a, b) => combine(flat_width(a), flat_width(b), 0),
        Doc::Group(d) | Doc::Nest(_, d) => flat_width(d),
    }
}

fn combine(a: Option<u32>, b: Option<u32>, sep: u32) -> Option<u32> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x + sep + y),
        _ => None,
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Flat,
    Break,
}

struct Printer<'a> {
    opts: &'a Options,
    out: String,
    column: u32,
}

impl<'a> Printer<'a> {
    fn new(opts: &'a Options) -> Self {
        Self { opts, out: String::new(), column: 0 }
    }

    fn newline(&mut self, indent: u32) {
        self.out.push('\n');
        for _ in 0..indent {
            self.out.push(' ');
        }
        self.column = indent;
    }

    fn push_text(&mut self, s: &str) {
        match s.rsplit_once('\n') {
            Some((_, last_line)) => {
                self.out.push_str(s);
                self.column = display_width(last_line, self.opts.tab_width);
            }
            None => {
                self.out.push_str(s);
                self.column += display_width(s, self.opts.tab_width);
            }
        }
    }

    fn fits(&self, width: Option<u32>, indent: u32) -> bool {
        match width {
            Some(w) => self.column + w <= self.opts.ribbon_width(indent),
            None => false,
        }
    }

    fn render(&mut self, doc: &Doc, indent: u32, mode: Mode) {
        match doc {
            Doc::Empty => {}
            Doc::Text(s) => self.push_text(s),
            Doc::Space => {
                self.out.push(' ');
                self.column += 1;
            }
            Doc::SoftSpace => match mode {
                Mode::Flat => {
                    self.out.push(' ');
                    self.column += 1;
                }
                Mode::Break => self.newline(indent),
            },
            Doc::Beside(a, b) => {
                self.render(a, indent, mode);
                self.render(b, indent, mode);
            }
            Doc::AboveOrSpace(a, b) => self.render_pair(a, b, indent, mode, true),
            Doc::AboveOrBeside(a, b) => self.render_pair(a, b, indent, mode, false),
            Doc::Group(d) => {
                let child_mode = if mode == Mode::Flat || self.fits(flat_width(d), indent) { Mode::Flat } else { Mode::Break };
                self.render(d, indent, child_mode);
            }
            Doc::Nest(levels, d) => {
                self.render(d, indent + levels * self.opts.indent_width, mode);
            }
        }
    }

    /// Renders `a` and `b` joined either by a space (or nothing, for
    /// `aboveOrBeside`) on one line, or stacked across a break, deciding
    /// independently of the surrounding mode whenever that surrounding
    /// mode isn't already flat.
    fn render_pair(&mut self, a: &Doc, b: &Doc, indent: u32, mode: Mode, space_when_flat: bool) {
        let pair_fits = mode == Mode::Flat || {
            let sep = if space_when_flat { 1 } else { 0 };
            self.fits(combine(flat_width(a), flat_width(b), sep), indent)
        };
        if pair_fits {
            self.render(a, indent, Mode::Flat);
            if space_when_flat {
                self.out.push(' ');
                self.column += 1;
            }
            self.render(b, indent, Mode::Flat);
        } else {
            self.render(a, indent, mode);
            self.newline(indent);
            self.render(b, indent, mode);
        }
    }
}

fn display_width(s: &str, tab_width: u32) -> u32 {
    s.chars().map(|c| if c == '\t' { tab_width } else { 1 }).sum()
}

/// Renders `doc` to a string under the given layout [`Options`]. The
/// top-level document starts in "break" mode: any bare [`Doc::SoftSpace`]
/// not wrapped in its own [`Doc::Group`] (or in an [`Doc::AboveOrSpace`]/
/// [`Doc::AboveOrBeside`] pair that happens to fit) always breaks, since
/// there's no enclosing group to ever decide otherwise.
pub fn render(doc: &Doc, opts: &Options) -> String {
    let mut printer = Printer::new(opts);
    printer.render(doc, 0, Mode::Break);
    printer.out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_text_render_verbatim() {
        let doc = beside(text("a"), beside(space(), text("b")));
        assert_eq!(render(&doc, &Options::default()), "a b");
    }

    #[test]
    fn group_flattens_when_it_fits() {
        let doc = group(beside(text("("), beside(softspace(), beside(text("x"), beside(softspace(), text(")"))))));
        assert_eq!(render(&doc, &Options::default()), "( x )");
    }

    #[test]
    fn group_breaks_when_it_does_not_fit() {
        let opts = Options { max_width: 5, ..Options::default() };
        let doc = group(beside(text("aaa"), beside(softspace(), text("bbb"))));
        let out = render(&doc, &opts);
        assert_eq!(out, "aaa\nbbb");
    }

    #[test]
    fn above_or_space_decides_independently_of_outer_break_mode() {
        // Even though the outer group must break (total width exceeds the
        // budget), the short `a b` pair still fits on one line by itself.
        let opts = Options { max_width: 6, ..Options::default() };
        let doc = group(beside(
            above_or_space(text("a"), text("b")),
            beside(softspace(), text("ccccccccc")),
        ));
        let out = render(&doc, &opts);
        assert_eq!(out, "a b\nccccccccc");
    }

    #[test]
    fn above_or_beside_omits_the_separator_when_flat() {
        let doc = above_or_beside(text("a"), text("b"));
        assert_eq!(render(&doc, &Options::default()), "ab");
    }

    #[test]
    fn nest_indents_after_a_break() {
        let opts = Options { max_width: 1, ..Options::default() };
        let doc = nest(1, beside(text("a"), beside(softspace(), text("b"))));
        assert_eq!(render(&doc, &opts), "a\n  b");
    }

    #[test]
    fn text_with_embedded_newline_forces_its_group_to_break() {
        let doc = group(beside(text("(*\n*)"), beside(softspace(), text("x"))));
        let out = render(&doc, &Options::default());
        assert_eq!(out, "(*\n*)\nx");
    }
}
