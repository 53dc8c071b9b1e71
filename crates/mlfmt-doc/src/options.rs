//! Layout configuration (spec §6 ambient config, §4.4 layout engine).
//!
//! Mirrors the shape of a formatter's options struct: a handful of knobs
//! with sane defaults, deserializable from the CLI's config file and
//! overridable by flags.

use serde::{Deserialize, Serialize};

/// Layout budget and indentation knobs for [`crate::render`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// The column at which a group is forced to break onto multiple lines.
    pub max_width: u32,
    /// Fraction of `max_width` usable before triggering a break inside a
    /// group that's already indented past column 0; keeps deeply nested
    /// code from hugging the right margin even when it technically fits.
    pub ribbon_frac: f32,
    /// Spaces added per indentation level.
    pub indent_width: u32,
    /// Width a literal tab character in the source is assumed to occupy
    /// when computing alignment for text carried through verbatim.
    pub tab_width: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self { max_width: 80, ribbon_frac: 1.0, indent_width: 2, tab_width: 4 }
    }
}

impl Options {
    /// The effective column budget once `ribbon_frac` is applied at the
    /// given base indentation.
    pub fn ribbon_width(&self, base_indent: u32) -> u32 {
        let ribbon = (self.max_width as f32 * self.ribbon_frac.clamp(0.0, 1.0)) as u32;
        self.max_width.min(base_indent + ribbon.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_common_formatter_conventions() {
        let opts = Options::default();
        assert_eq!(opts.max_width, 80);
        assert_eq!(opts.indent_width, 2);
    }

    #[test]
    fn ribbon_frac_is_clamped() {
        let opts = Options { ribbon_frac: 2.0, ..Options::default() };
        assert_eq!(opts.ribbon_width(0), opts.max_width);
    }
}
