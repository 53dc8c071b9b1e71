//! Command-line argument surface (spec §6 "Command-line surface").
//!
//! This models the positional paths plus the listed flags, using clap's
//! conventional `--long-flag` spelling rather than a literal single-dash
//! MLton style — the CLI is an external collaborator whose exact flag
//! spelling is outside the formatter core's concern (see `DESIGN.md`).

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "mlfmt")]
#[command(author, version, about = "Reformats source files and .mlb build manifests", long_about = None)]
pub struct Cli {
    /// One or more `.sml`/`.sig`/`.fun` source paths, or `.mlb` build manifests.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Suppress the overwrite confirmation prompt.
    #[arg(long)]
    pub force: bool,

    /// Also write formatted output to stdout.
    #[arg(long)]
    pub preview: bool,

    /// Write only to stdout; never touches the input file. Incompatible with `--force`.
    #[arg(long, conflicts_with = "force")]
    pub preview_only: bool,

    /// `NAME VALUE` substitution for `$(NAME)` inside `.mlb` manifests. May be repeated.
    #[arg(long = "mlb-path-var", value_parser = parse_mlb_path_var)]
    pub mlb_path_var: Vec<(String, String)>,

    /// Fraction of `max-width` usable before a group breaks. Must be in `(0, 1]`.
    #[arg(long)]
    pub ribbon_frac: Option<f32>,

    /// Column at which a group is forced to break. Must be >= 1.
    #[arg(long)]
    pub max_width: Option<u32>,

    /// Spaces added per indentation level.
    #[arg(long)]
    pub indent_width: Option<u32>,

    /// Width assumed for a literal tab character. Must be >= 1.
    #[arg(long)]
    pub tab_width: Option<u32>,

    /// Path to a project config file (defaults to `mlfmt.toml` if present).
    #[arg(short, long, env = "MLFMT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable ANSI coloring of `--preview` output.
    #[arg(long, env = "MLFMT_NO_COLOR")]
    pub no_color: bool,

    /// Enable verbose (debug-level) logging.
    #[arg(short, long, env = "MLFMT_VERBOSE")]
    pub verbose: bool,
}

fn parse_mlb_path_var(s: &str) -> Result<(String, String), String> {
    match s.split_once(' ') {
        Some((name, value)) => Ok((name.to_string(), value.to_string())),
        None => Err(format!("expected `<NAME> <VALUE>`, got `{s}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_paths_and_flags() {
        let cli = Cli::parse_from(["mlfmt", "a.sml", "--force", "--max-width", "100"]);
        assert_eq!(cli.paths, vec![PathBuf::from("a.sml")]);
        assert!(cli.force);
        assert_eq!(cli.max_width, Some(100));
    }

    #[test]
    fn parses_repeated_mlb_path_var() {
        let cli = Cli::parse_from(["mlfmt", "a.mlb", "--mlb-path-var", "ROOT /x", "--mlb-path-var", "LIB /y"]);
        assert_eq!(cli.mlb_path_var, vec![("ROOT".to_string(), "/x".to_string()), ("LIB".to_string(), "/y".to_string())]);
    }

    #[test]
    fn rejects_preview_only_with_force() {
        let result = Cli::try_parse_from(["mlfmt", "a.sml", "--force", "--preview-only"]);
        assert!(result.is_err());
    }
}
