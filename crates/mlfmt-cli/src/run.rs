//! File gathering, formatting, and the overwrite/preview orchestration
//! spec §6 describes at the CLI's interface.

use std::collections::HashMap;
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};

use mlfmt_doc::Options;

use crate::cli::Cli;

pub struct RunOutcome {
    pub had_diagnostics: bool,
}

pub fn run(cli: &Cli, opts: &Options) -> anyhow::Result<RunOutcome> {
    let path_vars: HashMap<String, String> = cli.mlb_path_var.iter().cloned().collect();
    let files = gather_files(&cli.paths, &path_vars)?;

    let mut had_diagnostics = false;
    for path in &files {
        had_diagnostics |= process_file(path, cli, opts)?;
    }
    Ok(RunOutcome { had_diagnostics })
}

/// Expands every `.mlb` manifest among `paths` into its enumerated source
/// files; everything else passes through unchanged.
fn gather_files(paths: &[PathBuf], path_vars: &HashMap<String, String>) -> anyhow::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for path in paths {
        if path.extension().and_then(|e| e.to_str()) == Some("mlb") {
            out.extend(mlfmt_mlb::enumerate_sources(path, path_vars)?);
        } else {
            out.push(path.clone());
        }
    }
    Ok(out)
}

/// Formats one source file, reports its diagnostics, and previews/writes
/// the result per the CLI flags. Returns whether any diagnostic fired.
fn process_file(path: &Path, cli: &Cli, opts: &Options) -> anyhow::Result<bool> {
    let source = std::fs::read_to_string(path).map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let result = mlfmt_fmt::format_source(&source, opts);

    for diag in &result.diagnostics {
        eprintln!("{}: {}", path.display(), diag);
    }

    if cli.preview || cli.preview_only {
        print_preview(&result.formatted, !cli.no_color);
    }
    if !cli.preview_only {
        write_output(path, &result.formatted, cli.force)?;
    }
    Ok(!result.diagnostics.is_empty())
}

fn write_output(path: &Path, formatted: &str, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force && !confirm_overwrite(path)? {
        tracing::info!(path = %path.display(), "left file unchanged");
        return Ok(());
    }
    std::fs::write(path, formatted).map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))
}

fn confirm_overwrite(path: &Path) -> anyhow::Result<bool> {
    print!("overwrite {}? [y/N] ", path.display());
    std::io::stdout().flush().ok();
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn print_preview(formatted: &str, color: bool) {
    if color && std::io::stdout().is_terminal() {
        println!("\x1b[32m{formatted}\x1b[0m");
    } else {
        println!("{formatted}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn gather_files_passes_through_plain_source_paths() {
        let files = gather_files(&[PathBuf::from("a.sml"), PathBuf::from("b.sig")], &HashMap::new()).unwrap();
        assert_eq!(files, vec![PathBuf::from("a.sml"), PathBuf::from("b.sig")]);
    }

    #[test]
    fn gather_files_expands_a_manifest() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.sml"), "val a = 1").unwrap();
        let manifest = dir.path().join("project.mlb");
        fs::write(&manifest, "a.sml").unwrap();

        let files = gather_files(&[manifest], &HashMap::new()).unwrap();
        assert_eq!(files, vec![dir.path().join("a.sml")]);
    }

    #[test]
    fn write_output_overwrites_unconditionally_when_forced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.sml");
        fs::write(&path, "val   x=1").unwrap();

        write_output(&path, "val x = 1", true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "val x = 1");
    }

    #[test]
    fn write_output_creates_a_new_file_without_prompting() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("new.sml");

        write_output(&path, "val x = 1", false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "val x = 1");
    }
}
