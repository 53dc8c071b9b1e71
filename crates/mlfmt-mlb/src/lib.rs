//! Build-manifest (`.mlb`) path enumeration (spec §6 "File formats").
//!
//! This crate is deliberately thin: spec.md scopes the manifest language's
//! "detailed semantics" out of the formatter core, so this walker does not
//! model `basis`/`local`/`let` scoping, annotation pragmas, or structure/
//! signature/functor bindings at all. It recognizes exactly two things in
//! the token stream: a `$(NAME)` path-variable reference, and a bare or
//! quoted word ending in `.sml`, `.sig`, `.fun`, or `.mlb`. Everything else
//! — keywords, bound identifiers, annotation strings — is skipped, which is
//! sufficient to answer the one question `mlfmt-cli` needs answered: which
//! source files, in which order, does this manifest pull in.

pub mod error;
mod token;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

pub use error::MlbError;

/// Walks `entry` and every manifest it transitively references, returning
/// the ordered, deduplicated list of `.sml`/`.sig`/`.fun` source paths.
///
/// `path_vars` supplies the substitution table collected from the CLI's
/// repeated `-mlb-path-var "<NAME> <VALUE>"` flag (spec §6).
#[tracing::instrument(level = "debug", skip(path_vars), fields(entry = %entry.display()))]
pub fn enumerate_sources(entry: &Path, path_vars: &HashMap<String, String>) -> Result<Vec<PathBuf>, MlbError> {
    let mut ancestors = Vec::new();
    let mut emitted = HashSet::new();
    let mut sources = Vec::new();
    walk(entry, path_vars, &mut ancestors, &mut emitted, &mut sources)?;
    tracing::debug!(source_count = sources.len(), "enumerated manifest sources");
    Ok(sources)
}

fn walk(
    manifest: &Path,
    path_vars: &HashMap<String, String>,
    ancestors: &mut Vec<PathBuf>,
    emitted: &mut HashSet<PathBuf>,
    sources: &mut Vec<PathBuf>,
) -> Result<(), MlbError> {
    let normalized = normalize(manifest);
    if ancestors.contains(&normalized) {
        return Err(MlbError::Cycle(normalized));
    }

    let text = std::fs::read_to_string(manifest).map_err(|e| MlbError::Io { path: manifest.to_path_buf(), source: e })?;
    let base_dir = manifest.parent().unwrap_or_else(|| Path::new("."));

    ancestors.push(normalized);
    for word in token::words(&text) {
        let expanded = token::expand_path_vars(word, path_vars)?;
        if expanded.ends_with(".mlb") {
            walk(&base_dir.join(&expanded), path_vars, ancestors, emitted, sources)?;
        } else if expanded.ends_with(".sml") || expanded.ends_with(".sig") || expanded.ends_with(".fun") {
            let path = normalize(&base_dir.join(&expanded));
            if emitted.insert(path.clone()) {
                sources.push(path);
            }
        }
    }
    ancestors.pop();

    Ok(())
}

fn normalize(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn enumerates_plain_source_paths_in_order() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.sml", "val a = 1");
        write(&dir, "b.sig", "signature B = sig end");
        let manifest = write(&dir, "project.mlb", "a.sml b.sig");

        let sources = enumerate_sources(&manifest, &HashMap::new()).unwrap();
        assert_eq!(sources, vec![dir.path().join("a.sml"), dir.path().join("b.sig")]);
    }

    #[test]
    fn recurses_into_nested_manifests() {
        let dir = TempDir::new().unwrap();
        write(&dir, "leaf.sml", "val x = 1");
        let inner = write(&dir, "inner.mlb", "leaf.sml");
        let outer = write(&dir, "outer.mlb", &format!("{}", inner.file_name().unwrap().to_str().unwrap()));

        let sources = enumerate_sources(&outer, &HashMap::new()).unwrap();
        assert_eq!(sources, vec![dir.path().join("leaf.sml")]);
    }

    #[test]
    fn expands_path_variables() {
        let dir = TempDir::new().unwrap();
        let lib_dir = dir.path().join("lib");
        fs::create_dir(&lib_dir).unwrap();
        fs::write(lib_dir.join("core.sml"), "val x = 1").unwrap();
        let manifest = write(&dir, "project.mlb", "$(LIBDIR)/core.sml");

        let mut vars = HashMap::new();
        vars.insert("LIBDIR".to_string(), "lib".to_string());

        let sources = enumerate_sources(&manifest, &vars).unwrap();
        assert_eq!(sources, vec![lib_dir.join("core.sml")]);
    }

    #[test]
    fn undefined_path_variable_is_an_error() {
        let dir = TempDir::new().unwrap();
        let manifest = write(&dir, "project.mlb", "$(MISSING)/core.sml");
        let err = enumerate_sources(&manifest, &HashMap::new()).unwrap_err();
        assert!(matches!(err, MlbError::UndefinedPathVar(name) if name == "MISSING"));
    }

    #[test]
    fn ignores_keywords_and_bindings() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.sml", "val a = 1");
        let manifest = write(
            &dir,
            "project.mlb",
            "local\n  basis.mlb\nin\n  structure A = a.sml\nend",
        );
        // `basis.mlb` does not exist, so this asserts only that the bare
        // keywords/identifiers ("local", "in", "structure", "A", "end",
        // "=") never reach the source/manifest branches; missing-file
        // handling is covered separately.
        let err = enumerate_sources(&manifest, &HashMap::new()).unwrap_err();
        assert!(matches!(err, MlbError::Io { .. }));
    }

    #[test]
    fn detects_a_self_referential_cycle() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("project.mlb");
        fs::write(&manifest, "project.mlb").unwrap();
        let err = enumerate_sources(&manifest, &HashMap::new()).unwrap_err();
        assert!(matches!(err, MlbError::Cycle(_)));
    }
}
