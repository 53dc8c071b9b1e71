//! Project-local layout configuration, loaded from an `mlfmt.toml` and
//! layered under whatever the CLI flags override (spec §6 ambient config,
//! matching `faxt::config::Config`'s load/layer shape).

use std::path::{Path, PathBuf};

use mlfmt_doc::Options;

pub const CONFIG_FILE_NAME: &str = "mlfmt.toml";

/// Loads `Options` from an explicit path, or from the first of
/// (current directory, user config directory) that has an `mlfmt.toml`,
/// falling back to `Options::default()` if none exists.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<Options> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file(),
    };
    match path {
        Some(path) => load_from_path(&path),
        None => Ok(Options::default()),
    }
}

fn load_from_path(path: &Path) -> anyhow::Result<Options> {
    let content = std::fs::read_to_string(path).map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let options: Options = toml::from_str(&content).map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))?;
    Ok(options)
}

fn find_config_file() -> Option<PathBuf> {
    let here = PathBuf::from(CONFIG_FILE_NAME);
    if here.exists() {
        return Some(here);
    }
    dirs::config_dir().map(|dir| dir.join("mlfmt").join(CONFIG_FILE_NAME)).filter(|p| p.exists())
}

/// Applies every CLI-supplied override onto `base`, in the order the flags
/// are defined (spec §6 option list).
pub fn apply_overrides(
    mut base: Options,
    ribbon_frac: Option<f32>,
    max_width: Option<u32>,
    indent_width: Option<u32>,
    tab_width: Option<u32>,
) -> Options {
    if let Some(v) = ribbon_frac {
        base.ribbon_frac = v;
    }
    if let Some(v) = max_width {
        base.max_width = v;
    }
    if let Some(v) = indent_width {
        base.indent_width = v;
    }
    if let Some(v) = tab_width {
        base.tab_width = v;
    }
    base
}

/// Validates the option ranges spec §6 requires (`-ribbon-frac` in
/// `(0,1]`, `-max-width` >= 1, `-tab-width` >= 1; `-indent-width` has no
/// lower bound beyond `u32`'s own).
pub fn validate(opts: &Options) -> anyhow::Result<()> {
    if !(opts.ribbon_frac > 0.0 && opts.ribbon_frac <= 1.0) {
        anyhow::bail!("--ribbon-frac must be in (0, 1], got {}", opts.ribbon_frac);
    }
    if opts.max_width < 1 {
        anyhow::bail!("--max-width must be >= 1, got {}", opts.max_width);
    }
    if opts.tab_width < 1 {
        anyhow::bail!("--tab-width must be >= 1, got {}", opts.tab_width);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn loads_defaults_when_no_file_given() {
        let opts = load(None).unwrap_or_else(|_| Options::default());
        assert!(opts.max_width >= 1);
    }

    #[test]
    fn loads_an_explicit_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mlfmt.toml");
        std::fs::write(&path, "max_width = 100\nindent_width = 4\n").unwrap();
        let opts = load(Some(&path)).unwrap();
        assert_eq!(opts.max_width, 100);
        assert_eq!(opts.indent_width, 4);
    }

    #[test]
    fn overrides_take_precedence_over_the_file() {
        let opts = apply_overrides(Options::default(), Some(0.9), Some(100), None, None);
        assert_eq!(opts.max_width, 100);
        assert_eq!(opts.ribbon_frac, 0.9);
        assert_eq!(opts.indent_width, Options::default().indent_width);
    }

    #[test]
    fn rejects_an_out_of_range_ribbon_frac() {
        let opts = Options { ribbon_frac: 1.5, ..Options::default() };
        assert!(validate(&opts).is_err());
    }

    #[test]
    fn rejects_a_zero_max_width() {
        let opts = Options { max_width: 0, ..Options::default() };
        assert!(validate(&opts).is_err());
    }
}
