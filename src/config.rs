use crate::scope::ScopeMerge;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CORPUS: &str = "vxref";
pub const DEFAULT_LANGUAGE: &str = "verilog";

/// Contents of `vxref.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct XrefConfig {
    pub corpus: Option<String>,
    pub root: Option<String>,
    pub language: Option<String>,
    pub scope_merge: Option<ScopeMerge>,
}

impl XrefConfig {
    /// Resolve the file settings into extractor options
    pub fn options(&self) -> ExtractorOptions {
        let defaults = ExtractorOptions::default();
        ExtractorOptions {
            corpus: self.corpus.clone().unwrap_or(defaults.corpus),
            root: self.root.clone().unwrap_or(defaults.root),
            language: self.language.clone().unwrap_or(defaults.language),
            scope_merge: self.scope_merge.unwrap_or(defaults.scope_merge),
        }
    }

    /// Config with every field spelled out, as written by `vxref init`
    pub fn with_defaults() -> Self {
        let defaults = ExtractorOptions::default();
        Self {
            corpus: Some(defaults.corpus),
            root: Some(defaults.root),
            language: Some(defaults.language),
            scope_merge: Some(defaults.scope_merge),
        }
    }
}

/// Descriptors stamped on every VName, plus the scope policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorOptions {
    pub corpus: String,
    pub root: String,
    pub language: String,
    pub scope_merge: ScopeMerge,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            corpus: DEFAULT_CORPUS.to_string(),
            root: String::new(),
            language: DEFAULT_LANGUAGE.to_string(),
            scope_merge: ScopeMerge::default(),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("vxref.toml")
}

/// Load `path`, or `./vxref.toml` when no path is given.
///
/// Only the implicit default may be absent; a path the user named must exist.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<XrefConfig>> {
    let path = match path {
        Some(path) if !path.exists() => {
            anyhow::bail!("config file {} does not exist", path.display());
        }
        Some(path) => path.to_path_buf(),
        None => {
            let path = default_config_path();
            if !path.exists() {
                return Ok(None);
            }
            path
        }
    };

    let contents = std::fs::read_to_string(&path)?;
    let config: XrefConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &XrefConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("custom.toml"));
    }

    #[test]
    fn test_missing_default_config_is_none() {
        // Runs from the crate root, which ships no vxref.toml.
        assert!(!default_config_path().exists());
        assert!(load_config(None).unwrap().is_none());
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vxref.toml");
        std::fs::write(&path, "corpus = \"chip\"\nscope_merge = \"encapsulate\"\n").unwrap();

        let options = load_config(Some(&path)).unwrap().unwrap().options();
        assert_eq!(options.corpus, "chip");
        assert_eq!(options.root, "");
        assert_eq!(options.language, DEFAULT_LANGUAGE);
        assert_eq!(options.scope_merge, ScopeMerge::Encapsulate);
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vxref.toml");
        write_config(&path, &XrefConfig::with_defaults(), false).unwrap();

        let options = load_config(Some(&path)).unwrap().unwrap().options();
        assert_eq!(options, ExtractorOptions::default());
    }

    #[test]
    fn test_write_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vxref.toml");
        write_config(&path, &XrefConfig::default(), false).unwrap();
        assert!(write_config(&path, &XrefConfig::default(), false).is_err());
        assert!(write_config(&path, &XrefConfig::default(), true).is_ok());
    }

    #[test]
    fn test_bad_scope_merge_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vxref.toml");
        std::fs::write(&path, "scope_merge = \"sideways\"\n").unwrap();
        assert!(load_config(Some(&path)).is_err());
    }
}
