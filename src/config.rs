use std::path::Path;

use anyhow::Context;
use confique::Config as DeriveConfig;

/// Name of the config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "puffcheck.toml";

#[derive(Debug, DeriveConfig)]
pub struct Config {
    /// How many arrays/objects may be nested inside each other before the document is rejected.
    /// Deeply nested input is decoded recursively, so very large values risk exhausting the
    /// stack.
    #[config(default = 512, env = "PUFFCHECK_MAX_DEPTH")]
    pub max_depth: usize,

    /// Warn when an object defines the same key more than once. The decoder keeps every member,
    /// but most consumers only ever see one of them.
    #[config(default = true, env = "PUFFCHECK_LINT_DUPLICATE_KEYS")]
    pub lint_duplicate_keys: bool,
}

impl Config {
    /// Load from environment variables, then `path`, then defaults. A missing file is not an
    /// error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        Config::builder()
            .env()
            .file(path)
            .load()
            .with_context(|| format!("failed to load config from `{}`", path.display()))
    }
}
