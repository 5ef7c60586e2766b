/// Config file loading and creation for the pairrank CLI.
///
/// Config lives at ~/.config/pairrank/config.toml.
/// All fields are optional; CLI flags override config values.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::bail;

#[derive(Debug, Deserialize, Default)]
pub struct PairrankConfig {
    pub tui: Option<bool>,
    pub output: Option<String>,
    pub shuffle: Option<bool>,
    pub verbose: Option<bool>,
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# pairrank configuration
# All values here can be overridden by CLI flags.

# Answer comparisons in the terminal UI instead of the line prompt
# tui = false

# Also write the final ranking to this file
# output = \"ranking.txt\"

# Shuffle items before sorting
# shuffle = false

# Debug logging on stderr (RUST_LOG overrides)
# verbose = false
";

/// Returns the default config path: ~/.config/pairrank/config.toml.
/// `None` when HOME is not set.
pub fn config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(PathBuf::from(home).join(".config").join("pairrank").join("config.toml"))
}

pub fn parse_config(content: &str) -> Result<PairrankConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Read the config at `path`, either `--config` or [`config_path`].
///
/// A missing file is not an error: every setting stays unset and the CLI
/// defaults apply. A file that exists but is unreadable or malformed aborts the run.
pub fn load_config(path: &Path) -> PairrankConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content)
            .unwrap_or_else(|e| bail(format!("Failed to parse config at {}: {e}", path.display()))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => PairrankConfig::default(),
        Err(e) => bail(format!("Failed to read config at {}: {e}", path.display())),
    }
}

/// Write the commented template for `--init-config`, creating parent directories.
///
/// Never overwrites: an existing file at `path` aborts the run.
pub fn create_default_config(path: &Path) {
    if path.exists() {
        bail(format!("Config file already exists at {}", path.display()));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| bail(format!("Failed to create directory {}: {e}", parent.display())));
    }

    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE)
        .unwrap_or_else(|e| bail(format!("Failed to write config to {}: {e}", path.display())));
}
