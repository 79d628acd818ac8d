//! galist configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::templates::{TemplateRegistry, DEFAULT_TEMPLATE};

/// Top-level galist configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalistConfig {
    /// Template loaded when grading starts with no exercise.
    #[serde(default = "default_template")]
    pub default_template: String,
    /// Extra directories of TOML template files.
    #[serde(default)]
    pub template_dirs: Vec<PathBuf>,
    /// Seed for the random exercise generator (None = from entropy).
    #[serde(default)]
    pub generator_seed: Option<u64>,
    /// Number of exercises the generator keeps in its pool.
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}
fn default_pool_size() -> usize {
    20
}

impl Default for GalistConfig {
    fn default() -> Self {
        Self {
            default_template: default_template(),
            template_dirs: Vec::new(),
            generator_seed: None,
            pool_size: default_pool_size(),
        }
    }
}

impl GalistConfig {
    /// Built-in templates plus everything under `template_dirs`.
    pub fn build_registry(&self) -> Result<TemplateRegistry> {
        let mut registry = TemplateRegistry::builtin();
        let loaded = registry.load_directories(&self.template_dirs)?;
        if loaded > 0 {
            tracing::info!("registered {loaded} template(s) from configured directories");
        }
        Ok(registry)
    }
}

/// Resolve variable references like `${VAR_NAME}` in a string through
/// `lookup`. Unknown variables become empty; substituted values are not
/// scanned again.
fn resolve_with(s: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        result.push_str(&lookup(&rest[start + 2..start + end]).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `galist.toml` in the current directory
/// 2. `~/.config/galist/config.toml`
///
/// Environment variable overrides: `GALIST_DEFAULT_TEMPLATE`,
/// `GALIST_TEMPLATE_DIRS` (colon-separated, replaces `template_dirs`).
pub fn load_config() -> Result<GalistConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<GalistConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("galist.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<GalistConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => GalistConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());

    Ok(config)
}

fn apply_env_overrides(config: &mut GalistConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(key) = lookup("GALIST_DEFAULT_TEMPLATE") {
        if !key.trim().is_empty() {
            config.default_template = key.trim().to_string();
        }
    }

    if let Some(dirs) = lookup("GALIST_TEMPLATE_DIRS") {
        config.template_dirs = dirs
            .split(':')
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from)
            .collect();
    }

    config.template_dirs = config
        .template_dirs
        .iter()
        .map(|d| PathBuf::from(resolve_with(&d.to_string_lossy(), &lookup)))
        .collect();
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("galist"))
}
