pub mod generate;
pub mod grade;
pub mod init;
pub mod templates;
pub mod validate;

use std::path::PathBuf;

use anyhow::Result;

use galist_core::config::{load_config_from, GalistConfig};
use galist_core::templates::TemplateRegistry;

/// Load config and build the template registry, adding `extra_dir` if given.
pub fn load_registry(
    extra_dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<(GalistConfig, TemplateRegistry)> {
    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(dir) = extra_dir {
        config.template_dirs.push(dir);
    }
    let registry = config.build_registry()?;
    Ok((config, registry))
}
