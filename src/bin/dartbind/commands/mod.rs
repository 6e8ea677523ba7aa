//! Command implementations

pub mod completions;
pub mod generate;
pub mod inspect;

use anyhow::Result;

use crate::cli::SourceArgs;
use dartbind::util::config::{self, Config};

/// Resolve configuration: an explicit `--config` file, otherwise the merged
/// global and project files, then command-line overrides.
pub fn resolve_config(args: &SourceArgs) -> Result<Config> {
    let mut config = match args.config {
        Some(ref path) => Config::load(path)?,
        None => {
            let cwd = std::env::current_dir()?;
            config::load_config(
                config::global_config_path().as_deref(),
                &config::project_config_path(&cwd),
            )
        }
    };

    if args.input.is_some() {
        config.generate.input = args.input.clone();
    }
    if args.prefix.is_some() {
        config.generate.prefix = args.prefix.clone();
    }

    Ok(config)
}
