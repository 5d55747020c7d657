//! Configuration loading for the command-line adapter.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use conquest_system_bootstrap::Config;

/// Reads a TOML configuration, or the defaults when no path is given.
///
/// Keys missing from the file keep their default values. `seed` overrides the
/// configured seed when present.
pub(crate) fn load(path: Option<&Path>, seed: Option<u64>) -> Result<Config> {
    let mut config = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read configuration {}", path.display()))?;
            parse(&contents)
                .with_context(|| format!("invalid configuration in {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(seed) = seed {
        config.generator.seed = seed;
    }
    Ok(config)
}

fn parse(contents: &str) -> Result<Config> {
    Ok(toml::from_str(contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_flag_overrides_defaults() {
        let config = load(None, Some(99)).expect("defaults load");
        assert_eq!(config.generator.seed, 99);
        assert_eq!(config.generator.node_count, 15);
    }

    #[test]
    fn partial_files_keep_defaults() {
        let config = parse("[generator]\nplayer_count = 3\n").expect("config parses");
        assert_eq!(config.generator.player_count, 3);
        assert_eq!(config.generator.node_count, 15);
    }

    #[test]
    fn unknown_values_are_reported() {
        assert!(parse("[generator]\nownership = \"alphabetical\"\n").is_err());
    }
}
