//! Configuration commands.

use anyhow::Result;
use chaincheck_config::ChaincheckConfig;

/// Show the effective configuration after all sources are merged.
pub fn show(config: &ChaincheckConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}
