//! Policy loading: compiled defaults, then an optional file, then
//! `IDEATREE_*` environment variables.
//!
//! Nested span fields use `__`, e.g. `IDEATREE_INITIAL_BRANCHES__MAX=8`.

use std::path::Path;

use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use ideatree_core::engine::RoundPolicy;

pub const ENV_PREFIX: &str = "IDEATREE";

pub fn load_policy(path: Option<&Path>) -> Result<RoundPolicy> {
    let mut builder = defaults()?;
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }
    finish(builder.add_source(environment()))
}

fn defaults() -> Result<ConfigBuilder<DefaultState>> {
    let defaults = Config::try_from(&RoundPolicy::default()).context("encode default policy")?;
    Ok(Config::builder().add_source(defaults))
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<RoundPolicy> {
    let policy: RoundPolicy = builder
        .build()
        .context("load policy")?
        .try_deserialize()
        .context("decode policy")?;
    policy.validate().context("invalid policy")?;
    Ok(policy)
}
