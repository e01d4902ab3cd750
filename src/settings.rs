use std::path::PathBuf;

use anyhow::Result;
use config::{Config, Environment};
use serde::Deserialize;

pub const DEFAULT_TARGET: &str =
    "backend/supabase/migrations/20251114000001_seed_data_complete.sql";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Seed SQL file rewritten in place.
    #[serde(default = "default_target")]
    pub target: PathBuf,
    /// Only scan the marker-delimited block for model rows.
    #[serde(default)]
    pub scoped: bool,
}

fn default_target() -> PathBuf {
    PathBuf::from(DEFAULT_TARGET)
}

impl Settings {
    /// Read `SEED_TARGET` / `SEED_SCOPED` from the environment.
    pub fn load() -> Result<Self> {
        Self::from_source(Environment::with_prefix("SEED").try_parsing(true))
    }

    fn from_source<S>(source: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize::<Settings>()?;
        Ok(settings)
    }
}
