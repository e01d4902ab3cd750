mod error;
mod extract;
mod pipeline;
mod render;
mod settings;
mod splice;

use std::fs;

use anyhow::{Context, Result};
use render::CategoryOrder;
use settings::Settings;
use splice::Markers;
use tracing::info;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .try_init();
}

/// Read the seed file, reorder its model block and write it back.
/// The file is only written once the whole transform succeeded.
fn run(settings: &Settings) -> Result<usize> {
    let sql = fs::read_to_string(&settings.target)
        .with_context(|| format!("reading {}", settings.target.display()))?;

    let out = pipeline::reorder(
        &sql,
        &CategoryOrder::default(),
        &Markers::default(),
        settings.scoped,
    )?;

    info!(
        rows = out.rows,
        duplicates = out.duplicates,
        categories = out.stats.len(),
        "rendered model block"
    );

    fs::write(&settings.target, &out.sql)
        .with_context(|| format!("writing {}", settings.target.display()))?;
    Ok(out.rows)
}

fn main() -> Result<()> {
    init_tracing();
    let settings = Settings::load().context("loading settings")?;
    info!(settings_loaded = ?settings, msg = "Starting seed model reorder");

    let rows = run(&settings)?;
    println!("Reordered {} models by vehicle type.", rows);
    Ok(())
}
