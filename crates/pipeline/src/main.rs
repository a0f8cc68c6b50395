//! Affect Analysis Pipeline - Main Entry Point

use anyhow::Context;
use feature_engine::signal;
use pipeline::{init_logging, AnalysisPipeline, PipelineConfig};
use std::path::PathBuf;
use tracing::info;

/// Environment variable naming an optional TOML config file
const CONFIG_FILE_ENV: &str = "AFFECT_CONFIG";

fn main() -> anyhow::Result<()> {
    let config_path = std::env::var_os(CONFIG_FILE_ENV).map(PathBuf::from);
    let config = PipelineConfig::load(config_path.as_deref()).context("failed to load configuration")?;

    init_logging(&config.logging)?;

    info!("=== Affect Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let pipeline = AnalysisPipeline::new(&config)?;

    let demo = &config.demo;
    let samples = signal::sine(
        demo.breathing_rate / 60.0,
        config.breathing.spectral.sample_rate,
        demo.samples,
        demo.amplitude,
    );
    info!(
        "Analyzing {} samples of synthetic breathing at {:.1} breaths/min",
        samples.len(),
        demo.breathing_rate
    );

    let report = pipeline.analyze(&samples);
    let windows = pipeline.breathing().process_with_overlap(&samples);
    info!(
        "Overlapped breathing analysis: {} windows, pattern {:?}",
        windows.len(),
        pipeline.breathing().pattern()
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    println!("{}", serde_json::to_string_pretty(&pipeline.breathing().statistics())?);

    Ok(())
}
