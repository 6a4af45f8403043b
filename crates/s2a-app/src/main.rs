use anyhow::Result;
use clap::Parser;
use s2a_ascii::OutputFormat;
use s2a_core::config::ConvertConfig;

pub mod batch;
pub mod cli;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config, puis les overrides CLI
    let mut config = resolve_config(&cli)?;
    cli.apply_overrides(&mut config)?;
    config.validate()?;
    log::debug!("Config : {config:?}");

    // 4. Fichiers explicites
    if !cli.files.is_empty() {
        let extra = cli.format.unwrap_or(OutputFormat::TypeScript);
        let failures = batch::run_files(&cli.files, extra, &config);
        if failures > 0 {
            anyhow::bail!("{failures} fichier(s) en échec sur {}", cli.files.len());
        }
        return Ok(());
    }

    // 5. Traitement par lots
    if !cli.input_dir.is_dir() {
        println!("No image files found in {}", cli.input_dir.display());
        return Ok(());
    }
    let format = cli.format.unwrap_or(OutputFormat::Text);
    let report = batch::run_batch(
        &cli.input_dir,
        &cli.output_dir,
        cli.recursive,
        format,
        &config,
    )?;
    if report.converted.is_empty() && report.failed.is_empty() {
        println!("No image files found in {}", cli.input_dir.display());
        return Ok(());
    }
    for (src, out) in &report.converted {
        let name = src.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        println!("Converted: {name} -> {}", out.display());
    }
    println!("Done. Wrote sprites to: {}", cli.output_dir.display());
    if !report.failed.is_empty() {
        anyhow::bail!(
            "{} image(s) en échec sur {}",
            report.failed.len(),
            report.failed.len() + report.converted.len()
        );
    }
    Ok(())
}

/// Config file if present, defaults otherwise.
fn resolve_config(cli: &cli::Cli) -> Result<ConvertConfig> {
    if cli.config.exists() {
        s2a_core::config::load_config(&cli.config)
    } else {
        log::debug!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(ConvertConfig::default())
    }
}
