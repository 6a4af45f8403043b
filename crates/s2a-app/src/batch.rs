use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use s2a_ascii::{OutputFormat, convert_file};
use s2a_core::config::ConvertConfig;
use s2a_core::error::CoreError;
use s2a_source::folder::scan_images;

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// (source, written file) for every converted sprite.
    pub converted: Vec<(PathBuf, PathBuf)>,
    /// (source, error message) for every sprite that failed.
    pub failed: Vec<(PathBuf, String)>,
}

fn sprite_name(path: &Path) -> &str {
    path.file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("sprite")
}

/// Output file for each source: `<stem>.<ext>` under the source's sub-folder.
///
/// Sources sharing a stem in one folder (`shark.png`, `shark.bmp`) keep their
/// extension instead: `shark.png.txt`, `shark.bmp.txt`.
fn output_paths(
    files: &[PathBuf],
    input_dir: &Path,
    output_dir: &Path,
    format: OutputFormat,
) -> Vec<PathBuf> {
    let ext = format.extension();
    let plain: Vec<PathBuf> = files
        .iter()
        .map(|path| {
            let sub_dir = path
                .parent()
                .and_then(|p| p.strip_prefix(input_dir).ok())
                .unwrap_or_else(|| Path::new(""));
            output_dir
                .join(sub_dir)
                .join(format!("{}.{ext}", sprite_name(path)))
        })
        .collect();

    let mut uses: HashMap<&Path, usize> = HashMap::new();
    for out in &plain {
        *uses.entry(out.as_path()).or_default() += 1;
    }

    files
        .iter()
        .zip(&plain)
        .map(|(src, out)| match src.file_name() {
            Some(name) if uses.get(out.as_path()).copied().unwrap_or(0) > 1 => {
                out.with_file_name(format!("{}.{ext}", name.to_string_lossy()))
            }
            _ => out.clone(),
        })
        .collect()
}

/// Convert every image in `input_dir`, one file per sprite in `output_dir`.
///
/// Sprites are processed in parallel; a failing sprite is recorded in the
/// report and does not stop the others. Two sources never write the same
/// output file: a clash left after [`output_paths`] fails both sprites.
///
/// # Errors
/// Returns an error if `input_dir` cannot be scanned or `output_dir` cannot
/// be created.
pub fn run_batch(
    input_dir: &Path,
    output_dir: &Path,
    recursive: bool,
    format: OutputFormat,
    config: &ConvertConfig,
) -> Result<BatchReport> {
    let files = scan_images(input_dir, recursive)?;
    if files.is_empty() {
        log::warn!("Aucune image trouvée dans {}", input_dir.display());
        return Ok(BatchReport::default());
    }
    log::info!(
        "{} images à convertir depuis {} ({format})",
        files.len(),
        input_dir.display()
    );

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Impossible de créer {}", output_dir.display()))?;

    let outputs = output_paths(&files, input_dir, output_dir, format);
    let mut claims: HashMap<&Path, usize> = HashMap::new();
    for out in &outputs {
        *claims.entry(out.as_path()).or_default() += 1;
    }

    let results: Vec<_> = files
        .par_iter()
        .zip(&outputs)
        .map(|(path, out_path)| {
            let written = if claims.get(out_path.as_path()).copied().unwrap_or(0) > 1 {
                Err(anyhow::anyhow!(
                    "Sortie {} partagée avec une autre image",
                    out_path.display()
                ))
            } else {
                write_sprite(path, out_path, format, config)
            };
            (path.clone(), out_path.clone(), written)
        })
        .collect();

    let mut report = BatchReport::default();
    for (src, out, written) in results {
        match written {
            Ok(()) => {
                log::info!("{} → {}", src.display(), out.display());
                report.converted.push((src, out));
            }
            Err(e) => {
                log::error!("{}: {e:#}", src.display());
                report.failed.push((src, format!("{e:#}")));
            }
        }
    }
    Ok(report)
}

fn write_sprite(
    path: &Path,
    out_path: &Path,
    format: OutputFormat,
    config: &ConvertConfig,
) -> Result<()> {
    let grid = convert_file(path, config)?;
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer {}", parent.display()))?;
    }
    let mut body = format.format(&grid, sprite_name(path));
    body.push('\n');
    fs::write(out_path, body).with_context(|| format!("Impossible d'écrire {}", out_path.display()))
}

/// `=== TypeScript format ===` style header for the extra block.
fn format_header(format: OutputFormat) -> String {
    format!("=== {} format ===", format.title())
}

/// Convert explicit files and print each result to stdout.
///
/// Prints the text block, then `extra` (TypeScript by default) unless it is
/// plain text. Returns the number of files that failed.
pub fn run_files(files: &[PathBuf], extra: OutputFormat, config: &ConvertConfig) -> usize {
    let geo = &config.geometry;
    let mut failures = 0;
    for path in files {
        if !path.exists() {
            let err = CoreError::FileNotFound {
                path: path.display().to_string(),
            };
            log::error!("{err}");
            println!("Error: {err}");
            failures += 1;
            continue;
        }
        let name = sprite_name(path);
        match convert_file(path, config) {
            Ok(grid) => {
                println!(
                    "\n=== {name} (stretch={}, rotate={}, margin={}) ===\n",
                    geo.h_stretch, geo.rotation_degrees, geo.margin
                );
                println!("{}", grid.to_text());
                if extra != OutputFormat::Text {
                    println!("\n{}\n", format_header(extra));
                    println!("{}", extra.format(&grid, name));
                }
            }
            Err(e) => {
                log::error!("{}: {e:#}", path.display());
                failures += 1;
            }
        }
    }
    failures
}
