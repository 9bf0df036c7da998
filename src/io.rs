// src/io.rs
use anyhow::{anyhow, Context, Result};
use glob::glob;
use rayon::prelude::*;
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::{error, info, instrument};

use crate::config::AugmentConfig;
use crate::expression::vega_spec_table;
use crate::table::Datatable;

/// File suffix given to augmented tables in directory mode.
pub const AUGMENTED_SUFFIX: &str = ".augmented.json";

/// Load a datatable from a JSON file.
pub fn read_datatable<P: AsRef<Path>>(path: P) -> Result<Datatable> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("opening table {}", path.display()))?;
    serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parsing table {}", path.display()))
}

/// Read the raw augment-fields argument from a file, as the expression receives it.
pub fn read_augment_fields<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).with_context(|| format!("reading augment fields {}", path.display()))
}

/// Write `table` as pretty JSON to `path` atomically (tmp file, then rename).
pub fn write_datatable<P: AsRef<Path>>(path: P, table: &Datatable) -> Result<()> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("output path {} has no file name", path.display()))?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let tmp_path = dir.join(format!(".{}.tmp", file_name));

    {
        let file = File::create(&tmp_path)
            .with_context(|| format!("creating {}", tmp_path.display()))?;
        let mut w = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut w, table).context("serializing datatable")?;
        w.write_all(b"\n")?;
        w.flush()?;
    }

    fs::rename(&tmp_path, path)
        .with_context(|| format!("renaming {} -> {}", tmp_path.display(), path.display()))?;
    Ok(())
}

/// Augment a single table file and return the result.
#[instrument(level = "info", skip(path, augment_fields, config), fields(path = %path.as_ref().display()))]
pub fn augment_file<P: AsRef<Path>>(
    path: P,
    augment_fields: Option<&str>,
    config: &AugmentConfig,
) -> Result<Datatable> {
    let table = read_datatable(&path)?;
    let augmented = vega_spec_table(&table, augment_fields, config)
        .with_context(|| format!("augmenting {}", path.as_ref().display()))?;
    Ok(augmented)
}

/// Outcome of a directory run.
#[derive(Debug, Default)]
pub struct DirReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

/// Destination for the augmented copy of `input` inside `out_dir`.
pub fn output_path(input: &Path, out_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "table".to_string());
    out_dir.join(format!("{}{}", stem, AUGMENTED_SUFFIX))
}

/// Augment every `*.json` table directly under `in_dir` in parallel, writing
/// results to `out_dir`. Files that already carry the augmented suffix are
/// skipped. A failing file is logged and reported; it does not stop the others.
#[instrument(level = "info", skip_all, fields(in_dir = %in_dir.display(), out_dir = %out_dir.display()))]
pub fn augment_dir(
    in_dir: &Path,
    out_dir: &Path,
    augment_fields: Option<&str>,
    config: &AugmentConfig,
) -> Result<DirReport> {
    let start = Instant::now();
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let pattern = format!("{}/*.json", in_dir.display());
    let inputs: Vec<PathBuf> = glob(&pattern)
        .with_context(|| format!("Failed to read glob pattern '{}'", pattern))?
        .filter_map(|entry| entry.ok())
        .filter(|p| {
            !p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(AUGMENTED_SUFFIX))
        })
        .collect();
    info!(files = inputs.len(), "augmenting tables");

    let results: Vec<(PathBuf, Result<PathBuf>)> = inputs
        .into_par_iter()
        .map(|input| {
            let res = augment_file(&input, augment_fields, config).and_then(|table| {
                let dest = output_path(&input, out_dir);
                write_datatable(&dest, &table)?;
                Ok(dest)
            });
            (input, res)
        })
        .collect();

    let mut report = DirReport::default();
    for (input, res) in results {
        match res {
            Ok(dest) => report.written.push(dest),
            Err(e) => {
                error!("{} failed: {:#}", input.display(), e);
                report.failed.push((input, format!("{:#}", e)));
            }
        }
    }
    report.written.sort();

    info!(
        written = report.written.len(),
        failed = report.failed.len(),
        elapsed = ?start.elapsed(),
        "directory done"
    );
    Ok(report)
}
