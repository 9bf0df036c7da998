// src/main.rs
use anyhow::{anyhow, Result};
use std::{
    env,
    io::{self, Write},
    path::PathBuf,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};
use visaugment::{
    io::{augment_dir, augment_file, read_augment_fields},
    AugmentConfig,
};

const USAGE: &str = "Usage: visaugment <TABLE_JSON|TABLE_DIR> <AUGMENT_FIELDS_JSON> [OUT_DIR]";

fn main() -> Result<()> {
    // ─── 1) init logging (stderr, so stdout stays clean JSON) ────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    // ─── 2) args + config ────────────────────────────────────────────
    let mut args = env::args().skip(1);
    let input = PathBuf::from(args.next().ok_or_else(|| anyhow!(USAGE))?);
    let fields_path = PathBuf::from(args.next().ok_or_else(|| anyhow!(USAGE))?);
    let out_dir = args.next().map(PathBuf::from);

    let config = AugmentConfig::load()?;
    let fields = read_augment_fields(&fields_path)?;

    // ─── 3) run ──────────────────────────────────────────────────────
    if input.is_dir() {
        let out_dir = out_dir.unwrap_or_else(|| input.clone());
        let report = augment_dir(&input, &out_dir, Some(&fields), &config)?;
        for path in &report.written {
            info!("wrote {}", path.display());
        }
        if !report.failed.is_empty() {
            for (path, err) in &report.failed {
                error!("{}: {}", path.display(), err);
            }
            return Err(anyhow!("{} table(s) failed", report.failed.len()));
        }
    } else {
        let table = augment_file(&input, Some(&fields), &config)?;
        match out_dir {
            Some(dir) => {
                std::fs::create_dir_all(&dir)?;
                let dest = visaugment::io::output_path(&input, &dir);
                visaugment::io::write_datatable(&dest, &table)?;
                info!("wrote {}", dest.display());
            }
            None => {
                let stdout = io::stdout();
                let mut out = stdout.lock();
                serde_json::to_writer_pretty(&mut out, &table)?;
                out.write_all(b"\n")?;
            }
        }
    }

    Ok(())
}
