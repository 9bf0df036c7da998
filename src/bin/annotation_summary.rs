use anyhow::{anyhow, Result};
use std::env;
use tracing_subscriber::{fmt, EnvFilter};
use visaugment::{
    augment::ANNOTATION_ID_SUFFIX,
    io::read_datatable,
    table::{axis_value_millis, DatatableColumn},
};

/// Print a per-row table of annotation hit counts for an augmented datatable.
fn main() -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let path = env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("Usage: annotation_summary <AUGMENTED_TABLE_JSON>"))?;
    let table = read_datatable(&path)?;

    let x_axis = table
        .x_axis()
        .ok_or_else(|| anyhow!("{} has no columns", path))?;
    let layers: Vec<&DatatableColumn> = table
        .columns
        .iter()
        .filter(|c| c.id.ends_with(ANNOTATION_ID_SUFFIX))
        .collect();
    if layers.is_empty() {
        println!("{}: no annotation columns", path);
        return Ok(());
    }

    print!("{: <6} {: <26}", "Row", x_axis.name);
    for layer in &layers {
        print!(" {:>12}", layer.name);
    }
    println!();
    println!("{:-<1$}", "", 33 + 13 * layers.len());

    let mut totals = vec![0u64; layers.len()];
    for (i, row) in table.rows.iter().enumerate() {
        let x = row.get(&x_axis.id);
        let label = match (x, axis_value_millis(x)) {
            (_, Some(ms)) => chrono::DateTime::from_timestamp_millis(ms as i64)
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| ms.to_string()),
            (Some(v), None) => v.to_string(),
            (None, None) => "-".to_string(),
        };
        print!("{: <6} {: <26}", i, label);
        for (j, layer) in layers.iter().enumerate() {
            let n = row.get(&layer.id).and_then(|v| v.as_u64()).unwrap_or(0);
            totals[j] += n;
            print!(" {:>12}", n);
        }
        println!();
    }

    println!("{:-<1$}", "", 33 + 13 * layers.len());
    print!("{: <33}", "total");
    for t in totals {
        print!(" {:>12}", t);
    }
    println!();

    Ok(())
}
