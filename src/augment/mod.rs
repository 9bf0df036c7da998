// src/augment/mod.rs
pub mod binning;
pub mod error;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::{AugmentConfig, AxisCheck};
use crate::table::{axis_value_millis, Datatable, DatatableColumn, Row};

pub use error::AugmentError;

/// Suffix appended to an annotation name to form its column id.
pub const ANNOTATION_ID_SUFFIX: &str = "-annotation-id";

/// A named set of event instants to overlay on a time-series chart.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Annotation {
    pub name: String,
    #[serde(default)]
    pub timestamps: Vec<f64>,
}

impl Annotation {
    pub fn new(name: impl Into<String>, timestamps: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            timestamps,
        }
    }

    /// Column id under which this annotation's per-row counts are stored.
    pub fn column_id(&self) -> String {
        format!("{}{}", self.name, ANNOTATION_ID_SUFFIX)
    }
}

/// Extra layers attached to a visualization. Only annotations exist today.
#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Clone)]
pub struct AugmentVisFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Vec<Annotation>>,
}

impl AugmentVisFields {
    pub fn with_annotations(annotations: Vec<Annotation>) -> Self {
        Self {
            annotations: Some(annotations),
        }
    }

    pub fn annotations(&self) -> &[Annotation] {
        self.annotations.as_deref().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations().is_empty()
    }
}

/// Bin every annotation timestamp into its nearest row and count hits per row.
///
/// Works on a clone of `datatable`; the input is left untouched. For each
/// annotation a column `<name>-annotation-id` is registered, then:
///
/// - no rows: nothing is assigned
/// - one row: that row receives the total timestamp count for the layer
/// - otherwise: each timestamp goes to the nearest row on the x-axis
///   (`columns[0]`), see [`binning::assign_buckets`]
///
/// Rows never hit by a layer carry no field for it.
#[instrument(level = "debug", skip_all, fields(rows = datatable.rows.len(), layers = fields.annotations().len()))]
pub fn augment_table(
    datatable: &Datatable,
    fields: &AugmentVisFields,
    config: &AugmentConfig,
) -> Result<Datatable, AugmentError> {
    let mut augmented = datatable.clone();
    let annotations = fields.annotations();
    if annotations.is_empty() {
        return Ok(augmented);
    }

    // Only needed once there is something to bin between.
    let axis = if augmented.rows.len() >= 2 {
        Some(axis_positions(&augmented, config.axis_check)?)
    } else {
        None
    };

    for annotation in annotations {
        let column_id = annotation.column_id();
        augmented.push_column(DatatableColumn::new(&column_id, &annotation.name));

        match augmented.rows.len() {
            0 => {
                debug!(annotation = %annotation.name, "empty table, nothing to bin");
            }
            1 => {
                let total = annotation.timestamps.len() as u64;
                debug!(annotation = %annotation.name, total, "single row takes every timestamp");
                if total > 0 {
                    add_count(&mut augmented.rows[0], &column_id, total);
                }
            }
            _ => {
                let axis = axis.as_deref().unwrap_or_default();
                let counts = binning::bucket_counts(axis, &annotation.timestamps);
                for (row, hits) in augmented.rows.iter_mut().zip(counts) {
                    if hits > 0 {
                        add_count(row, &column_id, hits);
                    }
                }
                debug!(
                    annotation = %annotation.name,
                    timestamps = annotation.timestamps.len(),
                    "binned annotation"
                );
            }
        }
    }

    Ok(augmented)
}

/// x-axis positions for every row, checked for order according to `check`.
fn axis_positions(table: &Datatable, check: AxisCheck) -> Result<Vec<f64>, AugmentError> {
    let column = table.x_axis().ok_or(AugmentError::MissingAxisColumn)?;

    let axis = table
        .rows
        .iter()
        .enumerate()
        .map(|(row, values)| {
            axis_value_millis(values.get(&column.id)).ok_or_else(|| {
                AugmentError::InvalidAxisValue {
                    row,
                    column: column.id.clone(),
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if check != AxisCheck::Off {
        if let Some(row) = binning::first_unsorted(&axis) {
            if check == AxisCheck::Strict {
                return Err(AugmentError::UnsortedAxis {
                    row,
                    column: column.id.clone(),
                });
            }
            warn!(
                row,
                column = %column.id,
                "x-axis is not sorted ascending; annotation bins may be wrong"
            );
        }
    }

    Ok(axis)
}

/// Add `n` to the row's counter for `column_id`, treating absent as zero.
fn add_count(row: &mut Row, column_id: &str, n: u64) {
    let current = match row.get(column_id) {
        None => 0,
        Some(v) => v.as_u64().unwrap_or_else(|| {
            warn!(column = column_id, value = %v, "existing annotation count is not a count; resetting");
            0
        }),
    };
    row.insert(column_id.to_string(), Value::from(current + n));
}
