// src/expression.rs
use tracing::{debug, info};

use crate::augment::{augment_table, AugmentError, AugmentVisFields};
use crate::config::AugmentConfig;
use crate::table::Datatable;

/// Parse the raw `augmentVisFields` expression argument.
///
/// `None`, empty and whitespace-only strings all mean "no augmentation".
pub fn parse_augment_fields(raw: Option<&str>) -> Result<AugmentVisFields, AugmentError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(AugmentVisFields::default()),
        Some(s) => Ok(serde_json::from_str(s)?),
    }
}

/// Table stage of the `vega_spec` expression function.
///
/// Takes the incoming datatable plus the serialized augment fields and
/// returns the table the chart spec should be built from: augmented when
/// annotation layers are present, otherwise an untouched copy.
pub fn vega_spec_table(
    input: &Datatable,
    augment_vis_fields: Option<&str>,
    config: &AugmentConfig,
) -> Result<Datatable, AugmentError> {
    let fields = parse_augment_fields(augment_vis_fields)?;
    if fields.is_empty() {
        debug!("no augment fields; passing table through");
        return Ok(input.clone());
    }

    if !config.enabled {
        return Err(AugmentError::Disabled);
    }
    let count = fields.annotations().len();
    if count > config.max_layers {
        return Err(AugmentError::TooManyLayers {
            count,
            max: config.max_layers,
        });
    }

    let table = augment_table(input, &fields, config)?;
    info!(
        rows = table.rows.len(),
        layers = count,
        "augmented table with annotation layers"
    );
    Ok(table)
}
