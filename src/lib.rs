pub mod augment;
pub mod config;
pub mod expression;
pub mod io;
pub mod table;

pub use augment::{augment_table, Annotation, AugmentError, AugmentVisFields};
pub use config::{AugmentConfig, AxisCheck};
pub use expression::vega_spec_table;
pub use table::{Datatable, DatatableColumn, Row};
