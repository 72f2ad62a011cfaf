// caseline-core/src/domain/record/mod.rs

pub mod case;
pub mod coerce;
pub mod schema;
pub mod table;
pub mod transform;

pub use case::CaseRecord;
pub use schema::{AGE_UNIT_MARKER, ColumnType, FIELD_COUNT, FIELD_MAPPINGS, FieldMapping};
pub use table::CaseTable;
pub use transform::{TransformOptions, parse_payload, reshape};
