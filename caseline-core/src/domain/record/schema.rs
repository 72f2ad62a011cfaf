// caseline-core/src/domain/record/schema.rs

use serde::Serialize;

/// Warehouse-side type of a target column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    Text,
    DateTime,
}

/// Binds one source API field to its target column, by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldMapping {
    pub source: &'static str,
    pub target: &'static str,
    pub column_type: ColumnType,
}

const fn field(
    source: &'static str,
    target: &'static str,
    column_type: ColumnType,
) -> FieldMapping {
    FieldMapping {
        source,
        target,
        column_type,
    }
}

pub const FIELD_COUNT: usize = 13;

/// Source-to-target mapping in output column order.
///
/// `Age (Years)` is an integer in the transformed table but lands in a text
/// column of the warehouse table.
pub const FIELD_MAPPINGS: [FieldMapping; FIELD_COUNT] = [
    field("year", "Year", ColumnType::Integer),
    field("weeknum", "Weeknum", ColumnType::Integer),
    field("gender", "Gender", ColumnType::Text),
    field("age_number", "Age (Years)", ColumnType::Text),
    field("age_range", "Age_Range (Years)", ColumnType::Text),
    field("job", "Job", ColumnType::Text),
    field("risk", "Risk", ColumnType::Text),
    field("patient_type", "Patient_Type", ColumnType::Text),
    field("province", "Province", ColumnType::Text),
    field("reporting_group", "Reporting_Group", ColumnType::Text),
    field("region_odpc", "Region_Odpc", ColumnType::Text),
    field("region", "Region", ColumnType::Text),
    field("update_date", "Update_Date", ColumnType::DateTime),
];

/// Unit suffix ("years" in Thai) removed from the age-range values.
pub const AGE_UNIT_MARKER: &str = "ปี";

pub fn target_columns() -> impl Iterator<Item = &'static str> {
    FIELD_MAPPINGS.iter().map(|m| m.target)
}

pub fn is_source_field(name: &str) -> bool {
    FIELD_MAPPINGS.iter().any(|m| m.source == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_mapping_names_are_unique() {
        let sources: HashSet<_> = FIELD_MAPPINGS.iter().map(|m| m.source).collect();
        let targets: HashSet<_> = target_columns().collect();
        assert_eq!(sources.len(), FIELD_COUNT);
        assert_eq!(targets.len(), FIELD_COUNT);
        // No target name collides with a source name
        assert!(targets.iter().all(|t| !is_source_field(t)));
    }

    #[test]
    fn test_warehouse_layout() {
        let count = |ty: ColumnType| FIELD_MAPPINGS.iter().filter(|m| m.column_type == ty).count();
        assert_eq!(count(ColumnType::Integer), 2);
        assert_eq!(count(ColumnType::Text), 10);
        assert_eq!(count(ColumnType::DateTime), 1);
    }
}
