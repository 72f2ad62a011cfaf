// caseline-core/src/domain/record/case.rs

use chrono::NaiveDateTime;
use serde::Serialize;

/// One line-list row after reshaping, fields in target column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseRecord {
    pub year: i32,
    pub weeknum: i32,
    pub gender: String,
    pub age_years: i64,
    pub age_range_years: String,
    pub job: String,
    pub risk: String,
    pub patient_type: String,
    pub province: String,
    pub reporting_group: String,
    pub region_odpc: String,
    pub region: String,
    pub update_date: NaiveDateTime,
}
