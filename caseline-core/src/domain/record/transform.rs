// caseline-core/src/domain/record/transform.rs

// Reshape raw API records into the target vocabulary.
// Fields are bound by source name (never by position), so a reordered
// payload maps identically and a renamed/missing field fails loudly.

use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::record::case::CaseRecord;
use crate::domain::record::coerce::{
    coerce_age, coerce_integer, coerce_text, parse_timestamp, strip_unit_marker,
};
use crate::domain::record::schema::is_source_field;
use crate::domain::record::table::CaseTable;

#[derive(Debug, Clone, Copy)]
pub struct TransformOptions {
    /// Reject records carrying fields outside the mapping.
    pub strict_fields: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            strict_fields: true,
        }
    }
}

/// Parses the response body. The whole body must be a JSON array.
pub fn parse_payload(body: &[u8]) -> Result<Vec<Value>, DomainError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| DomainError::PayloadShape(e.to_string()))?;

    match value {
        Value::Array(rows) => Ok(rows),
        other => Err(DomainError::PayloadShape(format!(
            "expected an array, got {}",
            json_kind(&other)
        ))),
    }
}

/// All-or-nothing: the first bad record aborts the whole table.
pub fn reshape(rows: &[Value], options: TransformOptions) -> Result<CaseTable, DomainError> {
    let mut records = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        let obj = row.as_object().ok_or_else(|| {
            DomainError::PayloadShape(format!(
                "record #{} is {}, expected an object",
                index,
                json_kind(row)
            ))
        })?;
        records.push(reshape_record(index, obj, options)?);
    }

    debug!(rows = records.len(), "Reshaped case records");
    Ok(CaseTable::new(records))
}

fn reshape_record(
    index: usize,
    obj: &Map<String, Value>,
    options: TransformOptions,
) -> Result<CaseRecord, DomainError> {
    if options.strict_fields
        && let Some(unknown) = obj.keys().find(|k| !is_source_field(k))
    {
        return Err(DomainError::UnexpectedField {
            record: index,
            field: unknown.clone(),
        });
    }

    let text = |name: &str| field(index, obj, name).map(coerce_text);

    Ok(CaseRecord {
        year: coerce_integer(index, "year", field(index, obj, "year")?)?,
        weeknum: coerce_integer(index, "weeknum", field(index, obj, "weeknum")?)?,
        gender: text("gender")?,
        age_years: coerce_age(index, field(index, obj, "age_number")?)?,
        age_range_years: strip_unit_marker(&text("age_range")?),
        job: text("job")?,
        risk: text("risk")?,
        patient_type: text("patient_type")?,
        province: text("province")?,
        reporting_group: text("reporting_group")?,
        region_odpc: text("region_odpc")?,
        region: text("region")?,
        update_date: parse_timestamp(index, field(index, obj, "update_date")?)?,
    })
}

fn field<'a>(
    index: usize,
    obj: &'a Map<String, Value>,
    name: &str,
) -> Result<&'a Value, DomainError> {
    obj.get(name).ok_or_else(|| DomainError::MissingField {
        record: index,
        field: name.to_string(),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
