// caseline-core/src/domain/record/table.rs

use std::sync::Arc;

use arrow::array::{ArrayRef, Int32Array, Int64Array, StringArray, TimestampSecondArray};
use arrow::csv::WriterBuilder;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use arrow::record_batch::RecordBatch;

use crate::domain::error::DomainError;
use crate::domain::record::case::CaseRecord;
use crate::domain::record::schema::FIELD_MAPPINGS;

/// Timestamp layout of the CSV artifact, accepted as-is by both warehouses.
pub const CSV_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The reshaped snapshot. Lives for a single run.
#[derive(Debug, Clone, Default)]
pub struct CaseTable {
    records: Vec<CaseRecord>,
}

impl CaseTable {
    pub fn new(records: Vec<CaseRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Arrow schema of the transformed table. Column names come from the
    /// field mapping; age is an integer here even though the warehouse
    /// stores it as text.
    pub fn schema() -> SchemaRef {
        let [
            year,
            weeknum,
            gender,
            age,
            age_range,
            job,
            risk,
            patient_type,
            province,
            group,
            odpc,
            region,
            update,
        ] = FIELD_MAPPINGS.map(|m| m.target);

        Arc::new(Schema::new(vec![
            Field::new(year, DataType::Int32, false),
            Field::new(weeknum, DataType::Int32, false),
            Field::new(gender, DataType::Utf8, false),
            Field::new(age, DataType::Int64, false),
            Field::new(age_range, DataType::Utf8, false),
            Field::new(job, DataType::Utf8, false),
            Field::new(risk, DataType::Utf8, false),
            Field::new(patient_type, DataType::Utf8, false),
            Field::new(province, DataType::Utf8, false),
            Field::new(group, DataType::Utf8, false),
            Field::new(odpc, DataType::Utf8, false),
            Field::new(region, DataType::Utf8, false),
            Field::new(update, DataType::Timestamp(TimeUnit::Second, None), false),
        ]))
    }

    pub fn to_record_batch(&self) -> Result<RecordBatch, DomainError> {
        let text = |get: fn(&CaseRecord) -> &str| -> ArrayRef {
            Arc::new(StringArray::from_iter_values(self.records.iter().map(get)))
        };

        let columns: Vec<ArrayRef> = vec![
            Arc::new(Int32Array::from_iter_values(
                self.records.iter().map(|r| r.year),
            )),
            Arc::new(Int32Array::from_iter_values(
                self.records.iter().map(|r| r.weeknum),
            )),
            text(|r| &r.gender),
            Arc::new(Int64Array::from_iter_values(
                self.records.iter().map(|r| r.age_years),
            )),
            text(|r| &r.age_range_years),
            text(|r| &r.job),
            text(|r| &r.risk),
            text(|r| &r.patient_type),
            text(|r| &r.province),
            text(|r| &r.reporting_group),
            text(|r| &r.region_odpc),
            text(|r| &r.region),
            Arc::new(TimestampSecondArray::from_iter_values(
                self.records
                    .iter()
                    .map(|r| r.update_date.and_utc().timestamp()),
            )),
        ];

        Ok(RecordBatch::try_new(Self::schema(), columns)?)
    }

    /// Header row + one line per record, no index column.
    pub fn to_csv(&self) -> Result<Vec<u8>, DomainError> {
        let batch = self.to_record_batch()?;
        let mut writer = WriterBuilder::new()
            .with_header(true)
            .with_delimiter(b',')
            .with_timestamp_format(CSV_TIMESTAMP_FORMAT.to_string())
            .build(Vec::new());
        writer.write(&batch)?;
        Ok(writer.into_inner())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::record::fixtures::sample_row;
    use crate::domain::record::schema::{AGE_UNIT_MARKER, FIELD_COUNT, target_columns};
    use crate::domain::record::transform::{TransformOptions, reshape};
    use arrow::csv::ReaderBuilder;
    use arrow::csv::reader::Format;
    use serde_json::json;
    use std::io::Cursor;

    fn sample_table(n: usize) -> CaseTable {
        let rows: Vec<_> = (0..n).map(|i| sample_row(json!(i.to_string()))).collect();
        reshape(&rows, TransformOptions::default()).unwrap()
    }

    #[test]
    fn test_csv_header_matches_target_vocabulary() {
        let csv = String::from_utf8(sample_table(3).to_csv().unwrap()).unwrap();
        let mut lines = csv.lines();

        let header: Vec<&str> = lines.next().unwrap().split(',').collect();
        let expected: Vec<&str> = target_columns().collect();
        assert_eq!(header, expected);
        assert_eq!(lines.count(), 3);
    }

    #[test]
    fn test_csv_rows_carry_coerced_values() {
        let csv = String::from_utf8(sample_table(1).to_csv().unwrap()).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "2023,3,หญิง,0,20-29 ,พนักงานบริษัท,สัมผัสใกล้ชิดผู้ป่วย,ผู้ป่วยนอก,กรุงเทพมหานคร,1,13,กรุงเทพฯ,2023-01-16 07:36:13"
        );
        assert!(!csv.contains(AGE_UNIT_MARKER));
    }

    #[test]
    fn test_csv_round_trip_preserves_rows_and_columns() {
        let table = sample_table(5);
        let csv = table.to_csv().unwrap();

        let (inferred, _) = Format::default()
            .with_header(true)
            .infer_schema(Cursor::new(&csv), None)
            .unwrap();
        assert_eq!(inferred.fields().len(), FIELD_COUNT);

        let reader = ReaderBuilder::new(CaseTable::schema())
            .with_header(true)
            .build(Cursor::new(csv))
            .unwrap();
        let batches: Vec<RecordBatch> = reader.collect::<Result<_, _>>().unwrap();
        let rows: usize = batches.iter().map(|b| b.num_rows()).sum();
        assert_eq!(rows, table.len());
        assert_eq!(batches[0], table.to_record_batch().unwrap());
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let mut row = sample_row(json!("51"));
        row["job"] = json!("ค้าขาย, รับจ้าง");
        let table = reshape(&[row], TransformOptions::default()).unwrap();
        let csv = String::from_utf8(table.to_csv().unwrap()).unwrap();
        assert!(csv.contains("\"ค้าขาย, รับจ้าง\""));
    }

    #[test]
    fn test_sub_second_precision_is_dropped_in_csv() {
        let mut row = sample_row(json!("51"));
        row["update_date"] = json!("2023-01-16 07:36:13.987654");
        let table = reshape(&[row], TransformOptions::default()).unwrap();
        let csv = String::from_utf8(table.to_csv().unwrap()).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert!(row.ends_with(",2023-01-16 07:36:13"), "{row}");
    }

    #[test]
    fn test_empty_table_still_has_header() {
        let csv = String::from_utf8(CaseTable::default().to_csv().unwrap()).unwrap();
        assert_eq!(csv.lines().count(), 1);
        assert!(csv.starts_with("Year,Weeknum,Gender,Age (Years)"));
    }
}
