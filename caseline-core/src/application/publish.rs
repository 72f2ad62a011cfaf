// caseline-core/src/application/publish.rs

use bytes::Bytes;
use tracing::{info, instrument};

use crate::domain::artifact::ArtifactLocation;
use crate::domain::record::{TransformOptions, parse_payload, reshape};
use crate::error::CaselineError;
use crate::ports::source::CaseSource;
use crate::ports::storage::ArtifactStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    pub location: ArtifactLocation,
    pub rows: usize,
}

/// Fetch the snapshot, reshape it, publish one CSV object.
///
/// The whole table is validated and serialized before the single `put`:
/// a malformed record means nothing reaches storage.
#[instrument(skip(source, store), fields(url = %source.endpoint()))]
pub async fn transform_and_publish(
    source: &dyn CaseSource,
    store: &dyn ArtifactStore,
    key: &str,
    options: TransformOptions,
) -> Result<PublishOutcome, CaselineError> {
    let payload = source.fetch().await?;

    let raw = parse_payload(&payload)?;
    let table = reshape(&raw, options)?;
    let csv = table.to_csv()?;
    info!(rows = table.len(), bytes = csv.len(), "Case table serialized");

    let location = store.put(key, Bytes::from(csv)).await?;

    Ok(PublishOutcome {
        location,
        rows: table.len(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::testing::ScriptedSource;
    use crate::domain::error::DomainError;
    use crate::domain::record::fixtures::sample_row;
    use crate::infrastructure::adapters::ObjectStoreArtifacts;
    use crate::infrastructure::error::InfrastructureError;
    use anyhow::Result;
    use serde_json::json;

    const KEY: &str = "weekly_covid_patient_information.csv";

    fn payload(rows: Vec<serde_json::Value>) -> Vec<u8> {
        serde_json::to_vec(&rows).unwrap()
    }

    #[tokio::test]
    async fn test_publishes_header_and_rows() -> Result<()> {
        let body = payload(vec![sample_row(json!("0.0")), sample_row(json!(34.9))]);
        let source = ScriptedSource::new(vec![200], &body);
        let store = ObjectStoreArtifacts::memory();

        let outcome =
            transform_and_publish(&source, &store, KEY, TransformOptions::default()).await?;

        assert_eq!(outcome.rows, 2);
        assert_eq!(outcome.location.uri(), format!("memory://{KEY}"));

        let csv = String::from_utf8(store.read(KEY).await?.to_vec())?;
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Year,Weeknum,Gender,Age (Years),Age_Range (Years),Job,Risk,Patient_Type,Province,Reporting_Group,Region_Odpc,Region,Update_Date"
        );
        assert!(!csv.contains("ปี"));
        assert!(lines[1].contains(",0,"));
        assert!(lines[2].contains(",34,"));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_age_uploads_nothing() -> Result<()> {
        let mut broken = sample_row(json!(40));
        broken.as_object_mut().unwrap().remove("age_number");
        let body = payload(vec![sample_row(json!(20)), broken]);
        let source = ScriptedSource::new(vec![200], &body);
        let store = ObjectStoreArtifacts::memory();

        let err = transform_and_publish(&source, &store, KEY, TransformOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CaselineError::Domain(DomainError::MissingField { .. })
        ));
        assert!(!err.is_retriable());
        assert!(store.read(KEY).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_server_error_on_fetch_is_retriable() -> Result<()> {
        let source = ScriptedSource::new(vec![200], b"[]").with_fetch_status(502);
        let store = ObjectStoreArtifacts::memory();

        let err = transform_and_publish(&source, &store, KEY, TransformOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CaselineError::Infrastructure(InfrastructureError::HttpStatus { status: 502, .. })
        ));
        assert!(err.is_retriable());
        Ok(())
    }

    #[tokio::test]
    async fn test_non_array_payload_is_terminal() -> Result<()> {
        let source = ScriptedSource::new(vec![200], br#"{"error":"maintenance"}"#);
        let store = ObjectStoreArtifacts::memory();

        let err = transform_and_publish(&source, &store, KEY, TransformOptions::default())
            .await
            .unwrap_err();
        assert!(!err.is_retriable());
        Ok(())
    }
}
