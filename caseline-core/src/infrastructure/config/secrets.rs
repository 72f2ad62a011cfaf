// caseline-core/src/infrastructure/config/secrets.rs

// Credentials never live in the YAML file. They are read once from the
// environment and only leave this struct through explicit accessors.

use std::fmt;

use crate::domain::warehouse::StageCredentials;
use crate::infrastructure::error::InfrastructureError;

pub const AWS_KEY_ID_VARS: [&str; 2] = ["CASELINE_AWS_ACCESS_KEY_ID", "AWS_ACCESS_KEY_ID"];
pub const AWS_SECRET_VARS: [&str; 2] = ["CASELINE_AWS_SECRET_ACCESS_KEY", "AWS_SECRET_ACCESS_KEY"];
pub const SNOWFLAKE_TOKEN_VAR: &str = "SNOWFLAKE_TOKEN";
pub const SLACK_WEBHOOK_VAR: &str = "SLACK_WEBHOOK_URL";

#[derive(Clone, Default)]
pub struct Secrets {
    aws_key_id: Option<String>,
    aws_secret: Option<String>,
    snowflake_token: Option<String>,
    slack_webhook_url: Option<String>,
}

impl Secrets {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// First non-empty value wins for each alias list.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| {
            keys.iter()
                .filter_map(|k| lookup(*k))
                .find(|v| !v.trim().is_empty())
        };
        Self {
            aws_key_id: first(&AWS_KEY_ID_VARS),
            aws_secret: first(&AWS_SECRET_VARS),
            snowflake_token: first(&[SNOWFLAKE_TOKEN_VAR]),
            slack_webhook_url: first(&[SLACK_WEBHOOK_VAR]),
        }
    }

    /// Stage credentials, only when both halves of the key pair are set.
    pub fn stage_credentials(&self, region: Option<String>) -> Option<StageCredentials> {
        match (&self.aws_key_id, &self.aws_secret) {
            (Some(key_id), Some(secret)) => Some(StageCredentials {
                key_id: key_id.clone(),
                secret: secret.clone(),
                region,
            }),
            _ => None,
        }
    }

    pub fn snowflake_token(&self) -> Result<&str, InfrastructureError> {
        self.snowflake_token
            .as_deref()
            .ok_or_else(|| InfrastructureError::MissingSecret(SNOWFLAKE_TOKEN_VAR.into()))
    }

    pub fn slack_webhook_url(&self) -> Result<&str, InfrastructureError> {
        self.slack_webhook_url
            .as_deref()
            .ok_or_else(|| InfrastructureError::MissingSecret(SLACK_WEBHOOK_VAR.into()))
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |v: &Option<String>| if v.is_some() { "****" } else { "<unset>" };
        f.debug_struct("Secrets")
            .field("aws_key_id", &mask(&self.aws_key_id))
            .field("aws_secret", &mask(&self.aws_secret))
            .field("snowflake_token", &mask(&self.snowflake_token))
            .field("slack_webhook_url", &mask(&self.slack_webhook_url))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_prefixed_aws_vars_take_precedence() {
        let secrets = Secrets::from_lookup(lookup(&[
            ("CASELINE_AWS_ACCESS_KEY_ID", "AKIA_CASELINE"),
            ("AWS_ACCESS_KEY_ID", "AKIA_GENERIC"),
            ("AWS_SECRET_ACCESS_KEY", "generic-secret"),
        ]));
        let creds = secrets.stage_credentials(Some("ap-southeast-1".into()));
        assert_eq!(
            creds.map(|c| (c.key_id, c.secret)),
            Some(("AKIA_CASELINE".to_string(), "generic-secret".to_string()))
        );
    }

    #[test]
    fn test_half_a_key_pair_is_no_credentials() {
        let secrets = Secrets::from_lookup(lookup(&[("AWS_ACCESS_KEY_ID", "AKIA")]));
        assert!(secrets.stage_credentials(None).is_none());
    }

    #[test]
    fn test_missing_secrets_are_named() {
        let secrets = Secrets::from_lookup(lookup(&[("SLACK_WEBHOOK_URL", "  ")]));
        match secrets.slack_webhook_url() {
            Err(InfrastructureError::MissingSecret(var)) => assert_eq!(var, "SLACK_WEBHOOK_URL"),
            other => panic!("expected MissingSecret, got {:?}", other),
        }
        assert!(secrets.snowflake_token().is_err());
    }

    #[test]
    fn test_debug_masks_values() {
        let secrets = Secrets::from_lookup(lookup(&[("SNOWFLAKE_TOKEN", "tok-123")]));
        let dbg = format!("{:?}", secrets);
        assert!(!dbg.contains("tok-123"));
        assert!(dbg.contains("<unset>"));
    }
}
