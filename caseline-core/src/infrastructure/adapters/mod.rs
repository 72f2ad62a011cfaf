// caseline-core/src/infrastructure/adapters/mod.rs

pub mod duckdb;
pub mod http_source;
pub mod object_store;
pub mod slack;
pub mod snowflake;

pub use self::duckdb::DuckDBConnector;
pub use self::http_source::HttpCaseSource;
pub use self::object_store::ObjectStoreArtifacts;
pub use self::slack::SlackWebhookNotifier;
pub use self::snowflake::SnowflakeConnector;
