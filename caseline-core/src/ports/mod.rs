// caseline-core/src/ports/mod.rs

pub mod connector;
pub mod notifier;
pub mod source;
pub mod storage;

pub use connector::Connector;
pub use notifier::Notifier;
pub use source::{CaseSource, PokeOutcome};
pub use storage::ArtifactStore;
