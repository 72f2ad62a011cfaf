// caseline-core/src/lib.rs

#![allow(missing_docs)]
// Memory safety
#![deny(unsafe_code)]
// Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::perf)]

// --- MODULES HEXAGONAUX ---

// 1. Ports (Interfaces / Traits)
// Source API, object store, warehouse, notifier.
pub mod ports;

// 2. Domain
// Field mapping, case table, warehouse statements, task graph, retry policy.
// Depends on nothing else in the crate.
pub mod domain;

// 3. Infrastructure (Adapters)
// reqwest, object_store, DuckDB, Snowflake SQL API, Slack webhook, config files.
pub mod infrastructure;

// 4. Application (Use Cases)
// One module per pipeline stage plus the orchestrator.
pub mod application;

// --- GESTION DES ERREURS GLOBALE ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::CaselineError;
