// caseline-core/src/domain/warehouse/mod.rs

pub mod compiler;
pub mod statement;

pub use compiler::StatementCompiler;
pub use statement::{CsvFileFormat, Dialect, StageCredentials, WarehouseStatement, WarehouseTarget};
