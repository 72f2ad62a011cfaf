// caseline-core/src/infrastructure/templating/mod.rs

pub mod jinja;

pub use jinja::JinjaRenderer;
