// caseline-core/src/application/ports/renderer.rs

use crate::error::CaselineError;

pub trait TemplateEngine: Send + Sync {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, CaselineError>;
}
