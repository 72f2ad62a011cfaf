// caseline-core/src/infrastructure/templating/jinja.rs

// Renders the notification message. Only the values the pipeline puts in
// the context are visible; a misspelled variable is an error, not a blank.

use minijinja::{Environment, UndefinedBehavior};

use crate::application::ports::TemplateEngine;
use crate::error::CaselineError;
use crate::infrastructure::error::InfrastructureError;

pub struct JinjaRenderer<'a> {
    env: Environment<'a>,
}

impl<'a> JinjaRenderer<'a> {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        Self { env }
    }
}

impl<'a> Default for JinjaRenderer<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> TemplateEngine for JinjaRenderer<'a> {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, CaselineError> {
        self.env
            .render_str(template, context)
            .map_err(|e| CaselineError::Infrastructure(InfrastructureError::TemplateError(e)))
    }
}
