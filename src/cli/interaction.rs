//! Terminal implementation of [`FormInteraction`] built on dialoguer.

use dialoguer::{theme::ColorfulTheme, Input, Select};

use crate::cli::forms::{
    ConfirmationResponse, FieldKind, FormInteraction, FormSummary, PromptContext, PromptResponse,
};
use crate::cli::output;

/// Maps typed text to a prompt response. Blank input keeps the default when
/// there is one; `:back`, `:help` and `:cancel` steer the wizard.
pub(crate) fn interpret_text(raw: &str, default: Option<&str>) -> PromptResponse {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return if default.is_some() {
            PromptResponse::Keep
        } else {
            PromptResponse::Value(String::new())
        };
    }
    match trimmed.to_ascii_lowercase().as_str() {
        ":cancel" => PromptResponse::Cancel,
        ":back" => PromptResponse::Back,
        ":help" => PromptResponse::Help,
        _ => PromptResponse::Value(raw.to_string()),
    }
}

#[derive(Debug, Default)]
pub struct DialoguerInteraction;

impl DialoguerInteraction {
    pub fn new() -> Self {
        Self
    }
}

impl FormInteraction for DialoguerInteraction {
    fn prompt_field(&mut self, context: &PromptContext<'_>) -> PromptResponse {
        let theme = ColorfulTheme::default();
        let prompt = match &context.descriptor.kind {
            FieldKind::Choice(_) => format!("{} (number or name)", context.descriptor.label),
            FieldKind::Text => context.descriptor.label.to_string(),
        };
        let answer = Input::<String>::with_theme(&theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text();
        match answer {
            Ok(raw) => interpret_text(&raw, context.default),
            Err(_) => PromptResponse::Cancel,
        }
    }

    fn confirm(&mut self, _summary: &FormSummary, lines: &[String]) -> ConfirmationResponse {
        output::lines(lines);
        let options = ["Save", "Edit previous field", "Cancel"];
        let choice = Select::with_theme(&ColorfulTheme::default())
            .items(&options)
            .default(0)
            .interact_opt();
        match choice {
            Ok(Some(0)) => ConfirmationResponse::Confirm,
            Ok(Some(1)) => ConfirmationResponse::Back,
            _ => ConfirmationResponse::Cancel,
        }
    }
}
