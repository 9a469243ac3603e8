//! Shell context, dispatch, and error reporting for the terminal front end.

use std::io;
use std::time::Duration;

use strsim::levenshtein;
use thiserror::Error;

use crate::cli::forms::{FormInteraction, ValidationError};
use crate::cli::interaction::DialoguerInteraction;
use crate::cli::io as cli_io;
use crate::cli::registry::CommandRegistry;
use crate::errors::{CliError, FormError};
use crate::form::BusinessForm;
use crate::submit::{SubmissionSink, SubmitHandler};
use crate::suggestions::SuggestionEngine;
use crate::taxonomy::CategoryOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Per-command failure. Reported to the user; the shell keeps running.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ValidationError> for CommandError {
    fn from(err: ValidationError) -> Self {
        CommandError::Message(err.message)
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Form(inner) => CliError::Core(inner),
            other => CliError::Command(other.to_string()),
        }
    }
}

pub type SharedSink = Box<dyn SubmissionSink + Send>;

/// Everything a command handler may touch.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub form: BusinessForm,
    pub suggestions: SuggestionEngine,
    pub submitter: SubmitHandler<SharedSink>,
    pub interaction: Option<Box<dyn FormInteraction + Send>>,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    /// Wizards use dialoguer in interactive mode and are unavailable in
    /// script mode unless an interaction is supplied.
    pub fn new(mode: CliMode, options: CategoryOptions, sink: SharedSink, grace: Duration) -> Self {
        let mut registry = CommandRegistry::new();
        super::commands::register_all(&mut registry);
        let interaction: Option<Box<dyn FormInteraction + Send>> = match mode {
            CliMode::Interactive => Some(Box::new(DialoguerInteraction::new())),
            CliMode::Script => None,
        };
        Self {
            mode,
            registry,
            form: BusinessForm::new(),
            suggestions: SuggestionEngine::with_grace(options, grace),
            submitter: SubmitHandler::new(sink),
            interaction,
            last_command: None,
            running: true,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_interaction(mut self, interaction: Box<dyn FormInteraction + Send>) -> Self {
        self.interaction = Some(interaction);
        self
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn prompt(&self) -> String {
        let name = self.form.business().name.trim();
        if name.is_empty() {
            "business-form> ".to_string()
        } else {
            format!("business-form ({})> ", name)
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &needle), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action("Exit shell?", true)?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Form(FormError::Incomplete(missing)) => {
                cli_io::print_error("Cannot submit: required fields are missing.");
                for field in missing {
                    cli_io::print_hint(format!("- {}", field));
                }
                Ok(())
            }
            CommandError::Io(err) if self.mode == CliMode::Script => Err(err.into()),
            other => {
                cli_io::print_error(other.to_string());
                Ok(())
            }
        }
    }
}

#[cfg(test)]
pub(crate) fn process_script(
    context: &mut ShellContext,
    lines: &[&str],
) -> Result<(), CliError> {
    for line in lines {
        match crate::cli::shell::handle_line(context, line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::domain::Business;

    /// Sink that keeps every submitted record for inspection.
    #[derive(Clone, Default)]
    pub struct CapturingSink {
        pub received: Arc<Mutex<Vec<Business>>>,
    }

    impl SubmissionSink for CapturingSink {
        fn submit(&mut self, business: &Business) -> Result<(), FormError> {
            self.received
                .lock()
                .map_err(|err| FormError::Submission(err.to_string()))?
                .push(business.clone());
            Ok(())
        }
    }

    pub fn script_context(categories: &[&str]) -> (ShellContext, CapturingSink) {
        let sink = CapturingSink::default();
        let options = CategoryOptions::from_names(categories.iter().copied());
        let context = ShellContext::new(
            CliMode::Script,
            options,
            Box::new(sink.clone()),
            Duration::from_millis(100),
        );
        (context, sink)
    }
}
