use std::{
    borrow::Cow,
    fmt,
    io::{self, BufRead},
    time::Instant,
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;

use crate::cli::core::{CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output;
use crate::errors::CliError;
use crate::suggestions::filter_suggestions;
use crate::taxonomy::CategoryOptions;

const CATEGORY_COMMANDS: [&str; 2] = ["category", "suggest"];

/// Runs the shell until `exit`, end of input, or a fatal error.
pub fn run_cli(context: &mut ShellContext) -> Result<(), CliError> {
    match context.mode {
        CliMode::Interactive => run_interactive(context),
        CliMode::Script => run_script(context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    let helper = CommandHelper::new(
        context.command_names(),
        context.suggestions.options().clone(),
    );
    editor.set_helper(Some(helper));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    output::section("Business Form");
    output::info("Type `help` for commands or `wizard` for a guided walk-through.");

    loop {
        if !context.running {
            break;
        }
        context.suggestions.tick(Instant::now());
        if let Some(helper) = editor.helper_mut() {
            helper.chosen = context.form.business().categories.clone();
        }
        let prompt = context.prompt();
        let line = editor.readline(&prompt);

        match line {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                editor.add_history_entry(trimmed).ok();

                match handle_line(context, trimmed) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err)?,
                }
            }
            Err(ReadlineError::Interrupted) => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        context.suggestions.tick(Instant::now());
        let line = line?;
        match handle_line(context, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

pub(crate) fn handle_line(
    context: &mut ShellContext,
    line: &str,
) -> Result<LoopControl, CommandError> {
    let tokens = match parse_command_line(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(&err.message);
            return Ok(LoopControl::Continue);
        }
    };

    if tokens.is_empty() || tokens[0].starts_with('#') {
        return Ok(LoopControl::Continue);
    }

    let raw = &tokens[0];
    let command = raw.to_lowercase();
    let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

    context.last_command = Some(line.trim().to_string());

    match context.dispatch(&command, raw, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        other => other,
    }
}

/// Completes command names, and category names after `category`/`suggest`
/// (taxonomy order, excluding chosen ones) or `remove-category` (chosen ones).
struct CommandHelper {
    commands: Vec<String>,
    options: CategoryOptions,
    chosen: Vec<String>,
}

impl CommandHelper {
    fn new(names: Vec<&'static str>, options: CategoryOptions) -> Self {
        let mut commands: Vec<String> = names
            .into_iter()
            .map(|name| name.to_ascii_lowercase())
            .collect();
        commands.sort();
        commands.dedup();
        Self {
            commands,
            options,
            chosen: Vec::new(),
        }
    }

    fn category_candidates(&self, command: &str, needle: &str) -> Vec<String> {
        if CATEGORY_COMMANDS.contains(&command) {
            self.options
                .with_names(|names| filter_suggestions(names, needle, &self.chosen))
        } else if command == "remove-category" {
            filter_suggestions(&self.chosen, needle, &[])
        } else {
            Vec::new()
        }
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let leading = prefix.len() - prefix.trim_start().len();
        let trimmed = &prefix[leading..];

        if let Some(space_idx) = trimmed.find(char::is_whitespace) {
            let command = trimmed[..space_idx].to_ascii_lowercase();
            let rest = &trimmed[space_idx..];
            let start = leading + space_idx + (rest.len() - rest.trim_start().len());
            let candidates = self
                .category_candidates(&command, &prefix[start..])
                .into_iter()
                .map(|name| Pair {
                    display: name.clone(),
                    replacement: name,
                })
                .collect();
            return Ok((start, candidates));
        }

        let needle = trimmed.to_ascii_lowercase();
        let candidates = self
            .commands
            .iter()
            .filter(|name| name.starts_with(&needle))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect();
        Ok((leading, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        let _ = ctx;
        Ok(ValidationResult::Valid(None))
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
