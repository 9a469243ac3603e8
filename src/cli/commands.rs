//! Shell command handlers.

use std::time::Instant;

use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::forms::{
    BranchWizard, BusinessWizard, ContactWizard, FormEngine, FormFlow, FormResult,
    SocialLinkWizard,
};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::cli::render;
use crate::domain::{BranchId, ContactId, ContactKind, SocialLinkId, SocialPlatform};
use crate::form::{BranchField, BusinessField, ContactUpdate, SocialLinkUpdate};
use crate::suggestions::same_category;
use crate::taxonomy::LoadState;

pub fn register_all(registry: &mut CommandRegistry) {
    registry.register(CommandEntry::new(
        "help",
        "Show available commands",
        "help [command]",
        cmd_help,
    ));
    registry.register(CommandEntry::new(
        "show",
        "Display the business as entered so far",
        "show",
        cmd_show,
    ));
    registry.register(CommandEntry::new(
        "name",
        "Set the business name",
        "name <text>",
        cmd_name,
    ));
    registry.register(CommandEntry::new(
        "description",
        "Set the business description",
        "description <text>",
        cmd_description,
    ));
    registry.register(CommandEntry::new(
        "category",
        "Type into the category field; a unique match is added",
        "category [text]",
        cmd_category,
    ));
    registry.register(CommandEntry::new(
        "suggest",
        "List category suggestions for a prefix",
        "suggest [prefix]",
        cmd_suggest,
    ));
    registry.register(CommandEntry::new(
        "remove-category",
        "Remove a chosen category",
        "remove-category <name>",
        cmd_remove_category,
    ));
    registry.register(CommandEntry::new(
        "add-branch",
        "Add a branch",
        "add-branch [name] [address]",
        cmd_add_branch,
    ));
    registry.register(CommandEntry::new(
        "branch",
        "Edit a branch field",
        "branch <n> name|address <text>",
        cmd_branch,
    ));
    registry.register(CommandEntry::new(
        "add-contact",
        "Add a contact to a branch",
        "add-contact <branch> [phone|email|fax] [info]",
        cmd_add_contact,
    ));
    registry.register(CommandEntry::new(
        "contact",
        "Edit a contact field",
        "contact <branch> <n> type|info <value>",
        cmd_contact,
    ));
    registry.register(CommandEntry::new(
        "add-social",
        "Add a social link to a branch",
        "add-social <branch> [facebook|twitter|linkedin] [info]",
        cmd_add_social,
    ));
    registry.register(CommandEntry::new(
        "social",
        "Edit a social link field",
        "social <branch> <n> platform|info <value>",
        cmd_social,
    ));
    registry.register(CommandEntry::new(
        "wizard",
        "Step through a guided form",
        "wizard [business | branch [n] | contact <branch> [n] | social <branch> [n]]",
        cmd_wizard,
    ));
    registry.register(CommandEntry::new(
        "submit",
        "Validate and submit the business",
        "submit",
        cmd_submit,
    ));
    registry.register(CommandEntry::new(
        "reset",
        "Discard everything entered so far",
        "reset",
        cmd_reset,
    ));
    registry.register(CommandEntry::new(
        "exit",
        "Leave the shell",
        "exit",
        cmd_exit,
    ));
    registry.alias("quit", "exit");
}

fn usage_error(context: &ShellContext, command: &str) -> CommandError {
    let usage = context
        .registry
        .get(command)
        .map(|entry| entry.usage)
        .unwrap_or(command);
    CommandError::InvalidArguments(format!("Usage: {}", usage))
}

fn joined(args: &[&str]) -> String {
    args.join(" ")
}

fn parse_position(raw: &str, what: &str) -> Result<usize, CommandError> {
    match raw.trim().parse::<usize>() {
        Ok(position) if position > 0 => Ok(position - 1),
        _ => Err(CommandError::InvalidArguments(format!(
            "Expected a {} number starting at 1, got `{}`",
            what, raw
        ))),
    }
}

fn branch_at(context: &ShellContext, raw: &str) -> Result<BranchId, CommandError> {
    let position = parse_position(raw, "branch")?;
    context.form.branch_id(position).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "No branch #{} (the form has {})",
            position + 1,
            context.form.business().branches.len()
        ))
    })
}

fn contact_at(
    context: &ShellContext,
    branch: BranchId,
    raw: &str,
) -> Result<ContactId, CommandError> {
    let position = parse_position(raw, "contact")?;
    context
        .form
        .contact_id(branch, position)
        .ok_or_else(|| CommandError::InvalidArguments(format!("No contact #{}", position + 1)))
}

fn social_link_at(
    context: &ShellContext,
    branch: BranchId,
    raw: &str,
) -> Result<SocialLinkId, CommandError> {
    let position = parse_position(raw, "social link")?;
    context
        .form
        .social_link_id(branch, position)
        .ok_or_else(|| CommandError::InvalidArguments(format!("No social link #{}", position + 1)))
}

fn print_load_notice(context: &ShellContext) {
    let state = context.suggestions.options().state();
    if let Some(notice) = render::load_notice(&state) {
        match state {
            LoadState::Failed(_) => io::print_warning(notice),
            _ => io::print_info(notice),
        }
    }
}

fn print_suggestions(items: &[String]) {
    for item in items {
        output::detail(item);
    }
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        let entry = context
            .registry
            .get(&name.to_lowercase())
            .ok_or_else(|| CommandError::InvalidArguments(format!("Unknown command `{}`", name)))?;
        output::info(format!("{}: {}", entry.name, entry.description));
        output::detail(format!("Usage: {}", entry.usage));
        return Ok(());
    }
    output::section("Commands");
    let width = context
        .registry
        .list()
        .iter()
        .map(|entry| entry.usage.len())
        .max()
        .unwrap_or(0);
    let lines: Vec<String> = context
        .registry
        .list()
        .iter()
        .map(|entry| format!("  {:<width$}  {}", entry.usage, entry.description))
        .collect();
    output::lines(&lines);
    Ok(())
}

fn cmd_show(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let state = context.suggestions.options().state();
    output::lines(&render::form_lines(context.form.business(), &state));
    Ok(())
}

fn cmd_name(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(usage_error(context, "name"));
    }
    context.form.set_field(BusinessField::Name, joined(args));
    io::print_success("Name updated.");
    Ok(())
}

fn cmd_description(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(usage_error(context, "description"));
    }
    context
        .form
        .set_field(BusinessField::Description, joined(args));
    io::print_success("Description updated.");
    Ok(())
}

fn cmd_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let text = joined(args);
    let text = text.trim();
    let chosen = context.form.business().categories.clone();

    context.suggestions.on_focus();
    context.suggestions.on_input(text, &chosen);

    if text.is_empty() {
        show_open_list(context);
        context.suggestions.on_blur(Instant::now());
        return Ok(());
    }

    if let Some(existing) = chosen
        .iter()
        .find(|category| same_category(category, text))
    {
        io::print_info(format!("`{}` is already chosen.", existing));
    } else if let Some(choice) = context.suggestions.resolve_input() {
        context.suggestions.select(&choice, &mut context.form);
        io::print_success(format!("Added category `{}`.", choice));
    } else if context.suggestions.is_visible() {
        io::print_info(format!("Several categories match `{}`:", text));
        print_suggestions(context.suggestions.filtered());
        output::detail("Type more of the name to choose one.");
    } else {
        io::print_warning(format!("No category matches `{}`.", text));
        if let Some(hint) = context.suggestions.closest(text) {
            io::print_info(format!("Did you mean `{}`?", hint));
        }
        print_load_notice(context);
    }

    context.suggestions.on_blur(Instant::now());
    Ok(())
}

fn show_open_list(context: &ShellContext) {
    let chosen = &context.form.business().categories;
    if chosen.is_empty() {
        io::print_info("No categories chosen yet.");
    } else {
        io::print_info(format!("Chosen: {}", chosen.join(", ")));
    }
    if context.suggestions.is_visible() {
        print_suggestions(context.suggestions.filtered());
    }
    print_load_notice(context);
}

fn cmd_suggest(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let prefix = joined(args);
    let chosen = context.form.business().categories.clone();
    context.suggestions.on_input(prefix.trim(), &chosen);
    if context.suggestions.filtered().is_empty() {
        io::print_info("No suggestions.");
    } else {
        print_suggestions(context.suggestions.filtered());
    }
    print_load_notice(context);
    context.suggestions.on_blur(Instant::now());
    Ok(())
}

fn cmd_remove_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(usage_error(context, "remove-category"));
    }
    let wanted = joined(args);
    let target = context
        .form
        .business()
        .categories
        .iter()
        .find(|category| same_category(category, wanted.trim()))
        .cloned()
        .ok_or_else(|| CommandError::Message(format!("`{}` is not a chosen category", wanted)))?;
    context.form.remove_category(&target);
    let chosen = context.form.business().categories.clone();
    context.suggestions.refresh(&chosen);
    io::print_success(format!("Removed category `{}`.", target));
    Ok(())
}

fn cmd_add_branch(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let branch = context.form.add_branch();
    if let Some(name) = args.first() {
        context.form.update_branch(branch, BranchField::Name, *name)?;
    }
    if args.len() > 1 {
        context
            .form
            .update_branch(branch, BranchField::Address, joined(&args[1..]))?;
    }
    io::print_success(format!(
        "Added branch #{}.",
        context.form.business().branches.len()
    ));
    Ok(())
}

fn cmd_branch(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 3 {
        return Err(usage_error(context, "branch"));
    }
    let branch = branch_at(context, args[0])?;
    let field = match args[1].to_lowercase().as_str() {
        "name" => BranchField::Name,
        "address" => BranchField::Address,
        _ => return Err(usage_error(context, "branch")),
    };
    context
        .form
        .update_branch(branch, field, joined(&args[2..]))?;
    io::print_success(format!("Branch #{} updated.", args[0]));
    Ok(())
}

fn cmd_add_contact(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw_branch) = args.first() else {
        return Err(usage_error(context, "add-contact"));
    };
    let branch = branch_at(context, raw_branch)?;
    let kind = args
        .get(1)
        .map(|raw| raw.parse::<ContactKind>())
        .transpose()?;
    let contact = context.form.add_contact(branch)?;
    if let Some(kind) = kind {
        context
            .form
            .update_contact(branch, contact, ContactUpdate::Kind(kind))?;
    }
    if args.len() > 2 {
        context
            .form
            .update_contact(branch, contact, ContactUpdate::Info(joined(&args[2..])))?;
    }
    let count = context
        .form
        .business()
        .branch(branch)
        .map(|entry| entry.contacts.len())
        .unwrap_or(0);
    io::print_success(format!("Added contact #{} to branch #{}.", count, raw_branch));
    Ok(())
}

fn cmd_contact(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 4 {
        return Err(usage_error(context, "contact"));
    }
    let branch = branch_at(context, args[0])?;
    let contact = contact_at(context, branch, args[1])?;
    let value = joined(&args[3..]);
    let update = match args[2].to_lowercase().as_str() {
        "type" => ContactUpdate::Kind(value.parse()?),
        "info" => ContactUpdate::Info(value),
        _ => return Err(usage_error(context, "contact")),
    };
    context.form.update_contact(branch, contact, update)?;
    io::print_success(format!("Contact #{} of branch #{} updated.", args[1], args[0]));
    Ok(())
}

fn cmd_add_social(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw_branch) = args.first() else {
        return Err(usage_error(context, "add-social"));
    };
    let branch = branch_at(context, raw_branch)?;
    let platform = args
        .get(1)
        .map(|raw| raw.parse::<SocialPlatform>())
        .transpose()?;
    let link = context.form.add_social_link(branch)?;
    if let Some(platform) = platform {
        context
            .form
            .update_social_link(branch, link, SocialLinkUpdate::Platform(platform))?;
    }
    if args.len() > 2 {
        context
            .form
            .update_social_link(branch, link, SocialLinkUpdate::Info(joined(&args[2..])))?;
    }
    let count = context
        .form
        .business()
        .branch(branch)
        .map(|entry| entry.social_links.len())
        .unwrap_or(0);
    io::print_success(format!(
        "Added social link #{} to branch #{}.",
        count, raw_branch
    ));
    Ok(())
}

fn cmd_social(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 4 {
        return Err(usage_error(context, "social"));
    }
    let branch = branch_at(context, args[0])?;
    let link = social_link_at(context, branch, args[1])?;
    let value = joined(&args[3..]);
    let update = match args[2].to_lowercase().as_str() {
        "platform" => SocialLinkUpdate::Platform(value.parse()?),
        "info" => SocialLinkUpdate::Info(value),
        _ => return Err(usage_error(context, "social")),
    };
    context.form.update_social_link(branch, link, update)?;
    io::print_success(format!(
        "Social link #{} of branch #{} updated.",
        args[1], args[0]
    ));
    Ok(())
}

/// Runs `flow` through the context's interaction. `None` means cancelled.
fn run_wizard<F>(context: &mut ShellContext, flow: &F) -> Result<Option<F::Output>, CommandError>
where
    F: FormFlow,
    CommandError: From<F::Error>,
{
    let Some(interaction) = context.interaction.as_mut() else {
        return Err(CommandError::Message(
            "Wizards need an interactive terminal; use the field commands instead.".into(),
        ));
    };
    match FormEngine::new(flow).run(&mut **interaction)? {
        FormResult::Completed(output) => Ok(Some(output)),
        FormResult::Cancelled => {
            io::print_info("Wizard cancelled; nothing changed.");
            Ok(None)
        }
    }
}

fn cmd_wizard(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let target = args.first().map(|raw| raw.to_lowercase());
    match target.as_deref() {
        None | Some("business") => wizard_business(context),
        Some("branch") => wizard_branch(context, args.get(1).copied()),
        Some("contact") => match args.get(1) {
            Some(raw_branch) => wizard_contact(context, raw_branch, args.get(2).copied()),
            None => Err(usage_error(context, "wizard")),
        },
        Some("social") => match args.get(1) {
            Some(raw_branch) => wizard_social(context, raw_branch, args.get(2).copied()),
            None => Err(usage_error(context, "wizard")),
        },
        Some(_) => Err(usage_error(context, "wizard")),
    }
}

fn wizard_business(context: &mut ShellContext) -> CommandResult {
    let wizard = BusinessWizard::new(context.form.business());
    if let Some(details) = run_wizard(context, &wizard)? {
        context.form.set_field(BusinessField::Name, details.name);
        context
            .form
            .set_field(BusinessField::Description, details.description);
        io::print_success("Business details saved.");
    }
    Ok(())
}

fn wizard_branch(context: &mut ShellContext, position: Option<&str>) -> CommandResult {
    let existing = position
        .map(|raw| branch_at(context, raw))
        .transpose()?;
    let wizard = BranchWizard::new(existing.and_then(|id| context.form.business().branch(id)));
    let Some(details) = run_wizard(context, &wizard)? else {
        return Ok(());
    };
    let branch = match existing {
        Some(id) => id,
        None => context.form.add_branch(),
    };
    context
        .form
        .update_branch(branch, BranchField::Name, details.name)?;
    context
        .form
        .update_branch(branch, BranchField::Address, details.address)?;
    io::print_success("Branch saved.");
    Ok(())
}

fn wizard_contact(
    context: &mut ShellContext,
    raw_branch: &str,
    position: Option<&str>,
) -> CommandResult {
    let branch = branch_at(context, raw_branch)?;
    let existing = position
        .map(|raw| contact_at(context, branch, raw))
        .transpose()?;
    let initial = existing.and_then(|id| {
        context
            .form
            .business()
            .branch(branch)
            .and_then(|entry| entry.contact(id))
    });
    let wizard = ContactWizard::new(initial);
    let Some(details) = run_wizard(context, &wizard)? else {
        return Ok(());
    };
    let contact = match existing {
        Some(id) => id,
        None => context.form.add_contact(branch)?,
    };
    context
        .form
        .update_contact(branch, contact, ContactUpdate::Kind(details.kind))?;
    context
        .form
        .update_contact(branch, contact, ContactUpdate::Info(details.info))?;
    io::print_success("Contact saved.");
    Ok(())
}

fn wizard_social(
    context: &mut ShellContext,
    raw_branch: &str,
    position: Option<&str>,
) -> CommandResult {
    let branch = branch_at(context, raw_branch)?;
    let existing = position
        .map(|raw| social_link_at(context, branch, raw))
        .transpose()?;
    let initial = existing.and_then(|id| {
        context
            .form
            .business()
            .branch(branch)
            .and_then(|entry| entry.social_link(id))
    });
    let wizard = SocialLinkWizard::new(initial);
    let Some(details) = run_wizard(context, &wizard)? else {
        return Ok(());
    };
    let link = match existing {
        Some(id) => id,
        None => context.form.add_social_link(branch)?,
    };
    context
        .form
        .update_social_link(branch, link, SocialLinkUpdate::Platform(details.platform))?;
    context
        .form
        .update_social_link(branch, link, SocialLinkUpdate::Info(details.info))?;
    io::print_success("Social link saved.");
    Ok(())
}

fn cmd_submit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let submitted = context.submitter.submit(&context.form)?;
    io::print_success(format!(
        "Submitted `{}` with {} branch(es).",
        submitted.name,
        submitted.branches.len()
    ));
    Ok(())
}

fn cmd_reset(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.mode == CliMode::Interactive
        && !io::confirm_action("Discard everything entered so far?", false)?
    {
        return Ok(());
    }
    context.form.reset();
    context.suggestions.refresh(&[]);
    io::print_success("Form cleared.");
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
