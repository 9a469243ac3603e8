//! Wizard-style form framework used by interactive CLI commands.
//!
//! A wizard describes its fields through a [`FormDescriptor`], the
//! [`FormEngine`] walks the user through them via a [`FormInteraction`], and
//! the wizard turns the collected strings into typed details that the shell
//! then applies to the business form.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::cli::io;
use crate::cli::output;
use crate::domain::{Branch, Business, Contact, ContactKind, SocialLink, SocialPlatform};

/// High-level lifecycle states emitted by the form runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormResult<T> {
    Completed(T),
    Cancelled,
}

/// Describes how prompts can be answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    /// User supplied a concrete value.
    Value(String),
    /// User chose to keep the default/current value.
    Keep,
    /// Abort the entire wizard immediately.
    Cancel,
    /// Go back to the previous field.
    Back,
    /// Request additional information for the current field.
    Help,
}

/// Responses accepted when confirming the collected data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationResponse {
    Confirm,
    Back,
    Cancel,
}

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[derive(Debug, Clone)]
pub enum FieldKind {
    Text,
    Choice(Vec<String>),
}

type ValidatorCallback = dyn Fn(&str) -> Result<String, String> + Send + Sync;
type SharedValidatorCallback = Arc<ValidatorCallback>;

/// Built-in validation helpers.
#[derive(Clone)]
pub enum Validator {
    NonEmpty,
    OneOf(Vec<String>),
    Custom(SharedValidatorCallback),
}

impl Validator {
    fn validate(&self, input: &str) -> Result<String, ValidationError> {
        match self {
            Validator::NonEmpty => {
                if input.trim().is_empty() {
                    Err(ValidationError::new("Value cannot be empty"))
                } else {
                    Ok(input.trim().to_string())
                }
            }
            Validator::OneOf(options) => {
                let normalized = input.trim().to_lowercase();
                options
                    .iter()
                    .find(|candidate| candidate.to_lowercase() == normalized)
                    .cloned()
                    .ok_or_else(|| {
                        ValidationError::new(format!(
                            "Value must be one of: {}",
                            options.join(", ")
                        ))
                    })
            }
            Validator::Custom(func) => func(input).map_err(ValidationError::new),
        }
    }
}

/// Declarative description of a single form field.
#[derive(Clone)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub help: Option<&'static str>,
    pub validator: Validator,
}

impl FieldDescriptor {
    pub fn new(
        key: &'static str,
        label: &'static str,
        kind: FieldKind,
        validator: Validator,
    ) -> Self {
        Self {
            key,
            label,
            kind,
            help: None,
            validator,
        }
    }

    pub fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

/// Metadata describing a full wizard, including field order.
pub struct FormDescriptor {
    pub name: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

impl FormDescriptor {
    pub fn new(name: &'static str, fields: Vec<FieldDescriptor>) -> Self {
        Self { name, fields }
    }
}

/// Presents menu-style choices while accepting the display label, the bare
/// label, or its 1-based index.
#[derive(Clone)]
struct ChoiceMapper<T: Clone + PartialEq + Send + Sync> {
    display: Vec<String>,
    values: Vec<T>,
    alias_to_index: HashMap<String, usize>,
}

impl<T: Clone + PartialEq + Send + Sync> ChoiceMapper<T> {
    fn from_pairs(pairs: Vec<(String, T)>) -> Self {
        let mut display = Vec::new();
        let mut values = Vec::new();
        let mut alias_to_index = HashMap::new();

        for (idx, (label, value)) in pairs.into_iter().enumerate() {
            let index = idx + 1;
            let display_label = format!("[{}] {}", index, label);
            alias_to_index.insert(index.to_string(), idx);
            alias_to_index.insert(label.to_ascii_lowercase(), idx);
            alias_to_index.insert(display_label.to_ascii_lowercase(), idx);
            display.push(display_label);
            values.push(value);
        }

        Self {
            display,
            values,
            alias_to_index,
        }
    }

    fn options(&self) -> Vec<String> {
        self.display.clone()
    }

    fn resolve(&self, input: &str) -> Option<String> {
        let key = input.trim().to_ascii_lowercase();
        self.alias_to_index
            .get(&key)
            .map(|index| self.display[*index].clone())
    }

    fn value_for_display(&self, display: &str) -> Option<&T> {
        self.display
            .iter()
            .position(|candidate| candidate == display)
            .and_then(|index| self.values.get(index))
    }

    fn display_for_value(&self, value: &T) -> Option<String> {
        self.values
            .iter()
            .position(|candidate| candidate == value)
            .map(|index| self.display[index].clone())
    }
}

fn make_choice_validator<T: Clone + PartialEq + Send + Sync + 'static>(
    mapper: ChoiceMapper<T>,
    field_label: &'static str,
) -> Validator {
    let options = mapper.options();
    let lookup = mapper.clone();
    Validator::Custom(Arc::new(move |input| {
        if let Some(display) = lookup.resolve(input) {
            Ok(display)
        } else {
            Err(format!(
                "Select a valid {} (options: {})",
                field_label,
                options.join(", ")
            ))
        }
    }))
}

fn contact_kind_choices() -> ChoiceMapper<ContactKind> {
    ChoiceMapper::from_pairs(
        ContactKind::ALL
            .iter()
            .map(|kind| (kind.label().to_string(), *kind))
            .collect(),
    )
}

fn social_platform_choices() -> ChoiceMapper<SocialPlatform> {
    ChoiceMapper::from_pairs(
        SocialPlatform::ALL
            .iter()
            .map(|platform| (platform.label().to_string(), *platform))
            .collect(),
    )
}

fn insert_if_filled(defaults: &mut BTreeMap<String, String>, key: &str, value: &str) {
    if !value.trim().is_empty() {
        defaults.insert(key.into(), value.to_string());
    }
}

fn collected(values: &BTreeMap<String, String>, key: &str) -> String {
    values.get(key).cloned().unwrap_or_default()
}

/// Name and description of the business.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BusinessDetails {
    pub name: String,
    pub description: String,
}

pub struct BusinessWizard {
    descriptor: FormDescriptor,
    defaults: BTreeMap<String, String>,
}

impl BusinessWizard {
    pub fn new(current: &Business) -> Self {
        let fields = vec![
            FieldDescriptor::new("name", "Business name", FieldKind::Text, Validator::NonEmpty),
            FieldDescriptor::new(
                "description",
                "Description",
                FieldKind::Text,
                Validator::NonEmpty,
            )
            .with_help("A short summary of what the business does."),
        ];
        let mut defaults = BTreeMap::new();
        insert_if_filled(&mut defaults, "name", &current.name);
        insert_if_filled(&mut defaults, "description", &current.description);
        Self {
            descriptor: FormDescriptor::new("business", fields),
            defaults,
        }
    }
}

impl FormFlow for BusinessWizard {
    type Output = BusinessDetails;
    type Error = ValidationError;

    fn descriptor(&self) -> &FormDescriptor {
        &self.descriptor
    }

    fn defaults(&self) -> BTreeMap<String, String> {
        self.defaults.clone()
    }

    fn commit(&self, values: BTreeMap<String, String>) -> Result<Self::Output, Self::Error> {
        Ok(BusinessDetails {
            name: collected(&values, "name"),
            description: collected(&values, "description"),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BranchDetails {
    pub name: String,
    pub address: String,
}

pub struct BranchWizard {
    descriptor: FormDescriptor,
    defaults: BTreeMap<String, String>,
}

impl BranchWizard {
    /// Wizard for a new branch, or for editing `initial` when given.
    pub fn new(initial: Option<&Branch>) -> Self {
        let fields = vec![
            FieldDescriptor::new("name", "Branch name", FieldKind::Text, Validator::NonEmpty),
            FieldDescriptor::new("address", "Address", FieldKind::Text, Validator::NonEmpty),
        ];
        let mut defaults = BTreeMap::new();
        if let Some(branch) = initial {
            insert_if_filled(&mut defaults, "name", &branch.name);
            insert_if_filled(&mut defaults, "address", &branch.address);
        }
        Self {
            descriptor: FormDescriptor::new("branch", fields),
            defaults,
        }
    }
}

impl FormFlow for BranchWizard {
    type Output = BranchDetails;
    type Error = ValidationError;

    fn descriptor(&self) -> &FormDescriptor {
        &self.descriptor
    }

    fn defaults(&self) -> BTreeMap<String, String> {
        self.defaults.clone()
    }

    fn commit(&self, values: BTreeMap<String, String>) -> Result<Self::Output, Self::Error> {
        Ok(BranchDetails {
            name: collected(&values, "name"),
            address: collected(&values, "address"),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactDetails {
    pub kind: ContactKind,
    pub info: String,
}

pub struct ContactWizard {
    descriptor: FormDescriptor,
    defaults: BTreeMap<String, String>,
    kind_choices: ChoiceMapper<ContactKind>,
}

impl ContactWizard {
    pub fn new(initial: Option<&Contact>) -> Self {
        let kind_choices = contact_kind_choices();
        let fields = vec![
            FieldDescriptor::new(
                "kind",
                "Contact type",
                FieldKind::Choice(kind_choices.options()),
                make_choice_validator(kind_choices.clone(), "contact type"),
            ),
            FieldDescriptor::new("info", "Contact info", FieldKind::Text, Validator::NonEmpty)
                .with_help("The phone number, email address, or fax number."),
        ];
        let mut defaults = BTreeMap::new();
        if let Some(contact) = initial {
            if let Some(display) = contact
                .kind
                .and_then(|kind| kind_choices.display_for_value(&kind))
            {
                defaults.insert("kind".into(), display);
            }
            insert_if_filled(&mut defaults, "info", &contact.info);
        }
        Self {
            descriptor: FormDescriptor::new("contact", fields),
            defaults,
            kind_choices,
        }
    }
}

impl FormFlow for ContactWizard {
    type Output = ContactDetails;
    type Error = ValidationError;

    fn descriptor(&self) -> &FormDescriptor {
        &self.descriptor
    }

    fn defaults(&self) -> BTreeMap<String, String> {
        self.defaults.clone()
    }

    fn commit(&self, values: BTreeMap<String, String>) -> Result<Self::Output, Self::Error> {
        let display = collected(&values, "kind");
        let kind = self
            .kind_choices
            .value_for_display(&display)
            .copied()
            .ok_or_else(|| ValidationError::new("Contact type is required"))?;
        Ok(ContactDetails {
            kind,
            info: collected(&values, "info"),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SocialLinkDetails {
    pub platform: SocialPlatform,
    pub info: String,
}

pub struct SocialLinkWizard {
    descriptor: FormDescriptor,
    defaults: BTreeMap<String, String>,
    platform_choices: ChoiceMapper<SocialPlatform>,
}

impl SocialLinkWizard {
    pub fn new(initial: Option<&SocialLink>) -> Self {
        let platform_choices = social_platform_choices();
        let fields = vec![
            FieldDescriptor::new(
                "platform",
                "Platform",
                FieldKind::Choice(platform_choices.options()),
                make_choice_validator(platform_choices.clone(), "social platform"),
            ),
            FieldDescriptor::new("info", "Profile", FieldKind::Text, Validator::NonEmpty)
                .with_help("Handle or profile URL on the chosen platform."),
        ];
        let mut defaults = BTreeMap::new();
        if let Some(link) = initial {
            if let Some(display) = link
                .platform
                .and_then(|platform| platform_choices.display_for_value(&platform))
            {
                defaults.insert("platform".into(), display);
            }
            insert_if_filled(&mut defaults, "info", &link.info);
        }
        Self {
            descriptor: FormDescriptor::new("social link", fields),
            defaults,
            platform_choices,
        }
    }
}

impl FormFlow for SocialLinkWizard {
    type Output = SocialLinkDetails;
    type Error = ValidationError;

    fn descriptor(&self) -> &FormDescriptor {
        &self.descriptor
    }

    fn defaults(&self) -> BTreeMap<String, String> {
        self.defaults.clone()
    }

    fn commit(&self, values: BTreeMap<String, String>) -> Result<Self::Output, Self::Error> {
        let display = collected(&values, "platform");
        let platform = self
            .platform_choices
            .value_for_display(&display)
            .copied()
            .ok_or_else(|| ValidationError::new("Platform is required"))?;
        Ok(SocialLinkDetails {
            platform,
            info: collected(&values, "info"),
        })
    }
}

/// Snapshot of collected data displayed before final confirmation.
#[derive(Default)]
pub struct FormSummary {
    pub entries: Vec<(String, String)>,
}

pub struct PromptContext<'a> {
    pub descriptor: &'a FieldDescriptor,
    pub default: Option<&'a str>,
    pub index: usize,
    pub total: usize,
}

/// Interaction surface used by the form engine.
pub trait FormInteraction {
    fn prompt_field(&mut self, context: &PromptContext<'_>) -> PromptResponse;

    fn confirm(&mut self, summary: &FormSummary, lines: &[String]) -> ConfirmationResponse;
}

/// In-progress wizard session. Callers may drive the session manually or use
/// [`FormEngine::run`] to handle the full loop.
pub struct FormSession<'a> {
    descriptor: &'a FormDescriptor,
    values: BTreeMap<String, String>,
    defaults: BTreeMap<String, String>,
    index: usize,
    completed: bool,
    cancelled: bool,
}

impl<'a> FormSession<'a> {
    pub fn new(descriptor: &'a FormDescriptor, defaults: BTreeMap<String, String>) -> Self {
        Self {
            descriptor,
            values: defaults.clone(),
            defaults,
            index: 0,
            completed: false,
            cancelled: false,
        }
    }

    pub fn start(&mut self) -> Option<FormStep<'_>> {
        self.index = 0;
        self.current_field()
    }

    pub fn current_field(&self) -> Option<FormStep<'_>> {
        self.descriptor
            .fields
            .get(self.index)
            .map(|field| FormStep {
                descriptor: field,
                default: self
                    .values
                    .get(field.key)
                    .cloned()
                    .or_else(|| self.defaults.get(field.key).cloned()),
                index: self.index,
                total: self.descriptor.fields.len(),
            })
    }

    pub fn apply_response(
        &mut self,
        response: PromptResponse,
    ) -> Result<FormSessionEvent, ValidationError> {
        if self.completed || self.cancelled {
            return Ok(FormSessionEvent::NoOp);
        }

        let Some(field) = self.descriptor.fields.get(self.index) else {
            return Ok(FormSessionEvent::NoOp);
        };

        match response {
            PromptResponse::Cancel => {
                self.cancelled = true;
                Ok(FormSessionEvent::Cancelled)
            }
            PromptResponse::Back => {
                if self.index > 0 {
                    self.index -= 1;
                    Ok(FormSessionEvent::Moved)
                } else {
                    io::print_warning("Already at the first field.");
                    Ok(FormSessionEvent::Repeat)
                }
            }
            PromptResponse::Help => {
                if let Some(help) = field.help {
                    io::print_info(help);
                } else {
                    io::print_info("No additional information available for this field.");
                }
                Ok(FormSessionEvent::Repeat)
            }
            PromptResponse::Keep => {
                if self.values.contains_key(field.key) {
                    self.index += 1;
                    Ok(FormSessionEvent::Moved)
                } else {
                    io::print_warning("This field is required.");
                    Ok(FormSessionEvent::Repeat)
                }
            }
            PromptResponse::Value(raw) => match field.validator.validate(&raw) {
                Ok(value) => {
                    self.values.insert(field.key.to_string(), value);
                    self.index += 1;
                    Ok(FormSessionEvent::Moved)
                }
                Err(err) => {
                    io::print_warning(&err.message);
                    Err(err)
                }
            },
        }
    }

    pub fn is_complete(&self) -> bool {
        self.index >= self.descriptor.fields.len()
    }

    pub fn mark_complete(&mut self) {
        self.completed = true;
    }

    pub fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormSessionEvent {
    Moved,
    Repeat,
    Cancelled,
    NoOp,
}

/// Data provided to render the current field.
pub struct FormStep<'a> {
    pub descriptor: &'a FieldDescriptor,
    pub default: Option<String>,
    pub index: usize,
    pub total: usize,
}

impl<'a> FormStep<'a> {
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }
}

/// High-level form contract for entity wizards.
///
/// Implementations describe their fields, supply defaults when editing an
/// existing entry, and transform the collected values into typed details
/// once the wizard completes.
pub trait FormFlow {
    type Output;
    type Error;

    fn descriptor(&self) -> &FormDescriptor;

    fn defaults(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    fn commit(&self, values: BTreeMap<String, String>) -> Result<Self::Output, Self::Error>;
}

/// Drives a [`FormFlow`] using a [`FormInteraction`] implementation.
pub struct FormEngine<'a, F: FormFlow> {
    flow: &'a F,
}

impl<'a, F: FormFlow> FormEngine<'a, F> {
    pub fn new(flow: &'a F) -> Self {
        Self { flow }
    }

    pub fn run<I: FormInteraction + ?Sized>(
        &self,
        interaction: &mut I,
    ) -> Result<FormResult<F::Output>, F::Error> {
        let descriptor = self.flow.descriptor();
        let mut session = FormSession::new(descriptor, self.flow.defaults());

        session.start();

        loop {
            if session.cancelled {
                return Ok(FormResult::Cancelled);
            }

            if session.is_complete() {
                let summary = build_summary(descriptor, session.values());
                let summary_lines = format_summary_lines(&summary);
                match interaction.confirm(&summary, &summary_lines) {
                    ConfirmationResponse::Confirm => {
                        session.mark_complete();
                        let output = self.flow.commit(session.values().clone())?;
                        return Ok(FormResult::Completed(output));
                    }
                    ConfirmationResponse::Back => {
                        if descriptor.fields.is_empty() {
                            return Ok(FormResult::Cancelled);
                        }
                        session.index = descriptor.fields.len() - 1;
                        continue;
                    }
                    ConfirmationResponse::Cancel => {
                        session.mark_cancelled();
                        return Ok(FormResult::Cancelled);
                    }
                }
            }

            let Some(step) = session.current_field() else {
                session.mark_complete();
                continue;
            };

            let response = {
                let context = PromptContext {
                    descriptor: step.descriptor,
                    default: step.default_value(),
                    index: step.index,
                    total: step.total,
                };
                render_prompt(descriptor, &context);
                interaction.prompt_field(&context)
            };
            if let PromptResponse::Cancel = response {
                session.mark_cancelled();
                return Ok(FormResult::Cancelled);
            }

            match session.apply_response(response) {
                Ok(FormSessionEvent::Cancelled) => return Ok(FormResult::Cancelled),
                // Validation errors are already reported; re-prompt.
                Ok(_) | Err(_) => continue,
            }
        }
    }
}

fn render_prompt(form: &FormDescriptor, context: &PromptContext<'_>) {
    output::section(format!(
        "{} {} of {}: {}",
        form.name,
        context.index + 1,
        context.total,
        context.descriptor.label
    ));
    if let FieldKind::Choice(options) = &context.descriptor.kind {
        for option in options {
            output::detail(option);
        }
    }
    if let Some(default_value) = context.default {
        output::detail(format!("Default: {}", default_value));
    }
    let mut instructions = vec!["Press Enter to keep the default.".to_string()];
    instructions.push("Type :help for details or :cancel to abort.".into());
    if context.index > 0 {
        instructions.push("Type :back to revisit the previous field.".into());
    }
    output::detail(instructions.join(" "));
}

fn format_summary_lines(summary: &FormSummary) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push("Review your entries:".into());
    for (key, value) in &summary.entries {
        lines.push(format!("  {}: {}", key, value));
    }
    lines
}

fn build_summary(descriptor: &FormDescriptor, values: &BTreeMap<String, String>) -> FormSummary {
    let mut summary = FormSummary::default();
    for field in &descriptor.fields {
        let value = values
            .get(field.key)
            .cloned()
            .unwrap_or_else(|| "[unfilled]".to_string());
        summary.entries.push((field.label.to_string(), value));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::OnceLock;

    struct MockInteraction {
        prompts: VecDeque<PromptResponse>,
        confirmations: VecDeque<ConfirmationResponse>,
        help_hits: usize,
    }

    impl MockInteraction {
        fn new(prompts: Vec<PromptResponse>, confirmations: Vec<ConfirmationResponse>) -> Self {
            Self {
                prompts: prompts.into(),
                confirmations: confirmations.into(),
                help_hits: 0,
            }
        }
    }

    impl FormInteraction for MockInteraction {
        fn prompt_field(&mut self, _context: &PromptContext<'_>) -> PromptResponse {
            let response = self.prompts.pop_front().unwrap_or(PromptResponse::Cancel);
            if matches!(response, PromptResponse::Help) {
                self.help_hits += 1;
            }
            response
        }

        fn confirm(&mut self, _summary: &FormSummary, _lines: &[String]) -> ConfirmationResponse {
            self.confirmations
                .pop_front()
                .unwrap_or(ConfirmationResponse::Confirm)
        }
    }

    struct TestForm;

    impl FormFlow for TestForm {
        type Output = BTreeMap<String, String>;
        type Error = &'static str;

        fn descriptor(&self) -> &FormDescriptor {
            static DESCRIPTOR: OnceLock<FormDescriptor> = OnceLock::new();
            DESCRIPTOR.get_or_init(|| {
                FormDescriptor::new(
                    "test",
                    vec![
                        FieldDescriptor::new("name", "Name", FieldKind::Text, Validator::NonEmpty),
                        FieldDescriptor::new(
                            "size",
                            "Size",
                            FieldKind::Text,
                            Validator::OneOf(vec!["Small".into(), "Large".into()]),
                        )
                        .with_help("Pick the size of the location."),
                    ],
                )
            })
        }

        fn commit(&self, values: BTreeMap<String, String>) -> Result<Self::Output, Self::Error> {
            Ok(values)
        }
    }

    #[test]
    fn wizard_completes_successfully() {
        let form = TestForm;
        let mut interaction = MockInteraction::new(
            vec![
                PromptResponse::Value("Bakery".into()),
                PromptResponse::Value("large".into()),
            ],
            vec![ConfirmationResponse::Confirm],
        );

        match FormEngine::new(&form).run(&mut interaction).unwrap() {
            FormResult::Completed(values) => {
                assert_eq!(values.get("name").unwrap(), "Bakery");
                assert_eq!(values.get("size").unwrap(), "Large");
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn wizard_reprompts_on_invalid_input() {
        let form = TestForm;
        let mut interaction = MockInteraction::new(
            vec![
                PromptResponse::Value("  ".into()),
                PromptResponse::Value("Deli".into()),
                PromptResponse::Value("medium".into()),
                PromptResponse::Value("small".into()),
            ],
            vec![ConfirmationResponse::Confirm],
        );

        match FormEngine::new(&form).run(&mut interaction).unwrap() {
            FormResult::Completed(values) => {
                assert_eq!(values.get("name").unwrap(), "Deli");
                assert_eq!(values.get("size").unwrap(), "Small");
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn wizard_cancelled_midway() {
        let form = TestForm;
        let mut interaction = MockInteraction::new(
            vec![PromptResponse::Value("Cafe".into()), PromptResponse::Cancel],
            vec![],
        );

        let result = FormEngine::new(&form).run(&mut interaction).unwrap();
        assert!(matches!(result, FormResult::Cancelled));
    }

    #[test]
    fn wizard_supports_back_and_help() {
        let form = TestForm;
        let mut interaction = MockInteraction::new(
            vec![
                PromptResponse::Value("Cafe".into()),
                PromptResponse::Help,
                PromptResponse::Back,
                PromptResponse::Value("Cafe Two".into()),
                PromptResponse::Value("small".into()),
            ],
            vec![ConfirmationResponse::Confirm],
        );

        match FormEngine::new(&form).run(&mut interaction).unwrap() {
            FormResult::Completed(values) => {
                assert_eq!(values.get("name").unwrap(), "Cafe Two");
            }
            other => panic!("Unexpected result: {:?}", other),
        }
        assert_eq!(interaction.help_hits, 1);
    }

    #[test]
    fn keep_without_default_is_refused_for_required_fields() {
        let form = TestForm;
        let mut interaction = MockInteraction::new(
            vec![
                PromptResponse::Keep,
                PromptResponse::Value("Kiosk".into()),
                PromptResponse::Value("small".into()),
            ],
            vec![ConfirmationResponse::Confirm],
        );

        match FormEngine::new(&form).run(&mut interaction).unwrap() {
            FormResult::Completed(values) => assert_eq!(values.get("name").unwrap(), "Kiosk"),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn confirmation_back_returns_to_last_field() {
        let form = TestForm;
        let mut interaction = MockInteraction::new(
            vec![
                PromptResponse::Value("Kiosk".into()),
                PromptResponse::Value("small".into()),
                PromptResponse::Value("large".into()),
            ],
            vec![ConfirmationResponse::Back, ConfirmationResponse::Confirm],
        );

        match FormEngine::new(&form).run(&mut interaction).unwrap() {
            FormResult::Completed(values) => assert_eq!(values.get("size").unwrap(), "Large"),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn business_wizard_keeps_existing_values() {
        let current = Business {
            name: "Acme".into(),
            description: "Widgets".into(),
            ..Business::default()
        };
        let wizard = BusinessWizard::new(&current);
        let mut interaction = MockInteraction::new(
            vec![
                PromptResponse::Keep,
                PromptResponse::Value("Widgets and gadgets".into()),
            ],
            vec![ConfirmationResponse::Confirm],
        );

        match FormEngine::new(&wizard).run(&mut interaction).unwrap() {
            FormResult::Completed(details) => {
                assert_eq!(details.name, "Acme");
                assert_eq!(details.description, "Widgets and gadgets");
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn branch_wizard_trims_values() {
        let wizard = BranchWizard::new(None);
        let mut interaction = MockInteraction::new(
            vec![
                PromptResponse::Value(" Main ".into()),
                PromptResponse::Value("1 High St".into()),
            ],
            vec![ConfirmationResponse::Confirm],
        );

        match FormEngine::new(&wizard).run(&mut interaction).unwrap() {
            FormResult::Completed(details) => {
                assert_eq!(
                    details,
                    BranchDetails {
                        name: "Main".into(),
                        address: "1 High St".into(),
                    }
                );
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn contact_wizard_accepts_index_or_label() {
        for (answer, expected) in [
            ("1", ContactKind::Phone),
            ("Email", ContactKind::Email),
            ("fax", ContactKind::Fax),
            ("[2] email", ContactKind::Email),
        ] {
            let wizard = ContactWizard::new(None);
            let mut interaction = MockInteraction::new(
                vec![
                    PromptResponse::Value(answer.into()),
                    PromptResponse::Value("555-0100".into()),
                ],
                vec![ConfirmationResponse::Confirm],
            );
            match FormEngine::new(&wizard).run(&mut interaction).unwrap() {
                FormResult::Completed(details) => {
                    assert_eq!(details.kind, expected);
                    assert_eq!(details.info, "555-0100");
                }
                other => panic!("Unexpected result: {:?}", other),
            }
        }
    }

    #[test]
    fn contact_wizard_reprompts_unknown_type() {
        let wizard = ContactWizard::new(None);
        let mut interaction = MockInteraction::new(
            vec![
                PromptResponse::Value("pager".into()),
                PromptResponse::Value("2".into()),
                PromptResponse::Value("a@b.test".into()),
            ],
            vec![ConfirmationResponse::Confirm],
        );
        match FormEngine::new(&wizard).run(&mut interaction).unwrap() {
            FormResult::Completed(details) => assert_eq!(details.kind, ContactKind::Email),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn social_link_wizard_edits_existing_link() {
        let link = SocialLink {
            platform: Some(SocialPlatform::Twitter),
            info: "@acme".into(),
            ..SocialLink::new()
        };
        let wizard = SocialLinkWizard::new(Some(&link));
        let mut interaction = MockInteraction::new(
            vec![PromptResponse::Value("linkedin".into()), PromptResponse::Keep],
            vec![ConfirmationResponse::Confirm],
        );
        match FormEngine::new(&wizard).run(&mut interaction).unwrap() {
            FormResult::Completed(details) => {
                assert_eq!(details.platform, SocialPlatform::Linkedin);
                assert_eq!(details.info, "@acme");
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn summary_marks_unfilled_fields() {
        let form = TestForm;
        let mut values = BTreeMap::new();
        values.insert("name".to_string(), "Cafe".to_string());
        let lines = format_summary_lines(&build_summary(form.descriptor(), &values));
        assert_eq!(
            lines,
            vec!["Review your entries:", "  Name: Cafe", "  Size: [unfilled]"]
        );
    }
}
