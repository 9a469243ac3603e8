//! Prefix filter and show/hide state behind the category autocomplete.

use std::time::{Duration, Instant};

use strsim::levenshtein;

use crate::form::BusinessForm;
use crate::taxonomy::CategoryOptions;

/// Grace period between losing focus and hiding the suggestion list, so a
/// pointer selection still lands.
pub const DEFAULT_BLUR_GRACE: Duration = Duration::from_millis(100);

const MAX_HINT_DISTANCE: usize = 3;

/// Every option whose name starts with `input` (ignoring case) and that has
/// not been chosen yet, in taxonomy order.
pub fn filter_suggestions(options: &[String], input: &str, chosen: &[String]) -> Vec<String> {
    let needle = input.to_lowercase();
    options
        .iter()
        .filter(|option| option.to_lowercase().starts_with(&needle))
        .filter(|option| !chosen.contains(option))
        .cloned()
        .collect()
}

/// Category names compare equal ignoring case, with the same folding the
/// filter uses.
pub fn same_category(left: &str, right: &str) -> bool {
    left.to_lowercase() == right.to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Visible,
}

/// State of the category input field and its suggestion list.
#[derive(Debug)]
pub struct SuggestionEngine {
    options: CategoryOptions,
    input: String,
    filtered: Vec<String>,
    visibility: Visibility,
    pending_hide: Option<Instant>,
    grace: Duration,
}

impl SuggestionEngine {
    pub fn new(options: CategoryOptions) -> Self {
        Self::with_grace(options, DEFAULT_BLUR_GRACE)
    }

    pub fn with_grace(options: CategoryOptions, grace: Duration) -> Self {
        Self {
            options,
            input: String::new(),
            filtered: Vec::new(),
            visibility: Visibility::Hidden,
            pending_hide: None,
            grace,
        }
    }

    pub fn options(&self) -> &CategoryOptions {
        &self.options
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn filtered(&self) -> &[String] {
        &self.filtered
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    /// Keystroke in the category field.
    pub fn on_input(&mut self, value: impl Into<String>, chosen: &[String]) {
        self.input = value.into();
        self.pending_hide = None;
        self.refilter(chosen);
        self.visibility = self.visibility_for_results();
    }

    pub fn on_focus(&mut self) {
        self.pending_hide = None;
        self.visibility = self.visibility_for_results();
    }

    pub fn on_blur(&mut self, now: Instant) {
        if self.is_visible() {
            self.pending_hide = Some(now + self.grace);
        }
    }

    /// Applies a pending blur once its grace period has elapsed. Returns
    /// whether the list was hidden.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.pending_hide {
            Some(deadline) if now >= deadline => {
                self.pending_hide = None;
                self.visibility = Visibility::Hidden;
                true
            }
            _ => false,
        }
    }

    /// Chooses `suggestion`: adds it to the form's categories when absent,
    /// clears the input, and hides the list. Wins over a pending blur.
    pub fn select(&mut self, suggestion: &str, form: &mut BusinessForm) -> bool {
        let added = form.add_category(suggestion);
        self.input.clear();
        self.pending_hide = None;
        self.visibility = Visibility::Hidden;
        self.refilter(&form.business().categories);
        added
    }

    /// Recomputes the filtered list for the current input, e.g. after the
    /// taxonomy arrives or a category is removed.
    pub fn refresh(&mut self, chosen: &[String]) {
        self.refilter(chosen);
        if self.filtered.is_empty() {
            self.visibility = Visibility::Hidden;
        }
    }

    /// The suggestion the current input commits to: an exact match ignoring
    /// case, else the only remaining suggestion.
    pub fn resolve_input(&self) -> Option<String> {
        let needle = self.input.trim();
        if needle.is_empty() {
            return None;
        }
        if let Some(exact) = self
            .filtered
            .iter()
            .find(|candidate| same_category(candidate, needle))
        {
            return Some(exact.clone());
        }
        match self.filtered.as_slice() {
            [only] => Some(only.clone()),
            _ => None,
        }
    }

    /// Nearest known category for a "did you mean" hint.
    pub fn closest(&self, input: &str) -> Option<String> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.options.with_names(|names| {
            names
                .iter()
                .map(|name| (levenshtein(&name.to_lowercase(), &needle), name))
                .filter(|(distance, _)| *distance <= MAX_HINT_DISTANCE)
                .min_by_key(|(distance, _)| *distance)
                .map(|(_, name)| name.clone())
        })
    }

    fn refilter(&mut self, chosen: &[String]) {
        let input = self.input.as_str();
        self.filtered = self
            .options
            .with_names(|names| filter_suggestions(names, input, chosen));
    }

    fn visibility_for_results(&self) -> Visibility {
        if self.filtered.is_empty() {
            Visibility::Hidden
        } else {
            Visibility::Visible
        }
    }
}
