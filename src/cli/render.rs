//! Text rendering of the form state for `show`.

use crate::domain::{Business, Displayable};
use crate::taxonomy::LoadState;

fn or_unfilled(value: &str) -> &str {
    if value.trim().is_empty() {
        "[unfilled]"
    } else {
        value
    }
}

/// Loading notice shown next to the category list.
pub fn load_notice(state: &LoadState) -> Option<String> {
    match state {
        LoadState::Pending => Some("Categories are still loading.".to_string()),
        LoadState::Ready => None,
        LoadState::Failed(reason) => Some(format!(
            "Categories could not be loaded ({}); suggestions are unavailable.",
            reason
        )),
    }
}

pub fn form_lines(business: &Business, state: &LoadState) -> Vec<String> {
    let mut lines = vec![
        format!("Name: {}", or_unfilled(&business.name)),
        format!("Description: {}", or_unfilled(&business.description)),
    ];

    if business.categories.is_empty() {
        lines.push("Categories: (none)".to_string());
    } else {
        lines.push(format!("Categories: {}", business.categories.join(", ")));
    }
    if let Some(notice) = load_notice(state) {
        lines.push(format!("  {}", notice));
    }

    if business.branches.is_empty() {
        lines.push("Branches: (none)".to_string());
        return lines;
    }
    lines.push("Branches:".to_string());
    for (pos, branch) in business.branches.iter().enumerate() {
        lines.push(format!("  {}. {}", pos + 1, branch.display_label()));
        if !branch.contacts.is_empty() {
            lines.push("     Contacts:".to_string());
            for (idx, contact) in branch.contacts.iter().enumerate() {
                lines.push(format!("       {}. {}", idx + 1, contact.display_label()));
            }
        }
        if !branch.social_links.is_empty() {
            lines.push("     Social links:".to_string());
            for (idx, link) in branch.social_links.iter().enumerate() {
                lines.push(format!("       {}. {}", idx + 1, link.display_label()));
            }
        }
    }
    lines
}
