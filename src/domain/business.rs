//! The business record collected by the form.

use serde::{Deserialize, Serialize};

use crate::domain::choices::{ContactKind, SocialPlatform};
use crate::domain::common::{BranchId, ContactId, Displayable, SocialLinkId};

/// Root record: identity, description, chosen categories, and branches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub branches: Vec<Branch>,
}

impl Business {
    pub fn branch(&self, id: BranchId) -> Option<&Branch> {
        self.branches.iter().find(|branch| branch.id == id)
    }

    pub(crate) fn branch_mut(&mut self, id: BranchId) -> Option<&mut Branch> {
        self.branches.iter_mut().find(|branch| branch.id == id)
    }

    /// Required fields that are still empty, addressed by 1-based position.
    /// Whitespace counts as a value.
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.name.is_empty() {
            missing.push("name".to_string());
        }
        if self.description.is_empty() {
            missing.push("description".to_string());
        }
        for (branch_pos, branch) in self.branches.iter().enumerate() {
            let prefix = format!("branches[{}]", branch_pos + 1);
            if branch.name.is_empty() {
                missing.push(format!("{prefix}.name"));
            }
            if branch.address.is_empty() {
                missing.push(format!("{prefix}.address"));
            }
            for (pos, contact) in branch.contacts.iter().enumerate() {
                if contact.kind.is_none() {
                    missing.push(format!("{prefix}.contacts[{}].type", pos + 1));
                }
                if contact.info.is_empty() {
                    missing.push(format!("{prefix}.contacts[{}].info", pos + 1));
                }
            }
            for (pos, link) in branch.social_links.iter().enumerate() {
                if link.platform.is_none() {
                    missing.push(format!("{prefix}.socialLinks[{}].platform", pos + 1));
                }
                if link.info.is_empty() {
                    missing.push(format!("{prefix}.socialLinks[{}].info", pos + 1));
                }
            }
        }
        missing
    }
}

/// A physical or organizational location of the business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    #[serde(skip)]
    pub id: BranchId,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
}

impl Branch {
    pub fn new() -> Self {
        Self {
            id: BranchId::new(),
            name: String::new(),
            address: String::new(),
            contacts: Vec::new(),
            social_links: Vec::new(),
        }
    }

    pub fn contact(&self, id: ContactId) -> Option<&Contact> {
        self.contacts.iter().find(|contact| contact.id == id)
    }

    pub fn social_link(&self, id: SocialLinkId) -> Option<&SocialLink> {
        self.social_links.iter().find(|link| link.id == id)
    }
}

impl Default for Branch {
    fn default() -> Self {
        Self::new()
    }
}

impl Displayable for Branch {
    fn display_label(&self) -> String {
        match (is_blank(&self.name), is_blank(&self.address)) {
            (true, true) => "[unnamed branch]".to_string(),
            (false, true) => self.name.clone(),
            (true, false) => format!("[unnamed] – {}", self.address),
            (false, false) => format!("{} – {}", self.name, self.address),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(skip)]
    pub id: ContactId,
    #[serde(rename = "type")]
    pub kind: Option<ContactKind>,
    pub info: String,
}

impl Contact {
    pub fn new() -> Self {
        Self {
            id: ContactId::new(),
            kind: None,
            info: String::new(),
        }
    }
}

impl Default for Contact {
    fn default() -> Self {
        Self::new()
    }
}

impl Displayable for Contact {
    fn display_label(&self) -> String {
        let kind = self.kind.map(|k| k.label()).unwrap_or("[type?]");
        format!("{kind}: {}", display_text(&self.info))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    #[serde(skip)]
    pub id: SocialLinkId,
    pub platform: Option<SocialPlatform>,
    pub info: String,
}

impl SocialLink {
    pub fn new() -> Self {
        Self {
            id: SocialLinkId::new(),
            platform: None,
            info: String::new(),
        }
    }
}

impl Default for SocialLink {
    fn default() -> Self {
        Self::new()
    }
}

impl Displayable for SocialLink {
    fn display_label(&self) -> String {
        let platform = self.platform.map(|p| p.label()).unwrap_or("[platform?]");
        format!("{platform}: {}", display_text(&self.info))
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn display_text(value: &str) -> &str {
    if is_blank(value) {
        "[unfilled]"
    } else {
        value
    }
}
