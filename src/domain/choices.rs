//! Closed choice sets for contact and social link entries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::FormError;

/// How a branch can be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    Phone,
    Email,
    Fax,
}

impl ContactKind {
    pub const ALL: [ContactKind; 3] = [ContactKind::Phone, ContactKind::Email, ContactKind::Fax];

    /// Wire value used in the submission payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactKind::Phone => "phone",
            ContactKind::Email => "email",
            ContactKind::Fax => "fax",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContactKind::Phone => "Phone",
            ContactKind::Email => "Email",
            ContactKind::Fax => "Fax",
        }
    }
}

impl fmt::Display for ContactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ContactKind {
    type Err = FormError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_choice(&Self::ALL, value, "contact type", |kind| kind.as_str())
    }
}

/// Social network a branch links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    Facebook,
    Twitter,
    Linkedin,
}

impl SocialPlatform {
    pub const ALL: [SocialPlatform; 3] = [
        SocialPlatform::Facebook,
        SocialPlatform::Twitter,
        SocialPlatform::Linkedin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SocialPlatform::Facebook => "facebook",
            SocialPlatform::Twitter => "twitter",
            SocialPlatform::Linkedin => "linkedin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SocialPlatform::Facebook => "Facebook",
            SocialPlatform::Twitter => "Twitter",
            SocialPlatform::Linkedin => "LinkedIn",
        }
    }
}

impl fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SocialPlatform {
    type Err = FormError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_choice(&Self::ALL, value, "social platform", |platform| {
            platform.as_str()
        })
    }
}

fn parse_choice<T: Copy>(
    all: &[T],
    value: &str,
    field: &'static str,
    wire: impl Fn(&T) -> &'static str,
) -> Result<T, FormError> {
    let normalized = value.trim().to_ascii_lowercase();
    all.iter()
        .find(|candidate| wire(candidate) == normalized)
        .copied()
        .ok_or_else(|| FormError::InvalidChoice {
            field,
            value: value.to_string(),
            expected: all.iter().map(|c| wire(c)).collect::<Vec<_>>().join(", "),
        })
}
