use std::fmt;

use uuid::Uuid;

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut shorthand = self.0.simple().to_string();
                shorthand.truncate(8);
                f.write_str(&shorthand)
            }
        }
    };
}

entity_id!(
    /// Stable identity of a branch, independent of its position.
    BranchId
);
entity_id!(
    /// Stable identity of a contact within a branch.
    ContactId
);
entity_id!(
    /// Stable identity of a social link within a branch.
    SocialLinkId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(BranchId::new(), BranchId::new());
    }

    #[test]
    fn display_uses_short_form() {
        let id = ContactId::new();
        let shown = id.to_string();
        assert_eq!(shown.len(), 8);
        assert!(id.0.simple().to_string().starts_with(&shown));
    }
}
