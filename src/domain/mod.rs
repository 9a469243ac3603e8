//! Domain types for the business intake record.

pub mod business;
pub mod choices;
pub mod common;

pub use business::{Branch, Business, Contact, SocialLink};
pub use choices::{ContactKind, SocialPlatform};
pub use common::{BranchId, ContactId, Displayable, SocialLinkId};
