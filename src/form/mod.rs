//! Copy-on-write state container for the business record.
//!
//! Every mutation replaces the current value with a copy that differs only at
//! the addressed path. Snapshots handed out earlier keep their contents, so a
//! renderer can compare snapshots (or [`BusinessForm::revision`]) to detect
//! change.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{
    Branch, BranchId, Business, Contact, ContactId, ContactKind, SocialLink, SocialLinkId,
    SocialPlatform,
};
use crate::errors::FormError;

/// Top-level text fields of the business record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusinessField {
    Name,
    Description,
}

/// Text fields of a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchField {
    Name,
    Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactUpdate {
    Kind(ContactKind),
    Info(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocialLinkUpdate {
    Platform(SocialPlatform),
    Info(String),
}

/// Single-writer owner of the in-progress business record.
#[derive(Debug, Clone, Default)]
pub struct BusinessForm {
    business: Arc<Business>,
    revision: u64,
}

impl BusinessForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<Business> {
        Arc::clone(&self.business)
    }

    pub fn business(&self) -> &Business {
        &self.business
    }

    /// Incremented on every effective mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn reset(&mut self) {
        self.business = Arc::new(Business::default());
        self.bump();
    }

    pub fn set_field(&mut self, field: BusinessField, value: impl Into<String>) {
        let value = value.into();
        let business = self.edit();
        match field {
            BusinessField::Name => business.name = value,
            BusinessField::Description => business.description = value,
        }
        self.bump();
    }

    /// Appends `name` unless it is already chosen.
    pub fn add_category(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.business.categories.contains(&name) {
            return false;
        }
        debug!(category = %name, "category added");
        self.edit().categories.push(name);
        self.bump();
        true
    }

    /// Removes every entry equal to `name`; returns how many were removed.
    pub fn remove_category(&mut self, name: &str) -> usize {
        let matches = self
            .business
            .categories
            .iter()
            .filter(|category| category.as_str() == name)
            .count();
        if matches == 0 {
            return 0;
        }
        self.edit()
            .categories
            .retain(|category| category.as_str() != name);
        self.bump();
        matches
    }

    pub fn add_branch(&mut self) -> BranchId {
        let branch = Branch::new();
        let id = branch.id;
        self.edit().branches.push(branch);
        self.bump();
        debug!(branch = %id, "branch added");
        id
    }

    pub fn update_branch(
        &mut self,
        branch: BranchId,
        field: BranchField,
        value: impl Into<String>,
    ) -> Result<(), FormError> {
        self.require_branch(branch)?;
        let value = value.into();
        let target = self.branch_entry(branch)?;
        match field {
            BranchField::Name => target.name = value,
            BranchField::Address => target.address = value,
        }
        self.bump();
        Ok(())
    }

    pub fn add_contact(&mut self, branch: BranchId) -> Result<ContactId, FormError> {
        self.require_branch(branch)?;
        let contact = Contact::new();
        let id = contact.id;
        self.branch_entry(branch)?.contacts.push(contact);
        self.bump();
        Ok(id)
    }

    pub fn update_contact(
        &mut self,
        branch: BranchId,
        contact: ContactId,
        update: ContactUpdate,
    ) -> Result<(), FormError> {
        let exists = self
            .business
            .branch(branch)
            .ok_or(FormError::UnknownBranch(branch))?
            .contact(contact)
            .is_some();
        if !exists {
            return Err(FormError::UnknownContact { branch, contact });
        }
        let entry = self
            .branch_entry(branch)?
            .contacts
            .iter_mut()
            .find(|candidate| candidate.id == contact)
            .ok_or(FormError::UnknownContact { branch, contact })?;
        match update {
            ContactUpdate::Kind(kind) => entry.kind = Some(kind),
            ContactUpdate::Info(info) => entry.info = info,
        }
        self.bump();
        Ok(())
    }

    pub fn add_social_link(&mut self, branch: BranchId) -> Result<SocialLinkId, FormError> {
        self.require_branch(branch)?;
        let link = SocialLink::new();
        let id = link.id;
        self.branch_entry(branch)?.social_links.push(link);
        self.bump();
        Ok(id)
    }

    pub fn update_social_link(
        &mut self,
        branch: BranchId,
        link: SocialLinkId,
        update: SocialLinkUpdate,
    ) -> Result<(), FormError> {
        let exists = self
            .business
            .branch(branch)
            .ok_or(FormError::UnknownBranch(branch))?
            .social_link(link)
            .is_some();
        if !exists {
            return Err(FormError::UnknownSocialLink { branch, link });
        }
        let entry = self
            .branch_entry(branch)?
            .social_links
            .iter_mut()
            .find(|candidate| candidate.id == link)
            .ok_or(FormError::UnknownSocialLink { branch, link })?;
        match update {
            SocialLinkUpdate::Platform(platform) => entry.platform = Some(platform),
            SocialLinkUpdate::Info(info) => entry.info = info,
        }
        self.bump();
        Ok(())
    }

    /// Id of the branch at a 0-based position.
    pub fn branch_id(&self, position: usize) -> Option<BranchId> {
        self.business.branches.get(position).map(|branch| branch.id)
    }

    pub fn contact_id(&self, branch: BranchId, position: usize) -> Option<ContactId> {
        self.business
            .branch(branch)
            .and_then(|b| b.contacts.get(position))
            .map(|contact| contact.id)
    }

    pub fn social_link_id(&self, branch: BranchId, position: usize) -> Option<SocialLinkId> {
        self.business
            .branch(branch)
            .and_then(|b| b.social_links.get(position))
            .map(|link| link.id)
    }

    fn require_branch(&self, branch: BranchId) -> Result<(), FormError> {
        self.business
            .branch(branch)
            .map(|_| ())
            .ok_or(FormError::UnknownBranch(branch))
    }

    // Callers check existence first so a failed lookup never clones the record.
    fn branch_entry(&mut self, branch: BranchId) -> Result<&mut Branch, FormError> {
        self.edit()
            .branch_mut(branch)
            .ok_or(FormError::UnknownBranch(branch))
    }

    fn edit(&mut self) -> &mut Business {
        Arc::make_mut(&mut self.business)
    }

    fn bump(&mut self) {
        self.revision += 1;
    }
}
