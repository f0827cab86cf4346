//! Container edit session.
//!
//! Holds the fetched container snapshot plus the user's in-progress copy of
//! its name and labels, and computes the minimal change set to submit.

use crate::error::ValidationError;
use crate::model::Container;
use std::collections::HashMap;

/// Pending label entry not yet inserted into the edit buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelDraft {
    pub key: String,
    pub value: String,
}

/// The sub-resource updates needed to reconcile the edit buffer with the
/// server's container. Computed fresh for each submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    pub name_changed: bool,
    pub new_name: String,
    pub labels_changed: bool,
    pub new_labels: HashMap<String, String>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        !self.name_changed && !self.labels_changed
    }
}

/// One edit session over a fetched container.
///
/// The snapshot is never mutated; all edits land in the buffer and are
/// reconciled against the snapshot by [`EditSession::change_set`]. Sessions
/// are independent; starting a new one discards prior edits.
pub struct EditSession {
    container: Container,
    name: String,
    labels: HashMap<String, String>,
    draft: LabelDraft,
}

impl EditSession {
    /// Seed the buffer from the fetched container: display name (leading
    /// `/` stripped) and a copy of its labels.
    pub fn new(container: Container) -> Self {
        let name = container.display_name().to_string();
        let labels = container.labels.clone();
        Self {
            container,
            name,
            labels,
            draft: LabelDraft::default(),
        }
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn labels(&self) -> &HashMap<String, String> {
        &self.labels
    }

    pub fn draft(&self) -> &LabelDraft {
        &self.draft
    }

    /// Replace the proposed name. Emptiness is checked at submit, not here.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_draft_key(&mut self, key: impl Into<String>) {
        self.draft.key = key.into();
    }

    pub fn set_draft_value(&mut self, value: impl Into<String>) {
        self.draft.value = value.into();
    }

    /// Insert the pending draft as a label. The draft survives a failed
    /// validation so the caller can correct it.
    pub fn stage_draft(&mut self) -> Result<(), ValidationError> {
        let key = self.draft.key.clone();
        let value = self.draft.value.clone();
        self.add_label(&key, &value)
    }

    /// Validate and insert a label, trimming key and value. Clears the
    /// pending draft on success.
    pub fn add_label(&mut self, key: &str, value: &str) -> Result<(), ValidationError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ValidationError::EmptyLabelKey);
        }
        let value = value.trim();
        if value.is_empty() {
            return Err(ValidationError::EmptyLabelValue);
        }
        if self.labels.contains_key(key) {
            return Err(ValidationError::DuplicateLabelKey(key.to_string()));
        }
        self.labels.insert(key.to_string(), value.to_string());
        self.draft = LabelDraft::default();
        Ok(())
    }

    /// Remove a label if present. Removing an absent key is not an error.
    pub fn remove_label(&mut self, key: &str) {
        self.labels.remove(key);
    }

    /// Diff the edit buffer against the snapshot. Pure: the session is not
    /// mutated, and the comparison is order-independent for labels.
    pub fn change_set(&self) -> ChangeSet {
        let new_name = self.name.trim().to_string();
        let name_changed = new_name != self.container.display_name();
        let labels_changed = self.labels != self.container.labels;
        ChangeSet {
            name_changed,
            new_name,
            labels_changed,
            new_labels: self.labels.clone(),
        }
    }
}
