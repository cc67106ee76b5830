//! Modal state machine for create/edit/delete.

use serde_json::{Map, Value};

use crate::domain::forms::{FormBuffer, FormError};
use crate::domain::resource::{Capabilities, Resource};

/// A request ready to be sent for the open form.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Create a new record.
    Create(Map<String, Value>),
    /// Update an existing record.
    Update {
        /// Record identifier.
        id: String,
        /// Request body.
        payload: Map<String, Value>,
    },
}

/// Errors converting the open modal into a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// No form is open.
    #[error("no form is open")]
    NotEditing,
    /// The record being edited has no identifier.
    #[error("record has no identifier")]
    MissingId,
    /// The form has invalid input.
    #[error(transparent)]
    Form(#[from] FormError),
}

/// The single active modal of a list tab.
///
/// Exactly one of: nothing open, a create form, an edit form bound to one
/// record, or a delete confirmation bound to one record.
#[derive(Debug, Clone, PartialEq)]
pub enum CrudState<R> {
    /// No modal.
    Closed,
    /// Create form.
    Creating {
        /// Form buffer.
        form: FormBuffer,
    },
    /// Edit form for `target`.
    Editing {
        /// Record being edited.
        target: R,
        /// Form buffer.
        form: FormBuffer,
    },
    /// Delete confirmation for `target`.
    ConfirmingDelete {
        /// Record pending deletion.
        target: R,
    },
}

impl<R> Default for CrudState<R> {
    fn default() -> Self {
        Self::Closed
    }
}

impl<R: Resource> CrudState<R> {
    /// Returns whether any modal is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Opens an empty create form. Ignored if creation is not offered.
    pub fn open_create(&mut self) -> bool {
        if !R::capabilities().contains(Capabilities::CREATE) {
            return false;
        }
        *self = Self::Creating {
            form: FormBuffer::new(R::form_fields()),
        };
        true
    }

    /// Opens an edit form pre-filled from `target`. Ignored if updates are not offered.
    pub fn open_edit(&mut self, target: R) -> bool {
        if !R::capabilities().contains(Capabilities::UPDATE) {
            return false;
        }
        let form = FormBuffer::with_values(R::form_fields(), target.form_values());
        *self = Self::Editing { target, form };
        true
    }

    /// Opens the delete confirmation. Ignored if deletion is not offered.
    pub fn request_delete(&mut self, target: R) -> bool {
        if !R::capabilities().contains(Capabilities::DELETE) {
            return false;
        }
        *self = Self::ConfirmingDelete { target };
        true
    }

    /// Closes any modal, discarding its buffer or pending target.
    pub fn cancel(&mut self) {
        *self = Self::Closed;
    }

    /// Mutable access to the open form.
    pub fn form_mut(&mut self) -> Option<&mut FormBuffer> {
        match self {
            Self::Creating { form } | Self::Editing { form, .. } => Some(form),
            _ => None,
        }
    }

    /// The open form.
    #[must_use]
    pub const fn form(&self) -> Option<&FormBuffer> {
        match self {
            Self::Creating { form } | Self::Editing { form, .. } => Some(form),
            _ => None,
        }
    }

    /// Record pending deletion, only while the confirmation is open.
    #[must_use]
    pub const fn pending_delete(&self) -> Option<&R> {
        match self {
            Self::ConfirmingDelete { target } => Some(target),
            _ => None,
        }
    }

    /// Builds the request for the open form.
    ///
    /// # Errors
    /// Returns error if no form is open, the edited record has no id, or the
    /// form input is invalid.
    pub fn submission(&self) -> Result<Submission, SubmitError> {
        match self {
            Self::Creating { form } => Ok(Submission::Create(form.to_payload(true)?)),
            Self::Editing { target, form } => {
                let id = target.id().ok_or(SubmitError::MissingId)?.to_string();
                Ok(Submission::Update {
                    id,
                    payload: form.to_payload(false)?,
                })
            }
            _ => Err(SubmitError::NotEditing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Bus, Payment};

    fn bus() -> Bus {
        serde_json::from_str(r#"{"id": "b1", "numero": "12", "type": "VIP", "capacite": 40}"#)
            .unwrap()
    }

    #[test]
    fn test_starts_closed() {
        let state: CrudState<Bus> = CrudState::default();
        assert!(!state.is_open());
        assert!(state.pending_delete().is_none());
    }

    #[test]
    fn test_edit_prefills_form() {
        let mut state: CrudState<Bus> = CrudState::Closed;
        assert!(state.open_edit(bus()));

        let form = state.form().unwrap();
        assert_eq!(form.value("numero"), Some("12"));
        assert_eq!(form.value("type"), Some("VIP"));
        assert_eq!(form.value("capacite"), Some("40"));
    }

    #[test]
    fn test_update_submission_carries_id() {
        let mut state: CrudState<Bus> = CrudState::Closed;
        state.open_edit(bus());
        state.form_mut().unwrap().set("capacite", "45");

        match state.submission().unwrap() {
            Submission::Update { id, payload } => {
                assert_eq!(id, "b1");
                assert_eq!(payload["capacite"], 45);
            }
            other => panic!("unexpected submission {other:?}"),
        }
    }

    #[test]
    fn test_opening_replaces_previous_modal() {
        let mut state: CrudState<Bus> = CrudState::Closed;
        state.open_create();
        state.request_delete(bus());

        assert!(state.form().is_none());
        assert_eq!(state.pending_delete().and_then(|b| b.id()), Some("b1"));
    }

    #[test]
    fn test_cancel_discards_pending_target() {
        let mut state: CrudState<Bus> = CrudState::Closed;
        state.request_delete(bus());
        state.cancel();

        assert!(state.pending_delete().is_none());
        assert_eq!(state.submission(), Err(SubmitError::NotEditing));
    }

    #[test]
    fn test_read_only_resource_never_opens() {
        let payment: Payment = serde_json::from_str(r#"{"id": "p1", "montant": 10}"#).unwrap();
        let mut state: CrudState<Payment> = CrudState::Closed;

        assert!(!state.open_create());
        assert!(!state.open_edit(payment.clone()));
        assert!(!state.request_delete(payment));
        assert!(!state.is_open());
    }
}
