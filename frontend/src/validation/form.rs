use std::rc::Rc;

use super::messages::ValidationMessages;
use super::rules::{first_failure, Rule};
use crate::presenter::{Presenter, HIDDEN_CLASS};

/// Class put on the floating-label wrapper of an invalid input.
pub const ERROR_CLASS: &str = "error";

/// One validated input and where its message goes.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBinding {
    pub input_id: String,
    pub rules: Vec<Rule>,
    pub error_slot: Option<String>,
    pub container: Option<String>,
}

impl FieldBinding {
    pub fn new(input_id: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            input_id: input_id.into(),
            rules,
            error_slot: None,
            container: None,
        }
    }

    pub fn with_error_slot(mut self, id: impl Into<String>) -> Self {
        self.error_slot = Some(id.into());
        self
    }

    pub fn with_container(mut self, id: impl Into<String>) -> Self {
        self.container = Some(id.into());
        self
    }
}

pub struct FormValidator {
    presenter: Rc<dyn Presenter>,
    fields: Vec<FieldBinding>,
    messages: ValidationMessages,
}

impl FormValidator {
    pub fn new(presenter: Rc<dyn Presenter>, fields: Vec<FieldBinding>, messages: ValidationMessages) -> Self {
        Self {
            presenter,
            fields,
            messages,
        }
    }

    pub fn fields(&self) -> &[FieldBinding] {
        &self.fields
    }

    pub fn field(&self, input_id: &str) -> Option<&FieldBinding> {
        self.fields.iter().find(|f| f.input_id == input_id)
    }

    /// Message for the first rule the field breaks, if any.
    pub fn validate_input(&self, field: &FieldBinding) -> Option<String> {
        let raw = self.presenter.field_value(&field.input_id).unwrap_or_default();
        let presenter = &self.presenter;
        let lookup = |id: &str| presenter.field_value(id);
        first_failure(&field.rules, &raw, &lookup).map(|kind| self.messages.for_kind(kind).to_string())
    }

    /// Checks every field, painting or clearing each error. `true` when clean.
    pub fn validate(&self) -> bool {
        let mut valid = true;
        for field in &self.fields {
            match self.validate_input(field) {
                Some(message) => {
                    self.show_error(field, &message);
                    valid = false;
                }
                None => self.clear_error(field),
            }
        }
        valid
    }

    pub fn show_error(&self, field: &FieldBinding, message: &str) {
        if let Some(container) = &field.container {
            self.presenter.set_class(container, ERROR_CLASS, true);
        }
        if let Some(slot) = &field.error_slot {
            self.presenter.set_text(slot, message);
            self.presenter.set_class(slot, HIDDEN_CLASS, false);
        }
    }

    pub fn clear_error(&self, field: &FieldBinding) {
        if let Some(container) = &field.container {
            self.presenter.set_class(container, ERROR_CLASS, false);
        }
        if let Some(slot) = &field.error_slot {
            self.presenter.set_text(slot, "");
            self.presenter.set_class(slot, HIDDEN_CLASS, true);
        }
    }

    pub fn on_blur(&self, input_id: &str) {
        let Some(field) = self.field(input_id) else {
            return;
        };
        match self.validate_input(field) {
            Some(message) => self.show_error(field, &message),
            None => self.clear_error(field),
        }
    }

    pub fn on_input(&self, input_id: &str) {
        if let Some(field) = self.field(input_id) {
            self.clear_error(field);
        }
    }
}
