//! Form definitions backing the customer create and edit flows.

use std::collections::BTreeMap;

use thiserror::Error;
use validator::ValidationErrors;

pub mod customer;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid name in {0}")]
    InvalidName(&'static str),
}

impl FormError {
    /// Messages to show next to each offending field, keyed by field name.
    pub fn field_messages(&self) -> BTreeMap<String, Vec<String>> {
        match self {
            FormError::Validation(errors) => field_messages(errors),
            FormError::InvalidEmail => single("email", "Please enter a valid email address"),
            FormError::InvalidName(field) => single(field, "Please enter a valid name"),
        }
    }
}

fn single(field: &str, message: &str) -> BTreeMap<String, Vec<String>> {
    BTreeMap::from([(field.to_string(), vec![message.to_string()])])
}

/// Flattens validator output into field name → messages.
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|err| match &err.message {
                    Some(message) => message.to_string(),
                    None => err.code.to_string(),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}
