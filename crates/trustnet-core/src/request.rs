//! Request building and input validation.

use serde::Serialize;
use thiserror::Error;

/// Message shown to the user when a required field is empty.
pub const FILL_IN_ALL_FIELDS: &str = "Please fill in all fields";

/// Errors raised while building an [`EvaluationRequest`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },
}

impl ValidationError {
    /// Generic message for the user; does not name the field.
    pub fn user_message(&self) -> &'static str {
        FILL_IN_ALL_FIELDS
    }
}

/// A validated `(question, context, answer)` triple.
///
/// Every field is trimmed and non-empty. The wire body of `POST /evaluate`
/// is this struct serialized as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationRequest {
    question: String,
    context: String,
    answer: String,
}

impl EvaluationRequest {
    /// Trim and validate the three inputs.
    ///
    /// Fails on the first field (in question, context, answer order) that is
    /// empty after trimming.
    pub fn build(
        question: impl AsRef<str>,
        context: impl AsRef<str>,
        answer: impl AsRef<str>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            question: required("question", question.as_ref())?,
            context: required("context", context.as_ref())?,
            answer: required("answer", answer.as_ref())?,
        })
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(trimmed.to_string())
}
