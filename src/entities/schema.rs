use std::collections::HashMap;
use thiserror::Error;

/// Shape violation found while building or persisting a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid value for {field}: {message}")]
    InvalidField { field: &'static str, message: String },
}

impl ValidationError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        ValidationError::InvalidField { field, message: message.into() }
    }

    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField(field) => field,
            ValidationError::InvalidField { field, .. } => field,
        }
    }

    /// Field name to message map for API responses
    pub fn field_errors(&self) -> HashMap<String, String> {
        let message = match self {
            ValidationError::MissingField(_) => "This field is required".to_string(),
            ValidationError::InvalidField { message, .. } => message.clone(),
        };
        HashMap::from([(self.field().to_string(), message)])
    }
}

/// Minimum shape every persisted record must satisfy.
///
/// Checked by the form layer before submission and again by
/// [`crate::database::store::ValidatedStore`] before anything reaches storage.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

pub fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

pub fn require_max_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::invalid(field, format!("must be at most {} characters", max)));
    }
    Ok(())
}

pub fn require_email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    require_text(field, value)?;
    let valid = match value.trim().split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.'),
        None => false,
    };
    if !valid {
        return Err(ValidationError::invalid(field, "must be a valid email address"));
    }
    Ok(())
}

/// Lowercase kebab-case tag such as `temperature-log`
pub fn require_tag(field: &'static str, value: &str) -> Result<(), ValidationError> {
    require_text(field, value)?;
    let valid = value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if !valid {
        return Err(ValidationError::invalid(field, "must be a lowercase tag (letters, digits, '-' or '_')"));
    }
    Ok(())
}

/// Trimmed value of an optional text input; blank inputs count as absent
pub fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(require_email("email", "ops@kitchen.co.uk").is_ok());
        assert_eq!(require_email("email", "  "), Err(ValidationError::MissingField("email")));
        assert!(require_email("email", "ops@localhost").is_err());
        assert!(require_email("email", "@kitchen.com").is_err());
    }

    #[test]
    fn tag_shape() {
        assert!(require_tag("evidence_type", "temperature-log").is_ok());
        assert!(require_tag("evidence_type", "Temperature Log").is_err());
    }

    #[test]
    fn field_errors_name_the_field() {
        let errors = ValidationError::MissingField("title").field_errors();
        assert_eq!(errors.get("title").map(String::as_str), Some("This field is required"));
    }
}
