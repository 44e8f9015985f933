use thiserror::Error;

/// Upper bound on a confession, counted in characters after trimming.
pub const MAX_MESSAGE_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Message is required")]
    Required,

    #[error("Message too long (max {max})")]
    TooLong { max: usize },
}

/// Trim `raw` and check it fits a confession. Returns the trimmed text.
pub fn validate_message(raw: &str) -> Result<&str, ValidationError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Required);
    }
    if trimmed.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ValidationError::TooLong {
            max: MAX_MESSAGE_CHARS,
        });
    }

    Ok(trimmed)
}
