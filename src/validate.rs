use std::fmt;

use crate::{Tainted, Verified};

/// Column width of `posts.title`, `posts.subtitle` and `posts.img_url`.
pub const SHORT_FIELD_MAX: usize = 250;

/// Error returned when a plain form field is rejected.
///
/// The message never echoes the rejected input.
///
/// # Examples
///
/// ```
/// use blog_policy::{ValidationError, ValidationErrorKind};
///
/// let error = ValidationError::new("title", ValidationErrorKind::Empty, "a title is required");
/// assert_eq!(error.kind(), ValidationErrorKind::Empty);
/// assert_eq!(error.field(), "title");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    field: &'static str,
    kind: ValidationErrorKind,
    message: String,
}

impl ValidationError {
    /// Creates a new validation error for `field`.
    pub fn new(field: &'static str, kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            field,
            kind,
            message: message.into(),
        }
    }

    /// The name of the rejected field.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ValidationErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.field, self.kind, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Kind of validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A required field is empty or contains only whitespace.
    Empty,
    /// Input exceeds the column width.
    TooLong,
    /// Input contains control or non-printable characters.
    ContainsControlChars,
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty input"),
            Self::TooLong => write!(f, "input too long"),
            Self::ContainsControlChars => write!(f, "contains control characters"),
        }
    }
}

/// Trait for validating plain (non-markup) form fields.
///
/// Unlike [`Sanitizer`](crate::Sanitizer), validation can refuse input.
pub trait Validator<T> {
    /// The verified output; `Option` for optional fields.
    type Output;

    /// Validates a tainted value.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the input breaks the field's rules.
    fn validate(&self, input: Tainted<T>) -> Result<Self::Output, ValidationError>;
}

/// Validator for short, single-line form fields such as a post title.
///
/// - trims leading and trailing whitespace
/// - rejects control characters (newlines, NUL, ...)
/// - enforces a maximum length in characters
///
/// A required field rejects empty input; use
/// [`optional`](FieldValidator::optional) for fields where empty means
/// "not provided".
///
/// # Examples
///
/// ```
/// use blog_policy::{FieldValidator, Tainted, Validator};
///
/// let title = FieldValidator::required("title", 250);
/// let verified = title.validate(Tainted::new("  Hello  ".to_string())).unwrap();
/// assert_eq!(verified.as_ref(), "Hello");
///
/// assert!(title.validate(Tainted::new("   ".to_string())).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FieldValidator {
    field: &'static str,
    max_len: usize,
}

impl FieldValidator {
    /// Creates a validator for a required field.
    ///
    /// # Panics
    ///
    /// Panics if `max_len` is 0.
    pub fn required(field: &'static str, max_len: usize) -> Self {
        assert!(max_len > 0, "max_len must be greater than 0");
        Self { field, max_len }
    }

    /// Creates a validator for an optional field.
    pub fn optional(field: &'static str, max_len: usize) -> OptionalField {
        OptionalField(Self::required(field, max_len))
    }

    fn check(&self, raw: &str) -> Result<(), ValidationError> {
        if raw.chars().any(char::is_control) {
            return Err(ValidationError::new(
                self.field,
                ValidationErrorKind::ContainsControlChars,
                "input contains control or non-printable characters",
            ));
        }

        if raw.chars().count() > self.max_len {
            return Err(ValidationError::new(
                self.field,
                ValidationErrorKind::TooLong,
                format!("input exceeds maximum length of {}", self.max_len),
            ));
        }

        Ok(())
    }
}

impl Validator<String> for FieldValidator {
    type Output = Verified<String>;

    fn validate(&self, input: Tainted<String>) -> Result<Verified<String>, ValidationError> {
        let raw = input.into_inner();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::new(
                self.field,
                ValidationErrorKind::Empty,
                "this field is required",
            ));
        }

        self.check(trimmed)?;
        Ok(Verified::new_unchecked(trimmed.to_string()))
    }
}

/// A [`FieldValidator`] where empty input means "not provided".
#[derive(Debug, Clone, Copy)]
pub struct OptionalField(FieldValidator);

impl Validator<String> for OptionalField {
    type Output = Option<Verified<String>>;

    fn validate(&self, input: Tainted<String>) -> Result<Self::Output, ValidationError> {
        let raw = input.into_inner();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Ok(None);
        }

        self.0.check(trimmed)?;
        Ok(Some(Verified::new_unchecked(trimmed.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_field_trims() {
        let v = FieldValidator::required("title", 10);
        let out = v.validate(Tainted::new("  abc ".to_string())).unwrap();
        assert_eq!(out.as_ref(), "abc");
    }

    #[test]
    fn required_field_rejects_blank() {
        let v = FieldValidator::required("title", 10);
        let err = v.validate(Tainted::new(" \t ".to_string())).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::Empty);
        assert_eq!(err.field(), "title");
    }

    #[test]
    fn control_chars_are_rejected() {
        let v = FieldValidator::required("title", 64);
        let err = v
            .validate(Tainted::new("line\nbreak".to_string()))
            .unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::ContainsControlChars);
    }

    #[test]
    fn length_counts_characters() {
        let v = FieldValidator::required("title", 3);
        assert!(v.validate(Tainted::new("äöü".to_string())).is_ok());

        let err = v.validate(Tainted::new("abcd".to_string())).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::TooLong);
        assert!(!err.message().contains("abcd"));
    }

    #[test]
    fn optional_field_maps_blank_to_none() {
        let v = FieldValidator::optional("subtitle", 10);
        assert_eq!(v.validate(Tainted::new("  ".to_string())).unwrap(), None);

        let some = v.validate(Tainted::new(" sub ".to_string())).unwrap();
        assert_eq!(some.unwrap().as_ref(), "sub");
    }

    #[test]
    fn optional_field_still_enforces_rules() {
        let v = FieldValidator::optional("img_url", 4);
        let err = v.validate(Tainted::new("toolong".to_string())).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::TooLong);
        assert_eq!(err.field(), "img_url");
    }

    #[test]
    fn display_includes_field_and_kind() {
        let err = ValidationError::new("title", ValidationErrorKind::TooLong, "too long");
        assert_eq!(err.to_string(), "title (input too long): too long");
    }
}
