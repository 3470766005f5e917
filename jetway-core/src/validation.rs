//! Field validation for the passenger-details form.
//!
//! Pure classification only: each function trims its input, inspects it
//! and returns an [`ErrorKind`] or `None`. Display text lives in one
//! fixed table so an error kind always renders the same way.

/// Classification of a single-field validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Required,
    TooShort,
    TooLong,
    BadFormat,
    BadChars,
}

/// The two validated fields of a passenger's extra details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailField {
    Nationality,
    Phone,
}

/// Validate a nationality value: a 2-3 letter uppercase country code.
pub fn validate_nationality(value: &str) -> Option<ErrorKind> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(ErrorKind::Required);
    }
    if trimmed.len() < 2 {
        return Some(ErrorKind::TooShort);
    }
    if trimmed.len() > 3 || !trimmed.chars().all(|c| c.is_ascii_uppercase()) {
        return Some(ErrorKind::BadFormat);
    }
    None
}

/// Validate a phone value: 6-15 characters of digits, whitespace,
/// dashes or parentheses.
pub fn validate_phone(value: &str) -> Option<ErrorKind> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(ErrorKind::Required);
    }
    if trimmed.len() < 6 {
        return Some(ErrorKind::TooShort);
    }
    if trimmed.len() > 15 {
        return Some(ErrorKind::TooLong);
    }
    let allowed = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_whitespace() || matches!(c, '-' | '(' | ')'));
    if !allowed {
        return Some(ErrorKind::BadChars);
    }
    None
}

/// Validate one field by name.
pub fn validate(field: DetailField, value: &str) -> Option<ErrorKind> {
    match field {
        DetailField::Nationality => validate_nationality(value),
        DetailField::Phone => validate_phone(value),
    }
}

/// The fixed user-facing message for a field/kind pair. Kinds a field
/// never produces fold into its format message.
pub fn display_text(field: DetailField, kind: ErrorKind) -> &'static str {
    match (field, kind) {
        (DetailField::Nationality, ErrorKind::Required) => "Nationality is required",
        (DetailField::Nationality, ErrorKind::TooShort) => "Enter valid country code (e.g., TH, US)",
        (DetailField::Nationality, _) => "Use 2-3 letter country code",
        (DetailField::Phone, ErrorKind::Required) => "Phone number is required",
        (DetailField::Phone, ErrorKind::TooShort) => "Phone number too short",
        (DetailField::Phone, ErrorKind::TooLong) => "Phone number too long",
        (DetailField::Phone, _) => "Only numbers, spaces, and dashes allowed",
    }
}
