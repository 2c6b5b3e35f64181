// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Sign-up form validation and sanitization.
//!
//! Every field is checked and all violations are collected, so a single
//! submission reports every problem at once. Values that pass are trimmed,
//! normalized and HTML-escaped before they reach the store.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw sign-up form as submitted. Missing fields arrive as empty strings.
#[derive(Deserialize, Default, Clone)]
#[serde(default)]
pub struct SignUpForm {
    pub username: String,
    pub password: String,
    pub firstname: String,
    pub lastname: String,
    pub membership: String,
    pub admin: String,
}

impl std::fmt::Debug for SignUpForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUpForm")
            .field("username", &self.username)
            .field("firstname", &self.firstname)
            .field("lastname", &self.lastname)
            .field("membership", &self.membership)
            .field("admin", &self.admin)
            .finish_non_exhaustive()
    }
}

/// Normalized sign-up fields, ready to be hashed and persisted
#[derive(Clone, PartialEq, Eq)]
pub struct ValidSignUp {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub membership: String,
    pub admin: bool,
}

impl std::fmt::Debug for ValidSignUp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidSignUp")
            .field("username", &self.username)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("membership", &self.membership)
            .field("admin", &self.admin)
            .finish_non_exhaustive()
    }
}

/// Possible validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{0} must contain only ASCII letters, numbers or symbols")]
    NotAscii(&'static str),

    #[error("{0} must contain only alphabetic letters")]
    NotAlphabetic(&'static str),

    #[error("{0} must be true or false")]
    NotBoolean(&'static str),
}

/// A validation failure attached to the form field it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, error: ValidationError) -> Self {
        Self {
            field,
            message: error.to_string(),
        }
    }
}

/// Validate and sanitize a sign-up submission.
///
/// Returns the normalized fields, or every field error in form order.
pub fn validate_sign_up(form: &SignUpForm) -> Result<ValidSignUp, Vec<FieldError>> {
    let mut errors = Vec::new();

    let username = check_ascii("username", "Username", &form.username, &mut errors)
        .map(|value| escape_html(&value.to_ascii_lowercase()));
    let password =
        check_ascii("password", "Password", &form.password, &mut errors).map(|v| escape_html(&v));
    let first_name = check_alpha("firstname", "First name", &form.firstname, &mut errors);
    let last_name = check_alpha("lastname", "Last name", &form.lastname, &mut errors);
    let membership = check_present("membership", "Membership status", &form.membership, &mut errors);
    let admin = check_present("admin", "Admin status", &form.admin, &mut errors).and_then(|raw| {
        let parsed = parse_bool_like(&raw);
        if parsed.is_none() {
            errors.push(FieldError::new("admin", ValidationError::NotBoolean("Admin status")));
        }
        parsed
    });

    match (username, password, first_name, last_name, membership, admin) {
        (Some(username), Some(password), Some(first_name), Some(last_name), Some(membership), Some(admin))
            if errors.is_empty() =>
        {
            Ok(ValidSignUp {
                username,
                password,
                first_name,
                last_name,
                membership,
                admin,
            })
        },
        _ => Err(errors),
    }
}

/// Normalize a username the way sign-up stores it
pub fn normalize_username(raw: &str) -> String {
    escape_html(&raw.trim().to_ascii_lowercase())
}

/// Normalize a password the way sign-up hashes it
pub fn normalize_password(raw: &str) -> String {
    escape_html(raw.trim())
}

/// Replace markup-significant characters with HTML entities
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(c),
        }
    }
    out
}

/// Interpret a boolean-like form value (checkbox, select or free text)
pub fn parse_bool_like(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn check_present(
    field: &'static str,
    label: &'static str,
    raw: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        errors.push(FieldError::new(field, ValidationError::Required(label)));
        return None;
    }
    Some(value.to_string())
}

fn check_ascii(
    field: &'static str,
    label: &'static str,
    raw: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let value = check_present(field, label, raw, errors)?;
    if !value.is_ascii() {
        errors.push(FieldError::new(field, ValidationError::NotAscii(label)));
        return None;
    }
    Some(value)
}

fn check_alpha(
    field: &'static str,
    label: &'static str,
    raw: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    let value = check_present(field, label, raw, errors)?;
    if !value.chars().all(|c| c.is_ascii_alphabetic()) {
        errors.push(FieldError::new(field, ValidationError::NotAlphabetic(label)));
        return None;
    }
    Some(escape_html(&value))
}
