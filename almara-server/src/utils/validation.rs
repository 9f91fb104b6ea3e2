//! Input validation helpers
//!
//! Field rules are collected rather than fail-fast: every failure for a
//! request is gathered into one list so the client can render all of them
//! at once. Validation always runs before any persistence write.

use std::path::Path;

use validator::ValidateEmail;

use crate::utils::AppError;

// ── Field rules ─────────────────────────────────────────────────────

/// Names (people): at least first and last initial.
pub const MIN_USER_NAME_LEN: usize = 2;

/// Product names
pub const MIN_PRODUCT_NAME_LEN: usize = 5;

/// Product descriptions
pub const MIN_DESCRIPTION_LEN: usize = 20;

/// Passwords (before hashing)
pub const MIN_PASSWORD_LEN: usize = 8;

/// Accepted image file extensions (avatars and product images).
pub const ALLOWED_IMAGE_EXTS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Collects field validation failures; empty means the input passed.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Finish the pass: `Err(AppError::ValidationErrors)` if anything failed.
    pub fn into_result(self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::ValidationErrors(self.errors))
        }
    }
}

/// Whether `value` looks like an email address.
pub fn email_ok(value: &str) -> bool {
    value.validate_email()
}

/// Password complexity: lower, upper, digit and a special character.
pub fn password_complexity_ok(password: &str) -> bool {
    let lower = password.chars().any(|c| c.is_ascii_lowercase());
    let upper = password.chars().any(|c| c.is_ascii_uppercase());
    let digit = password.chars().any(|c| c.is_ascii_digit());
    let special = password.chars().any(|c| !c.is_ascii_alphanumeric());
    lower && upper && digit && special
}

/// Whether a file name (or bare value) carries an accepted image extension.
///
/// A value without any extension passes — the field is a free-form path in
/// the product form.
pub fn image_ext_ok(value: &str) -> bool {
    match Path::new(value).extension().and_then(|e| e.to_str()) {
        Some(ext) => ALLOWED_IMAGE_EXTS
            .iter()
            .any(|allowed| ext.eq_ignore_ascii_case(allowed)),
        None => true,
    }
}

/// Like [`image_ext_ok`] but an extension is required (uploaded files).
pub fn upload_ext_ok(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            ALLOWED_IMAGE_EXTS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

/// A finite, non-negative price.
pub fn price_ok(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_complexity_requires_all_classes() {
        assert!(password_complexity_ok("Abcdef1!"));
        assert!(password_complexity_ok("Sup3r_Secret"));
        assert!(!password_complexity_ok("alllowercase1!"));
        assert!(!password_complexity_ok("NoDigits!!"));
        assert!(!password_complexity_ok("NoSpecial123"));
    }

    #[test]
    fn image_extensions_are_whitelisted() {
        assert!(image_ext_ok("shirt.JPG"));
        assert!(image_ext_ok("shirt.png"));
        assert!(image_ext_ok("no-extension"));
        assert!(!image_ext_ok("shirt.webp"));

        assert!(upload_ext_ok("avatar.jpeg"));
        assert!(!upload_ext_ok("avatar"));
        assert!(!upload_ext_ok("avatar.svg"));
    }

    #[test]
    fn collected_errors_surface_together() {
        let mut errors = FieldErrors::new();
        errors.push("name is required");
        errors.push("description is too short");
        let err = errors.into_result().unwrap_err();
        match err {
            AppError::ValidationErrors(msgs) => assert_eq!(msgs.len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn email_format_is_checked() {
        assert!(email_ok("ana@example.com"));
        assert!(!email_ok("not-an-email"));
    }
}
