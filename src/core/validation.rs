//! Client-side form validation.
//!
//! Every form is checked here before a request is built, so constraint
//! violations never reach the transport layer.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::core::error::ValidationErrors;
use crate::models::Role;
use crate::utils::url::{UrlValidation, validate_link_url};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("valid username regex"));

/// Maximum length of folder, file, and event names.
pub const MAX_NAME_LEN: usize = 255;
pub const MIN_PASSWORD_LEN: usize = 8;
pub const USERNAME_LEN: std::ops::RangeInclusive<usize> = 3..=50;

fn check_name(errors: &mut ValidationErrors, field: &'static str, label: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, format!("{} is required", label));
    } else if value.chars().count() > MAX_NAME_LEN {
        errors.add(
            field,
            format!("{} must be at most {} characters", label, MAX_NAME_LEN),
        );
    }
}

/// Folder create/rename form.
pub fn validate_folder_name(name: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_name(&mut errors, "name", "Folder name", name);
    if name.contains(['/', '\\']) {
        errors.add("name", "Folder name cannot contain slashes");
    }
    errors.into_result()
}

/// File link form.
pub fn validate_file_link(name: &str, url: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_name(&mut errors, "name", "File name", name);
    if let UrlValidation::Invalid(reason) = validate_link_url(url) {
        errors.add("url", reason.to_string());
    }
    errors.into_result()
}

/// User fields shared by the create and edit forms.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserForm {
    pub username: String,
    pub email: String,
    pub full_name: String,
    /// Required on create; blank on edit keeps the current password.
    pub password: String,
    pub role: Option<Role>,
}

/// Validate the user form. `creating` makes the password mandatory.
pub fn validate_user(form: &UserForm, creating: bool) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let username = form.username.trim();
    if username.is_empty() {
        errors.add("username", "Username is required");
    } else if !USERNAME_LEN.contains(&username.chars().count()) {
        errors.add(
            "username",
            format!(
                "Username must be {}-{} characters",
                USERNAME_LEN.start(),
                USERNAME_LEN.end()
            ),
        );
    } else if !USERNAME_RE.is_match(username) {
        errors.add(
            "username",
            "Username may only contain letters, numbers, dots, dashes and underscores",
        );
    }

    check_email(&mut errors, &form.email);

    if creating || !form.password.is_empty() {
        check_password(&mut errors, "password", &form.password);
    }

    if form.role.is_none() {
        errors.add("role", "Role is required");
    }

    errors.into_result()
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    let email = email.trim();
    if email.is_empty() {
        errors.add("email", "Email is required");
    } else if !EMAIL_RE.is_match(email) {
        errors.add("email", "Email address is invalid");
    }
}

/// Own-profile form; only the email is constrained.
pub fn validate_profile(email: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_email(&mut errors, email);
    errors.into_result()
}

fn check_password(errors: &mut ValidationErrors, field: &'static str, password: &str) {
    if password.is_empty() {
        errors.add(field, "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.add(
            field,
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        );
    }
}

/// Password change form.
pub fn validate_password_change(
    current: &str,
    new: &str,
    confirm: &str,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if current.is_empty() {
        errors.add("current_password", "Current password is required");
    }
    check_password(&mut errors, "new_password", new);
    if !new.is_empty() && new == current {
        errors.add("new_password", "New password must differ from the current one");
    }
    if confirm != new {
        errors.add("confirm_password", "Passwords do not match");
    }
    errors.into_result()
}

/// Login form.
pub fn validate_login(username: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if username.trim().is_empty() {
        errors.add("username", "Username is required");
    }
    if password.is_empty() {
        errors.add("password", "Password is required");
    }
    errors.into_result()
}

/// Calendar event form.
pub fn validate_event(
    title: &str,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_name(&mut errors, "title", "Title", title);
    match (start, end) {
        (None, _) => errors.add("start_date", "Start date is required"),
        (_, None) => errors.add("end_date", "End date is required"),
        (Some(start), Some(end)) if end < start => {
            errors.add("end_date", "End date must not be before the start date")
        }
        _ => {}
    }
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_form() -> UserForm {
        UserForm {
            username: "jdoe".into(),
            email: "jdoe@example.com".into(),
            full_name: "Jane Doe".into(),
            password: "correct horse".into(),
            role: Some(Role::User),
        }
    }

    #[test]
    fn test_folder_name() {
        assert!(validate_folder_name("Reports 2024").is_ok());
        let err = validate_folder_name("   ").unwrap_err();
        assert_eq!(err.get("name"), Some("Folder name is required"));
        assert!(validate_folder_name("a/b").is_err());
        assert!(validate_folder_name(&"x".repeat(256)).is_err());
        assert!(validate_folder_name(&"x".repeat(255)).is_ok());
    }

    #[test]
    fn test_file_link() {
        assert!(validate_file_link("Spec", "https://example.com/spec.pdf").is_ok());
        let err = validate_file_link("", "ftp://example.com").unwrap_err();
        assert_eq!(err.len(), 2);
        assert_eq!(
            err.get("url"),
            Some("URL must start with http:// or https://")
        );
    }

    #[test]
    fn test_user_create_requires_password() {
        assert!(validate_user(&user_form(), true).is_ok());

        let form = UserForm {
            password: String::new(),
            ..user_form()
        };
        assert_eq!(
            validate_user(&form, true).unwrap_err().get("password"),
            Some("Password is required")
        );
        assert!(validate_user(&form, false).is_ok());
    }

    #[test]
    fn test_user_field_rules() {
        let form = UserForm {
            username: "a b".into(),
            email: "not-an-email".into(),
            password: "short".into(),
            role: None,
            ..user_form()
        };
        let err = validate_user(&form, false).unwrap_err();
        assert!(err.get("username").is_some());
        assert_eq!(err.get("email"), Some("Email address is invalid"));
        assert_eq!(
            err.get("password"),
            Some("Password must be at least 8 characters")
        );
        assert_eq!(err.get("role"), Some("Role is required"));
    }

    #[test]
    fn test_username_length() {
        let form = UserForm {
            username: "ab".into(),
            ..user_form()
        };
        assert_eq!(
            validate_user(&form, true).unwrap_err().get("username"),
            Some("Username must be 3-50 characters")
        );
    }

    #[test]
    fn test_password_change() {
        assert!(validate_password_change("old-password", "new-password", "new-password").is_ok());
        let err = validate_password_change("", "same-pass", "other").unwrap_err();
        assert!(err.get("current_password").is_some());
        assert_eq!(err.get("confirm_password"), Some("Passwords do not match"));
        let err = validate_password_change("same-pass", "same-pass", "same-pass").unwrap_err();
        assert!(err.get("new_password").is_some());
    }

    #[test]
    fn test_profile() {
        assert!(validate_profile("jdoe@example.com").is_ok());
        let err = validate_profile("not-an-email").unwrap_err();
        assert_eq!(err.get("email"), Some("Email address is invalid"));
        assert!(validate_profile(" ").is_err());
    }

    #[test]
    fn test_login() {
        assert!(validate_login("jdoe", "pw").is_ok());
        assert_eq!(validate_login(" ", "").unwrap_err().len(), 2);
    }

    #[test]
    fn test_event_dates() {
        let at = |s: &str| Some(s.parse::<DateTime<Utc>>().unwrap());
        assert!(validate_event("Review", at("2024-03-10T09:00:00Z"), at("2024-03-10T09:00:00Z")).is_ok());
        let err =
            validate_event("Review", at("2024-03-10T09:00:00Z"), at("2024-03-09T09:00:00Z")).unwrap_err();
        assert_eq!(
            err.get("end_date"),
            Some("End date must not be before the start date")
        );
        let err = validate_event("", None, None).unwrap_err();
        assert!(err.get("title").is_some());
        assert!(err.get("start_date").is_some());
    }
}
