//! Join form validation

use thiserror::Error;

use crate::config::JoinConfig;

/// A validated join request, values trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    pub username: String,
    pub room_code: String,
}

/// Inline error message per join form field
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("Invalid join form")]
pub struct FieldErrors {
    pub username: Option<String>,
    pub room_code: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.room_code.is_none()
    }
}

/// Check both fields and report every failure at once
pub fn validate_join(
    username: &str,
    room_code: &str,
    rules: &JoinConfig,
) -> Result<JoinRequest, FieldErrors> {
    let username = username.trim();
    let room_code = room_code.trim();

    let errors = FieldErrors {
        username: check_field("Username", username, rules.min_username_len),
        room_code: check_field("Room code", room_code, rules.min_room_code_len),
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(JoinRequest {
        username: username.to_string(),
        room_code: room_code.to_string(),
    })
}

fn check_field(label: &str, value: &str, min_len: usize) -> Option<String> {
    if value.is_empty() {
        Some(format!("{} is required", label))
    } else if value.chars().count() < min_len {
        Some(format!("{} must be at least {} characters", label, min_len))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_join() {
        let req = validate_join("alice", "room1", &JoinConfig::default()).unwrap();
        assert_eq!(req.username, "alice");
        assert_eq!(req.room_code, "room1");
    }

    #[test]
    fn test_values_are_trimmed() {
        let req = validate_join("  alice ", " room1\t", &JoinConfig::default()).unwrap();
        assert_eq!(req.username, "alice");
        assert_eq!(req.room_code, "room1");
    }

    #[test]
    fn test_required_fields() {
        let errors = validate_join("   ", "", &JoinConfig::default()).unwrap_err();
        assert_eq!(errors.username.as_deref(), Some("Username is required"));
        assert_eq!(errors.room_code.as_deref(), Some("Room code is required"));
    }

    #[test]
    fn test_minimum_lengths() {
        let errors = validate_join("al", "abc", &JoinConfig::default()).unwrap_err();
        assert_eq!(
            errors.username.as_deref(),
            Some("Username must be at least 3 characters")
        );
        assert_eq!(
            errors.room_code.as_deref(),
            Some("Room code must be at least 4 characters")
        );
    }

    #[test]
    fn test_padding_does_not_count() {
        let errors = validate_join(" al ", "room1", &JoinConfig::default()).unwrap_err();
        assert!(errors.username.is_some());
        assert!(errors.room_code.is_none());
    }

    #[test]
    fn test_lengths_count_characters() {
        let req = validate_join("äöü", "ññññ", &JoinConfig::default()).unwrap();
        assert_eq!(req.username, "äöü");
    }
}
