//! Common validation utilities for guest-submitted forms.

use validator::ValidationError;

/// Maximum length accepted for a guest display name.
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum length accepted for free-text fields (messages, dietary notes).
pub const MAX_TEXT_LENGTH: usize = 2000;

/// Upper bound on a party size; anything larger is a typo or abuse.
pub const MAX_GUESTS: i32 = 20;

/// Validates that a text field is non-empty after trimming.
pub fn validate_trimmed_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("Field must not be empty".into());
        return Err(err);
    }
    Ok(())
}

/// Validates a guest display name: non-blank and within length bounds.
pub fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.len() < 2 {
        let mut err = ValidationError::new("name_too_short");
        err.message = Some("Name must be at least 2 characters".into());
        return Err(err);
    }
    if trimmed.len() > MAX_NAME_LENGTH {
        let mut err = ValidationError::new("name_too_long");
        err.message = Some("Name must be at most 100 characters".into());
        return Err(err);
    }
    Ok(())
}

/// Validates a guest count for an attending RSVP.
pub fn validate_guest_count(count: i32) -> Result<(), ValidationError> {
    if count < 1 {
        let mut err = ValidationError::new("guest_count_range");
        err.message = Some("Number of guests must be at least 1".into());
        return Err(err);
    }
    if count > MAX_GUESTS {
        let mut err = ValidationError::new("guest_count_range");
        err.message = Some("Number of guests must be at most 20".into());
        return Err(err);
    }
    Ok(())
}

/// Validates an event-setting key: lowercase snake_case identifiers only.
pub fn validate_setting_key(key: &str) -> Result<(), ValidationError> {
    let valid = !key.is_empty()
        && key.len() <= 64
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !valid {
        let mut err = ValidationError::new("setting_key_format");
        err.message = Some("Setting key must be lowercase snake_case".into());
        return Err(err);
    }
    Ok(())
}

/// Trims a string and maps blank results to `None`.
///
/// Used to normalize optional free-text form fields before persistence.
pub fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trimmed_not_empty() {
        assert!(validate_trimmed_not_empty("hello").is_ok());
        assert!(validate_trimmed_not_empty("  x  ").is_ok());
        assert!(validate_trimmed_not_empty("").is_err());
        assert!(validate_trimmed_not_empty("   ").is_err());
        assert!(validate_trimmed_not_empty("\t\n").is_err());
    }

    #[test]
    fn test_display_name_bounds() {
        assert!(validate_display_name("Ana").is_ok());
        assert!(validate_display_name("Jo").is_ok());
        assert!(validate_display_name("J").is_err());
        assert!(validate_display_name("  ").is_err());
        assert!(validate_display_name(&"a".repeat(100)).is_ok());
        assert!(validate_display_name(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_display_name_trims_before_checking() {
        // One visible character padded with spaces is still too short.
        assert!(validate_display_name("  A  ").is_err());
        assert!(validate_display_name("  Ana  ").is_ok());
    }

    #[test]
    fn test_guest_count_range() {
        assert!(validate_guest_count(1).is_ok());
        assert!(validate_guest_count(20).is_ok());
        assert!(validate_guest_count(0).is_err());
        assert!(validate_guest_count(-3).is_err());
        assert!(validate_guest_count(21).is_err());
    }

    #[test]
    fn test_setting_key_format() {
        assert!(validate_setting_key("event_address").is_ok());
        assert!(validate_setting_key("event_time_end").is_ok());
        assert!(validate_setting_key("key2").is_ok());
        assert!(validate_setting_key("").is_err());
        assert!(validate_setting_key("Event-Address").is_err());
        assert!(validate_setting_key("has space").is_err());
        assert!(validate_setting_key(&"k".repeat(65)).is_err());
    }

    #[test]
    fn test_normalize_optional_text() {
        assert_eq!(normalize_optional_text(None), None);
        assert_eq!(normalize_optional_text(Some("".into())), None);
        assert_eq!(normalize_optional_text(Some("   ".into())), None);
        assert_eq!(
            normalize_optional_text(Some("  gluten free  ".into())),
            Some("gluten free".to_string())
        );
    }
}
