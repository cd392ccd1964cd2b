//! Guild settings validation

use thiserror::Error;

/// Errors that can occur while validating guild settings values
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SettingsValidationError {
    #[error("Guild ID cannot be empty")]
    EmptyGuildId,

    #[error("Guild ID must be a numeric snowflake, got '{0}'")]
    InvalidGuildId(String),

    #[error("Prefix cannot be empty")]
    EmptyPrefix,

    #[error("Prefix cannot exceed {0} characters")]
    PrefixTooLong(usize),

    #[error("Prefix cannot contain whitespace")]
    PrefixWhitespace,
}

pub const MAX_PREFIX_LENGTH: usize = 32;

/// Validate a command prefix
pub fn validate_prefix(prefix: &str) -> Result<(), SettingsValidationError> {
    if prefix.is_empty() {
        return Err(SettingsValidationError::EmptyPrefix);
    }

    if prefix.chars().count() > MAX_PREFIX_LENGTH {
        return Err(SettingsValidationError::PrefixTooLong(MAX_PREFIX_LENGTH));
    }

    if prefix.chars().any(char::is_whitespace) {
        return Err(SettingsValidationError::PrefixWhitespace);
    }

    Ok(())
}

/// Parse a guild snowflake from its decimal form
pub fn parse_guild_id(raw: &str) -> Result<u64, SettingsValidationError> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(SettingsValidationError::EmptyGuildId);
    }

    raw.parse::<u64>()
        .map_err(|_| SettingsValidationError::InvalidGuildId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_prefixes() {
        assert!(validate_prefix(">>").is_ok());
        assert!(validate_prefix("!").is_ok());
        assert!(validate_prefix("bot.").is_ok());
        assert!(validate_prefix("é€").is_ok());
    }

    #[test]
    fn test_empty_prefix() {
        assert_eq!(validate_prefix(""), Err(SettingsValidationError::EmptyPrefix));
    }

    #[test]
    fn test_prefix_too_long() {
        let long = "x".repeat(MAX_PREFIX_LENGTH + 1);
        assert_eq!(
            validate_prefix(&long),
            Err(SettingsValidationError::PrefixTooLong(MAX_PREFIX_LENGTH))
        );
        assert!(validate_prefix(&"x".repeat(MAX_PREFIX_LENGTH)).is_ok());
    }

    #[test]
    fn test_prefix_with_whitespace() {
        assert_eq!(
            validate_prefix("! "),
            Err(SettingsValidationError::PrefixWhitespace)
        );
    }

    #[test]
    fn test_parse_guild_id() {
        assert_eq!(parse_guild_id("123456789012345678"), Ok(123456789012345678));
        assert_eq!(parse_guild_id(" 42 "), Ok(42));
        assert_eq!(parse_guild_id(""), Err(SettingsValidationError::EmptyGuildId));
        assert_eq!(
            parse_guild_id("abc"),
            Err(SettingsValidationError::InvalidGuildId("abc".to_string()))
        );
        assert!(parse_guild_id("-1").is_err());
    }
}
