//! Prompt commands
//!
//! Keyboard-driven alternative to the buttons:
//! - `:c` / `:h`  select the CPU / heap profile (clears the filter)
//! - `:r`         forced refresh
//! - `:s`         toggle cumulative sort
//! - `:f=<regex>` set the filter; `:f=` clears it

use crate::error::CommandError;
use crate::models::ProfileKind;
use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptCommand {
    SelectProfile(ProfileKind),
    ForceRefresh,
    ToggleCumsort,
    Filter(String),
}

/// Parse one prompt line.
///
/// Filters are checked with the same regex dialect the backend uses, so a
/// typo is reported here instead of as an HTTP 400.
pub fn parse_command(input: &str) -> Result<PromptCommand, CommandError> {
    let input = input.trim_end_matches(['\r', '\n']);
    if !input.starts_with(':') {
        return Err(CommandError::MissingPrefix(input.to_string()));
    }

    match input.trim() {
        ":c" => return Ok(PromptCommand::SelectProfile(ProfileKind::Cpu)),
        ":h" => return Ok(PromptCommand::SelectProfile(ProfileKind::Heap)),
        ":r" => return Ok(PromptCommand::ForceRefresh),
        ":s" => return Ok(PromptCommand::ToggleCumsort),
        _ => {}
    }

    if let Some(filter) = input.strip_prefix(":f=") {
        if !filter.is_empty() {
            Regex::new(filter).map_err(|e| CommandError::InvalidFilter(e.to_string()))?;
        }
        return Ok(PromptCommand::Filter(filter.to_string()));
    }

    Err(CommandError::Unknown(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_commands() {
        assert_eq!(parse_command(":c"), Ok(PromptCommand::SelectProfile(ProfileKind::Cpu)));
        assert_eq!(parse_command(":h"), Ok(PromptCommand::SelectProfile(ProfileKind::Heap)));
        assert_eq!(parse_command(":r"), Ok(PromptCommand::ForceRefresh));
        assert_eq!(parse_command(":s\n"), Ok(PromptCommand::ToggleCumsort));
    }

    #[test]
    fn test_filter_command_keeps_text_verbatim() {
        assert_eq!(
            parse_command(":f=runtime\\..* gc"),
            Ok(PromptCommand::Filter("runtime\\..* gc".to_string()))
        );
        assert_eq!(parse_command(":f="), Ok(PromptCommand::Filter(String::new())));
    }

    #[test]
    fn test_filter_prefix_only_stripped_once() {
        assert_eq!(parse_command(":f=a=b"), Ok(PromptCommand::Filter("a=b".to_string())));
        assert_eq!(parse_command(":f=:f=x"), Ok(PromptCommand::Filter(":f=x".to_string())));
        assert_eq!(parse_command(":f"), Err(CommandError::Unknown(":f".to_string())));
        assert_eq!(parse_command(":ff=x"), Err(CommandError::Unknown(":ff=x".to_string())));
    }

    #[test]
    fn test_invalid_filter_regex() {
        assert!(matches!(parse_command(":f=(unclosed"), Err(CommandError::InvalidFilter(_))));
    }

    #[test]
    fn test_unknown_and_unprefixed() {
        assert_eq!(parse_command(":x"), Err(CommandError::Unknown(":x".to_string())));
        assert_eq!(parse_command("c"), Err(CommandError::MissingPrefix("c".to_string())));
    }
}
