//! Input parsing for the interactive `play` command.

use montyhall_engine::door::DoorId;

/// Outcome of parsing one line typed at a play prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseResult {
    /// A door, already converted from the 1-based number the player typed
    Door(DoorId),
    Stay,
    Switch,
    /// User entered quit command (q or quit)
    Quit,
    /// Invalid input with error message
    Invalid(String),
}

/// Parse play input. Doors are typed as `1`, `2` or `3`.
///
/// ```rust
/// # use montyhall_cli::validation::{parse_choice, ParseResult};
/// use montyhall_engine::door::DoorId;
///
/// assert_eq!(parse_choice("1"), ParseResult::Door(DoorId::new(0).unwrap()));
/// assert_eq!(parse_choice("SWITCH"), ParseResult::Switch);
/// assert_eq!(parse_choice("q"), ParseResult::Quit);
/// assert!(matches!(parse_choice("4"), ParseResult::Invalid(_)));
/// ```
pub fn parse_choice(input: &str) -> ParseResult {
    let input = input.trim().to_lowercase();
    match input.as_str() {
        "" => ParseResult::Invalid("Empty input".to_string()),
        "q" | "quit" => ParseResult::Quit,
        "s" | "stay" => ParseResult::Stay,
        "w" | "switch" => ParseResult::Switch,
        other => match other.parse::<u8>() {
            Ok(n @ 1..=3) => match DoorId::new(n - 1) {
                Ok(id) => ParseResult::Door(id),
                Err(e) => ParseResult::Invalid(e.to_string()),
            },
            Ok(n) => ParseResult::Invalid(format!("Door must be 1, 2 or 3 (got {})", n)),
            Err(_) => ParseResult::Invalid(format!("Unrecognized input: {}", other)),
        },
    }
}

/// Validate a round or game count flag.
pub fn validate_count(name: &str, value: u64) -> Result<u64, String> {
    if value == 0 {
        Err(format!("{} must be >= 1", name))
    } else {
        Ok(value)
    }
}
