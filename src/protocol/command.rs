//! Command line parsing

/// Strip a protocol line, skipping blank ones
pub fn parse_command(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    Some(input.to_string())
}
