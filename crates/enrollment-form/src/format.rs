//! Phone number formatting and the length validation message.

/// Keep only ASCII digits.
pub fn strip_digits(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Render a phone number as `(AAA) BBB-CCCC`.
///
/// Groups are 3-3-4; partial groups are rendered as typed and empty
/// groups are omitted. Digits beyond the tenth are not rendered (they
/// still count toward validation). Idempotent on its own output.
pub fn format_phone(input: &str) -> String {
    let digits = strip_digits(input);

    let area = &digits[..digits.len().min(3)];
    let prefix = &digits[digits.len().min(3)..digits.len().min(6)];
    let line = &digits[digits.len().min(6)..digits.len().min(10)];

    let mut formatted = String::new();
    if !area.is_empty() {
        formatted.push('(');
        formatted.push_str(area);
        formatted.push_str(") ");
    }
    formatted.push_str(prefix);
    if !line.is_empty() {
        formatted.push('-');
        formatted.push_str(line);
    }

    formatted.trim().to_string()
}

/// Validation message shown when the digit count is off.
pub fn validation_message(required: usize) -> String {
    format!("Please enter {} digits", required)
}
