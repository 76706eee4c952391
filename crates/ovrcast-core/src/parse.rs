// Defensive parsing of provider cells.
//
// Every parser here returns `None` for anything it cannot read. Callers treat
// `None` as "absent" and apply their own defaults; a malformed cell must never
// become zero.

/// Currency symbols that may prefix a marketplace price.
const CURRENCY_PREFIXES: &[char] = &['$', '£', '€', '¤'];

/// Placeholder strings providers use for "no value".
const PLACEHOLDERS: &[&str] = &["", "-", "--", "n/a", "na", "nan", "none", "null"];

fn is_placeholder(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    PLACEHOLDERS.contains(&lower.as_str())
}

/// Normalize a player name into the key used for cross-source joins.
///
/// Joins are case-insensitive exact matches, so the key is the trimmed,
/// lowercased name. Inner whitespace is preserved.
pub fn join_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Parse a statistics cell into a finite `f64`.
///
/// - Thousands separators are removed (`"1,024"` → 1024.0).
/// - A trailing percent sign converts to a fraction (`"22.5 %"` → 0.225).
/// - Placeholders (`"-"`, `"N/A"`, empty) and non-finite values yield `None`.
pub fn parse_stat(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if is_placeholder(trimmed) {
        return None;
    }

    let (body, percent) = match trimmed.strip_suffix('%') {
        Some(rest) => (rest.trim_end(), true),
        None => (trimmed, false),
    };
    let cleaned: String = body.chars().filter(|c| *c != ',').collect();
    let value: f64 = cleaned.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if percent { value / 100.0 } else { value })
}

/// Parse a marketplace price into a whole-number amount.
///
/// Strips thousands separators, a leading currency symbol and a trailing
/// currency label (`"1,234 Stubs"` → 1234). Negative, fractional-garbage or
/// otherwise non-numeric input yields `None`, never zero.
pub fn parse_amount(cell: &str) -> Option<u32> {
    let trimmed = cell.trim();
    if is_placeholder(trimmed) {
        return None;
    }

    let without_symbol = trimmed.trim_start_matches(CURRENCY_PREFIXES).trim_start();
    let without_label = without_symbol
        .trim_end_matches(|c: char| c.is_alphabetic())
        .trim_end();
    let cleaned: String = without_label
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    whole_number(&cleaned)
}

/// Parse an overall rating cell (`"85"`, `"85.0"`).
pub fn parse_rating(cell: &str) -> Option<u32> {
    let trimmed = cell.trim();
    if is_placeholder(trimmed) {
        return None;
    }
    whole_number(trimmed)
}

/// Read a non-negative whole number, accepting float spellings of integers
/// (`"3000.0"`) as exported by dataframe tooling.
fn whole_number(s: &str) -> Option<u32> {
    if let Ok(n) = s.parse::<u32>() {
        return Some(n);
    }
    let value: f64 = s.parse().ok()?;
    if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 || value.fract() != 0.0 {
        return None;
    }
    Some(value as u32)
}
