// 💰 Amount Extractor - Trailing number out of a noisy line
//
// "Tiket pesawat 500.000"  → 500000
// "Hotel 2 malam 1,250,000" → 1250000
// "info reschedule"        → 0
//
// Separators are always thousands separators; there is no decimal handling.

/// Parse the last run of digits, `.` and `,` into an integer amount.
///
/// Whitespace is removed first, so "1 250 000" reads as one run. A run that
/// holds no digits, or one too large for `u64`, yields 0.
pub fn extract_amount(line: &str) -> u64 {
    let compact: String = line
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();

    let Some(run) = last_numeric_run(&compact) else {
        return 0;
    };

    let digits: String = run.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse::<u64>().unwrap_or(0)
}

fn is_numeric_char(c: char) -> bool {
    c.is_ascii_digit() || c == '.' || c == ','
}

/// Last maximal run of digits and separators
fn last_numeric_run(text: &str) -> Option<&str> {
    let end = text.rfind(is_numeric_char)? + 1;
    let start = text[..end]
        .rfind(|c: char| !is_numeric_char(c))
        .map(|pos| pos + text[pos..].chars().next().map_or(1, char::len_utf8))
        .unwrap_or(0);
    Some(&text[start..end])
}

// ============================================================================
// TESTS
// ============================================================================
