//! Textual repair of malformed generator output
//!
//! Generators wrap JSON in code fences, use typographic quotes, and leave
//! trailing commas. The repair passes here are a bounded, ordered list:
//! fence stripping, ASCII folding, noise stripping, bracket completion,
//! then a single trailing-comma retry. If both parse attempts fail the
//! caller falls back to a stub deck; nothing in this module errors out.

use tracing::debug;

/// Strip markdown code-fence lines (``` and ```json variants)
fn strip_code_fences(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fold typographic quotes and dashes to ASCII equivalents
fn ascii_fold(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' | '\u{201E}' => '"',
            '\u{2018}' | '\u{2019}' | '\u{201A}' => '\'',
            '\u{2013}' | '\u{2014}' | '\u{2015}' => '-',
            other => other,
        })
        .collect()
}

/// Drop control characters and zero-width noise that break parsers
///
/// Newlines and tabs survive; everything else in the C0/C1 ranges and the
/// usual zero-width/BOM code points is removed.
fn strip_noise(text: &str) -> String {
    text.chars()
        .filter(|c| {
            if matches!(c, '\n' | '\r' | '\t') {
                return true;
            }
            if c.is_control() {
                return false;
            }
            !matches!(c, '\u{FEFF}' | '\u{200B}' | '\u{200C}' | '\u{200D}')
        })
        .collect()
}

/// Remove one trailing comma before the final closing bracket, if present
fn strip_trailing_comma(text: &str) -> Option<String> {
    let trimmed = text.trim_end();
    let without_bracket = trimmed.strip_suffix(']')?;
    let inner = without_bracket.trim_end();
    let without_comma = inner.strip_suffix(',')?;
    Some(format!("{}]", without_comma))
}

/// Repair raw generator text and parse it as a JSON array
///
/// Returns `None` when the text is unsalvageable; the caller owns the
/// fallback policy.
pub fn repair_and_parse(raw: &str) -> Option<Vec<serde_json::Value>> {
    let mut text = strip_code_fences(raw);
    text = ascii_fold(&text);
    text = strip_noise(&text);
    let mut text = text.trim().to_string();

    if !text.starts_with('[') {
        text = format!("[{}]", text);
    }

    let entries = match parse_array(&text) {
        Some(entries) => Some(entries),
        None => {
            let retry = strip_trailing_comma(&text)?;
            debug!("repair_and_parse: retrying after trailing-comma strip");
            parse_array(&retry)
        }
    }?;

    // An empty sequence is as useless as an unparseable one; a deck needs
    // at least one entry to build from.
    if entries.is_empty() { None } else { Some(entries) }
}

fn parse_array(text: &str) -> Option<Vec<serde_json::Value>> {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(serde_json::Value::Array(entries)) => Some(entries),
        Ok(_) => {
            debug!("parse_array: parsed value is not a sequence");
            None
        }
        Err(e) => {
            debug!(error = %e, "parse_array: parse failed");
            None
        }
    }
}
