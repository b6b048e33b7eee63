use serde::Serialize;
use unicode_width::UnicodeWidthStr;

/// Terminal columns taken by `s`.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Compute the max display width of `values`, with a minimum of `min`.
pub fn max_width<'a>(values: impl Iterator<Item = &'a str>, min: usize) -> usize {
    values.map(display_width).max().unwrap_or(min).max(min)
}

/// Left-align `s` in a column of `width` display columns. `{:<w$}` counts
/// chars, which misaligns wide or combining characters.
pub fn pad_right(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(display_width(s));
    format!("{s}{}", " ".repeat(pad))
}

/// Print a horizontal separator of box-drawing chars.
pub fn separator(width: usize) -> String {
    "\u{2500}".repeat(width)
}

/// Serialize to pretty JSON and print to stdout.
pub fn print_json_stdout(value: &impl Serialize) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Keep the first `top` items; 0 keeps everything.
pub fn apply_top<T>(items: &mut Vec<T>, top: usize) {
    if top > 0 {
        items.truncate(top);
    }
}

#[cfg(test)]
#[path = "report_helpers_test.rs"]
mod tests;
