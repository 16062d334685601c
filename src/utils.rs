// src/utils.rs
use anyhow::{Context, Result};

/// Split a `;`-separated tag list as found in CSV imports.
///
/// Blank entries are dropped; casing is kept so the original spelling is
/// what gets stored and displayed.
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Empty or whitespace-only text becomes `None`
pub fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse an optional graduation year column
pub fn parse_optional_year(raw: &str) -> Result<Option<i32>> {
    non_blank(raw)
        .map(|year| {
            year.parse::<i32>()
                .with_context(|| format!("Invalid graduation year: {}", year))
        })
        .transpose()
}

/// Pad or cut `text` to exactly `width` characters for table output
pub fn fit_column(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count > width {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    } else {
        format!("{}{}", text, " ".repeat(width - count))
    }
}
