//! `list` subcommand.

use anyhow::Result;

use crate::ops::Context;

/// Longest a `comment` column entry may be before it is truncated with an
/// ellipsis.
const COMMENT_WIDTH: usize = 40;

/// Print every installed package in a columnar layout.
///
/// # Errors
///
/// Returns an error if the installed-store file exists but cannot be read.
pub fn list(ctx: &Context) -> Result<()> {
    let mut records = hostpkg_core::store::read_all()?;
    if records.is_empty() {
        ctx.reporter.info("no packages installed");
        return Ok(());
    }

    records.sort_by(|a, b| a.name.cmp(&b.name));

    let name_width = records.iter().map(|r| r.name.len()).max().unwrap_or(4).max(4);
    let version_width = records.iter().map(|r| r.version.len()).max().unwrap_or(7).max(7);

    println!("{:<name_width$}  {:<version_width$}  COMMENT", "NAME", "VERSION");
    for record in &records {
        println!(
            "{:<name_width$}  {:<version_width$}  {}",
            record.name,
            record.version,
            truncate(&record.comment, COMMENT_WIDTH)
        );
    }

    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(width.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_leaves_short_text_alone() {
        assert_eq!(truncate("short", 40), "short");
    }

    #[test]
    fn truncate_adds_ellipsis_past_width() {
        let long = "a".repeat(50);
        let truncated = truncate(&long, 40);
        assert_eq!(truncated.chars().count(), 40);
        assert!(truncated.ends_with('…'));
    }
}
