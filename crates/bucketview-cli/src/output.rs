//! Terminal rendering of listings.

use std::fmt::Write;

use bucketview_object::{Entry, format_date, format_size, icon_for};
use bucketview_store::{Breadcrumb, BrowserState};

/// Renders the location line, e.g. `/ pic / 2024`.
pub fn render_location(breadcrumbs: &[Breadcrumb]) -> String {
    let mut line = String::from("/");
    for crumb in breadcrumbs {
        let _ = write!(line, " {} /", crumb.name);
    }
    line
}

/// Renders one listing row: icon, name, size and modification date.
pub fn render_entry(entry: &Entry) -> String {
    let size = if entry.is_folder() {
        "-".to_string()
    } else {
        format_size(entry.size)
    };

    format!(
        "{} {:<40} {:>10}  {}",
        icon_for(&entry.key).glyph(),
        entry.name(),
        size,
        format_date(&entry.last_modified)
    )
}

/// Renders the whole listing shown by `ls`.
pub fn render_listing(state: &BrowserState) -> String {
    let entries = state.filtered_entries();

    let mut out = render_location(&state.breadcrumbs());
    out.push('\n');
    for entry in &entries {
        out.push_str(&render_entry(entry));
        out.push('\n');
    }

    let _ = write!(
        out,
        "{} of {} items, {}",
        entries.len(),
        state.total_count(),
        state.formatted_total_size()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> BrowserState {
        BrowserState {
            entries: vec![
                Entry::folder("pic/2024/", "2024-01-14T15:00:00Z", "u"),
                Entry::file("pic/logo.png", "2024-01-14T15:20:00Z", 15432, "e", "u"),
            ],
            current_prefix: "pic/".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_render_location() {
        assert_eq!(render_location(&[]), "/");
        assert_eq!(render_location(&state().breadcrumbs()), "/ pic /");
    }

    #[test]
    fn test_render_entry() {
        let row = render_entry(&state().entries[1]);
        assert!(row.starts_with("🖼️ logo.png"), "{row}");
        assert!(row.contains("15.07 KB"), "{row}");
        assert!(row.ends_with("2024/01/14 15:20"), "{row}");

        let row = render_entry(&state().entries[0]);
        assert!(row.starts_with("📁 2024/"), "{row}");
    }

    #[test]
    fn test_render_listing_applies_search() {
        let mut state = state();
        state.search_query = "LOGO".into();

        let out = render_listing(&state);
        assert!(out.contains("logo.png"));
        assert!(!out.contains("2024/ "));
        assert!(out.ends_with("1 of 2 items, 15.07 KB"), "{out}");
    }
}
