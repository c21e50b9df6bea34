//! Pure display helpers for listing entries.

use jiff::Timestamp;
use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;
use strum::{AsRefStr, Display, IntoStaticStr};

/// Units used by [`format_size`], each 1024 times the previous.
const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Layout used by [`format_date`].
const DATE_FORMAT: &str = "%Y/%m/%d %H:%M";

/// Formats a byte count with binary units and at most two decimals.
///
/// ```
/// use bucketview_object::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(1536), "1.5 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut unit = 0;
    let mut scaled = bytes as f64;
    while scaled >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }

    let fixed = format!("{scaled:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", SIZE_UNITS[unit])
}

/// Formats an ISO 8601 timestamp as `YYYY/MM/DD HH:MM` in UTC.
///
/// Inputs that do not parse are returned unchanged.
pub fn format_date(value: &str) -> String {
    if let Ok(timestamp) = value.parse::<Timestamp>() {
        return timestamp
            .to_zoned(TimeZone::UTC)
            .strftime(DATE_FORMAT)
            .to_string();
    }
    if let Ok(datetime) = value.parse::<DateTime>() {
        return datetime.strftime(DATE_FORMAT).to_string();
    }
    if let Ok(date) = value.parse::<Date>() {
        return date.at(0, 0, 0, 0).strftime(DATE_FORMAT).to_string();
    }

    value.to_string()
}

/// Icon category of an entry, chosen from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum FileIcon {
    Folder,
    Html,
    Stylesheet,
    Script,
    Image,
    Pdf,
    Text,
    Generic,
}

impl FileIcon {
    /// Returns the glyph shown next to the entry.
    pub const fn glyph(&self) -> &'static str {
        match self {
            Self::Folder => "📁",
            Self::Html | Self::Generic => "📄",
            Self::Stylesheet => "🎨",
            Self::Script => "⚡",
            Self::Image => "🖼️",
            Self::Pdf => "📋",
            Self::Text => "📝",
        }
    }
}

/// Picks the icon category for a key or file name.
///
/// A trailing `/` always yields [`FileIcon::Folder`]; otherwise the
/// extension decides, compared case-insensitively.
pub fn icon_for(name: &str) -> FileIcon {
    if name.ends_with('/') {
        return FileIcon::Folder;
    }

    let file_name = name.rsplit('/').next().unwrap_or(name);
    let Some((_, extension)) = file_name.rsplit_once('.') else {
        return FileIcon::Generic;
    };

    match extension.to_ascii_lowercase().as_str() {
        "html" | "htm" => FileIcon::Html,
        "css" | "scss" => FileIcon::Stylesheet,
        "js" | "mjs" | "ts" => FileIcon::Script,
        "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" | "ico" => FileIcon::Image,
        "pdf" => FileIcon::Pdf,
        "txt" | "md" | "log" => FileIcon::Text,
        _ => FileIcon::Generic,
    }
}
