//! Screenshot file naming.
//!
//! Screenshots are named after the moment of capture so they sort
//! chronologically in a file browser.  The name is the ISO-8601 UTC timestamp
//! with `:` and `.` replaced by `-` (neither is allowed in Windows file
//! names), e.g. `screenshot-2026-08-25T14-03-22-123Z.png`.

use chrono::{DateTime, SecondsFormat, Utc};

/// Folder created under the user's Pictures directory when no custom
/// screenshot folder is configured.
pub const DEFAULT_SCREENSHOT_FOLDER: &str = "RN04 Screenshots";

/// Builds the file name for a screenshot taken at `now`.
pub fn file_name(now: DateTime<Utc>) -> String {
    let timestamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("screenshot-{timestamp}.png")
}
