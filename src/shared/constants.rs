/// Minimum report text length in characters, after trimming
pub const MIN_REPORT_TEXT_CHARS: usize = 5;

/// Maximum report text length in characters, after trimming
pub const MAX_REPORT_TEXT_CHARS: usize = 150;

/// Source tag for reports submitted through the UI
pub const DEFAULT_REPORT_SOURCE: &str = "real";

/// Column order of the CSV export
pub const EXPORT_COLUMNS: [&str; 9] = [
    "id",
    "text",
    "latitude",
    "longitude",
    "timestamp",
    "category",
    "confidence",
    "source",
    "is_corrected",
];
