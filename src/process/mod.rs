pub mod date;
pub mod extract;
pub mod merge;
pub mod table;

pub use table::Table;

/// Substring that identifies the per-unit results table on a detail page.
pub const TABLE_MARKER: &str = "機種";

/// Column holding the canonical `YYYY/MM/DD` date of each row.
pub const DATE_COLUMN: &str = "日付";

/// Column holding the unit number; (date, unit) is the dedup key.
pub const UNIT_COLUMN: &str = "台番号";

/// Returned by date inference when no pattern matches the page title.
pub const DATE_UNKNOWN: &str = "日付不明";

/// Any column whose name contains one of these is coerced to an integer
/// before the sheet write, so the store does not treat it as text.
pub const NUMERIC_COLUMN_MARKERS: &[&str] = &["台番号", "総差枚", "差枚", "G数", "回転数"];
