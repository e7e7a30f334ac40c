//! Human-readable file sizes for image attachments.

/// Decimal places used when no precision is configured.
pub const DEFAULT_FILE_SIZE_PRECISION: u8 = 2;

const UNITS: [&str; 9] = ["Bytes", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];
const STEP: u64 = 1000;

/// Format a byte count using decimal (base 1000) units.
///
/// The value is rounded to `precision` decimal places and trailing zeros are
/// dropped, so `1500` renders as `1.5 KB` rather than `1.50 KB`.
///
/// # Examples
/// ```
/// use inventory_backend::domain::format_file_size;
///
/// assert_eq!(format_file_size(0, 2), "0 Bytes");
/// assert_eq!(format_file_size(1500, 2), "1.5 KB");
/// assert_eq!(format_file_size(2_345_678, 2), "2.35 MB");
/// ```
pub fn format_file_size(bytes: u64, precision: u8) -> String {
    if bytes == 0 {
        return format!("0 {}", UNITS[0]);
    }

    let mut index = 0_usize;
    let mut scaled = bytes;
    while scaled >= STEP && index < UNITS.len() - 1 {
        scaled /= STEP;
        index += 1;
    }

    let divisor = (STEP as f64).powi(index as i32);
    let value = bytes as f64 / divisor;
    let rendered = format!("{value:.prec$}", prec = usize::from(precision));
    format!("{} {}", trim_fraction(&rendered), UNITS[index])
}

fn trim_fraction(rendered: &str) -> &str {
    if rendered.contains('.') {
        rendered.trim_end_matches('0').trim_end_matches('.')
    } else {
        rendered
    }
}
