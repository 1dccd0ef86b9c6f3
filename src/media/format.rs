// Display formatting for probed media fields.

const NOT_AVAILABLE: &str = "N/A";

/// Seconds to zero-padded `HH:MM:SS`; missing or nonsensical input shows
/// `N/A`.
pub fn format_duration(seconds: Option<f64>) -> String {
    let Some(seconds) = seconds else {
        return NOT_AVAILABLE.to_string();
    };
    if !seconds.is_finite() || seconds < 0.0 {
        return NOT_AVAILABLE.to_string();
    }
    let total = seconds as u64;
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

/// Bytes to a `1.00 KB`-style string. The unit bucket follows the value's bit
/// length in steps of ten bits, capped at GB.
pub fn format_size(size_bytes: u64) -> String {
    if size_bytes == 0 {
        return "0B".to_string();
    }
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let bit_length = (64 - size_bytes.leading_zeros()) as usize;
    let bucket = ((bit_length - 1) / 10).min(UNITS.len() - 1);
    let scaled = size_bytes as f64 / 1024_f64.powi(bucket as i32);
    format!("{:.2} {}", scaled, UNITS[bucket])
}

/// Bits per second to kbps with one decimal, switching to Mbps with two
/// decimals at 1000 kbps. Missing or negative input shows `N/A`.
pub fn format_bitrate(bits_per_second: Option<f64>) -> String {
    let Some(value) = bits_per_second else {
        return NOT_AVAILABLE.to_string();
    };
    if !value.is_finite() || value < 0.0 {
        return NOT_AVAILABLE.to_string();
    }
    let kbps = value / 1000.0;
    if kbps >= 1000.0 {
        format!("{:.2} Mbps", kbps / 1000.0)
    } else {
        format!("{kbps:.1} kbps")
    }
}

pub fn format_resolution(width: Option<u32>, height: Option<u32>) -> String {
    match (width, height) {
        (Some(width), Some(height)) => format!("{width}x{height}"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Milliseconds to `HH:MM:SS.mmm`, the timestamp shape FFmpeg accepts for
/// `-ss`/`-to`.
pub fn ms_to_time_str(milliseconds: u64) -> String {
    let total_seconds = milliseconds / 1000;
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        total_seconds / 3600,
        (total_seconds % 3600) / 60,
        total_seconds % 60,
        milliseconds % 1000
    )
}
