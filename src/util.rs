/// Round to one decimal place for display, clamping negatives to zero
pub fn format_number(value: f64) -> f64 {
    ((value * 10.0).round() / 10.0).max(0.0)
}

/// Elapsed milliseconds as seconds with one decimal, e.g. `12.3s`
pub fn format_seconds(elapsed_ms: u64) -> String {
    format!("{:.1}s", elapsed_ms as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(66.666_666), 66.7);
        assert_eq!(format_number(12.0), 12.0);
        assert_eq!(format_number(0.04), 0.0);
        assert_eq!(format_number(99.95), 100.0);
    }

    #[test]
    fn test_format_number_clamps_negative() {
        assert_eq!(format_number(-3.2), 0.0);
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0), "0.0s");
        assert_eq!(format_seconds(1_260), "1.3s");
        assert_eq!(format_seconds(61_990), "62.0s");
    }
}
