use crate::state::Quality;

/// Human-readable size: bytes / 1024 with one decimal, e.g. "12.3 KB"
pub fn format_size(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

/// Slider caption, e.g. "Quality: 60%"
pub fn quality_label(quality: Quality) -> String {
    format!("Quality: {}%", quality.percent())
}

/// Size change relative to the original, e.g. "-42%"
pub fn savings_label(original: u64, compressed: u64) -> Option<String> {
    if original == 0 {
        return None;
    }
    let change = (compressed as f64 - original as f64) / original as f64 * 100.0;
    Some(format!("{:+.0}%", change))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0.0 KB");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5_000_000), "4882.8 KB");
    }

    #[test]
    fn test_quality_label_rounds() {
        assert_eq!(quality_label(Quality::new(0.6)), "Quality: 60%");
        assert_eq!(quality_label(Quality::new(0.01)), "Quality: 1%");
        assert_eq!(quality_label(Quality::new(0.333)), "Quality: 33%");
        assert_eq!(quality_label(Quality::new(1.0)), "Quality: 100%");
    }

    #[test]
    fn test_savings_label() {
        assert_eq!(savings_label(1000, 400).as_deref(), Some("-60%"));
        assert_eq!(savings_label(1000, 1000).as_deref(), Some("+0%"));
        assert_eq!(savings_label(0, 10), None);
    }
}
