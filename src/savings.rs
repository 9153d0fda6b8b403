//! Estimated manual work saved by applying the suggestions.
//!
//! The figure is deliberately coarse: each candidate kind is worth a fixed
//! number of minutes, and the total is reported in hours.

/// Minutes of manual work per candidate.
pub mod weights {
    pub const COMPONENT: f64 = 0.5;
    pub const RENAME: f64 = 0.25;
    pub const LAYOUT: f64 = 0.75;
}

pub const MINUTES_PER_HOUR: f64 = 60.0;

/// Unit suffix used in the savings string.
pub const HOURS_UNIT: &str = "saat";

/// Estimate hours saved from candidate counts.
pub fn estimate_hours(components: usize, renames: usize, layouts: usize) -> f64 {
    let minutes = components as f64 * weights::COMPONENT
        + renames as f64 * weights::RENAME
        + layouts as f64 * weights::LAYOUT;
    minutes / MINUTES_PER_HOUR
}

/// Render hours as the summary string, e.g. `"< 1 saat"` or `"2.5 saat"`.
pub fn format_savings(hours: f64) -> String {
    if hours < 1.0 {
        format!("< 1 {}", HOURS_UNIT)
    } else {
        format!("{:.1} {}", hours, HOURS_UNIT)
    }
}

/// Estimate and format in one step.
pub fn estimate(components: usize, renames: usize, layouts: usize) -> String {
    format_savings(estimate_hours(components, renames, layouts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_under_one_hour() {
        assert_eq!(estimate(0, 0, 0), "< 1 saat");
        // 239 renames = 59.75 minutes
        assert_eq!(estimate(0, 239, 0), "< 1 saat");
    }

    #[test]
    fn test_whole_and_fractional_hours() {
        // 240 renames = 60 minutes
        assert_eq!(estimate(0, 240, 0), "1.0 saat");
        // 120 components (60) + 120 layouts (90) = 150 minutes
        assert_eq!(estimate(120, 0, 120), "2.5 saat");
    }

    #[test]
    fn test_weights() {
        let hours = estimate_hours(2, 4, 4);
        assert!((hours - (1.0 + 1.0 + 3.0) / 60.0).abs() < f64::EPSILON);
    }
}
