#![forbid(unsafe_code)]

//! Number formatting for counter displays.

/// Targets at or above this value display with thousands separators.
pub const GROUPING_THRESHOLD: i64 = 1000;

/// Format `value` with a `,` every three digits (`2500` → `"2,500"`).
#[must_use]
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Display text for a counter showing `value` on its way to `target`.
///
/// Grouping depends on the target, not the current value, so a counter
/// climbing to 2,500 shows `"46"` and later `"1,012"`.
#[must_use]
pub fn counter_text(value: i64, target: i64) -> String {
    if target >= GROUPING_THRESHOLD {
        group_thousands(value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_every_three_digits() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(2500), "2,500");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
        assert_eq!(group_thousands(-45_000), "-45,000");
        assert_eq!(group_thousands(i64::MIN), "-9,223,372,036,854,775,808");
    }

    #[test]
    fn grouping_follows_target() {
        assert_eq!(counter_text(46, 2500), "46");
        assert_eq!(counter_text(1012, 2500), "1,012");
        assert_eq!(counter_text(999, 999), "999");
        assert_eq!(counter_text(0, 0), "0");
    }
}
