/// Revenue and cost multiplier per calendar month, January first.
pub const SEASONALITY: [f64; 12] = [
    0.90, // January
    0.95, // February
    1.10, // March
    1.00, // April
    1.00, // May
    1.05, // June
    0.95, // July
    0.90, // August
    1.10, // September
    1.05, // October
    1.15, // November
    1.20, // December
];

/// Calendar month (1-12) of a 1-based projection month; month 13 is January
/// again.
pub fn calendar_month(month: u32) -> u32 {
    (month.saturating_sub(1) % 12) + 1
}

pub fn seasonality_factor(month: u32) -> f64 {
    SEASONALITY[(calendar_month(month) - 1) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_values() {
        assert_eq!(seasonality_factor(1), 0.90);
        assert_eq!(seasonality_factor(3), 1.10);
        assert_eq!(seasonality_factor(11), 1.15);
        assert_eq!(seasonality_factor(12), 1.20);
    }

    #[test]
    fn test_wraps_after_a_year() {
        assert_eq!(calendar_month(13), 1);
        assert_eq!(calendar_month(24), 12);
        assert_eq!(calendar_month(25), 1);
        assert_eq!(seasonality_factor(13), seasonality_factor(1));
        assert_eq!(seasonality_factor(18), seasonality_factor(6));
    }
}
