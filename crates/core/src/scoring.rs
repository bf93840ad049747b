//! Scoring module - line clear points
//!
//! A sweep is scored once, by the number of rows it removed. The standard
//! table covers 0-4 rows; the wide early arena can clear more at once, and
//! those sweeps score a flat amount per row.

use crate::types::{LINE_SCORES, OVERFLOW_LINE_SCORE};

/// Points awarded for clearing `rows` rows in a single sweep
///
/// | Rows | Points |
/// |------|--------|
/// | 0 | 0 |
/// | 1 | 100 |
/// | 2 | 300 |
/// | 3 | 500 |
/// | 4 | 800 |
/// | n > 4 | n × 200 |
pub fn line_clear_score(rows: u32) -> u32 {
    match LINE_SCORES.get(rows as usize) {
        Some(&points) => points,
        None => rows.saturating_mul(OVERFLOW_LINE_SCORE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_values() {
        assert_eq!(line_clear_score(0), 0);
        assert_eq!(line_clear_score(1), 100);
        assert_eq!(line_clear_score(2), 300);
        assert_eq!(line_clear_score(3), 500);
        assert_eq!(line_clear_score(4), 800);
    }

    #[test]
    fn test_overflow_rows() {
        assert_eq!(line_clear_score(5), 1000);
        assert_eq!(line_clear_score(6), 1200);
        assert_eq!(line_clear_score(20), 4000);
    }
}
