//! Calendar system for simulation time
//!
//! One turn is one month. The calendar starts at year 1, month 1 and is the
//! timestamp source for every event log entry.

use serde::{Deserialize, Serialize};

/// Tracks simulation time with month granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calendar {
    year: u32,
    month: u32,
}

impl Calendar {
    pub fn new() -> Self {
        Self { year: 1, month: 1 }
    }

    /// Advance one month, rolling into the next year after month 12
    pub fn advance(&mut self) {
        self.month += 1;
        if self.month > 12 {
            self.month = 1;
            self.year += 1;
        }
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_starts_at_year_one() {
        let cal = Calendar::new();
        assert_eq!(cal.year(), 1);
        assert_eq!(cal.month(), 1);
    }

    #[test]
    fn test_calendar_advances_months() {
        let mut cal = Calendar::new();
        cal.advance();
        assert_eq!(cal.month(), 2);
        assert_eq!(cal.year(), 1);
    }

    #[test]
    fn test_calendar_rolls_into_year() {
        let mut cal = Calendar::new();
        for _ in 0..12 {
            cal.advance();
        }
        assert_eq!(cal.year(), 2);
        assert_eq!(cal.month(), 1);

        // Another full year
        for _ in 0..12 {
            cal.advance();
        }
        assert_eq!(cal.year(), 3);
        assert_eq!(cal.month(), 1);
    }
}
