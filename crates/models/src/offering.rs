use crate::error::{CatalogError, EnrollmentError, WindowClosed};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Half-open period `[start, end)` during which students may enroll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnrollmentWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl EnrollmentWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, CatalogError> {
        if start >= end {
            return Err(CatalogError::InvalidEnrollmentWindow);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Errors with the side of the window `now` falls on when it is outside
    pub fn check(&self, now: DateTime<Utc>) -> Result<(), WindowClosed> {
        if now < self.start {
            Err(WindowClosed::NotStarted)
        } else if now >= self.end {
            Err(WindowClosed::Ended)
        } else {
            Ok(())
        }
    }

    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.check(now).is_ok()
    }

    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        now >= self.end
    }
}

/// Seat limit of an offering; a capacity of 0 means unlimited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capacity {
    pub capacity: i32,
    pub current_enrollment: i32,
}

impl Capacity {
    pub fn new(capacity: i32, current_enrollment: i32) -> Result<Self, CatalogError> {
        if capacity < 0 {
            return Err(CatalogError::NegativeCapacity(capacity));
        }
        Ok(Self {
            capacity,
            current_enrollment,
        })
    }

    pub fn is_unlimited(&self) -> bool {
        self.capacity == 0
    }

    pub fn is_full(&self) -> bool {
        !self.is_unlimited() && self.current_enrollment >= self.capacity
    }

    /// Seats left, `None` when unlimited
    pub fn remaining(&self) -> Option<i32> {
        (!self.is_unlimited()).then(|| (self.capacity - self.current_enrollment).max(0))
    }

    pub fn check(&self) -> Result<(), EnrollmentError> {
        if self.is_full() {
            return Err(EnrollmentError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn window() -> EnrollmentWindow {
        let start = Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap();
        EnrollmentWindow::new(start, start + Duration::days(30)).unwrap()
    }

    #[test]
    fn test_window_must_be_ordered() {
        let start = Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap();
        assert_eq!(
            EnrollmentWindow::new(start, start),
            Err(CatalogError::InvalidEnrollmentWindow)
        );
        assert!(EnrollmentWindow::new(start + Duration::days(1), start).is_err());
    }

    #[test]
    fn test_window_is_half_open() {
        let window = window();

        assert_eq!(
            window.check(window.start() - Duration::seconds(1)),
            Err(WindowClosed::NotStarted)
        );
        assert_eq!(window.check(window.start()), Ok(()));
        assert_eq!(window.check(window.end() - Duration::seconds(1)), Ok(()));
        assert_eq!(window.check(window.end()), Err(WindowClosed::Ended));
        assert!(window.has_ended(window.end()));
    }

    #[test]
    fn test_capacity() {
        let full = Capacity::new(30, 30).unwrap();
        assert!(full.is_full());
        assert_eq!(
            full.check(),
            Err(EnrollmentError::CapacityExceeded { capacity: 30 })
        );
        assert_eq!(full.remaining(), Some(0));

        let open = Capacity::new(30, 29).unwrap();
        assert!(open.check().is_ok());
        assert_eq!(open.remaining(), Some(1));
    }

    #[test]
    fn test_zero_capacity_is_unlimited() {
        let unlimited = Capacity::new(0, 500).unwrap();
        assert!(!unlimited.is_full());
        assert_eq!(unlimited.remaining(), None);
        assert!(Capacity::new(-1, 0).is_err());
    }
}
