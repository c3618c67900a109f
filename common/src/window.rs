//! # Scan Window
//!
//! The lower time bound every time-bounded check of a run shares.
//!
//! "Now" is read exactly once when the window is built. Checks never look at
//! the clock themselves, so two checks run seconds apart still agree on `since`.

use chrono::{DateTime, Duration, Utc};

use crate::error::{Result, ScanError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    pub days: u32,
    pub buffer_hours: u32,
    pub now: DateTime<Utc>,
    pub since: DateTime<Utc>,
}

impl ScanWindow {
    /// Builds the window `[now - days - buffer, now]`. Fails when the start
    /// would fall outside the representable date range.
    pub fn new(days: u32, buffer_hours: u32, now: DateTime<Utc>) -> Result<Self> {
        let span = Duration::days(i64::from(days)) + Duration::hours(i64::from(buffer_hours));
        let since = now
            .checked_sub_signed(span)
            .ok_or(ScanError::WindowOutOfRange { days, buffer_hours })?;
        Ok(Self {
            days,
            buffer_hours,
            now,
            since,
        })
    }

    pub fn from_now(days: u32, buffer_hours: u32) -> Result<Self> {
        Self::new(days, buffer_hours, Utc::now())
    }

    /// The boundary without the skew buffer, as the operator asked for it.
    pub fn requested_since(&self) -> DateTime<Utc> {
        self.since + Duration::hours(i64::from(self.buffer_hours))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn since_subtracts_days_and_buffer() {
        let window = ScanWindow::new(7, 24, noon()).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap();
        assert_eq!(window.since, expected);
        assert_eq!(
            window.requested_since(),
            Utc.with_ymd_and_hms(2024, 3, 8, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn zero_buffer_matches_requested_boundary() {
        let window = ScanWindow::new(3, 0, noon()).unwrap();
        assert_eq!(window.since, window.requested_since());
    }

    #[test]
    fn huge_look_back_is_an_error() {
        let err = ScanWindow::new(u32::MAX, 0, noon()).unwrap_err();
        assert!(matches!(
            err,
            ScanError::WindowOutOfRange { days: u32::MAX, buffer_hours: 0 }
        ));
        assert!(ScanWindow::new(0, u32::MAX, noon()).is_err());
        assert!(ScanWindow::new(36_500, 0, noon()).is_ok());
    }
}
