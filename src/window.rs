//! Session time windows
//!
//! Multisport files share one record pool and one lap pool across all their
//! sessions. Each sub-activity claims the items whose timestamp falls inside
//! `[start_time, start_time + total_timer_time]`, both ends inclusive.

use chrono::{DateTime, TimeDelta, Utc};

use crate::schema::{LapMessage, RecordMessage, SessionMessage};

/// Messages that can be placed on the session timeline
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

impl Timestamped for RecordMessage {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Timestamped for LapMessage {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Closed time interval owned by one session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SessionWindow {
    /// Build a window from a start instant and a timer duration in seconds.
    ///
    /// Returns `None` for an absent start, or a timer that is absent,
    /// non-finite, negative or pushes the end out of the timestamp range.
    pub fn new(start: Option<DateTime<Utc>>, timer_secs: Option<f64>) -> Option<Self> {
        let start = start?;
        let timer_secs = timer_secs.filter(|t| t.is_finite() && *t >= 0.0)?;

        let millis = (timer_secs * 1000.0).round();
        if millis > i64::MAX as f64 {
            return None;
        }
        let duration = TimeDelta::try_milliseconds(millis as i64)?;
        let end = start.checked_add_signed(duration)?;

        Some(Self { start, end })
    }

    pub fn for_session(session: &SessionMessage) -> Option<Self> {
        Self::new(Some(session.start_time), Some(session.total_timer_time))
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }

    /// Items inside the window, in stream order
    pub fn select<'a, T: Timestamped>(&self, items: &'a [T]) -> Vec<&'a T> {
        items
            .iter()
            .filter(|item| self.contains(item.timestamp()))
            .collect()
    }
}

/// Records and laps owned by `session`; both empty when its window is invalid
pub fn filter<'a>(
    session: &SessionMessage,
    records: &'a [RecordMessage],
    laps: &'a [LapMessage],
) -> (Vec<&'a RecordMessage>, Vec<&'a LapMessage>) {
    match SessionWindow::for_session(session) {
        Some(window) => (window.select(records), window.select(laps)),
        None => (Vec::new(), Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FitMessage;
    use crate::testing::{at, lap_at, record_at, session};

    fn records(times: &[DateTime<Utc>]) -> Vec<RecordMessage> {
        times
            .iter()
            .map(|t| RecordMessage::from_fields(&record_at(*t).fields).unwrap())
            .collect()
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let window = SessionWindow::new(Some(at(9, 0, 0)), Some(60.0)).unwrap();
        assert!(window.contains(at(9, 0, 0)));
        assert!(window.contains(at(9, 1, 0)));
        assert!(!window.contains(at(8, 59, 59)));
        assert!(!window.contains(at(9, 1, 1)));
    }

    #[test]
    fn test_fractional_timer() {
        let window = SessionWindow::new(Some(at(9, 0, 0)), Some(1.5)).unwrap();
        assert_eq!(window.end - window.start, TimeDelta::milliseconds(1500));
    }

    #[test]
    fn test_invalid_windows() {
        assert_eq!(SessionWindow::new(None, Some(60.0)), None);
        assert_eq!(SessionWindow::new(Some(at(9, 0, 0)), None), None);
        assert_eq!(SessionWindow::new(Some(at(9, 0, 0)), Some(f64::NAN)), None);
        assert_eq!(SessionWindow::new(Some(at(9, 0, 0)), Some(f64::INFINITY)), None);
        assert_eq!(SessionWindow::new(Some(at(9, 0, 0)), Some(-1.0)), None);
        assert_eq!(SessionWindow::new(Some(at(9, 0, 0)), Some(1e300)), None);
        assert_eq!(SessionWindow::new(Some(DateTime::<Utc>::MAX_UTC), Some(10.0)), None);
    }

    #[test]
    fn test_filter_keeps_order_and_window() {
        let session = session("running", "generic");
        let records = records(&[
            at(8, 59, 0),
            at(9, 0, 0),
            at(9, 0, 30),
            at(9, 1, 0),
            at(9, 2, 0),
        ]);
        let laps = vec![
            LapMessage::from_fields(&lap_at(0, at(9, 1, 0)).fields).unwrap(),
            LapMessage::from_fields(&lap_at(1, at(9, 5, 0)).fields).unwrap(),
        ];

        let (kept_records, kept_laps) = filter(&session, &records, &laps);
        let times: Vec<_> = kept_records.iter().map(|r| r.timestamp).collect();
        assert_eq!(times, vec![at(9, 0, 0), at(9, 0, 30), at(9, 1, 0)]);
        assert_eq!(kept_laps.len(), 1);
        assert_eq!(kept_laps[0].message_index, 0);
    }

    #[test]
    fn test_filter_with_invalid_timer_is_empty() {
        let mut session = session("running", "generic");
        session.total_timer_time = f64::NAN;
        let records = records(&[at(9, 0, 0)]);

        let (kept_records, kept_laps) = filter(&session, &records, &[]);
        assert!(kept_records.is_empty());
        assert!(kept_laps.is_empty());
    }
}
