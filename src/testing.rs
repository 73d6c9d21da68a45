//! Shared test fixtures

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::schema::{FitMessage, MessageRecord, SessionMessage};

pub(crate) fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 2, h, m, s).unwrap()
}

pub(crate) fn session_record(
    index: i64,
    sport: &str,
    sub_sport: &str,
    start: DateTime<Utc>,
    timer: f64,
) -> MessageRecord {
    MessageRecord::new("session")
        .with("message_index", index)
        .with("timestamp", start + Duration::seconds(timer as i64))
        .with("start_time", start)
        .with("total_elapsed_time", timer)
        .with("total_timer_time", timer)
        .with("sport", sport)
        .with("sub_sport", sub_sport)
}

pub(crate) fn session(sport: &str, sub_sport: &str) -> SessionMessage {
    let record = session_record(0, sport, sub_sport, at(9, 0, 0), 60.0);
    SessionMessage::from_fields(&record.fields).unwrap()
}

pub(crate) fn record_at(timestamp: DateTime<Utc>) -> MessageRecord {
    MessageRecord::new("record").with("timestamp", timestamp)
}

pub(crate) fn lap_at(index: i64, timestamp: DateTime<Utc>) -> MessageRecord {
    MessageRecord::new("lap")
        .with("message_index", index)
        .with("timestamp", timestamp)
}
