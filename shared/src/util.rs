use chrono::{FixedOffset, NaiveDate, Offset, Utc};

/// Current UTC timestamp (millis)
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Fixed offset from whole hours, falling back to UTC when out of range
pub fn fixed_offset(offset_hours: i32) -> FixedOffset {
    FixedOffset::east_opt(offset_hours * 3600).unwrap_or(Utc.fix())
}

/// Today's calendar date at the association's local offset.
///
/// "Current month" for the ledger is always this date, never the host clock.
pub fn local_today(offset_hours: i32) -> NaiveDate {
    Utc::now()
        .with_timezone(&fixed_offset(offset_hours))
        .date_naive()
}
