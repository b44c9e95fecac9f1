// ============================================================
// Layer 4 — Temporal Feature Deriver
// ============================================================
// Pure functions of a timestamp.
//
//   day_of_week  ← CREATED_DATE_TIME   ("Monday" .. "Sunday")
//   hour_of_day  ← CREATED_DATE_TIME   (0 .. 23)
//   month        ← COMPLETED_DATE_TIME (1 .. 12)
//
// Month intentionally comes from the completion time: "when did it
// start" vs "when did it finish".

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

/// Full English day name, independent of locale
pub fn day_name(ts: NaiveDateTime) -> &'static str {
    match ts.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn hour_of_day(ts: NaiveDateTime) -> u32 {
    ts.hour()
}

pub fn month(ts: NaiveDateTime) -> u32 {
    ts.month()
}
