use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};

use crate::types::{PerformanceRecord, UserPreferences};

const ACTIVITY_WINDOW_DAYS: i64 = 30;
const DEFAULT_HOUR: u32 = 9;

/// Pick the next reminder time: the user's peak activity hour over the last
/// 30 days, pushed out by the preferred frequency interval. With no recent
/// activity the reminder lands at the default morning hour.
pub fn next_reminder_time(
    history: &[PerformanceRecord],
    preferences: &UserPreferences,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let cutoff = now - Duration::days(ACTIVITY_WINDOW_DAYS);

    let mut hour_frequency = [0u32; 24];
    for record in history {
        let Some(ts) = Utc.timestamp_millis_opt(record.created_at).single() else {
            continue;
        };
        if ts >= cutoff && ts <= now {
            hour_frequency[ts.hour() as usize] += 1;
        }
    }

    let peak_hour = hour_frequency
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .max_by_key(|(_, count)| **count)
        .map(|(hour, _)| hour as u32)
        .unwrap_or(DEFAULT_HOUR);

    let next_day = now + Duration::days(preferences.reminder_frequency.interval_days());
    next_day
        .with_hour(peak_hour)
        .and_then(|t| t.with_minute(0))
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(next_day)
}
