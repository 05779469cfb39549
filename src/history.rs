//! Summaries of the roll history for display.

use chrono::{DateTime, Local, TimeZone};

use crate::roll::RollResult;

const MINUTE_MILLIS: i64 = 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryStats {
    pub total: usize,
    /// Rolls made on the same local calendar day as `now`.
    pub today: usize,
}

fn local_time(timestamp: i64) -> Option<DateTime<Local>> {
    Local.timestamp_millis_opt(timestamp).single()
}

pub fn stats(history: &[RollResult], now: DateTime<Local>) -> HistoryStats {
    let today = now.date_naive();
    HistoryStats {
        total: history.len(),
        today: history
            .iter()
            .filter_map(|roll| local_time(roll.timestamp))
            .filter(|time| time.date_naive() == today)
            .count(),
    }
}

/// "Just now", "5m ago", "3h ago", or the local date for anything a day or older.
pub fn format_timestamp(timestamp: i64, now: DateTime<Local>) -> String {
    let minutes = now
        .timestamp_millis()
        .saturating_sub(timestamp)
        .div_euclid(MINUTE_MILLIS);
    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 24 * 60 {
        format!("{}h ago", minutes / 60)
    } else {
        match local_time(timestamp) {
            Some(time) => time.format("%Y-%m-%d").to_string(),
            None => timestamp.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::RollOutcome;

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().unwrap()
    }

    fn roll_at(timestamp: i64) -> RollResult {
        RollResult {
            id: timestamp.to_string(),
            dice_id: "d6".to_string(),
            dice_name: "D6".to_string(),
            result: RollOutcome::Number(3),
            timestamp,
            game_id: None,
        }
    }

    #[test]
    fn formats_relative_timestamps() {
        let now = noon();
        let at = |minutes_ago: i64| now.timestamp_millis() - minutes_ago * MINUTE_MILLIS;
        let cases = [
            (at(0), "Just now"),
            (now.timestamp_millis() - 59_000, "Just now"),
            (at(1), "1m ago"),
            (at(59), "59m ago"),
            (at(60), "1h ago"),
            (at(23 * 60 + 59), "23h ago"),
            (at(3 * 24 * 60), "2024-04-28"),
            // rolls from the future count as fresh
            (i64::MAX, "Just now"),
        ];

        for (timestamp, expected) in cases {
            assert_eq!(expected, format_timestamp(timestamp, now));
        }
    }

    #[test]
    fn out_of_range_timestamps_do_not_panic() {
        let now = noon();
        assert_eq!(i64::MIN.to_string(), format_timestamp(i64::MIN, now));
        let history = vec![roll_at(i64::MIN), roll_at(i64::MAX)];
        assert_eq!(HistoryStats { total: 2, today: 0 }, stats(&history, now));
    }

    #[test]
    fn counts_todays_rolls() {
        let now = noon();
        let hour = 60 * MINUTE_MILLIS;
        let history = vec![
            roll_at(now.timestamp_millis()),
            roll_at(now.timestamp_millis() - hour),
            roll_at(now.timestamp_millis() - 11 * hour),
            roll_at(now.timestamp_millis() - 13 * hour),
            roll_at(now.timestamp_millis() - 48 * hour),
        ];
        assert_eq!(HistoryStats { total: 5, today: 3 }, stats(&history, now));
        assert_eq!(HistoryStats::default(), stats(&[], now));
    }
}
