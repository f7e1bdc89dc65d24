//! Collapses the 3-hour forecast feed into one entry per calendar day.

use chrono::Weekday;

use crate::model::{DailyForecastEntry, ForecastSample, IconKind};

pub const MAX_DAYS: usize = 7;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Pick the first sample of each calendar date, up to [`MAX_DAYS`] days.
///
/// The first entry is always labeled "Today"; the rest are labeled by
/// counting forward from `today`. An empty feed yields no entries.
pub fn normalize(feed: &[ForecastSample], today: Weekday) -> Vec<DailyForecastEntry> {
    let today_idx = today.num_days_from_sunday() as usize;
    let mut days = Vec::with_capacity(MAX_DAYS);
    let mut last_date: Option<&str> = None;

    for sample in feed {
        if days.len() == MAX_DAYS {
            break;
        }

        let date = sample.calendar_date();
        if last_date == Some(date) {
            continue;
        }

        let day_label = match days.len() {
            0 => "Today".to_string(),
            n => WEEKDAYS[(today_idx + n) % 7].to_string(),
        };

        days.push(DailyForecastEntry {
            day_label,
            temperature_c: round_half_up(sample.temperature_c),
            condition: sample.condition.clone(),
            icon: IconKind::from_condition(&sample.condition),
            tooltip: sample.description.clone(),
        });
        last_date = Some(date);
    }

    days
}

/// Nearest whole number, halves rounding up (-2.5 -> -2).
pub(crate) fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}
