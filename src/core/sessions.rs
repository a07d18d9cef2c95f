use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// A trading session window in whole UTC hours. `end_hour` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSession {
    pub name: String,
    pub start_hour: u32,
    pub end_hour: u32,
}

impl MarketSession {
    pub fn new(name: &str, start_hour: u32, end_hour: u32) -> Self {
        Self {
            name: name.to_string(),
            start_hour,
            end_hour,
        }
    }

    pub fn wraps_midnight(&self) -> bool {
        self.start_hour > self.end_hour
    }

    pub fn is_open_at(&self, utc_hour: u32) -> bool {
        if self.start_hour < self.end_hour {
            utc_hour >= self.start_hour && utc_hour < self.end_hour
        } else {
            // Wraps midnight (e.g. Sydney 22:00 - 07:00)
            utc_hour >= self.start_hour || utc_hour < self.end_hour
        }
    }

    pub fn duration_hours(&self) -> u32 {
        if self.wraps_midnight() {
            24 - self.start_hour + self.end_hour
        } else {
            self.end_hour.saturating_sub(self.start_hour)
        }
    }

    /// Opening and closing wall-clock times of this session on `date` (UTC)
    /// as seen from `tz`.
    pub fn local_window(&self, tz: Tz, date: NaiveDate) -> Option<(NaiveTime, NaiveTime)> {
        let open = date.and_hms_opt(self.start_hour % 24, 0, 0)?;
        let close = date.and_hms_opt(self.end_hour % 24, 0, 0)?;
        let open = Utc.from_utc_datetime(&open).with_timezone(&tz).time();
        let close = Utc.from_utc_datetime(&close).with_timezone(&tz).time();
        Some((open, close))
    }
}

pub fn default_sessions() -> Vec<MarketSession> {
    vec![
        MarketSession::new("London", 8, 16),
        MarketSession::new("New York", 13, 21),
        MarketSession::new("Tokyo", 0, 9),
        MarketSession::new("Sydney", 22, 7),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStatus {
    pub name: String,
    pub start_hour: u32,
    pub end_hour: u32,
    pub is_open: bool,
}

pub fn session_statuses(
    sessions: &[MarketSession],
    utc_now: Option<DateTime<Utc>>,
) -> Vec<SessionStatus> {
    let hour = utc_now.unwrap_or_else(Utc::now).hour();
    sessions
        .iter()
        .map(|s| SessionStatus {
            name: s.name.clone(),
            start_hour: s.start_hour,
            end_hour: s.end_hour,
            is_open: s.is_open_at(hour),
        })
        .collect()
}

/// A horizontal segment on a 24h timeline; `left` and `width` are percentages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineBar {
    pub session: String,
    pub left: f64,
    pub width: f64,
}

pub fn timeline_bars(sessions: &[MarketSession]) -> Vec<TimelineBar> {
    let pct = |hours: u32| hours as f64 / 24.0 * 100.0;
    let mut bars = Vec::new();
    for s in sessions {
        if s.wraps_midnight() {
            bars.push(TimelineBar {
                session: s.name.clone(),
                left: pct(s.start_hour),
                width: pct(24 - s.start_hour),
            });
            bars.push(TimelineBar {
                session: s.name.clone(),
                left: 0.0,
                width: pct(s.end_hour),
            });
        } else {
            bars.push(TimelineBar {
                session: s.name.clone(),
                left: pct(s.start_hour),
                width: pct(s.end_hour.saturating_sub(s.start_hour)),
            });
        }
    }
    bars
}

pub fn now_marker(utc_now: DateTime<Utc>) -> f64 {
    (utc_now.hour() as f64 + utc_now.minute() as f64 / 60.0) / 24.0 * 100.0
}
