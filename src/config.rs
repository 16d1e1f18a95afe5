use chrono::{Duration, Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

const DEFAULT_SLOT_MINUTES: i64 = 20;
const MIN_SLOT_MINUTES: i64 = 1;
const MAX_SLOT_MINUTES: i64 = 24 * 60;
const DEFAULT_COURT: &str = "1";

/// Scheduling defaults stamped onto generated fixtures.
///
/// The external collaborator may override any fixture's time or court after
/// generation; these values only seed the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlottingConfig {
    pub date: NaiveDate,
    pub round_one_start: NaiveTime,
    pub round_two_start: NaiveTime,
    pub slot_minutes: i64,
    pub court: String,
}

impl Default for SlottingConfig {
    fn default() -> Self {
        Self {
            date: Local::now().date_naive(),
            round_one_start: default_round_one_start(),
            round_two_start: default_round_two_start(),
            slot_minutes: DEFAULT_SLOT_MINUTES,
            court: DEFAULT_COURT.to_string(),
        }
    }
}

impl SlottingConfig {
    /// Load `.env.local` / `.env` and overlay any `SLOTTING_*` variables.
    /// Values that fail to parse keep their defaults.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(date) = lookup("SLOTTING_DATE").and_then(|v| parse_date(&v)) {
            cfg.date = date;
        }
        if let Some(start) = lookup("SLOTTING_START_TIME").and_then(|v| parse_clock(&v)) {
            cfg.round_one_start = start;
        }
        if let Some(start) = lookup("SLOTTING_ROUND2_START_TIME").and_then(|v| parse_clock(&v)) {
            cfg.round_two_start = start;
        }
        if let Some(minutes) = lookup("SLOTTING_SLOT_MINUTES")
            .and_then(|v| v.trim().parse::<i64>().ok())
        {
            cfg.slot_minutes = minutes.clamp(MIN_SLOT_MINUTES, MAX_SLOT_MINUTES);
        }
        if let Some(court) = lookup("SLOTTING_COURT") {
            let trimmed = court.trim();
            if !trimmed.is_empty() {
                cfg.court = trimmed.to_string();
            }
        }
        cfg
    }

    /// Start offset of the `index`-th slot of a round. The slot length is
    /// held to `1..=1440` minutes even when the field was set directly.
    pub fn slot_offset(&self, index: usize) -> Duration {
        let slot = self.slot_minutes.clamp(MIN_SLOT_MINUTES, MAX_SLOT_MINUTES);
        i64::try_from(index)
            .ok()
            .and_then(|idx| slot.checked_mul(idx))
            .and_then(Duration::try_minutes)
            .unwrap_or_else(Duration::zero)
    }
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Accepts `HH:MM` or `HH:MM:SS`.
pub fn parse_clock(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .ok()
}

fn default_round_one_start() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn default_round_two_start() -> NaiveTime {
    NaiveTime::from_hms_opt(11, 0, 0).unwrap_or(NaiveTime::MIN)
}
