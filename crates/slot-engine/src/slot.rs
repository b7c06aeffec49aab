//! The weekly half-hour grid.
//!
//! A week is five days (Monday to Friday) of thirty half-hour slots each,
//! running from 8:00 AM to 11:00 PM. Slot `30 * d + h` is half-hour `h` of
//! day `d`, so Monday 8:00 AM is slot 0 and Friday 10:30 PM is slot 149.
//!
//! Only slot arithmetic lives here. Mapping slots onto real calendar dates is
//! left to the caller; [`Slot::start_time`] and friends give the wall-clock
//! time of day and nothing more.

use std::fmt;

use chrono::{Duration, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Days in the scheduling week.
pub const DAYS_PER_WEEK: u8 = 5;

/// Half-hour slots per day, 8:00 AM to 11:00 PM.
pub const SLOTS_PER_DAY: u8 = 30;

/// Total number of slots in the week.
pub const SLOTS_PER_WEEK: u8 = DAYS_PER_WEEK * SLOTS_PER_DAY;

/// Short names for each day of the scheduling week, in order.
pub const WEEKDAY_STRINGS: [&str; DAYS_PER_WEEK as usize] = ["Mon", "Tue", "Wed", "Thu", "Fri"];

const DAY_START: NaiveTime = match NaiveTime::from_hms_opt(8, 0, 0) {
    Some(time) => time,
    None => panic!("8:00 is a valid time of day"),
};

const WEEKDAYS: [Weekday; DAYS_PER_WEEK as usize] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

/// A half-hour slot in the weekly grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Slot(u8);

impl Slot {
    /// Monday, 8:00 AM.
    pub const FIRST: Slot = Slot(0);

    /// Friday, 10:30 PM.
    pub const LAST: Slot = Slot(SLOTS_PER_WEEK - 1);

    /// Build a slot from its slot number.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::SlotOutOfRange`] if `slot` is not in `0..150`.
    pub fn new(slot: u32) -> Result<Self, ScheduleError> {
        if slot >= u32::from(SLOTS_PER_WEEK) {
            return Err(ScheduleError::SlotOutOfRange(slot));
        }
        Ok(Slot(slot as u8))
    }

    /// Build a slot from a day (0 = Monday) and a half-hour index within the day
    /// (0 = 8:00 AM).
    pub fn from_day_and_index(day: u8, index: u8) -> Result<Self, ScheduleError> {
        if day >= DAYS_PER_WEEK {
            return Err(ScheduleError::InvalidDay(format!("day {day} is not Monday to Friday")));
        }
        if index >= SLOTS_PER_DAY {
            return Err(ScheduleError::InvalidTime(format!(
                "half-hour index {index} is past the end of the day"
            )));
        }
        Ok(Slot(day * SLOTS_PER_DAY + index))
    }

    /// The slot containing `time` on `weekday`. Minutes are floored to the
    /// half hour, so 9:45 falls in the 9:30 slot.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidDay`] for Saturday and Sunday, and
    /// [`ScheduleError::InvalidTime`] for times before 8:00 AM or from 11:00 PM on.
    pub fn from_weekday_time(weekday: Weekday, time: NaiveTime) -> Result<Self, ScheduleError> {
        let day = WEEKDAYS
            .iter()
            .position(|w| *w == weekday)
            .ok_or_else(|| ScheduleError::InvalidDay(weekday.to_string()))?;
        Slot::from_day_and_index(day as u8, half_hour_index(time)?)
    }

    /// Parse the strings produced by [`Slot::day_string`] and
    /// [`Slot::time_string`], e.g. `("Tue", "1:00 PM")`.
    pub fn from_day_string(day: &str, time: &str) -> Result<Self, ScheduleError> {
        let day_index = WEEKDAY_STRINGS
            .iter()
            .position(|d| d.eq_ignore_ascii_case(day.trim()))
            .ok_or_else(|| ScheduleError::InvalidDay(day.to_string()))?;
        let parsed = NaiveTime::parse_from_str(time.trim(), "%I:%M %p")
            .map_err(|_| ScheduleError::InvalidTime(time.to_string()))?;
        if parsed.minute() % 30 != 0 {
            return Err(ScheduleError::InvalidTime(format!(
                "{time} is not on a half-hour boundary"
            )));
        }
        Slot::from_day_and_index(day_index as u8, half_hour_index(parsed)?)
    }

    /// The slot number, `0..150`.
    #[inline]
    pub fn number(self) -> u8 {
        self.0
    }

    /// The day of the week, 0 (Monday) to 4 (Friday).
    #[inline]
    pub fn day(self) -> u8 {
        self.0 / SLOTS_PER_DAY
    }

    /// The half-hour index within the day, 0 (8:00 AM) to 29 (10:30 PM).
    #[inline]
    pub fn index_in_day(self) -> u8 {
        self.0 % SLOTS_PER_DAY
    }

    pub fn weekday(self) -> Weekday {
        WEEKDAYS[usize::from(self.day())]
    }

    /// Time of day this slot begins.
    pub fn start_time(self) -> NaiveTime {
        DAY_START + Duration::minutes(30 * i64::from(self.index_in_day()))
    }

    /// Time of day this slot ends. The last slot of a day ends at 11:00 PM.
    pub fn end_time(self) -> NaiveTime {
        self.start_time() + Duration::minutes(30)
    }

    /// "Mon" through "Fri".
    pub fn day_string(self) -> &'static str {
        WEEKDAY_STRINGS[usize::from(self.day())]
    }

    /// Start time as e.g. "9:30 AM".
    pub fn time_string(self) -> String {
        format_time(self.start_time())
    }
}

impl TryFrom<u32> for Slot {
    type Error = ScheduleError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Slot::new(value)
    }
}

impl From<Slot> for u32 {
    fn from(slot: Slot) -> Self {
        u32::from(slot.0)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day_string(), self.time_string())
    }
}

/// 12-hour clock without a leading zero, e.g. "9:30 AM".
pub(crate) fn format_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

fn half_hour_index(time: NaiveTime) -> Result<u8, ScheduleError> {
    let hour = time.hour();
    let start_hour = DAY_START.hour();
    if hour < start_hour {
        return Err(ScheduleError::InvalidTime(format!(
            "{} is before 8:00 AM",
            format_time(time)
        )));
    }
    let index = (hour - start_hour) * 2 + time.minute() / 30;
    if index >= u32::from(SLOTS_PER_DAY) {
        return Err(ScheduleError::InvalidTime(format!(
            "{} is after the last slot of the day",
            format_time(time)
        )));
    }
    Ok(index as u8)
}
