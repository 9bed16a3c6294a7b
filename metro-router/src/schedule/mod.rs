//! Travel time schedule.
//!
//! Owns the two mutable trip settings: the train speed and the trip start
//! (day, hour, minute). Everything time-related is derived from these at
//! call time, so no cached duration survives a setting change. The
//! transfer-wait schedule is a fixed piecewise curve over the day with
//! explicit closure windows; the metro closes shortly after midnight on
//! weekdays (02:00 on weekend nights) and reopens at 05:30.

use chrono::Weekday;

use crate::domain::ScheduleError;

/// Default average train speed, km/h.
pub const DEFAULT_SPEED_KMH: u32 = 80;

/// Round a minute value to one decimal, the resolution of all reported
/// durations.
pub(crate) fn round_to_tenth(minutes: f64) -> f64 {
    (minutes * 10.0).round() / 10.0
}

/// Wall-clock moment derived from the trip start plus elapsed minutes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clock {
    /// Day of week, 0 = Monday .. 6 = Sunday.
    pub day: u8,
    /// Hour of day, 0-23.
    pub hour: u32,
    /// Minute within the hour, fractional.
    pub minute: f64,
}

/// The trip-start moment and current speed setting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timetable {
    speed_m_per_min: f64,
    day: u8,
    hour: u32,
    minute: u32,
}

impl Default for Timetable {
    /// Monday noon at the default speed.
    fn default() -> Self {
        Self {
            speed_m_per_min: kmh_to_m_per_min(DEFAULT_SPEED_KMH),
            day: 0,
            hour: 12,
            minute: 0,
        }
    }
}

/// km/h to m/min, rounded to two decimals.
fn kmh_to_m_per_min(kmh: u32) -> f64 {
    (kmh as f64 * 1000.0 / 60.0 * 100.0).round() / 100.0
}

impl Timetable {
    /// Current speed in meters per minute.
    pub fn speed_m_per_min(&self) -> f64 {
        self.speed_m_per_min
    }

    /// Set the train speed in km/h.
    pub fn set_speed_kmh(&mut self, kmh: u32) -> Result<(), ScheduleError> {
        if kmh == 0 {
            return Err(ScheduleError::InvalidSpeed);
        }
        self.speed_m_per_min = kmh_to_m_per_min(kmh);
        Ok(())
    }

    /// Set the trip-start moment.
    pub fn set_departure(
        &mut self,
        day: Weekday,
        hour: u32,
        minute: u32,
    ) -> Result<(), ScheduleError> {
        if hour > 23 {
            return Err(ScheduleError::InvalidHour(hour));
        }
        if minute > 59 {
            return Err(ScheduleError::InvalidMinute(minute));
        }
        self.day = day.num_days_from_monday() as u8;
        self.hour = hour;
        self.minute = minute;
        Ok(())
    }

    /// Wall-clock moment after `elapsed_min` minutes of travel, with
    /// minute → hour → day carry and day wraparound modulo 7.
    pub fn clock_at(&self, elapsed_min: f64) -> Clock {
        let total_min = self.minute as f64 + elapsed_min;
        let carry_hours = (total_min / 60.0).floor();
        let minute = total_min - carry_hours * 60.0;

        let total_hours = self.hour as f64 + carry_hours;
        let carry_days = (total_hours / 24.0).floor();
        let hour = (total_hours - carry_days * 24.0) as u32;

        let day = ((self.day as f64 + carry_days) as u64 % 7) as u8;

        Clock { day, hour, minute }
    }

    /// Expected wait when changing lines `elapsed_min` minutes into the
    /// trip, in minutes rounded to one decimal, or `None` while the metro
    /// is closed.
    ///
    /// The curve over the day: 12 until 00:30, then 15 on Saturday and
    /// Sunday nights until 02:00, closed until the 05:30 opening; from
    /// there a linear ramp pinned at 10 (05:00) down to 3 (09:00), flat 3
    /// until noon, rising to 5 by 15:00, easing to 4 by 17:00, flat 4
    /// until 20:00, climbing to 10 by 22:00 and flat 10 to midnight.
    pub fn transfer_wait(&self, elapsed_min: f64) -> Option<f64> {
        let clock = self.clock_at(elapsed_min);
        let minute_of_day = clock.hour as f64 * 60.0 + clock.minute;

        let wait = if clock.hour < 5 {
            if clock.hour == 0 && clock.minute < 30.0 {
                12.0
            } else if matches!(clock.day, 5 | 6) && clock.hour < 2 {
                15.0
            } else {
                return None;
            }
        } else if clock.hour < 9 {
            if clock.hour == 5 && clock.minute < 30.0 {
                return None;
            }
            10.0 - (minute_of_day - 5.0 * 60.0) * (7.0 / 240.0)
        } else if clock.hour < 12 {
            3.0
        } else if clock.hour < 15 {
            3.0 + (minute_of_day - 12.0 * 60.0) / 90.0
        } else if clock.hour < 17 {
            5.0 - (minute_of_day - 15.0 * 60.0) / 120.0
        } else if clock.hour < 20 {
            4.0
        } else if clock.hour < 22 {
            4.0 + (minute_of_day - 20.0 * 60.0) / 20.0
        } else {
            10.0
        };

        Some(round_to_tenth(wait))
    }

    /// Returns true if the metro is operating at the given elapsed time.
    pub fn is_open(&self, elapsed_min: f64) -> bool {
        self.transfer_wait(elapsed_min).is_some()
    }
}
