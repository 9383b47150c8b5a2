//! UTC wall-clock time with second resolution.
//!
//! No timezone handling; good enough for log timestamps and a clock
//! command, without pulling in a date-time crate.

/// A UTC wall-clock timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl WallTime {
    /// Current UTC time from the system clock.
    pub fn now_utc() -> Self {
        let dur = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default();
        Self::from_unix_secs(dur.as_secs())
    }

    /// Break a Unix timestamp (seconds) into civil UTC fields.
    pub fn from_unix_secs(secs: u64) -> Self {
        let days = secs / 86400;
        let time_of_day = secs % 86400;
        let hour = (time_of_day / 3600) as u8;
        let minute = ((time_of_day % 3600) / 60) as u8;
        let second = (time_of_day % 60) as u8;
        let (year, month, day) = civil_from_days(days);
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// German-style `DD.MM.YYYY HH:MM:SS`.
    pub fn format_de(&self) -> String {
        format!(
            "{:02}.{:02}.{:04} {:02}:{:02}:{:02}",
            self.day, self.month, self.year, self.hour, self.minute, self.second,
        )
    }

    /// ISO 8601 `YYYY-MM-DDTHH:MM:SSZ` for wire payloads.
    pub fn iso8601(&self) -> String {
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second,
        )
    }
}

impl std::fmt::Display for WallTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second,
        )
    }
}

/// Non-leap month lengths, January first.
const MONTH_LENGTHS: [u64; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Convert a count of days since 1970-01-01 into a calendar date.
/// Walks forward year by year, then month by month; the day counts
/// involved are tiny, so the linear scan is fine.
fn civil_from_days(mut days: u64) -> (u16, u8, u8) {
    let mut year: u16 = 1970;
    loop {
        let year_len = 365 + u64::from(is_leap_year(year));
        if days < year_len {
            break;
        }
        days -= year_len;
        year += 1;
    }

    let mut month: u8 = 1;
    for (i, &len) in MONTH_LENGTHS.iter().enumerate() {
        let len = if i == 1 && is_leap_year(year) { len + 1 } else { len };
        if days < len {
            break;
        }
        days -= len;
        month += 1;
    }

    (year, month, (days + 1) as u8)
}

/// Gregorian leap-year rule.
fn is_leap_year(year: u16) -> bool {
    year.is_multiple_of(400) || (year.is_multiple_of(4) && !year.is_multiple_of(100))
}
