//! Partial-precision temporal values.
//!
//! FHIR dates, times and dateTimes may be truncated to any leading precision
//! (`2020`, `2020-03`, `2020-03-14T09:26`). The types here keep exactly the precision
//! that was parsed so printing a parsed value reproduces its lexical form.

use chrono::{NaiveDate, NaiveTime};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Failure to parse a temporal literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} `{text}`")]
pub struct ParseError {
    pub kind: &'static str,
    pub text: String,
}

impl ParseError {
    fn new(kind: &'static str, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
        }
    }
}

fn parse_fixed_digits(text: &str, len: usize) -> Option<u32> {
    if text.len() == len && text.bytes().all(|b| b.is_ascii_digit()) {
        text.parse().ok()
    } else {
        None
    }
}

/// A date with year, month or day precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrecisionDate {
    year: i32,
    month: Option<u32>,
    day: Option<u32>,
}

impl PrecisionDate {
    /// Year precision.
    pub fn from_year(year: i32) -> Option<Self> {
        (0..=9999).contains(&year).then_some(Self {
            year,
            month: None,
            day: None,
        })
    }

    /// Month precision.
    pub fn from_year_month(year: i32, month: u32) -> Option<Self> {
        let date = Self::from_year(year)?;
        (1..=12).contains(&month).then_some(Self {
            month: Some(month),
            ..date
        })
    }

    /// Day precision. Rejects impossible calendar dates.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)?;
        Some(Self {
            day: Some(day),
            ..Self::from_year_month(year, month)?
        })
    }

    /// Parses `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let err = || ParseError::new("date", text);
        let mut parts = text.split('-');
        let year = parts
            .next()
            .and_then(|y| parse_fixed_digits(y, 4))
            .ok_or_else(err)? as i32;
        let month = parts.next().map(|m| parse_fixed_digits(m, 2));
        let day = parts.next().map(|d| parse_fixed_digits(d, 2));
        if parts.next().is_some() {
            return Err(err());
        }
        match (month, day) {
            (None, None) => Self::from_year(year),
            (Some(Some(month)), None) => Self::from_year_month(year, month),
            (Some(Some(month)), Some(Some(day))) => Self::from_ymd(year, month, day),
            _ => None,
        }
        .ok_or_else(err)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn day(&self) -> Option<u32> {
        self.day
    }

    /// The calendar date, when the value has day precision.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month?, self.day?)
    }
}

impl fmt::Display for PrecisionDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.year)?;
        if let Some(month) = self.month {
            write!(f, "-{:02}", month)?;
            if let Some(day) = self.day {
                write!(f, "-{:02}", day)?;
            }
        }
        Ok(())
    }
}

impl FromStr for PrecisionDate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A time of day with hour, minute, second or sub-second precision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrecisionTime {
    hour: u32,
    minute: Option<u32>,
    second: Option<u32>,
    /// Fractional second digits exactly as written.
    fraction: Option<String>,
}

impl PrecisionTime {
    /// Second precision.
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, second)?;
        Some(Self {
            hour,
            minute: Some(minute),
            second: Some(second),
            fraction: None,
        })
    }

    /// Parses `hh`, `hh:mm`, `hh:mm:ss` or `hh:mm:ss.f+`.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let err = || ParseError::new("time", text);
        let (clock, fraction) = match text.split_once('.') {
            Some((clock, fraction)) => {
                if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(err());
                }
                (clock, Some(fraction.to_string()))
            }
            None => (text, None),
        };
        let mut parts = clock.split(':');
        let hour = parts
            .next()
            .and_then(|h| parse_fixed_digits(h, 2))
            .filter(|h| *h < 24)
            .ok_or_else(err)?;
        let minute = match parts.next() {
            Some(m) => Some(parse_fixed_digits(m, 2).filter(|m| *m < 60).ok_or_else(err)?),
            None => None,
        };
        let second = match parts.next() {
            Some(s) => Some(parse_fixed_digits(s, 2).filter(|s| *s < 60).ok_or_else(err)?),
            None => None,
        };
        if parts.next().is_some() || (fraction.is_some() && second.is_none()) {
            return Err(err());
        }
        Ok(Self {
            hour,
            minute,
            second,
            fraction,
        })
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> Option<u32> {
        self.minute
    }

    pub fn second(&self) -> Option<u32> {
        self.second
    }

    pub fn fraction(&self) -> Option<&str> {
        self.fraction.as_deref()
    }
}

impl fmt::Display for PrecisionTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.hour)?;
        if let Some(minute) = self.minute {
            write!(f, ":{:02}", minute)?;
            if let Some(second) = self.second {
                write!(f, ":{:02}", second)?;
                if let Some(fraction) = &self.fraction {
                    write!(f, ".{}", fraction)?;
                }
            }
        }
        Ok(())
    }
}

impl FromStr for PrecisionTime {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Time-zone designator of a dateTime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeZoneOffset {
    /// Written as `Z`.
    Utc,
    /// Signed offset in minutes, written as `+hh:mm` / `-hh:mm`.
    Minutes(i32),
}

impl TimeZoneOffset {
    /// Parses `Z`, `+hh:mm` or `-hh:mm`.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let err = || ParseError::new("time-zone offset", text);
        if text == "Z" {
            return Ok(Self::Utc);
        }
        let (sign, rest) = match text.as_bytes().first() {
            Some(b'+') => (1, &text[1..]),
            Some(b'-') => (-1, &text[1..]),
            _ => return Err(err()),
        };
        let (hours, minutes) = rest.split_once(':').ok_or_else(err)?;
        let hours = parse_fixed_digits(hours, 2).filter(|h| *h <= 14).ok_or_else(err)?;
        let minutes = parse_fixed_digits(minutes, 2).filter(|m| *m < 60).ok_or_else(err)?;
        Ok(Self::Minutes(sign * (hours * 60 + minutes) as i32))
    }
}

impl fmt::Display for TimeZoneOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utc => f.write_str("Z"),
            Self::Minutes(minutes) => {
                let sign = if *minutes < 0 { '-' } else { '+' };
                let total = minutes.unsigned_abs();
                write!(f, "{}{:02}:{:02}", sign, total / 60, total % 60)
            }
        }
    }
}

/// A dateTime: a [`PrecisionDate`] optionally followed by a time and offset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrecisionDateTime {
    date: PrecisionDate,
    time: Option<PrecisionTime>,
    offset: Option<TimeZoneOffset>,
}

impl PrecisionDateTime {
    pub fn new(
        date: PrecisionDate,
        time: Option<PrecisionTime>,
        offset: Option<TimeZoneOffset>,
    ) -> Self {
        Self { date, time, offset }
    }

    /// Parses `YYYY[-MM[-DD[Thh[:mm[:ss[.f+]]][Z|±hh:mm]]]]`.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let err = || ParseError::new("dateTime", text);
        let Some((date, rest)) = text.split_once('T') else {
            let date = PrecisionDate::parse(text).map_err(|_| err())?;
            return Ok(Self::from(date));
        };
        let date = PrecisionDate::parse(date).map_err(|_| err())?;
        if date.day().is_none() {
            return Err(err());
        }
        let (time, offset) = if let Some(time) = rest.strip_suffix('Z') {
            (time, Some(TimeZoneOffset::Utc))
        } else if let Some(index) = rest.rfind(['+', '-']) {
            let offset = TimeZoneOffset::parse(&rest[index..]).map_err(|_| err())?;
            (&rest[..index], Some(offset))
        } else {
            (rest, None)
        };
        let time = PrecisionTime::parse(time).map_err(|_| err())?;
        Ok(Self {
            date,
            time: Some(time),
            offset,
        })
    }

    pub fn date(&self) -> PrecisionDate {
        self.date
    }

    pub fn time(&self) -> Option<&PrecisionTime> {
        self.time.as_ref()
    }

    pub fn offset(&self) -> Option<TimeZoneOffset> {
        self.offset
    }
}

impl From<PrecisionDate> for PrecisionDateTime {
    fn from(date: PrecisionDate) -> Self {
        Self {
            date,
            time: None,
            offset: None,
        }
    }
}

impl fmt::Display for PrecisionDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date)?;
        if let Some(time) = &self.time {
            write!(f, "T{}", time)?;
            if let Some(offset) = &self.offset {
                write!(f, "{}", offset)?;
            }
        }
        Ok(())
    }
}

impl FromStr for PrecisionDateTime {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
