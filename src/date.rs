//! Date parsing and formatting for license fields.
//!
//! License dates carry neither a time of day nor a time zone. A parsed date
//! is anchored at midnight in a time zone resolved in this order: the zone
//! given to the call, the default zone of the [`DateParser`], the local time
//! zone.
use std::{env::VarError, fmt, str::FromStr};

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::aamva::dlid::types::{InvalidFieldValue, F8N};

/// Environment variable read by [`DateParser::from_env`].
pub const TIME_ZONE_VAR: &str = "US_DL_SCANNER_TIME_ZONE";

/// Named date formats.
///
/// All formats can be used with [`DateParser::format_date`]. Only those
/// carrying a full calendar date can be parsed: `Medium`, `TimeOnly` and
/// `DateOnly` always fail with [`DateParseError::NoCalendarDate`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateFormat {
    /// `MMDDYYYY`, used by AAMVA date elements.
    #[default]
    MonthDayYear,

    /// `Wed 15 Jan 3:04 PM`. No year, format only.
    Medium,

    /// `2020-01-15 15:04:05`.
    HighToLow,

    /// `3:04 PM`. Format only.
    TimeOnly,

    /// `Wed 15 Jan`. No year, format only.
    DateOnly,

    /// `Wed 15 Jan 2020`.
    DateAndYear,
}

impl DateFormat {
    pub const LIST: [Self; 6] = [
        Self::MonthDayYear,
        Self::Medium,
        Self::HighToLow,
        Self::TimeOnly,
        Self::DateOnly,
        Self::DateAndYear,
    ];

    /// `chrono` format string.
    pub fn pattern(&self) -> &'static str {
        match self {
            Self::MonthDayYear => "%m%d%Y",
            Self::Medium => "%a %-d %b %-I:%M %p",
            Self::HighToLow => "%Y-%m-%d %H:%M:%S",
            Self::TimeOnly => "%-I:%M %p",
            Self::DateOnly => "%a %-d %b",
            Self::DateAndYear => "%a %-d %b %Y",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid time zone `{0}`")]
pub struct InvalidZone(pub String);

/// Time zone used to anchor parsed dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Zone {
    Utc,

    /// Time zone of the host.
    Local,

    Fixed(FixedOffset),
}

impl Zone {
    /// Earliest instant of the wall-clock time `naive` in this zone.
    fn resolve(&self, naive: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::Utc => Utc
                .from_local_datetime(naive)
                .earliest()
                .map(|d| d.fixed_offset()),
            Self::Local => Local
                .from_local_datetime(naive)
                .earliest()
                .map(|d| d.fixed_offset()),
            Self::Fixed(offset) => offset.from_local_datetime(naive).earliest(),
        }
    }

    /// Wall-clock time of `date` in this zone.
    fn wall_clock(&self, date: &DateTime<FixedOffset>) -> NaiveDateTime {
        match self {
            Self::Utc => date.naive_utc(),
            Self::Local => date.with_timezone(&Local).naive_local(),
            Self::Fixed(offset) => date.with_timezone(offset).naive_local(),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utc => f.write_str("UTC"),
            Self::Local => f.write_str("local"),
            Self::Fixed(offset) => fmt::Display::fmt(offset, f),
        }
    }
}

impl FromStr for Zone {
    type Err = InvalidZone;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("utc") || s == "Z" {
            Ok(Self::Utc)
        } else if s.eq_ignore_ascii_case("local") {
            Ok(Self::Local)
        } else {
            s.parse()
                .map(Self::Fixed)
                .map_err(|_| InvalidZone(s.to_owned()))
        }
    }
}

impl TryFrom<String> for Zone {
    type Error = InvalidZone;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Zone> for String {
    fn from(value: Zone) -> Self {
        value.to_string()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DateParseError {
    #[error("empty date")]
    Empty,

    #[error(transparent)]
    InvalidField(#[from] InvalidFieldValue),

    #[error(transparent)]
    Chrono(#[from] chrono::ParseError),

    #[error("format {0:?} does not describe a calendar date")]
    NoCalendarDate(DateFormat),

    #[error("local time {0} does not exist in time zone {1}")]
    NonexistentLocalTime(NaiveDateTime, Zone),
}

lazy_static! {
    static ref GLOBAL: DateParser = DateParser::from_env();
}

/// Date parser and formatter with a configured default time zone.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DateParser {
    default_zone: Option<Zone>,
}

impl DateParser {
    /// Parser falling back to the local time zone.
    pub const fn new() -> Self {
        Self { default_zone: None }
    }

    pub const fn with_default_zone(zone: Zone) -> Self {
        Self {
            default_zone: Some(zone),
        }
    }

    /// Parser whose default zone is read from [`TIME_ZONE_VAR`].
    pub fn from_env() -> Self {
        Self::from_var(std::env::var(TIME_ZONE_VAR))
    }

    fn from_var(value: Result<String, VarError>) -> Self {
        match value {
            Ok(value) => match value.parse() {
                Ok(zone) => Self::with_default_zone(zone),
                Err(e) => {
                    log::warn!("ignoring {TIME_ZONE_VAR}: {e}");
                    Self::new()
                }
            },
            Err(_) => Self::new(),
        }
    }

    /// Process-wide parser, configured from the environment on first use.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    pub fn default_zone(&self) -> Option<Zone> {
        self.default_zone
    }

    pub fn selected_zone(&self, zone: Option<Zone>) -> Zone {
        zone.or(self.default_zone).unwrap_or(Zone::Local)
    }

    pub fn try_parse_date(
        &self,
        s: &str,
        format: DateFormat,
        zone: Option<Zone>,
    ) -> Result<DateTime<FixedOffset>, DateParseError> {
        if s.is_empty() {
            return Err(DateParseError::Empty);
        }

        let naive = match format {
            DateFormat::MonthDayYear => {
                let digits = F8N::new(s)?;
                NaiveDate::parse_from_str(&digits, format.pattern())?.and_time(NaiveTime::MIN)
            }
            DateFormat::DateAndYear => {
                NaiveDate::parse_from_str(s, format.pattern())?.and_time(NaiveTime::MIN)
            }
            DateFormat::HighToLow => NaiveDateTime::parse_from_str(s, format.pattern())?,
            DateFormat::Medium | DateFormat::TimeOnly | DateFormat::DateOnly => {
                return Err(DateParseError::NoCalendarDate(format))
            }
        };

        let zone = self.selected_zone(zone);
        zone.resolve(&naive)
            .ok_or(DateParseError::NonexistentLocalTime(naive, zone))
    }

    /// Parses `s`, returning `None` if it is empty or does not match
    /// `format`.
    pub fn parse_date(
        &self,
        s: &str,
        format: DateFormat,
        zone: Option<Zone>,
    ) -> Option<DateTime<FixedOffset>> {
        match self.try_parse_date(s, format, zone) {
            Ok(date) => Some(date),
            Err(e) => {
                log::trace!("unparsable date {s:?}: {e}");
                None
            }
        }
    }

    /// Formats `date` in the selected zone. Returns the empty string when
    /// there is no date.
    pub fn format_date(
        &self,
        date: Option<&DateTime<FixedOffset>>,
        format: DateFormat,
        zone: Option<Zone>,
    ) -> String {
        match date {
            Some(date) => self
                .selected_zone(zone)
                .wall_clock(date)
                .format(format.pattern())
                .to_string(),
            None => String::new(),
        }
    }
}

/// Parses a `MMDDYYYY` date with the process-wide parser.
pub fn parse_date(s: &str) -> Option<DateTime<FixedOffset>> {
    DateParser::global().parse_date(s, DateFormat::MonthDayYear, None)
}

/// Formats `date` with the process-wide parser.
pub fn format_date(date: Option<&DateTime<FixedOffset>>, format: DateFormat) -> String {
    DateParser::global().format_date(date, format, None)
}
