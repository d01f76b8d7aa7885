use chrono::NaiveDate;
use us_dl_scanner::{DateParser, Scanner, Zone};

pub const ISSUER_ID: u32 = 636000;

pub fn utc_scanner() -> Scanner {
    Scanner::with_date_parser(DateParser::with_default_zone(Zone::Utc))
}

/// Wraps the data elements of a DL subfile in a version 09 AAMVA file.
pub fn dl_payload(elements: &str) -> String {
    format!(
        "@\n\x1e\rANSI {ISSUER_ID:06}090001DL0031{:04}DL{elements}",
        2 + elements.len()
    )
}

pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
