use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub mod dlid;

use dlid::{DriverLicense, FieldMapping, File};

use crate::date::{DateParser, Zone};

lazy_static! {
    static ref COMPLIANCE_INDICATOR: Regex = Regex::new("@[^A-Za-z0-9]+ANSI").unwrap();
}

/// Checks that `input` starts like an AAMVA driver license payload: `@`,
/// one or more non alphanumeric characters, then `ANSI`.
pub fn is_driver_license_format(input: &str) -> bool {
    COMPLIANCE_INDICATOR
        .find(input)
        .is_some_and(|m| m.start() == 0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("not an AAMVA driver license payload")]
    NotDriverLicense,

    #[error("no known data element found")]
    NoRecognizedElements,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScannerConfig {
    /// Time zone anchoring license dates. The process-wide default is used
    /// when unset.
    pub default_time_zone: Option<Zone>,

    /// Makes [`Scanner::scan`] discard payloads without any known data
    /// element instead of returning an empty license.
    pub require_known_elements: bool,
}

/// Reads driver licenses from scanned PDF417 payloads.
#[derive(Debug, Clone, Copy)]
pub struct Scanner {
    dates: DateParser,
    require_known_elements: bool,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    /// Scanner using the process-wide [`DateParser`].
    pub fn new() -> Self {
        Self::with_date_parser(*DateParser::global())
    }

    pub fn with_date_parser(dates: DateParser) -> Self {
        Self {
            dates,
            require_known_elements: false,
        }
    }

    pub fn with_config(config: &ScannerConfig) -> Self {
        let dates = match config.default_time_zone {
            Some(zone) => DateParser::with_default_zone(zone),
            None => *DateParser::global(),
        };

        Self {
            dates,
            require_known_elements: config.require_known_elements,
        }
    }

    pub fn date_parser(&self) -> &DateParser {
        &self.dates
    }

    /// Reads the data elements of `payload`.
    ///
    /// When the AAMVA header can be decoded, reading starts at the first
    /// data element of the first subfile, which shares its line with the
    /// header. Otherwise every line of the payload is read.
    pub fn read_fields(&self, payload: &str) -> Result<FieldMapping, ScanError> {
        if !is_driver_license_format(payload) {
            log::debug!("rejecting payload: not an AAMVA driver license");
            return Err(ScanError::NotDriverLicense);
        }

        Ok(FieldMapping::tokenize(data_elements(payload)))
    }

    /// Reads a driver license, reporting why nothing could be read.
    pub fn try_scan(&self, payload: &str) -> Result<DriverLicense, ScanError> {
        let fields = self.read_fields(payload)?;
        if !fields.has_known_elements() {
            return Err(ScanError::NoRecognizedElements);
        }

        Ok(DriverLicense::from_fields(&fields, &self.dates))
    }

    /// Reads a driver license.
    ///
    /// Returns `None` if `payload` is not a driver license. A payload without
    /// any known data element gives a license with empty fields unless
    /// [`ScannerConfig::require_known_elements`] is set.
    pub fn scan(&self, payload: &str) -> Option<DriverLicense> {
        let fields = self.read_fields(payload).ok()?;
        if self.require_known_elements && !fields.has_known_elements() {
            log::debug!("rejecting payload: {}", ScanError::NoRecognizedElements);
            return None;
        }

        let license = DriverLicense::from_fields(&fields, &self.dates);
        log::debug!("scanned {} data elements", fields.len());
        Some(license)
    }
}

/// Part of `payload` holding data elements.
fn data_elements(payload: &str) -> &str {
    let file = match File::decode_from_bytes(payload.as_bytes()) {
        Ok(file) => file,
        Err(e) => {
            log::debug!("unreadable AAMVA header ({e}), reading the whole payload");
            return payload;
        }
    };

    let header = file.header();
    log::debug!(
        "AAMVA version {} payload from issuer {:06} with {} subfile(s)",
        header.version,
        header.issuer_id,
        header.entry_count
    );

    match file
        .elements_offset(payload.as_bytes())
        .and_then(|at| payload.get(at..))
    {
        Some(elements) => elements,
        None => {
            log::debug!("first subfile not found, reading the whole payload");
            payload
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{is_driver_license_format, Scanner, ScanError, ScannerConfig};
    use crate::date::{DateParser, Zone};

    const UTC: DateParser = DateParser::with_default_zone(Zone::Utc);

    #[test]
    fn format_must_start_at_offset_zero() {
        assert!(is_driver_license_format("@\nANSI 636000"));
        assert!(is_driver_license_format("@\n\x1e\rANSI 636000090002"));
        assert!(is_driver_license_format("@ \t-ANSI"));

        assert!(!is_driver_license_format("ANSI @\nANSI"));
        assert!(!is_driver_license_format(" @\nANSI"));
        assert!(!is_driver_license_format("@ANSI"));
        assert!(!is_driver_license_format("@x\nANSI"));
        assert!(!is_driver_license_format("@\nansi"));
        assert!(!is_driver_license_format(""));
        assert!(!is_driver_license_format("https://example.com"));
    }

    #[test]
    fn reject_non_license() {
        let scanner = Scanner::with_date_parser(UTC);

        assert_eq!(scanner.scan("DACJOHN\nDCSSMITH\n"), None);
        assert_eq!(
            scanner.try_scan("DACJOHN\nDCSSMITH\n"),
            Err(ScanError::NotDriverLicense)
        );
    }

    #[test]
    fn element_on_header_line() {
        let scanner = Scanner::with_date_parser(UTC);
        let fields = scanner
            .read_fields("@\n\x1e\rANSI 636000090001DL00310020DLDAQD1234578\nDCSSMITH\n")
            .unwrap();

        assert_eq!(fields.get_id(b"DAQ"), Some("D1234578"));
        assert_eq!(fields.get_id(b"DCS"), Some("SMITH"));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn element_on_header_line_with_other_separator() {
        let scanner = Scanner::with_date_parser(UTC);
        let payload = "@\n\x1c\rANSI 636000090001DL00310020DLDAQD1234578\nDCSSMITH\n";
        let license = scanner.scan(payload).unwrap();

        assert_eq!(license.license_number.as_deref(), Some("D1234578"));
        assert_eq!(license.last_name.as_deref(), Some("SMITH"));
    }

    #[test]
    fn loose_header_reads_every_line() {
        let scanner = Scanner::with_date_parser(UTC);
        let fields = scanner.read_fields("@\nANSI 6360\nDAQ42\n").unwrap();

        assert_eq!(fields.get_id(b"DAQ"), Some("42"));
        assert_eq!(fields.get_id(b"ANS"), Some("I 6360"));
    }

    #[test]
    fn empty_license() {
        let payload = "@\nANSI\nZZZnothing\n";
        let scanner = Scanner::with_date_parser(UTC);

        let license = scanner.scan(payload).unwrap();
        assert_eq!(license.first_name, None);
        assert_eq!(license.last_name.as_deref(), Some(""));
        assert_eq!(license.country, "US");

        assert_eq!(
            scanner.try_scan(payload),
            Err(ScanError::NoRecognizedElements)
        );

        let strict = Scanner::with_config(&ScannerConfig {
            default_time_zone: Some(Zone::Utc),
            require_known_elements: true,
        });
        assert_eq!(strict.scan(payload), None);
    }

    #[test]
    fn config_time_zone() {
        let config: ScannerConfig =
            serde_json::from_str(r#"{ "defaultTimeZone": "+02:00" }"#).unwrap();
        assert!(!config.require_known_elements);

        let scanner = Scanner::with_config(&config);
        assert_eq!(
            scanner.date_parser().default_zone().map(|z| z.to_string()),
            Some("+02:00".to_owned())
        );

        let config: ScannerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ScannerConfig::default());
    }
}
