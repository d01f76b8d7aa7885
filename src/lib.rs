//! This library reads US driver licenses from the AAMVA payload encoded in
//! the PDF417 barcode on the back of the card.
//!
//! Detecting and decoding the barcode itself is left to the caller, who
//! hands the decoded string to a [`Scanner`]:
//!
//! ```
//! use us_dl_scanner::{date::{DateParser, Zone}, Scanner};
//!
//! let scanner = Scanner::with_date_parser(DateParser::with_default_zone(Zone::Utc));
//! let license = scanner
//!     .scan("@\n\x1e\rANSI 636000090001DL00310020DLDAQD1234578\nDCSSMITH\nDACJOHN\n")
//!     .unwrap();
//!
//! assert_eq!(license.license_number.as_deref(), Some("D1234578"));
//! assert_eq!(license.first_name.as_deref(), Some("JOHN"));
//! ```
pub use chrono::{DateTime, FixedOffset};

pub mod aamva;
pub mod date;

pub use aamva::{
    dlid::{DlElement, DriverLicense, FieldMapping},
    is_driver_license_format, ScanError, Scanner, ScannerConfig,
};
pub use date::{DateFormat, DateParser, Zone};
