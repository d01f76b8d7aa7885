use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::{data_elements_enum, FieldMapping};
use crate::date::{DateFormat, DateParser};

/// Country of every license read by this crate.
pub const COUNTRY: &str = "US";

data_elements_enum! {
    /// Data elements read into a [`DriverLicense`].
    pub enum DlElement {
        /// Customer First Name (DAC).
        CustomerFirstName: b"DAC",

        /// Customer Middle Name(s) (DAD).
        CustomerMiddleName: b"DAD",

        /// Customer Family Name (DCS).
        CustomerFamilyName: b"DCS",

        /// Customer Given Names (DCT).
        ///
        /// First and middle names separated by a space, found on cards
        /// predating the DAC/DAD split.
        CustomerGivenNames: b"DCT",

        /// Address – Jurisdiction Code (DAJ).
        AddressJurisdictionCode: b"DAJ",

        /// Customer ID Number (DAQ).
        CustomerIdNumber: b"DAQ",

        /// Date of Birth (DBB).
        DateOfBirth: b"DBB",

        /// Document Expiration Date (DBA).
        DocumentExpirationDate: b"DBA"
    }
}

/// Driver license information read from a barcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverLicense {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub license_number: Option<String>,
    pub license_state: Option<String>,

    /// Midnight of the date of birth, in the zone chosen by the
    /// [`DateParser`].
    pub date_of_birth: Option<DateTime<FixedOffset>>,

    /// Midnight of the expiration date, in the zone chosen by the
    /// [`DateParser`].
    pub date_of_expiry: Option<DateTime<FixedOffset>>,

    /// Result of an external license check. Never set by the decoder.
    pub license_check_status: Option<String>,

    pub country: String,
}

impl Default for DriverLicense {
    fn default() -> Self {
        Self {
            first_name: None,
            middle_name: None,
            last_name: None,
            license_number: None,
            license_state: None,
            date_of_birth: None,
            date_of_expiry: None,
            license_check_status: None,
            country: COUNTRY.to_owned(),
        }
    }
}

impl DriverLicense {
    /// Builds the license from scanned fields.
    ///
    /// Missing text elements give empty strings, while missing or
    /// unparsable dates are left unset.
    pub fn from_fields(fields: &FieldMapping, dates: &DateParser) -> Self {
        let (first_name, middle_name) = names(fields);

        Self {
            first_name,
            middle_name,
            last_name: Some(text(fields, DlElement::CustomerFamilyName)),
            license_number: Some(text(fields, DlElement::CustomerIdNumber)),
            license_state: Some(text(fields, DlElement::AddressJurisdictionCode)),
            date_of_birth: date(fields, DlElement::DateOfBirth, dates),
            date_of_expiry: date(fields, DlElement::DocumentExpirationDate, dates),
            ..Self::default()
        }
    }

    /// Date of birth as `MMDDYYYY`, or the empty string.
    pub fn date_of_birth_string(&self, dates: &DateParser) -> String {
        dates.format_date(self.date_of_birth.as_ref(), DateFormat::MonthDayYear, None)
    }

    /// Expiration date as `MMDDYYYY`, or the empty string.
    pub fn date_of_expiry_string(&self, dates: &DateParser) -> String {
        dates.format_date(self.date_of_expiry.as_ref(), DateFormat::MonthDayYear, None)
    }
}

/// First and middle names.
///
/// DAC and DAD take precedence. Otherwise DCT must hold at least two space
/// separated names; extra names are dropped.
fn names(fields: &FieldMapping) -> (Option<String>, Option<String>) {
    if let Some(first) = fields.get(DlElement::CustomerFirstName) {
        return (
            Some(first.to_owned()),
            Some(text(fields, DlElement::CustomerMiddleName)),
        );
    }

    let given = fields.get_or_empty(DlElement::CustomerGivenNames);
    match given.split(' ').collect::<Vec<_>>().as_slice() {
        [first, middle, ..] => (Some((*first).to_owned()), Some((*middle).to_owned())),
        _ => (None, None),
    }
}

fn text(fields: &FieldMapping, element: DlElement) -> String {
    fields.get_or_empty(element).to_owned()
}

fn date(
    fields: &FieldMapping,
    element: DlElement,
    dates: &DateParser,
) -> Option<DateTime<FixedOffset>> {
    let value = fields.get(element)?;
    let result = dates.parse_date(value, DateFormat::MonthDayYear, None);
    if result.is_none() {
        log::debug!("ignoring invalid {element} date {value:?}");
    }

    result
}

struct OptionalDisplay<'a, T>(&'a Option<T>);

impl<T: fmt::Display> fmt::Display for OptionalDisplay<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => fmt::Display::fmt(value, f),
            None => f.write_str("-"),
        }
    }
}

impl fmt::Display for DriverLicense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let birth = self.date_of_birth.map(|d| d.date_naive());
        let expiry = self.date_of_expiry.map(|d| d.date_naive());

        write!(
            f,
            "firstName: {}, middleName: {}, lastName: {}, licenseNumber: {}, licenseState: {}, dateOfBirth: {}, dateOfExpiry: {}",
            OptionalDisplay(&self.first_name),
            OptionalDisplay(&self.middle_name),
            OptionalDisplay(&self.last_name),
            OptionalDisplay(&self.license_number),
            OptionalDisplay(&self.license_state),
            OptionalDisplay(&birth),
            OptionalDisplay(&expiry),
        )
    }
}
