//! AAMVA file header carried at the start of the PDF417 payload.
//!
//! ```text
//! "@" separator(3) "ANSI " IIN(6) version(2) [jurisdiction version(2)] entries(2)
//! { subfile type(2) offset(4) length(4) } * entries
//! ```
//!
//! The separator is normally LF RS CR, but some issuers use other control
//! characters. Any three non-alphanumeric bytes are accepted.
//!
//! The jurisdiction version is absent from version 01 (AAMVA 2000) headers.
use std::io::{self, BufRead};

const PREFIX_SIZE: usize = 9;

const SUBFILE_DESIGNATOR_SIZE: usize = 2 + 4 + 4;

const COMPLIANCE_INDICATOR: u8 = b'@';

const FILE_TYPE: [u8; 5] = *b"ANSI ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Issuer Identification Number of the jurisdiction.
    pub issuer_id: u32,

    /// AAMVA card design standard version.
    pub version: u8,

    pub jurisdiction_version: Option<u8>,

    /// Number of subfile designators following the header.
    pub entry_count: u8,
}

impl Header {
    pub fn decode(reader: &mut impl BufRead) -> io::Result<Self> {
        check_prefix(read_array(reader)?)?;

        let issuer_id = decode_digits6(read_array(reader)?)?;
        let version = decode_digits2(read_array(reader)?)?;
        let jurisdiction_version = if version >= 2 {
            Some(decode_digits2(read_array(reader)?)?)
        } else {
            None
        };

        Ok(Self {
            issuer_id,
            version,
            jurisdiction_version,
            entry_count: decode_digits2(read_array(reader)?)?,
        })
    }

    /// Encoded size of the header, without subfile designators.
    pub fn encoded_len(&self) -> usize {
        let jurisdiction = if self.jurisdiction_version.is_some() { 2 } else { 0 };
        PREFIX_SIZE + 6 + 2 + jurisdiction + 2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubfileDesignator {
    pub subfile_type: [u8; 2],
    pub offset: u64,
    pub length: u64,
}

impl SubfileDesignator {
    pub fn decode(reader: &mut impl BufRead) -> io::Result<Self> {
        Ok(Self {
            subfile_type: read_array(reader)?,
            offset: decode_digits4(read_array(reader)?)?,
            length: decode_digits4(read_array(reader)?)?,
        })
    }
}

/// Header and subfile designators of a scanned payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    header: Header,
    subfile_designators: Vec<SubfileDesignator>,
}

impl File {
    pub fn decode(reader: &mut impl BufRead) -> io::Result<Self> {
        let header = Header::decode(reader)?;

        let entry_count = header.entry_count as usize;
        let mut subfile_designators = Vec::with_capacity(entry_count);
        for _ in 0..entry_count {
            subfile_designators.push(SubfileDesignator::decode(reader)?);
        }

        Ok(Self {
            header,
            subfile_designators,
        })
    }

    pub fn decode_from_bytes(bytes: &[u8]) -> io::Result<Self> {
        let mut cursor = io::Cursor::new(bytes);
        Self::decode(&mut cursor)
    }

    pub fn header(&self) -> Header {
        self.header
    }

    pub fn subfile_designators(&self) -> &[SubfileDesignator] {
        &self.subfile_designators
    }

    pub fn index_of(&self, subfile_type: &[u8; 2]) -> Option<usize> {
        self.subfile_designators
            .iter()
            .position(|d| d.subfile_type == *subfile_type)
    }

    /// Encoded size of the header and all subfile designators.
    pub fn encoded_len(&self) -> usize {
        self.header.encoded_len() + SUBFILE_DESIGNATOR_SIZE * self.subfile_designators.len()
    }

    /// Byte offset, in `payload`, of the first data element of the first
    /// subfile.
    ///
    /// The subfile is expected right after the designators. Its declared
    /// offset is tried next since some issuers pad the header. Either way the
    /// two byte subfile type must be found there.
    pub fn elements_offset(&self, payload: &[u8]) -> Option<usize> {
        let first = self.subfile_designators.first()?;
        let declared = usize::try_from(first.offset).ok()?;

        [self.encoded_len(), declared]
            .into_iter()
            .find(|&at| payload.get(at..at + 2) == Some(first.subfile_type.as_slice()))
            .map(|at| at + 2)
    }
}

fn check_prefix(prefix: [u8; PREFIX_SIZE]) -> io::Result<()> {
    let (indicator, rest) = prefix.split_at(1);
    let (separator, file_type) = rest.split_at(3);

    if indicator[0] == COMPLIANCE_INDICATOR
        && !separator.iter().any(u8::is_ascii_alphanumeric)
        && file_type == FILE_TYPE
    {
        Ok(())
    } else {
        Err(io::ErrorKind::InvalidData.into())
    }
}

fn read_array<const N: usize>(reader: &mut impl BufRead) -> io::Result<[u8; N]> {
    let mut buffer = [0; N];
    reader.read_exact(&mut buffer)?;
    Ok(buffer)
}

fn decode_digit(d: u8) -> io::Result<u8> {
    if d.is_ascii_digit() {
        Ok(d - b'0')
    } else {
        Err(io::ErrorKind::InvalidData.into())
    }
}

fn decode_digits<const N: usize>(digits: [u8; N]) -> io::Result<u64> {
    digits
        .into_iter()
        .try_fold(0u64, |acc, d| -> io::Result<u64> {
            Ok(acc * 10 + decode_digit(d)? as u64)
        })
}

fn decode_digits2(digits: [u8; 2]) -> io::Result<u8> {
    Ok(decode_digits(digits)? as u8)
}

fn decode_digits4(digits: [u8; 4]) -> io::Result<u64> {
    decode_digits(digits)
}

fn decode_digits6(digits: [u8; 6]) -> io::Result<u32> {
    Ok(decode_digits(digits)? as u32)
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::{File, Header, SubfileDesignator};

    const PAYLOAD: &str = "@\n\x1e\rANSI 636000090002DL00410288ZA03190008DLDAQD1234578\nDCSSMITH\n";

    #[test]
    fn decode_header() {
        let file = File::decode_from_bytes(PAYLOAD.as_bytes()).unwrap();

        assert_eq!(
            file.header(),
            Header {
                issuer_id: 636000,
                version: 9,
                jurisdiction_version: Some(0),
                entry_count: 2
            }
        );
        assert_eq!(
            file.subfile_designators(),
            [
                SubfileDesignator {
                    subfile_type: *b"DL",
                    offset: 41,
                    length: 288
                },
                SubfileDesignator {
                    subfile_type: *b"ZA",
                    offset: 319,
                    length: 8
                }
            ]
        );
        assert_eq!(file.index_of(b"ZA"), Some(1));
        assert_eq!(file.index_of(b"ID"), None);
        assert_eq!(file.encoded_len(), 41);
    }

    #[test]
    fn locate_first_elements() {
        let file = File::decode_from_bytes(PAYLOAD.as_bytes()).unwrap();
        let at = file.elements_offset(PAYLOAD.as_bytes()).unwrap();

        assert!(PAYLOAD[at..].starts_with("DAQD1234578\n"));
    }

    #[test]
    fn locate_using_declared_offset() {
        // Two padding bytes between the designators and the subfile.
        let payload = "@\n\x1e\rANSI 636000090001DL00330010\n\nDLDAQX\n";
        let file = File::decode_from_bytes(payload.as_bytes()).unwrap();
        let at = file.elements_offset(payload.as_bytes()).unwrap();

        assert_eq!(&payload[at..], "DAQX\n");
    }

    #[test]
    fn version_one_has_no_jurisdiction_version() {
        let payload = "@\n\x1e\rANSI 6360000101DL00290010DLDAQX\n";
        let file = File::decode_from_bytes(payload.as_bytes()).unwrap();

        assert_eq!(file.header().jurisdiction_version, None);
        assert_eq!(file.encoded_len(), 29);
        let at = file.elements_offset(payload.as_bytes()).unwrap();
        assert_eq!(&payload[at..], "DAQX\n");
    }

    #[test]
    fn reject_bad_prefix_or_digits() {
        let e = File::decode_from_bytes(b"@\nANSI 636000090002").unwrap_err();
        assert_eq!(e.kind(), io::ErrorKind::InvalidData);

        let e = File::decode_from_bytes(b"@\n\x1e\rANSI 63600X090002").unwrap_err();
        assert_eq!(e.kind(), io::ErrorKind::InvalidData);

        let e = File::decode_from_bytes(b"@\n\x1e\rANSI 6360").unwrap_err();
        assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof);

        let e = File::decode_from_bytes(b"@\nA\rANSI 636000090002").unwrap_err();
        assert_eq!(e.kind(), io::ErrorKind::InvalidData);

        let e = File::decode_from_bytes(b"#\n\x1e\rANSI 636000090002").unwrap_err();
        assert_eq!(e.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn other_separator_bytes() {
        let payload = "@\n\x1c\rANSI 636000090001DL00310020DLDAQX\n";
        let file = File::decode_from_bytes(payload.as_bytes()).unwrap();

        assert_eq!(file.header().issuer_id, 636000);
        let at = file.elements_offset(payload.as_bytes()).unwrap();
        assert_eq!(&payload[at..], "DAQX\n");
    }

    #[test]
    fn missing_subfile_type() {
        let payload = "@\n\x1e\rANSI 636000090001DL00310010ZZDAQX\n";
        let file = File::decode_from_bytes(payload.as_bytes()).unwrap();
        assert_eq!(file.elements_offset(payload.as_bytes()), None);
    }
}
