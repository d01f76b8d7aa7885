use std::{fmt, marker::PhantomData, ops::Deref};

#[derive(Debug, thiserror::Error)]
#[error("invalid field value: {0}")]
pub struct InvalidFieldValue(MaybeAscii);

struct MaybeAscii(Vec<u8>);

impl fmt::Display for MaybeAscii {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.0) {
            Ok(s) if s.is_ascii() => write!(f, "{s:?}"),
            _ => write!(f, "{:?}", self.0),
        }
    }
}

impl fmt::Debug for MaybeAscii {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// ASCII character class.
///
/// # Safety
///
/// The `contains` function must return `true` only for ASCII bytes.
pub unsafe trait CharClass {
    fn contains(c: u8) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Numeric;

unsafe impl CharClass for Numeric {
    fn contains(c: u8) -> bool {
        c.is_ascii_digit()
    }
}

/// Fixed-length field value made of `N` characters of class `C`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed<C: CharClass, const N: usize> {
    data: [u8; N],
    class: PhantomData<C>,
}

impl<C: CharClass, const N: usize> Fixed<C, N> {
    pub fn new(value: impl AsRef<[u8]>) -> Result<Self, InvalidFieldValue> {
        let bytes = value.as_ref();
        if bytes.len() != N || !bytes.iter().copied().all(C::contains) {
            return Err(InvalidFieldValue(MaybeAscii(bytes.to_owned())));
        }

        let mut data = [0u8; N];
        data.copy_from_slice(bytes);

        Ok(Self {
            data,
            class: PhantomData,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_str(&self) -> &str {
        unsafe {
            // SAFETY: the character class `C` ensures that all bytes are in the
            //         ASCII range.
            std::str::from_utf8_unchecked(self.as_bytes())
        }
    }
}

impl<C: CharClass, const N: usize> Deref for Fixed<C, N> {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

/// Eight digit date field (`MMDDYYYY` on US licenses).
pub type F8N = Fixed<Numeric, 8>;

#[cfg(test)]
mod tests {
    use super::F8N;

    #[test]
    fn accepts_eight_digits() {
        let value = F8N::new("01152020").unwrap();
        assert_eq!(value.as_str(), "01152020");
        assert_eq!(&value[..2], "01");
    }

    #[test]
    fn rejects_wrong_length_or_class() {
        assert!(F8N::new("0115202").is_err());
        assert!(F8N::new("011520201").is_err());
        assert!(F8N::new("01-15-20").is_err());
        assert!(F8N::new("").is_err());
    }

    #[test]
    fn error_shows_ascii_as_string() {
        let e = F8N::new("abc").unwrap_err();
        assert_eq!(e.to_string(), "invalid field value: \"abc\"");
    }
}
