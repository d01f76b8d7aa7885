use indexmap::IndexMap;

use super::DlElement;

/// Length of an element identifier, in bytes.
pub const ID_LENGTH: usize = 3;

const DATA_ELEMENT_SEPARATOR: char = '\n';

/// Element identifier to value mapping read from a scanned payload.
///
/// Entries keep the order in which identifiers first appeared. A repeated
/// identifier replaces the previous value.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    entries: IndexMap<[u8; ID_LENGTH], String>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every `\n` separated line of `payload`.
    ///
    /// Lines of at most [`ID_LENGTH`] bytes (header fragments, separators)
    /// are skipped. For the others, the first three bytes are the element
    /// identifier and the rest, trimmed, is the value.
    pub fn tokenize(payload: &str) -> Self {
        let mut result = Self::new();

        for line in payload.split(DATA_ELEMENT_SEPARATOR) {
            let bytes = line.as_bytes();
            if bytes.len() <= ID_LENGTH {
                log::trace!("skipping short line {line:?}");
                continue;
            }

            let (id, value) = bytes.split_at(ID_LENGTH);
            let mut field = [0u8; ID_LENGTH];
            field.copy_from_slice(id);

            let value = String::from_utf8_lossy(value);
            result.insert(field, value.trim());
        }

        result
    }

    pub fn insert(&mut self, id: [u8; ID_LENGTH], value: impl Into<String>) -> Option<String> {
        let value = value.into();
        log::trace!("element {} = {value:?}", String::from_utf8_lossy(&id));
        self.entries.insert(id, value)
    }

    pub fn get_id(&self, id: &[u8; ID_LENGTH]) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    pub fn get(&self, element: DlElement) -> Option<&str> {
        self.get_id(element.id())
    }

    /// Value of `element`, or the empty string when it was not scanned.
    pub fn get_or_empty(&self, element: DlElement) -> &str {
        self.get(element).unwrap_or_default()
    }

    pub fn contains(&self, element: DlElement) -> bool {
        self.entries.contains_key(element.id())
    }

    /// Returns `true` if at least one element of [`DlElement::LIST`] is
    /// present.
    pub fn has_known_elements(&self) -> bool {
        DlElement::LIST.iter().any(|e| self.contains(*e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[u8; ID_LENGTH], &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for FieldMapping {
    /// Builds a mapping from `(identifier, value)` pairs. Identifiers that
    /// are not exactly three bytes long are ignored.
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str)>>(iter: T) -> Self {
        let mut result = Self::new();

        for (id, value) in iter {
            if let Ok(id) = <[u8; ID_LENGTH]>::try_from(id.as_bytes()) {
                result.insert(id, value);
            }
        }

        result
    }
}
