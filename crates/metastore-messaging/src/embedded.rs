//! Typed handle for record text embedded in a message.

use std::fmt;
use std::marker::PhantomData;

use metastore_api::{decode_record, encode_record, CatalogObject, RecordCodecError};

/// Encoded text of one catalog record of type `T`.
///
/// The text is opaque to the envelope layer; it is only ever produced by
/// [`Embedded::encode`] or read verbatim from an envelope.
pub struct Embedded<T> {
    text: String,
    _record: PhantomData<fn() -> T>,
}

impl<T: CatalogObject> Embedded<T> {
    /// Encode a whole record.
    pub fn encode(record: &T) -> Result<Self, RecordCodecError> {
        Ok(Self::from_text(encode_record(record)?))
    }

    /// Decode into a new record value.
    pub fn decode(&self) -> Result<T, RecordCodecError> {
        decode_record(&self.text)
    }
}

impl<T> Embedded<T> {
    /// Wrap text taken from an envelope without decoding it.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            _record: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl<T> Clone for Embedded<T> {
    fn clone(&self) -> Self {
        Self::from_text(self.text.clone())
    }
}

impl<T> PartialEq for Embedded<T> {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl<T> Eq for Embedded<T> {}

impl<T> fmt::Debug for Embedded<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Embedded")
            .field(&format_args!("{} chars", self.text.len()))
            .finish()
    }
}
