use serde::de::DeserializeOwned;
use serde::Serialize;

/// Document encoding used by a [`RecordStore`](crate::RecordStore).
///
/// The store never interprets document bytes; it only asks the codec to
/// turn values into bytes and back, and to name the file suffix records are
/// stored under. Decode errors are returned as plain strings so the store
/// can attach the offending path.
pub trait Codec: Send + Sync {
    /// File suffix for stored records, without the leading dot.
    fn extension(&self) -> &str;

    /// Encode a document. The store appends the trailing newline.
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, String>;

    /// Decode a document from the exact bytes stored on disk.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, String>;
}

/// Pretty-printed, tab-indented JSON.
///
/// `serde_json` is built with `arbitrary_precision`, so a
/// [`serde_json::Number`] field round-trips digit-for-digit.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl JsonCodec {
    pub const EXTENSION: &'static str = "json";
}

impl Codec for JsonCodec {
    fn extension(&self) -> &str {
        Self::EXTENSION
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, String> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        value.serialize(&mut ser).map_err(|e| e.to_string())?;
        Ok(out)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, String> {
        serde_json::from_slice(bytes).map_err(|e| e.to_string())
    }
}
