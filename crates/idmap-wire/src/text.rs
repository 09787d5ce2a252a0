/// Which text encoding produced a record name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextEncoding {
    /// The bytes were valid UTF-8.
    Utf8,
    /// The bytes were not valid UTF-8 and were mapped one byte per
    /// character (ISO-8859-1).
    Latin1,
}

impl TextEncoding {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin-1",
        }
    }
}

/// Result of decoding a name's raw bytes.
///
/// Both branches carry usable text. The split only exists so callers can
/// count or report names that needed the fallback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodedText {
    Utf8(String),
    Latin1Fallback(String),
}

impl DecodedText {
    #[must_use]
    pub fn encoding(&self) -> TextEncoding {
        match self {
            Self::Utf8(_) => TextEncoding::Utf8,
            Self::Latin1Fallback(_) => TextEncoding::Latin1,
        }
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Latin1Fallback(_))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Utf8(s) | Self::Latin1Fallback(s) => s,
        }
    }

    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Self::Utf8(s) | Self::Latin1Fallback(s) => s,
        }
    }
}

/// Decode a record name.
///
/// Strict UTF-8 is tried first. If the bytes are not valid UTF-8 the same
/// bytes are re-decoded as Latin-1, where every byte value `b` maps to the
/// code point `U+00b`. Latin-1 covers all 256 byte values, so this never
/// fails and no replacement character is ever produced.
///
/// ```text
///   [66 6F 6F]     → Utf8("foo")
///   [66 E9]        → Latin1Fallback("fé")   (0xE9 alone is not UTF-8)
///   [C3 A9]        → Utf8("é")
/// ```
#[must_use]
pub fn decode_text(bytes: Vec<u8>) -> DecodedText {
    match String::from_utf8(bytes) {
        Ok(s) => DecodedText::Utf8(s),
        Err(e) => DecodedText::Latin1Fallback(latin1(e.as_bytes())),
    }
}

// char::from(u8) is exactly the Latin-1 mapping: 0x00..=0xFF → U+0000..=U+00FF.
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}
