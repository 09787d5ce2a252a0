#![warn(clippy::pedantic)]

pub mod error;
pub mod record;
pub mod text;

pub use error::WireError;
pub use record::{Record, RecordField, RecordFrame, RecordHeader};
pub use text::{DecodedText, TextEncoding, decode_text};
