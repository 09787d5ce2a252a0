#![warn(clippy::pedantic)]

pub mod decoder;
pub mod end;
pub mod error;
pub mod reader;
pub mod streaming;

pub use decoder::{DecodedMap, IdmapDecoder};
pub use end::{Entry, StreamEnd};
pub use error::DecodeError;
pub use reader::RecordStream;
pub use streaming::AsyncRecordStream;
