#![warn(clippy::pedantic)]

pub mod encoder;
pub mod error;

pub use encoder::IdmapEncoder;
pub use error::EncodeError;
