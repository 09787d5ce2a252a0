#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod pipeline;
pub mod sink;
pub mod source;

pub use config::{ImportConfig, TruncationPolicy};
pub use error::ImportError;
pub use pipeline::{ImportPipeline, ImportResult, resolve_address};
pub use sink::{BaseAddressProvider, NamingSink, ResolvedName, SymbolTable};
pub use source::{ByteSource, FileSource, MemorySource};
