use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek};
use std::path::PathBuf;

/// Where an import reads its bytes from.
///
/// `open` consumes the source: one source feeds exactly one run.
pub trait ByteSource {
    type Reader: Read + Seek;

    /// Open the underlying bytes for reading from the start.
    ///
    /// # Errors
    ///
    /// Any I/O error that prevents reading at all (missing file,
    /// permission denied, ...).
    fn open(self) -> io::Result<Self::Reader>;

    /// Human-readable origin for logs and errors.
    fn describe(&self) -> String;
}

/// A file on disk.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ByteSource for FileSource {
    type Reader = BufReader<File>;

    fn open(self) -> io::Result<Self::Reader> {
        File::open(&self.path).map(BufReader::new)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Bytes already in memory.
#[derive(Clone, Debug)]
pub struct MemorySource {
    bytes: Vec<u8>,
}

impl MemorySource {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl ByteSource for MemorySource {
    type Reader = Cursor<Vec<u8>>;

    fn open(self) -> io::Result<Self::Reader> {
        Ok(Cursor::new(self.bytes))
    }

    fn describe(&self) -> String {
        format!("<memory, {} bytes>", self.bytes.len())
    }
}
