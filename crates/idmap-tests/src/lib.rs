//! Shared fixtures for the idmap integration tests and benchmarks.

use idmap_encoder::IdmapEncoder;
use idmap_import::{NamingSink, ResolvedName};

/// Build a well-formed payload with `count` records.
///
/// Offsets step by 0x10 starting at 0x1000; names look like
/// `sub_00001000`.
#[must_use]
pub fn synthetic_map(count: u32) -> Vec<u8> {
    let mut encoder = IdmapEncoder::new();
    for i in 0..count {
        let offset = 0x1000 + i * 0x10;
        encoder.add_name(offset, &format!("sub_{offset:08X}"));
    }
    encoder
        .encode()
        .unwrap_or_else(|e| panic!("synthetic map must encode: {e}"))
}

/// Sink that discards names but counts calls. Used where only throughput
/// matters.
#[derive(Debug, Default)]
pub struct CountingSink {
    pub calls: usize,
    pub last_address: u64,
}

impl NamingSink for CountingSink {
    fn apply_name(&mut self, address: u64, _name: &str) {
        self.calls += 1;
        self.last_address = address;
    }
}

/// Render resolved names the way `idmap import` prints them.
#[must_use]
pub fn render_table(entries: &[ResolvedName]) -> String {
    entries
        .iter()
        .map(|e| format!("{:#X}  {}", e.address, e.name))
        .collect::<Vec<_>>()
        .join("\n")
}
