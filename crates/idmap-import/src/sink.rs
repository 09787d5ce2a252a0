/// Binds a name to an absolute address in a host symbol table.
///
/// The import never learns whether the host accepted the name. Calls
/// arrive in file order and the same address may be named more than once;
/// how repeats are resolved is up to the implementation.
///
/// Closures `FnMut(u64, &str)` implement this trait, which is usually all
/// a host integration needs.
pub trait NamingSink {
    fn apply_name(&mut self, address: u64, name: &str);
}

impl<F> NamingSink for F
where
    F: FnMut(u64, &str),
{
    fn apply_name(&mut self, address: u64, name: &str) {
        self(address, name);
    }
}

/// Supplies the address the target image was loaded at.
pub trait BaseAddressProvider {
    fn base_address(&self) -> u64;
}

/// A fixed base address.
impl BaseAddressProvider for u64 {
    fn base_address(&self) -> u64 {
        *self
    }
}

/// One name as delivered to a sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedName {
    pub address: u64,
    pub name: String,
}

/// In-memory sink that records every call in order.
///
/// Keeps duplicates. [`latest`](Self::latest) gives the last-write-wins
/// view a real symbol table would end up with.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolTable {
    entries: Vec<ResolvedName>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call received, in call order.
    #[must_use]
    pub fn entries(&self) -> &[ResolvedName] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The name bound last to `address`, if any.
    #[must_use]
    pub fn latest(&self, address: u64) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.address == address)
            .map(|e| e.name.as_str())
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<ResolvedName> {
        self.entries
    }
}

impl NamingSink for SymbolTable {
    fn apply_name(&mut self, address: u64, name: &str) {
        self.entries.push(ResolvedName {
            address,
            name: name.to_owned(),
        });
    }
}
