//! Reader configuration.

/// Options controlling how containers are opened and checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Memory-map `.ndata` files instead of buffered reads.
    pub use_mmap: bool,
    /// Check each `.ndata` payload against its stored CRC-32.
    pub verify_checksums: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            use_mmap: cfg!(feature = "mmap"),
            verify_checksums: false,
        }
    }
}

impl ReaderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    pub fn with_checksums(mut self, verify: bool) -> Self {
        self.verify_checksums = verify;
        self
    }
}
