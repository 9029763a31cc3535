//! Configuration for file-backed block sources.

/// Options applied when a file is mapped.
#[derive(Clone, Debug, Default)]
pub struct FileSourceConfig {
    /// Pre-fault the whole mapping at bind time (`MAP_POPULATE` on Linux,
    /// ignored elsewhere). Trades a slower bind for reads that do not fault.
    pub populate: bool,
}

impl FileSourceConfig {
    /// Defaults with `populate` set.
    pub fn populated() -> Self {
        Self { populate: true }
    }
}
