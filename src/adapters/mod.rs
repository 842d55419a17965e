// Adapters layer: concrete implementations of the domain ports for external systems.

pub mod history;
pub mod mmcli;

pub use history::{MemoryHistory, SqliteHistory};
pub use mmcli::MmcliDevice;
