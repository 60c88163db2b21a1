// Adapters layer: concrete implementations of the domain ports for the external systems.

pub mod inventory;
pub mod ssh;

pub use inventory::InventoryClient;
pub use ssh::SshCommandRunner;
