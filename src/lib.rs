pub mod access;
pub mod address;
pub mod allocator;
pub mod command;
pub mod constants;
pub mod directory;
pub mod error;
pub mod logging;
pub mod memory;
pub mod process;
pub mod report;
pub mod simulator;
pub mod translation;

// Re-export commonly used items for convenience
pub use access::Access;
pub use address::{VirtualAddress, get_address, split_address};
pub use command::{Command, ParseError};
pub use constants::*;
pub use error::{AllocationKind, SimError};
pub use simulator::{SharedSimulator, Simulator};
