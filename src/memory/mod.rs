// Tue Jan 13 2026 - Alex

pub mod address;
pub mod buffer;
pub mod error;
pub mod process;
pub mod region;
pub mod traits;

pub use address::Address;
pub use buffer::BufferMemory;
pub use error::MemoryError;
pub use process::ProcessMemory;
pub use region::Region;
pub use traits::MemoryReader;
