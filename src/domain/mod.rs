pub mod device;
pub mod snapshot;

pub use device::*;
pub use snapshot::*;
