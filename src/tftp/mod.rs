pub mod shared;
pub mod transport;
