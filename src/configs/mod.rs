pub mod global;
pub mod network;
