pub mod network;
pub mod wallet;
