pub mod adapter;
pub mod evm;
#[cfg(test)]
pub mod mock;
