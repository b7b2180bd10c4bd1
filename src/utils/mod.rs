pub mod provider;
pub mod units;
