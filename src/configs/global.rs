// Local Hardhat deployment (default account, first two deployments)
pub const ESCROW_JOBS_ADDRESS: &str = "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512";
pub const MOCK_USDC_ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

// RPC URLs
pub const LOCAL_RPC_URL: &str = "http://127.0.0.1:8545";

// Config file lookup
pub const CONFIG_CANDIDATES: [&str; 2] = ["./config/config.json", "/config/config.json"];

// Local metadata store
pub const DEFAULT_METADATA_PATH: &str = "./.escrow-jobs/jobs.json";

// Receipt polling
pub const RECEIPT_POLL_INTERVAL_MS: u64 = 1000;
pub const RECEIPT_POLL_RETRIES: u32 = 120;

// Job watching
pub const WATCH_INTERVAL_SECS: u64 = 3;

// Display-only fiat conversions, 1 token unit = N local currency
pub const ARS_PER_TOKEN: f64 = 1000.0;
pub const BRL_PER_TOKEN: f64 = 5.0;
