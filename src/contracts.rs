use alloy::sol;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract EscrowJobs {
        function createJob(uint256 jobId, uint256 amount, address token) external;
        function fundJob(uint256 jobId) external;
        function assignFreelancer(uint256 jobId, address freelancer) external;
        function releasePayment(uint256 jobId) external;

        function jobs(uint256) external view returns (
            uint256 id,
            address client,
            address freelancer,
            uint256 amount,
            address token,
            uint8 status
        );

        #[derive(Debug, PartialEq, Eq)]
        event JobCreated(uint256 indexed jobId, address indexed client, uint256 amount, address token);
        #[derive(Debug, PartialEq, Eq)]
        event JobFunded(uint256 indexed jobId, address indexed client, uint256 amount);
        #[derive(Debug, PartialEq, Eq)]
        event JobAssigned(uint256 indexed jobId, address indexed freelancer);
        #[derive(Debug, PartialEq, Eq)]
        event PaymentReleased(uint256 indexed jobId, address indexed freelancer, uint256 amount);
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract MockUSDC {
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
        function decimals() external view returns (uint8);
        function symbol() external view returns (string);
    }
}
