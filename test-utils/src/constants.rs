use std::time::Duration;

pub const MOCK_NODE_START_TIMEOUT: Duration = Duration::from_millis(5000);
pub const MOCK_NODE_BODY_LIMIT_MIB: u64 = 4;
