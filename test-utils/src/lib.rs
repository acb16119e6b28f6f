mod constants;
mod config_dir;
mod mock_ipfs;
mod ports;

pub use config_dir::setup_config_dir;
pub use mock_ipfs::MockIpfsNode;
pub use ports::{free_local_port, unreachable_api_url};
