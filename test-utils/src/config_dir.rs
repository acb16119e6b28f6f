use assert_fs::prelude::*;
use assert_fs::TempDir;

/// Creates `etc/pinnotes/pinnotes.toml` under a temporary root,
/// with `extra` appended verbatim after the api url.
pub fn setup_config_dir(ipfs_api_url: &str, extra: &str) -> TempDir {
    let root = TempDir::new().unwrap();
    let config_dir = root.child("etc/pinnotes");
    config_dir.create_dir_all().unwrap();
    config_dir.child("pinnotes.toml")
        .write_str(&format!("ipfs_api_url = \"{ipfs_api_url}\"\n{extra}"))
        .unwrap();
    root
}
