use std::net::TcpListener;

/// A local port nothing listens on at the moment of the call.
pub fn free_local_port() -> u16 {
    TcpListener::bind(("127.0.0.1", 0))
        .and_then(|listener| listener.local_addr())
        .expect("failed to find a free local port")
        .port()
}

pub fn unreachable_api_url() -> String {
    format!("http://127.0.0.1:{}", free_local_port())
}
