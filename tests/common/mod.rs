#![allow(dead_code)]

use headlines::config::Config;
use httpmock::MockServer;

pub fn setup_server() -> MockServer {
    MockServer::start()
}

pub fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.api.base_url = server.base_url();
    config.api.request_timeout_secs = 5;
    config
}

/// A port nothing listens on.
pub const DEAD_BASE_URL: &str = "http://127.0.0.1:1";
