//! Test configuration helpers pointing the library at a mock site

use radio_dl::{Config, KolHayStation, PartialFailurePolicy};
use tempfile::TempDir;
use wiremock::MockServer;

/// Default configuration with the Kol-Hay site redirected to `server`
pub fn site_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.site.kol_hay_base_url = server.uri();
    config
}

/// Same as [`site_config`] with a partial-failure policy
pub fn site_config_with_policy(server: &MockServer, policy: PartialFailurePolicy) -> Config {
    let mut config = site_config(server);
    config.fetch.partial_failure = policy;
    config
}

/// Kol-Hay station backed by the mock site
pub fn station(server: &MockServer) -> KolHayStation {
    KolHayStation::new(&site_config(server)).unwrap_or_else(|e| panic!("station: {}", e))
}

/// Temporary output directory
pub fn output_dir() -> TempDir {
    TempDir::new().unwrap_or_else(|e| panic!("temp dir: {}", e))
}
