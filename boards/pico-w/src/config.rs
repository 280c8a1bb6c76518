#![deny(unsafe_code)]
#![deny(warnings)]
//! Compiled-in configuration structures
//!
//! Wi-Fi credentials are taken from the `WIFI_SSID` and `WIFI_PASSWORD`
//! environment variables at build time.

/// Wi-Fi association configuration
#[derive(Debug, Clone)]
pub struct WifiConfig {
    /// Network name
    pub ssid: &'static str,
    /// WPA2 passphrase, empty for an open network
    pub password: &'static str,
    /// Join attempts before startup is declared failed
    pub join_attempts: usize,
    /// Pause between join attempts in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for WifiConfig {
    fn default() -> Self {
        Self {
            ssid: match option_env!("WIFI_SSID") {
                Some(ssid) => ssid,
                None => "pico-thermo",
            },
            password: match option_env!("WIFI_PASSWORD") {
                Some(password) => password,
                None => "",
            },
            join_attempts: 5,
            retry_delay_ms: 2000,
        }
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// TCP port to listen on
    pub port: u16,
    /// Socket inactivity timeout in seconds
    pub socket_timeout_secs: u64,
    /// Upper bound on handling one request, in seconds
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 80,
            socket_timeout_secs: 10,
            request_timeout_secs: 15,
        }
    }
}

/// Analog sampling configuration
#[derive(Debug, Clone)]
pub struct SensorConfig {
    /// Upper bound on one ADC conversion in milliseconds
    pub read_timeout_ms: u64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            read_timeout_ms: 50,
        }
    }
}
