use super::RequestsLoggingLevel;

#[derive(Clone)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    /// Skips the governor layers entirely. Meant for test harnesses that
    /// hammer the API from one address.
    pub disable_rate_limit: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 3001,
            disable_rate_limit: false,
        }
    }
}
