use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub upstream_timeout_secs: u64,
    /// Budget for one aggregation, resolution included.
    pub request_deadline_ms: u64,
    pub cache_ttl_secs: u64,
    pub user_agent: String,
    pub accounts_base_url: String,
    pub business_info_base_url: String,
    pub v4_base_url: String,
    pub region_code: String,
    pub language_code: String,
    pub category_name: String,
    pub reviews_page_size: u32,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .field("request_deadline_ms", &self.request_deadline_ms)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("user_agent", &self.user_agent)
            .field("accounts_base_url", &self.accounts_base_url)
            .field("business_info_base_url", &self.business_info_base_url)
            .field("v4_base_url", &self.v4_base_url)
            .field("region_code", &self.region_code)
            .field("language_code", &self.language_code)
            .field("category_name", &self.category_name)
            .field("reviews_page_size", &self.reviews_page_size)
            .finish()
    }
}
