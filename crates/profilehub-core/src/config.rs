use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("PROFILEHUB_ENV", "development"))?;
    let bind_addr = parse_addr("PROFILEHUB_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("PROFILEHUB_LOG_LEVEL", "info");

    let upstream_timeout_secs = parse_u64("PROFILEHUB_UPSTREAM_TIMEOUT_SECS", "30")?;
    let request_deadline_ms = parse_u64("PROFILEHUB_REQUEST_DEADLINE_MS", "10000")?;
    if request_deadline_ms == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PROFILEHUB_REQUEST_DEADLINE_MS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let cache_ttl_secs = parse_u64("PROFILEHUB_CACHE_TTL_SECS", "60")?;
    let user_agent = or_default(
        "PROFILEHUB_USER_AGENT",
        "profilehub/0.1 (business-profile-aggregation)",
    );

    let accounts_base_url = or_default(
        "PROFILEHUB_ACCOUNTS_BASE_URL",
        "https://mybusinessaccountmanagement.googleapis.com/v1",
    );
    let business_info_base_url = or_default(
        "PROFILEHUB_BUSINESS_INFO_BASE_URL",
        "https://mybusinessbusinessinformation.googleapis.com/v1",
    );
    let v4_base_url = or_default("PROFILEHUB_V4_BASE_URL", "https://mybusiness.googleapis.com/v4");

    let region_code = or_default("PROFILEHUB_REGION_CODE", "IN");
    let language_code = or_default("PROFILEHUB_LANGUAGE_CODE", "en");
    let category_name = or_default("PROFILEHUB_CATEGORY_NAME", "gcid:corporate_office");
    let reviews_page_size = parse_u32("PROFILEHUB_REVIEWS_PAGE_SIZE", "20")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        upstream_timeout_secs,
        request_deadline_ms,
        cache_ttl_secs,
        user_agent,
        accounts_base_url,
        business_info_base_url,
        v4_base_url,
        region_code,
        language_code,
        category_name,
        reviews_page_size,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PROFILEHUB_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
