use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36";
pub const DEFAULT_OUTPUT_TEMPLATE: &str = "output/{retailer}_{brand}_{category}_{date}.csv";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can use a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
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

    let log_level = or_default("SHELFSCAN_LOG_LEVEL", "info");
    let user_agent = or_default("SHELFSCAN_USER_AGENT", DEFAULT_USER_AGENT);
    let request_timeout_secs = parse_u64("SHELFSCAN_REQUEST_TIMEOUT_SECS", "30")?;
    let inter_request_delay_ms = parse_u64("SHELFSCAN_INTER_REQUEST_DELAY_MS", "2000")?;
    let max_retries = parse_u32("SHELFSCAN_MAX_RETRIES", "2")?;
    let retry_backoff_base_secs = parse_u64("SHELFSCAN_RETRY_BACKOFF_BASE_SECS", "2")?;
    let output_template = or_default("SHELFSCAN_OUTPUT_TEMPLATE", DEFAULT_OUTPUT_TEMPLATE);

    if output_template.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHELFSCAN_OUTPUT_TEMPLATE".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    Ok(AppConfig {
        log_level,
        user_agent,
        request_timeout_secs,
        inter_request_delay_ms,
        max_retries,
        retry_backoff_base_secs,
        output_template,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
