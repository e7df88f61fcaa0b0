/// Process-level settings read from the environment, shared by every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_level: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub inter_request_delay_ms: u64,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    /// Output path template; see `shelfscan_export::render_output_path`.
    pub output_template: String,
}
