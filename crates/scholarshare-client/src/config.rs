use std::time::Duration;

use scholarshare_core::retry::RetryPolicy;

/// Default verification-code TTL in seconds.
///
/// Source screens disagreed (120, 180 and 300 were all in use); 180 is the
/// value the registration flow shipped with and is the documented default.
pub const DEFAULT_CODE_TTL_SECS: u64 = 180;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// REST API base URL (e.g. "https://api.scholarshare.example/api").
    pub api_base_url: String,
    /// EmailJS credentials for code delivery.
    pub emailjs: EmailJsConfig,
    /// Verification-code TTL in seconds. Env var: `CODE_TTL_SECS`.
    pub code_ttl_secs: u64,
    /// Retry budget for idempotent reads. Env vars: `RETRY_MAX_ATTEMPTS`,
    /// `RETRY_DELAY_MS`.
    pub retry: RetryPolicy,
}

#[derive(Debug, Clone)]
pub struct EmailJsConfig {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let defaults = RetryPolicy::default();
        Self {
            api_base_url: std::env::var("SCHOLARSHARE_API_URL").expect("SCHOLARSHARE_API_URL"),
            emailjs: EmailJsConfig {
                service_id: std::env::var("EMAILJS_SERVICE_ID").expect("EMAILJS_SERVICE_ID"),
                template_id: std::env::var("EMAILJS_TEMPLATE_ID").expect("EMAILJS_TEMPLATE_ID"),
                public_key: std::env::var("EMAILJS_PUBLIC_KEY").expect("EMAILJS_PUBLIC_KEY"),
            },
            code_ttl_secs: std::env::var("CODE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CODE_TTL_SECS),
            retry: RetryPolicy {
                max_attempts: std::env::var("RETRY_MAX_ATTEMPTS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.max_attempts),
                delay: std::env::var("RETRY_DELAY_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.delay),
            },
        }
    }
}
