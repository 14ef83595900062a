//! EmailJS adapter for verification-code delivery.
//!
//! Cancellation is the flow's job: it owns the spawned delivery task and
//! aborts it when superseded, which drops the in-flight request here.

use std::future::Future;

use serde_json::json;

use crate::config::EmailJsConfig;
use crate::domain::ports::CodeDelivery;
use crate::domain::types::CodeEmail;
use crate::error::ClientError;

const EMAILJS_SEND_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

#[derive(Clone)]
pub struct EmailJsDelivery {
    http: reqwest::Client,
    config: EmailJsConfig,
    endpoint: String,
}

impl EmailJsDelivery {
    pub fn new(config: EmailJsConfig) -> Self {
        Self::with_endpoint(config, EMAILJS_SEND_URL)
    }

    /// Point at a different endpoint (test servers).
    pub fn with_endpoint(config: EmailJsConfig, endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            endpoint: endpoint.into(),
        }
    }
}

impl CodeDelivery for EmailJsDelivery {
    fn deliver(&self, email: CodeEmail) -> impl Future<Output = Result<(), ClientError>> + Send {
        let http = self.http.clone();
        let endpoint = self.endpoint.clone();
        let body = json!({
            "service_id": self.config.service_id,
            "template_id": self.config.template_id,
            "user_id": self.config.public_key,
            "template_params": {
                "to_name": email.to_name,
                "to_email": email.to_email,
                "verification_code": email.code,
                "requested_by": email.requested_by,
            },
        });
        async move {
            let response = http
                .post(&endpoint)
                .json(&body)
                .send()
                .await
                .map_err(ClientError::delivery_failed)?;
            let status = response.status();
            if !status.is_success() {
                return Err(ClientError::delivery_failed(anyhow::anyhow!(
                    "email provider answered {status}"
                )));
            }
            Ok(())
        }
    }
}
