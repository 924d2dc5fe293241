//! Captcha service client.
//!
//! The login handler only sees the `CaptchaService` trait; the binary wires
//! an in-process implementation that logs instead of sending an SMS.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::future::BoxFuture;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptchaError {
    #[error("mobile number is required")]
    MissingMobile,
}

pub trait CaptchaService: Send + Sync {
    fn get_captcha<'a>(&'a self, mobile: &'a str) -> BoxFuture<'a, Result<String, CaptchaError>>;
}

/// Shared handle injected into `/user` requests.
#[derive(Clone)]
pub struct CaptchaClient(Arc<dyn CaptchaService>);

impl CaptchaClient {
    pub fn new(service: Arc<dyn CaptchaService>) -> Self {
        Self(service)
    }

    pub async fn get_captcha(&self, mobile: &str) -> Result<String, CaptchaError> {
        self.0.get_captcha(mobile).await
    }
}

/// Issues a fixed code and logs where it would have been sent.
#[derive(Debug, Default)]
pub struct LocalCaptcha {
    issued: AtomicU64,
}

impl CaptchaService for LocalCaptcha {
    fn get_captcha<'a>(&'a self, mobile: &'a str) -> BoxFuture<'a, Result<String, CaptchaError>> {
        Box::pin(async move {
            if mobile.is_empty() {
                return Err(CaptchaError::MissingMobile);
            }
            let code = "123456".to_string();
            let issued = self.issued.fetch_add(1, Ordering::Relaxed) + 1;
            tracing::info!(mobile, code = %code, issued, "Captcha issued");
            Ok(code)
        })
    }
}
