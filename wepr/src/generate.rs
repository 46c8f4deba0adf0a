//! Generate API (`POST /api/generate`).

use std::sync::Arc;

use tracing::{debug, warn};

use crate::client::ClientInner;
use crate::error::{Error, Result};

pub use wepr_types::generate::{GenerateOptions, GenerateRequest, GenerateResponse};

#[derive(Clone)]
pub struct Generate {
    pub(crate) inner: Arc<ClientInner>,
}

impl Generate {
    pub(crate) const fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// 生成文本并返回每个 token 的 logprobs。
    ///
    /// Streaming is always disabled and logprobs are always requested; when
    /// the request does not set `top_logprobs` the client default is used.
    ///
    /// # Errors
    /// 当请求失败或响应解析失败时返回错误。
    pub async fn generate(&self, mut request: GenerateRequest) -> Result<GenerateResponse> {
        request.stream = false;
        request.logprobs = true;
        if request.top_logprobs.is_none() {
            request.top_logprobs = Some(self.inner.config.top_logprobs);
        }

        let url = build_generate_url(&self.inner);
        debug!(model = %request.model, %url, "sending generate request");
        let response = self.inner.http.post(url).json(&request).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            warn!(status, model = %request.model, "generate request failed");
            return Err(Error::ApiError { status, message });
        }
        Ok(response.json::<GenerateResponse>().await?)
    }
}

fn build_generate_url(inner: &ClientInner) -> String {
    format!("{}api/generate", inner.config.base_url)
}
