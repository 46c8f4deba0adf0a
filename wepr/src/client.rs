//! Client configuration and transport layer.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client as HttpClient, Proxy};

use crate::error::{Error, Result};

/// Ollama 默认地址。
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434/";
/// Candidates requested per generated token.
pub const DEFAULT_TOP_LOGPROBS: u32 = 20;

/// Ollama 客户端。
#[derive(Clone)]
pub struct Client {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub http: HttpClient,
    pub config: ClientConfig,
}

/// 客户端配置。
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// 规范化后的基础 URL（以 `/` 结尾）。
    pub base_url: String,
    /// 每个 token 请求的候选数。
    pub top_logprobs: u32,
    /// HTTP 配置。
    pub http_options: HttpOptions,
}

/// HTTP 配置。
#[derive(Debug, Clone, Default)]
pub struct HttpOptions {
    pub timeout: Option<u64>,
    pub proxy: Option<String>,
    pub headers: HashMap<String, String>,
}

impl Client {
    /// 使用默认配置创建客户端（`http://localhost:11434`）。
    ///
    /// # Errors
    /// 当构建 HTTP 客户端失败时返回错误。
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// 从环境变量创建客户端。
    ///
    /// `OLLAMA_HOST` takes precedence over `WEPR_OLLAMA_URL`; blank values
    /// are ignored and the default address is used.
    ///
    /// # Errors
    /// 当构建客户端失败时返回错误。
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env().build()
    }

    /// 创建 Builder。
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// 访问 Generate API。
    #[must_use]
    pub fn generate(&self) -> crate::generate::Generate {
        crate::generate::Generate::new(self.inner.clone())
    }

    /// 当前配置。
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

/// 客户端 Builder。
#[derive(Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    top_logprobs: Option<u32>,
    http_options: HttpOptions,
}

impl ClientBuilder {
    /// 应用环境变量中的 Ollama 地址（`OLLAMA_HOST`，其次 `WEPR_OLLAMA_URL`）。
    #[must_use]
    pub fn with_env(mut self) -> Self {
        if let Ok(base_url) =
            std::env::var("OLLAMA_HOST").or_else(|_| std::env::var("WEPR_OLLAMA_URL"))
        {
            if !base_url.trim().is_empty() {
                self.base_url = Some(base_url);
            }
        }
        self
    }

    /// 设置 Ollama 地址。
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// 设置每个 token 的候选数。
    #[must_use]
    pub const fn top_logprobs(mut self, top_logprobs: u32) -> Self {
        self.top_logprobs = Some(top_logprobs);
        self
    }

    /// 设置请求超时（秒）。
    #[must_use]
    pub const fn timeout(mut self, secs: u64) -> Self {
        self.http_options.timeout = Some(secs);
        self
    }

    /// 设置代理。
    #[must_use]
    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.http_options.proxy = Some(url.into());
        self
    }

    /// 增加默认 HTTP 头。
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.http_options.headers.insert(key.into(), value.into());
        self
    }

    /// 构建客户端。
    ///
    /// # Errors
    /// 当参数无效或构建 HTTP 客户端失败时返回错误。
    pub fn build(self) -> Result<Client> {
        let Self {
            base_url,
            top_logprobs,
            http_options,
        } = self;

        let top_logprobs = top_logprobs.unwrap_or(DEFAULT_TOP_LOGPROBS);
        if top_logprobs == 0 {
            return Err(Error::InvalidConfig {
                message: "top_logprobs must be at least 1".into(),
            });
        }
        let base_url = base_url
            .as_deref()
            .map_or_else(|| DEFAULT_BASE_URL.to_string(), normalize_base_url);
        let headers = Self::build_headers(&http_options)?;
        let http = Self::build_http_client(&http_options, headers)?;

        Ok(Client {
            inner: Arc::new(ClientInner {
                http,
                config: ClientConfig {
                    base_url,
                    top_logprobs,
                    http_options,
                },
            }),
        })
    }

    fn build_headers(http_options: &HttpOptions) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (key, value) in &http_options.headers {
            let name =
                HeaderName::from_bytes(key.as_bytes()).map_err(|_| Error::InvalidConfig {
                    message: format!("Invalid header name: {key}"),
                })?;
            let value = HeaderValue::from_str(value).map_err(|_| Error::InvalidConfig {
                message: format!("Invalid header value for {key}"),
            })?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    fn build_http_client(http_options: &HttpOptions, headers: HeaderMap) -> Result<HttpClient> {
        let mut http_builder = HttpClient::builder();
        if let Some(timeout) = http_options.timeout {
            http_builder = http_builder.timeout(Duration::from_secs(timeout));
        }

        if let Some(proxy_url) = &http_options.proxy {
            let proxy = Proxy::all(proxy_url).map_err(|e| Error::InvalidConfig {
                message: format!("Invalid proxy: {e}"),
            })?;
            http_builder = http_builder.proxy(proxy);
        }

        if !headers.is_empty() {
            http_builder = http_builder.default_headers(headers);
        }

        Ok(http_builder.build()?)
    }
}

/// Adds a scheme when missing (`OLLAMA_HOST=0.0.0.0:11434` is common) and a
/// trailing slash.
fn normalize_base_url(base_url: &str) -> String {
    let mut value = base_url.trim().to_string();
    if !value.contains("://") {
        value = format!("http://{value}");
    }
    if !value.ends_with('/') {
        value.push('/');
    }
    value
}
