//! Transport seam between the pipeline and the inference service.
//!
//! [`Backend`] is the only place the controller touches the network, which
//! keeps the pipeline testable against scripted byte streams. [`HttpBackend`]
//! is the real implementation speaking the service's HTTP contract.

use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;

use crate::error::{Error, Result};
use crate::vocab::VocabPayload;

/// Raw body chunks of one open generation stream.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// Remote inference service, reduced to the two calls the pipeline makes.
pub trait Backend {
    /// Fetch the character vocabulary. Called once per session.
    fn fetch_vocab(&self) -> impl std::future::Future<Output = Result<VocabPayload>> + Send;

    /// Open one streaming generation request for the given normalized prefix
    /// and sampling temperature (the service accepts `[0.1, 1.5]`).
    fn open_stream(
        &self,
        prefix: &str,
        temperature: f32,
    ) -> impl std::future::Future<Output = Result<ByteStream>> + Send;
}

/// HTTP implementation of [`Backend`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a backend targeting `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Backend for HttpBackend {
    async fn fetch_vocab(&self) -> Result<VocabPayload> {
        let url = format!("{}/vocab", self.base_url);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Error::BackendStatus(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }

    async fn open_stream(&self, prefix: &str, temperature: f32) -> Result<ByteStream> {
        let url = format!("{}/generate/stream", self.base_url);
        let temperature = temperature.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[("prefix", prefix), ("temperature", temperature.as_str())])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Error::BackendStatus(response.status().as_u16()));
        }
        Ok(response.bytes_stream().map(|chunk| chunk.map_err(Error::from)).boxed())
    }
}
