//! The HTTP transport: one blocking POST per call.

use tracing::{debug, trace, warn};
use zonepull_protocol::{Codec, Reply, Request};

use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult};

/// Blocking client for the OpenXML API endpoint.
///
/// Each [`ApiClient::call`] renders the request, POSTs it, reads the
/// complete reply body and parses it. A non-zero fault code in the
/// parsed reply is returned as a normal reply, not an error; only
/// transport and wire-format failures abort the call.
pub struct ApiClient {
    http: reqwest::blocking::Client,
    config: ApiConfig,
    codec: Codec,
}

impl ApiClient {
    /// Creates a client from the given configuration.
    pub fn new(config: ApiConfig) -> ClientResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls)
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            http,
            config,
            codec: Codec::new(),
        })
    }

    /// Replaces the wire codec (e.g. for another declared charset).
    pub fn with_codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Sends the request and parses the reply envelope.
    pub fn call(&self, request: &mut Request) -> ClientResult<Reply> {
        let body = self.send(request)?;
        Ok(Reply::parse(&body)?)
    }

    /// Sends the request and returns the raw reply text unparsed.
    pub fn call_raw(&self, request: &mut Request) -> ClientResult<String> {
        self.send(request)
    }

    fn send(&self, request: &mut Request) -> ClientResult<String> {
        let body = request.render(&self.codec)?.to_owned();
        if self.config.debug {
            debug!(target: "zonepull::wire", "request: {body}");
        }

        trace!(url = %self.config.url, "posting request");
        let response = self
            .http
            .post(self.config.url.clone())
            .header("Content-Type", "text/xml; charset=utf-8")
            .body(body)
            .send()?;
        let text = response.text()?;

        if text.is_empty() {
            warn!("server returned an empty reply");
            return Err(ClientError::EmptyReply);
        }
        if self.config.debug {
            debug!(target: "zonepull::wire", "reply: {text}");
        }
        Ok(text)
    }
}
