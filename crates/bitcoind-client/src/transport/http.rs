use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, AUTHORIZATION};
use tracing::{debug, enabled, Level};

use crate::error::ClientError;
use crate::obfuscate::Obfuscator;

use super::{HttpMethod, HttpRequest, HttpResponse, Transport};

/// `reqwest`-backed transport. Requests and responses are logged at debug
/// level with secrets masked by the [`Obfuscator`].
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    auth: Option<(String, String)>,
    obfuscator: Obfuscator,
}

impl HttpTransport {
    /// `strict_ssl = false` accepts any server certificate.
    pub fn new(
        base_url: String,
        auth: Option<(String, String)>,
        timeout: Duration,
        strict_ssl: bool,
        obfuscator: Obfuscator,
    ) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10).min(timeout))
            .timeout(timeout)
            .pool_max_idle_per_host(32)
            .tcp_nodelay(true)
            .danger_accept_invalid_certs(!strict_ssl)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            auth,
            obfuscator,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self
                .client
                .post(&url)
                .header(header::CONTENT_TYPE, "application/json"),
        };
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        if let Some((ref user, ref pass)) = self.auth {
            builder = builder.basic_auth(user, Some(pass));
        }
        let outgoing = builder.build()?;

        let logging = enabled!(Level::DEBUG);
        let sent_body = logging.then(|| {
            outgoing
                .body()
                .and_then(reqwest::Body::as_bytes)
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        });
        if let Some(sent_body) = &sent_body {
            let authorization = outgoing
                .headers()
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .map(|value| self.obfuscator.authorization(value).into_owned());
            let body = sent_body
                .as_deref()
                .map(|body| self.obfuscator.request_body(body).into_owned());
            debug!(
                http.method = %outgoing.method(),
                http.url = %url,
                http.authorization = authorization.as_deref().unwrap_or("-"),
                body = body.as_deref().unwrap_or(""),
                "making request"
            );
        }

        let response = self.client.execute(outgoing).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        if let Some(sent_body) = &sent_body {
            let content_type = headers
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok());
            let masked =
                self.obfuscator
                    .response_body(sent_body.as_deref(), content_type, &body);
            debug!(
                http.url = %url,
                http.status = %status,
                body_len = body.len(),
                body = %masked,
                "received response"
            );
        }

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
