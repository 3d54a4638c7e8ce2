use crate::{
    configuration::{SmokeConfiguration, DEFAULT_BASE_URL},
    data::{Post, ResponseData},
    error::Error,
};
use reqwest::{
    blocking::RequestBuilder,
    header::{HeaderMap, CONTENT_TYPE},
};
use std::{collections::HashMap, time::Duration};

type ReqwestClient = reqwest::blocking::Client;

/// Builder used to build a PostsClient instance
#[derive(Debug, Clone, Default)]
pub struct PostsClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl PostsClientBuilder {
    /// Create a new PostsClientBuilder instance.
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: None,
        }
    }

    /// Use the given base URL when building a PostsClient instance.
    ///
    /// # Arguments
    /// `base_url` - scheme and authority of the service, a trailing `/` is ignored.
    ///
    /// # Returns
    /// This builder.
    pub fn with_base_url<T: Into<String>>(mut self, base_url: T) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Give up on a request that takes longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Consume the builder and create a PostsClient instance using all of the previously
    /// configured values or their defaults.
    ///
    /// # Returns
    /// A PostsClient instance, or the error the HTTP client failed to initialize with.
    pub fn build(mut self) -> Result<PostsClient, Error> {
        let mut http_builder = ReqwestClient::builder();
        if let Some(timeout) = self.timeout {
            http_builder = http_builder.timeout(timeout);
        }
        let http = http_builder.build()?;

        let base_url = self
            .base_url
            .take()
            .unwrap_or_else(|| String::from(DEFAULT_BASE_URL));

        Ok(PostsClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// Client of the posts resource of a JSONPlaceholder-style REST service.
///
/// The client only transports: every method hands back the response whatever its status, judging
/// it is up to the caller.
#[derive(Debug, Clone)]
pub struct PostsClient {
    http: ReqwestClient,
    base_url: String,
}

impl PostsClient {
    pub fn from_configuration(configuration: &SmokeConfiguration) -> Result<Self, Error> {
        let mut builder = PostsClientBuilder::new().with_base_url(configuration.base_url());
        if let Some(timeout) = configuration.timeout() {
            builder = builder.with_timeout(timeout);
        }

        builder.build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /posts/{id}`
    pub fn get_post(&self, id: i64) -> Result<ResponseData, Error> {
        self.send(self.http.get(self.url(&format!("/posts/{}", id))))
    }

    /// `GET /posts`
    pub fn list_posts(&self) -> Result<ResponseData, Error> {
        self.send(self.http.get(self.url("/posts")))
    }

    /// `POST /posts` with the post as a JSON body.
    pub fn create_post(&self, post: &Post) -> Result<ResponseData, Error> {
        let body = serde_json::to_string(post)?;

        self.send(
            self.http
                .post(self.url("/posts"))
                .header(CONTENT_TYPE, "application/json")
                .body(body),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send(&self, request: RequestBuilder) -> Result<ResponseData, Error> {
        let request = request.build()?;
        let method = request.method().clone();
        let url = request.url().clone();

        let response = self.http.execute(request)?;
        let status_code = response.status().as_u16();
        let headers = Self::extract_headers(response.headers());
        let body = response.text()?;

        tracing::debug!(%method, %url, status_code, "Received response");

        Ok(ResponseData {
            status_code,
            headers,
            body,
        })
    }

    fn extract_headers(header_map: &HeaderMap) -> HashMap<String, String> {
        // it currently ignores header values with opaque characters
        header_map
            .iter()
            .map(|(k, v)| (String::from(k.as_str()), v.to_str()))
            .filter_map(|(key, value)| value.ok().map(|v| (key, String::from(v))))
            .collect::<HashMap<_, _>>()
    }
}
