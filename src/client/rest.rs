//! REST client
//!
//! Thin reqwest wrapper over the platform's JSON API. One collection path
//! per resource kind; objects are addressed as `{collection}/{id}`.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::{ApiClient, ApiError, WireObject};
use crate::reconcile::Kind;

const USER_AGENT: &str = concat!("ngenix-sync/", env!("CARGO_PKG_VERSION"));

/// Connection settings for [`RestClient`]
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the API, e.g. `https://api.ngenix.net/api/v3`
    pub host: String,
    /// Login in the form `email/token`
    pub username: String,
    /// API token
    pub password: String,
    pub customer_id: i64,
    pub timeout: Duration,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("customer_id", &self.customer_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// List endpoints wrap their results
#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    elements: Vec<T>,
}

/// Platform API client
pub struct RestClient {
    client: Client,
    base_url: String,
    config: ClientConfig,
}

impl RestClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;

        let host = config.host.trim_end_matches('/');
        let base_url = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        };

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    fn collection_url(&self, kind: Kind) -> String {
        format!("{}/{}", self.base_url, collection(kind))
    }

    fn object_url(&self, kind: Kind, id: i64) -> String {
        format!("{}/{}", self.collection_url(kind), id)
    }

    /// Send an authenticated request and return the body of a successful response
    async fn execute(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request
            .basic_auth(&self.config.username, Some(&self.config.password))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    async fn execute_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.execute(request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn list<W: WireObject>(&self, name: Option<&str>) -> Result<Vec<W>, ApiError> {
        let mut query = vec![("customerId", self.config.customer_id.to_string())];
        if let Some(name) = name {
            query.push(("name", name.to_string()));
        }

        let request = self.client.get(self.collection_url(W::KIND)).query(&query);
        let response: ListResponse<W> = self.execute_json(request).await?;
        Ok(response.elements)
    }
}

/// Collection path segment for a resource kind
fn collection(kind: Kind) -> &'static str {
    match kind {
        Kind::DnsZone => "dns-zone",
        Kind::TrafficPattern => "traffic-pattern",
        Kind::Ruleset => "ruleset",
    }
}

#[async_trait]
impl ApiClient for RestClient {
    async fn id_by_name<W: WireObject>(&self, name: &str) -> Result<Option<i64>, ApiError> {
        debug!(kind = %W::KIND, name, "Resolving id by name");

        // The name filter is a substring match on the server side
        let id = self
            .list::<W>(Some(name))
            .await?
            .iter()
            .find(|object| object.name() == Some(name))
            .and_then(|object| object.id());
        Ok(id)
    }

    async fn create<W: WireObject>(&self, object: &W) -> Result<W, ApiError> {
        debug!(kind = %W::KIND, "POST {}", collection(W::KIND));
        let request = self.client.post(self.collection_url(W::KIND)).json(object);
        self.execute_json(request).await
    }

    async fn get_by_id<W: WireObject>(&self, id: i64) -> Result<W, ApiError> {
        debug!(kind = %W::KIND, id, "GET {}/{}", collection(W::KIND), id);
        let request = self.client.get(self.object_url(W::KIND, id));
        self.execute_json(request).await
    }

    async fn update<W: WireObject>(&self, id: i64, object: &W) -> Result<W, ApiError> {
        debug!(kind = %W::KIND, id, "PATCH {}/{}", collection(W::KIND), id);
        let request = self.client.patch(self.object_url(W::KIND, id)).json(object);
        self.execute_json(request).await
    }

    async fn delete<W: WireObject>(&self, id: i64) -> Result<(), ApiError> {
        debug!(kind = %W::KIND, id, "DELETE {}/{}", collection(W::KIND), id);
        let request = self.client.delete(self.object_url(W::KIND, id));
        self.execute(request).await?;
        Ok(())
    }

    async fn list_all<W: WireObject>(&self) -> Result<Vec<W>, ApiError> {
        debug!(kind = %W::KIND, "Listing all");
        self.list(None).await
    }

    fn customer_id(&self) -> i64 {
        self.config.customer_id
    }
}
