//! Request wrappers for the book API.
//!
//! [`BookService`] is the seam the table page talks to; [`HttpBookService`]
//! is the reqwest-backed implementation. Every call is a single attempt with
//! no retry.
//!
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ServiceError;
use crate::model::{FormValues, QueryParams, TableListData};

/// The four operations the table page needs from the backend.
#[async_trait]
pub trait BookService: Send + Sync {
    /// Fetch one page of records.
    async fn fetch_list(&self, params: &QueryParams) -> Result<TableListData, ServiceError>;
    /// Persist a new record. Only `desc` is sent.
    async fn create(&self, fields: &FormValues) -> Result<Value, ServiceError>;
    /// Mutate the record identified by `fields.key`.
    async fn update(&self, fields: &FormValues) -> Result<Value, ServiceError>;
    /// Delete every record whose key is in `keys`.
    async fn remove(&self, keys: &[u64]) -> Result<Value, ServiceError>;
}

/// Paths of the four endpoints, relative to the base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    pub list: String,
    pub create: String,
    pub update: String,
    pub remove: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            list: "/api/book".to_string(),
            create: "/api/rule".to_string(),
            update: "/api/rule".to_string(),
            remove: "/api/rule".to_string(),
        }
    }
}

#[derive(Serialize)]
struct Mutation<T: Serialize> {
    #[serde(flatten)]
    fields: T,
    method: &'static str,
}

#[derive(Serialize)]
struct CreateBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    desc: Option<&'a str>,
}

#[derive(Serialize)]
struct UpdateBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    desc: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<u64>,
}

#[derive(Serialize)]
struct RemoveBody<'a> {
    key: &'a [u64],
}

/// `BookService` over HTTP.
#[derive(Clone, Debug)]
pub struct HttpBookService {
    client: Client,
    base_url: Url,
    endpoints: Endpoints,
}

impl HttpBookService {
    /// Build a client from the loaded configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, ServiceError> {
        let mut base_url = Url::parse(&config.base_url).map_err(|e| ServiceError::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        // Endpoints resolve under the base path, so it must end in a slash.
        if !base_url.path().ends_with('/') {
            let dir = format!("{}/", base_url.path());
            base_url.set_path(&dir);
        }
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url,
            endpoints: config.endpoints.clone(),
        })
    }

    fn url(&self, path: &str) -> Result<Url, ServiceError> {
        let relative = path.trim_start_matches('/');
        self.base_url.join(relative).map_err(|e| ServiceError::InvalidUrl {
            url: format!("{}{}", self.base_url, relative),
            reason: e.to_string(),
        })
    }

    async fn post<T: Serialize>(
        &self,
        path: &str,
        method: &'static str,
        fields: T,
    ) -> Result<Value, ServiceError> {
        let url = self.url(path)?;
        tracing::debug!(%url, method, "POST mutation");
        let resp = self
            .client
            .post(url)
            .json(&Mutation { fields, method })
            .send()
            .await?;
        let body = read_body(resp).await?;
        if body.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Read the body of a successful response, turning non-2xx into `ServiceError::Status`.
async fn read_body(resp: Response) -> Result<Vec<u8>, ServiceError> {
    let status = resp.status();
    let bytes = resp.bytes().await?;
    if !status.is_success() {
        return Err(ServiceError::Status {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }
    Ok(bytes.to_vec())
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ServiceError> {
    let body = read_body(resp).await?;
    Ok(serde_json::from_slice(&body)?)
}

#[async_trait]
impl BookService for HttpBookService {
    async fn fetch_list(&self, params: &QueryParams) -> Result<TableListData, ServiceError> {
        let url = self.url(&self.endpoints.list)?;
        tracing::debug!(%url, ?params, "GET list");
        let resp = self.client.get(url).query(params).send().await?;
        read_json(resp).await
    }

    async fn create(&self, fields: &FormValues) -> Result<Value, ServiceError> {
        let body = CreateBody {
            desc: fields.desc.as_deref(),
        };
        self.post(&self.endpoints.create, "post", body).await
    }

    async fn update(&self, fields: &FormValues) -> Result<Value, ServiceError> {
        let body = UpdateBody {
            name: fields.name.as_deref(),
            desc: fields.desc.as_deref(),
            key: fields.key,
        };
        self.post(&self.endpoints.update, "update", body).await
    }

    async fn remove(&self, keys: &[u64]) -> Result<Value, ServiceError> {
        self.post(&self.endpoints.remove, "delete", RemoveBody { key: keys })
            .await
    }
}
