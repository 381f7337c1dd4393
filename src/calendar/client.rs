use async_trait::async_trait;
use color_eyre::eyre::{bail, Result};
use reqwest::{Client, RequestBuilder, Response, Url};
use tracing::{debug, error};

use super::event::{EventFields, EventId, EventRecord};
use crate::error::{Operation, TransportError};

/// The four REST calls the calendar needs from its backend.
#[async_trait]
pub trait EventBackend {
    async fn list_events(&self) -> Result<Vec<EventRecord>, TransportError>;

    async fn create_event(&self, draft: &EventFields) -> Result<EventRecord, TransportError>;

    async fn update_event(
        &self,
        id: &EventId,
        record: &EventRecord,
    ) -> Result<EventRecord, TransportError>;

    async fn delete_event(&self, id: &EventId) -> Result<(), TransportError>;
}

/// HTTP implementation of [`EventBackend`] against a single collection URL.
///
/// Every call is one request: no retries, no caching, and reqwest's default
/// timeouts. Failures are logged here and returned to the caller unchanged.
#[derive(Debug, Clone)]
pub struct EventClient {
    http: Client,
    base_url: Url,
}

impl EventClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            bail!("API URL {base_url} cannot hold event paths");
        }

        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn event_url(&self, id: &EventId) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&id.to_string());
        }
        url
    }

    async fn send(&self, op: Operation, req: RequestBuilder) -> Result<Response, TransportError> {
        let resp = req
            .send()
            .await
            .map_err(|source| TransportError::Request { op, source })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response".to_string());
        Err(TransportError::Status { op, status, body })
    }

    async fn send_json<T>(&self, op: Operation, req: RequestBuilder) -> Result<T, TransportError>
    where
        T: serde::de::DeserializeOwned,
    {
        self.send(op, req)
            .await?
            .json()
            .await
            .map_err(|source| TransportError::Request { op, source })
    }
}

fn logged<T>(result: Result<T, TransportError>) -> Result<T, TransportError> {
    if let Err(ref err) = result {
        error!(error = %err, "Error {}", err.operation().describe());
    }
    result
}

#[async_trait]
impl EventBackend for EventClient {
    async fn list_events(&self) -> Result<Vec<EventRecord>, TransportError> {
        debug!(url = %self.base_url, "GET events");
        let req = self.http.get(self.base_url.clone());
        logged(self.send_json(Operation::List, req).await)
    }

    async fn create_event(&self, draft: &EventFields) -> Result<EventRecord, TransportError> {
        debug!(url = %self.base_url, title = %draft.title, "POST event");
        let req = self.http.post(self.base_url.clone()).json(draft);
        logged(self.send_json(Operation::Create, req).await)
    }

    async fn update_event(
        &self,
        id: &EventId,
        record: &EventRecord,
    ) -> Result<EventRecord, TransportError> {
        let url = self.event_url(id);
        debug!(%url, "PUT event");
        let req = self.http.put(url).json(record);
        logged(self.send_json(Operation::Update, req).await)
    }

    async fn delete_event(&self, id: &EventId) -> Result<(), TransportError> {
        let url = self.event_url(id);
        debug!(%url, "DELETE event");
        let req = self.http.delete(url);
        logged(self.send(Operation::Delete, req).await.map(drop))
    }
}
