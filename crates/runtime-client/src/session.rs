//! Runtime-backed execution sessions.

use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use tracing::{debug, error, info};

use repolens_core::{
    CapabilitySet, EventStream, ExecutionSession, ResponseEvent, SessionError, SessionFactory,
};

use crate::wire::{InstructionRequest, SessionCreateRequest, SessionCreated};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:4096";

/// Opens sessions against a runtime server.
#[derive(Debug, Clone)]
pub struct RuntimeSessionFactory {
    base_url: String,
    http: reqwest::Client,
}

impl RuntimeSessionFactory {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for RuntimeSessionFactory {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl SessionFactory for RuntimeSessionFactory {
    async fn open(
        &self,
        capabilities: &CapabilitySet,
    ) -> Result<Box<dyn ExecutionSession>, SessionError> {
        let request = SessionCreateRequest {
            agents: capabilities.agents().values().collect(),
            allowed_tools: capabilities.allowed_tools(),
        };

        let url = format!("{}/v1/sessions", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(runtime)?;

        let created: SessionCreated = response.json().await.map_err(transport)?;
        info!(session_id = %created.id, "Runtime session created");

        Ok(Box::new(RuntimeSession {
            base_url: self.base_url.clone(),
            http: self.http.clone(),
            session_id: created.id,
            open: true,
            pending: None,
        }))
    }
}

/// One live session on the runtime server.
pub struct RuntimeSession {
    base_url: String,
    http: reqwest::Client,
    session_id: String,
    open: bool,
    pending: Option<BoxStream<'static, Result<ResponseEvent, SessionError>>>,
}

impl RuntimeSession {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn session_url(&self, suffix: &str) -> String {
        format!("{}/v1/sessions/{}{}", self.base_url, self.session_id, suffix)
    }
}

#[async_trait]
impl ExecutionSession for RuntimeSession {
    async fn send(&mut self, agent_name: &str, instruction: &str) -> Result<(), SessionError> {
        if !self.open {
            return Err(SessionError::Closed);
        }

        let request = InstructionRequest {
            agent: agent_name,
            instruction,
        };
        self.http
            .post(self.session_url("/messages"))
            .json(&request)
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(runtime)?;
        debug!(session_id = %self.session_id, agent = agent_name, "Instruction dispatched");

        // Attach to the event stream for this instruction now, so the
        // stream is correlated to the send that produced it.
        let response = self
            .http
            .get(self.session_url("/events"))
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(runtime)?;

        let decoded = response.bytes_stream().eventsource().map(|item| match item {
            Ok(event) => serde_json::from_str::<ResponseEvent>(&event.data)
                .map_err(|e| SessionError::MalformedEvent(e.to_string())),
            Err(e) => Err(SessionError::Transport(e.to_string())),
        });
        self.pending = Some(terminate_after_result(decoded).boxed());

        Ok(())
    }

    fn events(&mut self) -> EventStream<'_> {
        match self.pending.take() {
            Some(stream) => stream,
            None => stream::once(async {
                Err(SessionError::Runtime(
                    "no instruction pending; call send first".to_string(),
                ))
            })
            .boxed(),
        }
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        self.pending = None;

        let result = self
            .http
            .delete(self.session_url(""))
            .send()
            .await
            .map_err(transport)?
            .error_for_status();

        match result {
            Ok(_) => {
                info!(session_id = %self.session_id, "Runtime session closed");
                Ok(())
            }
            Err(e) => {
                error!(session_id = %self.session_id, error = %e, "Failed to close session");
                Err(runtime(e))
            }
        }
    }
}

/// Cut an SSE-backed stream down to the finite per-phase contract: the
/// stream ends after the result event, or after the first error.
fn terminate_after_result<S>(
    inner: S,
) -> impl futures::Stream<Item = Result<ResponseEvent, SessionError>>
where
    S: futures::Stream<Item = Result<ResponseEvent, SessionError>> + Send + 'static,
{
    stream::unfold(
        (false, Box::pin(inner)),
        |(done, mut inner)| async move {
            if done {
                return None;
            }
            let item = inner.next().await?;
            let stop_after = item.as_ref().map(ResponseEvent::is_result).unwrap_or(true);
            Some((item, (stop_after, inner)))
        },
    )
}

fn transport(e: reqwest::Error) -> SessionError {
    SessionError::Transport(e.to_string())
}

fn runtime(e: reqwest::Error) -> SessionError {
    SessionError::Runtime(e.to_string())
}

fn normalize_base_url(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalized() {
        let factory = RuntimeSessionFactory::new("http://localhost:4096///");
        assert_eq!(factory.base_url(), "http://localhost:4096");
    }

    #[test]
    fn test_session_url() {
        let session = RuntimeSession {
            base_url: "http://localhost:4096".to_string(),
            http: reqwest::Client::new(),
            session_id: "sess-1".to_string(),
            open: true,
            pending: None,
        };
        assert_eq!(
            session.session_url("/events"),
            "http://localhost:4096/v1/sessions/sess-1/events"
        );
    }

    #[tokio::test]
    async fn test_terminate_after_result_is_inclusive() {
        let events = vec![
            Ok(ResponseEvent::Text {
                text: "working".to_string(),
            }),
            Ok(ResponseEvent::PhaseResult {
                cost_usd: 0.1,
                success: true,
            }),
            Ok(ResponseEvent::Text {
                text: "never seen".to_string(),
            }),
        ];

        let collected: Vec<_> = terminate_after_result(stream::iter(events)).collect().await;
        assert_eq!(collected.len(), 2);
        assert!(collected[1].as_ref().unwrap().is_result());
    }

    #[tokio::test]
    async fn test_terminate_after_error() {
        let events = vec![
            Err(SessionError::Transport("connection reset".to_string())),
            Ok(ResponseEvent::Text {
                text: "never seen".to_string(),
            }),
        ];

        let collected: Vec<_> = terminate_after_result(stream::iter(events)).collect().await;
        assert_eq!(collected.len(), 1);
        assert!(collected[0].is_err());
    }

    #[tokio::test]
    async fn test_events_without_send_errors() {
        let mut session = RuntimeSession {
            base_url: "http://localhost:4096".to_string(),
            http: reqwest::Client::new(),
            session_id: "sess-1".to_string(),
            open: true,
            pending: None,
        };

        let collected: Vec<_> = session.events().collect().await;
        assert_eq!(collected.len(), 1);
        assert!(matches!(collected[0], Err(SessionError::Runtime(_))));
    }
}
