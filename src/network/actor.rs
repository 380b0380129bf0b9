//! Network actor - runs HTTP requests in the Tokio runtime

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::Transport;

/// Network actor that executes request commands against a transport
pub struct NetworkActor<T: Transport> {
    transport: Arc<T>,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl<T: Transport> NetworkActor<T> {
    pub fn new(transport: T, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            transport: Arc::new(transport),
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Execute { id, spec }) => {
                            let response_tx = self.response_tx.clone();
                            let transport = Arc::clone(&self.transport);

                            self.active_requests.spawn(async move {
                                tracing::info!(id, url = %spec.url, method = %spec.method, "Executing request");
                                let response = match transport.execute(spec).await {
                                    Ok(result) => {
                                        tracing::info!(id, status = result.status, elapsed_ms = result.elapsed.as_millis() as u64, "Request completed");
                                        NetworkResponse::Completed { id, result }
                                    }
                                    Err(error) => {
                                        tracing::warn!(id, kind = %error.kind, message = %error.message, "Request failed");
                                        NetworkResponse::Failed { id, error }
                                    }
                                };
                                let _ = response_tx.send(response);
                            });
                        }

                        Some(NetworkCommand::Shutdown) => {
                            self.active_requests.abort_all();
                            break;
                        }

                        None => break,
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::builder::{build_request, RequestSpec};
    use crate::error::{TransportError, TransportErrorKind};
    use crate::models::{KeyValue, RequestConfig, ResponseResult};
    use crate::viewer::{BodyView, ResponseDisplay};

    /// Records every spec it receives and answers with a canned result
    struct StubTransport {
        seen: Arc<Mutex<Vec<RequestSpec>>>,
        reply: Result<ResponseResult, TransportError>,
    }

    impl Transport for StubTransport {
        async fn execute(&self, spec: RequestSpec) -> Result<ResponseResult, TransportError> {
            let final_url = spec.url.clone();
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(spec);
            }
            self.reply.clone().map(|mut result| {
                result.final_url = final_url;
                result
            })
        }
    }

    fn start(
        reply: Result<ResponseResult, TransportError>,
    ) -> (
        Arc<Mutex<Vec<RequestSpec>>>,
        mpsc::UnboundedSender<NetworkCommand>,
        mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();
        let actor = NetworkActor::new(
            StubTransport {
                seen: Arc::clone(&seen),
                reply,
            },
            resp_tx,
        );
        tokio::spawn(actor.run(cmd_rx));
        (seen, cmd_tx, resp_rx)
    }

    #[tokio::test]
    async fn test_get_with_query_renders_json() {
        let (seen, cmd_tx, mut resp_rx) = start(Ok(ResponseResult {
            status: 200,
            elapsed: Duration::from_millis(42),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: br#"{"args":{"hello":"world"}}"#.to_vec(),
            final_url: String::new(),
        }));

        let cfg = RequestConfig {
            url: "https://httpbin.org/get".to_string(),
            query_params: vec![KeyValue::new("hello", "world")],
            ..RequestConfig::default()
        };
        let prepared = build_request(&cfg).unwrap();
        assert!(prepared.spec.url.ends_with("?hello=world"));

        cmd_tx
            .send(NetworkCommand::Execute {
                id: 7,
                spec: prepared.spec.clone(),
            })
            .unwrap();

        let (id, result) = match resp_rx.recv().await.unwrap() {
            NetworkResponse::Completed { id, result } => (id, result),
            other => panic!("expected a completed response, got {:?}", other),
        };
        assert_eq!(id, 7);
        assert_eq!(seen.lock().unwrap().as_slice(), &[prepared.spec]);

        let display = ResponseDisplay::from_result(&result);
        assert_eq!(display.status, 200);
        assert_eq!(display.final_url, "https://httpbin.org/get?hello=world");
        assert_eq!(
            display.body,
            BodyView::Json("{\n  \"args\": {\n    \"hello\": \"world\"\n  }\n}".to_string())
        );

        cmd_tx.send(NetworkCommand::Shutdown).unwrap();
    }

    #[tokio::test]
    async fn test_transport_error_is_forwarded() {
        let (_seen, cmd_tx, mut resp_rx) = start(Err(TransportError::new(
            TransportErrorKind::Timeout,
            "no response within 1.0s",
        )));

        let prepared = build_request(&RequestConfig::default()).unwrap();
        cmd_tx
            .send(NetworkCommand::Execute {
                id: 1,
                spec: prepared.spec,
            })
            .unwrap();

        match resp_rx.recv().await.unwrap() {
            NetworkResponse::Failed { id, error } => {
                assert_eq!(id, 1);
                assert_eq!(error.kind, TransportErrorKind::Timeout);
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_shutdown_stops_the_loop() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, _resp_rx) = mpsc::unbounded_channel();
        let actor = NetworkActor::new(
            StubTransport {
                seen,
                reply: Err(TransportError::new(TransportErrorKind::Other, "unused")),
            },
            resp_tx,
        );
        let handle = tokio::spawn(actor.run(cmd_rx));

        cmd_tx.send(NetworkCommand::Shutdown).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
