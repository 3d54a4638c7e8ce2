use crate::{error::Error, markdown, util, InteractionData, RequestData};
use hyper::{
    body,
    service::{make_service_fn, service_fn},
    Body, Request, Response, Server, StatusCode,
};
use std::{
    convert::Infallible,
    net::{SocketAddr, TcpListener},
    path::Path,
    sync::{Arc, Mutex},
    thread::{self, JoinHandle},
};
use tokio::{runtime::Runtime, sync::oneshot};

/// A local HTTP server answering requests with interactions recorded in a markdown file.
///
/// Every server binds its own ephemeral port, so tests using different recordings can run in
/// parallel.
#[derive(Debug)]
pub struct PlaybackServer {
    address: SocketAddr,
    state: Arc<PlaybackState>,
    shutdown: Option<oneshot::Sender<()>>,
    join_handle: Option<JoinHandle<()>>,
}

impl PlaybackServer {
    /// Load the interactions from `markdown_path` and start serving them.
    pub fn start<P: AsRef<Path>>(markdown_path: P) -> Result<Self, Error> {
        let interactions = markdown::load_markdown(markdown_path)?;
        Self::with_interactions(interactions)
    }

    pub fn with_interactions(interactions: Vec<InteractionData>) -> Result<Self, Error> {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))?;
        listener.set_nonblocking(true)?;
        let address = listener.local_addr()?;

        let runtime = Runtime::new()?;
        let server_builder = {
            let _guard = runtime.enter();
            Server::from_tcp(listener)?
        };

        let state = Arc::new(PlaybackState::new(interactions));
        let service_state = Arc::clone(&state);
        let (shutdown, shutdown_signal) = oneshot::channel::<()>();

        let join_handle = thread::spawn(move || {
            runtime.block_on(async move {
                let make_service = make_service_fn(move |_| {
                    let state = Arc::clone(&service_state);
                    async move {
                        Ok::<_, Infallible>(service_fn(move |request| {
                            let state = Arc::clone(&state);
                            async move { Ok::<_, Infallible>(state.respond(request).await) }
                        }))
                    }
                });

                let server = server_builder
                    .serve(make_service)
                    .with_graceful_shutdown(async {
                        shutdown_signal.await.ok();
                    });

                if let Err(e) = server.await {
                    tracing::error!(error = %e, "Playback server error");
                }
            });
        });

        tracing::debug!(%address, "Playback server started");

        Ok(Self {
            address,
            state,
            shutdown: Some(shutdown),
            join_handle: Some(join_handle),
        })
    }

    /// Base URL clients should use instead of the recorded service's one.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.address)
    }

    /// Stop the server and report the first playback failure, if any. Every recorded interaction
    /// must have been requested.
    pub fn finish(mut self) -> Result<(), Error> {
        self.stop()?;

        let first_error = self.state.errors.lock()?.drain(..).next();
        if let Some(error) = first_error {
            return Err(error);
        }

        let unplayed = self.state.unplayed()?;
        if !unplayed.is_empty() {
            return Err(Error::UnplayedInteractions(unplayed));
        }

        Ok(())
    }

    fn stop(&mut self) -> Result<(), Error> {
        if let Some(shutdown) = self.shutdown.take() {
            // the server may already be gone, nothing to signal then
            let _ = shutdown.send(());
        }

        if let Some(join_handle) = self.join_handle.take() {
            join_handle
                .join()
                .map_err(|_| Error::ServerThreadPanicked)?;
        }

        Ok(())
    }
}

impl Drop for PlaybackServer {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            tracing::error!(error = %e, "Couldn't gracefully shutdown the playback server");
        }
    }
}

#[derive(Debug)]
struct PlaybackState {
    interactions: Vec<InteractionData>,
    played: Mutex<Vec<bool>>,
    errors: Mutex<Vec<Error>>,
}

impl PlaybackState {
    fn new(interactions: Vec<InteractionData>) -> Self {
        let played = vec![false; interactions.len()];

        Self {
            interactions,
            played: Mutex::new(played),
            errors: Mutex::new(Vec::new()),
        }
    }

    async fn respond(&self, request: Request<Body>) -> Response<Body> {
        match self.replay(request).await {
            Ok(response) => response,
            Err(error) => {
                tracing::error!(%error, "Playback failed");
                if let Ok(mut errors) = self.errors.lock() {
                    errors.push(error);
                }

                let mut response = Response::new(Body::empty());
                *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                response
            }
        }
    }

    async fn replay(&self, mut request: Request<Body>) -> Result<Response<Body>, Error> {
        let request_data = read_request_data(&mut request).await?;
        let interaction = self.next_interaction(&request_data)?;

        let recorded_body = interaction.request_data.body.trim();
        if !recorded_body.is_empty() && recorded_body != request_data.body.trim() {
            return Err(Error::RequestBodyMismatch {
                uri: request_data.uri,
                expected: recorded_body.into(),
                actual: request_data.body,
            });
        }

        tracing::debug!(
            interaction = interaction.interaction_number,
            method = %request_data.method,
            uri = %request_data.uri,
            "Replaying interaction"
        );

        let mut response_builder = Response::builder().status(interaction.response_data.status_code);

        if let Some(headers_mut) = response_builder.headers_mut() {
            util::put_headers(
                headers_mut,
                util::filter_headers(&interaction.response_data.headers),
            )?;
        }

        Ok(response_builder.body(interaction.response_data.body.clone().into())?)
    }

    /// Claim the first unplayed interaction recorded for the request's method and uri.
    fn next_interaction(&self, request_data: &RequestData) -> Result<&InteractionData, Error> {
        let mut played = self.played.lock()?;

        let index = (0..self.interactions.len())
            .find(|&index| !played[index] && self.interactions[index].matches(request_data))
            .ok_or_else(|| {
                Error::UnexpectedRequest(request_data.method.clone(), request_data.uri.clone())
            })?;

        played[index] = true;
        Ok(&self.interactions[index])
    }

    fn unplayed(&self) -> Result<Vec<String>, Error> {
        let played = self.played.lock()?;

        Ok(self
            .interactions
            .iter()
            .zip(played.iter())
            .filter(|(_, played)| !**played)
            .map(|(interaction, _)| {
                format!(
                    "{}: {} {}",
                    interaction.interaction_number,
                    interaction.request_data.method,
                    interaction.request_data.uri
                )
            })
            .collect())
    }
}

async fn read_request_data(request: &mut Request<Body>) -> Result<RequestData, Error> {
    let method = request.method().to_string();
    let uri = request.uri().to_string();
    let headers = util::extract_headers(request.headers());

    let body = body::to_bytes(request.body_mut())
        .await
        .map_err(|_| Error::InvalidBody)?;

    Ok(RequestData {
        method,
        uri,
        headers,
        body: String::from_utf8_lossy(&body).into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResponseData;
    use std::collections::HashMap;

    fn interaction(
        interaction_number: u8,
        method: &str,
        uri: &str,
        request_body: &str,
        status_code: u16,
        response_body: &str,
    ) -> InteractionData {
        let mut headers = HashMap::new();
        headers.insert(
            "Content-Type".to_string(),
            "application/json; charset=utf-8".to_string(),
        );
        headers.insert("Content-Length".to_string(), "9999".to_string());

        InteractionData {
            interaction_number,
            request_data: RequestData {
                uri: uri.into(),
                method: method.into(),
                headers: HashMap::new(),
                body: request_body.into(),
            },
            response_data: ResponseData {
                status_code,
                headers,
                body: response_body.into(),
            },
        }
    }

    fn send(
        base_url: &str,
        method: &str,
        uri: &str,
        request_body: &str,
    ) -> (u16, HashMap<String, String>, String) {
        Runtime::new().unwrap().block_on(async {
            let request = Request::builder()
                .method(method)
                .uri(format!("{}{}", base_url, uri))
                .body(Body::from(request_body.to_string()))
                .unwrap();

            let response = hyper::Client::new().request(request).await.unwrap();
            let status = response.status().as_u16();
            let headers = util::extract_headers(response.headers());
            let body = body::to_bytes(response.into_body()).await.unwrap();

            (status, headers, String::from_utf8_lossy(&body).into())
        })
    }

    #[test]
    fn replays_recorded_response() {
        let server = PlaybackServer::with_interactions(vec![interaction(
            0,
            "GET",
            "/posts/1",
            "",
            200,
            "{\"userId\":1,\"id\":1}",
        )])
        .unwrap();

        let (status, headers, body) = send(&server.base_url(), "GET", "/posts/1", "");

        assert_eq!(status, 200);
        assert_eq!(
            headers.get("content-type").unwrap(),
            "application/json; charset=utf-8"
        );
        assert_eq!(headers.get("content-length").unwrap(), &body.len().to_string());
        assert_eq!(body, "{\"userId\":1,\"id\":1}");
        server.finish().unwrap();
    }

    #[test]
    fn repeated_requests_play_recordings_in_order() {
        let server = PlaybackServer::with_interactions(vec![
            interaction(0, "GET", "/posts", "", 200, "[1]"),
            interaction(1, "GET", "/posts", "", 200, "[1,2]"),
        ])
        .unwrap();

        assert_eq!(send(&server.base_url(), "GET", "/posts", "").2, "[1]");
        assert_eq!(send(&server.base_url(), "GET", "/posts", "").2, "[1,2]");
        server.finish().unwrap();
    }

    #[test]
    fn unexpected_request_is_reported() {
        let server =
            PlaybackServer::with_interactions(vec![interaction(0, "GET", "/posts", "", 200, "[]")])
                .unwrap();

        let (status, _, _) = send(&server.base_url(), "DELETE", "/posts", "");
        send(&server.base_url(), "GET", "/posts", "");

        assert_eq!(status, 500);
        match server.finish() {
            Err(Error::UnexpectedRequest(method, uri)) => {
                assert_eq!(method, "DELETE");
                assert_eq!(uri, "/posts");
            }
            other => panic!("Expected UnexpectedRequest, got {:?}", other),
        }
    }

    #[test]
    fn request_body_must_match_recording() {
        let server = PlaybackServer::with_interactions(vec![interaction(
            0,
            "POST",
            "/posts",
            "{\"title\":\"foo\"}",
            201,
            "{\"id\":101}",
        )])
        .unwrap();

        let (status, _, _) = send(&server.base_url(), "POST", "/posts", "{\"title\":\"baz\"}");

        assert_eq!(status, 500);
        match server.finish() {
            Err(Error::RequestBodyMismatch { expected, actual, .. }) => {
                assert_eq!(expected, "{\"title\":\"foo\"}");
                assert_eq!(actual, "{\"title\":\"baz\"}");
            }
            other => panic!("Expected RequestBodyMismatch, got {:?}", other),
        }
    }

    #[test]
    fn unplayed_interactions_fail_the_session() {
        let server = PlaybackServer::with_interactions(vec![
            interaction(0, "POST", "/posts", "", 201, "{\"id\":101}"),
            interaction(1, "GET", "/posts/101", "", 404, "{}"),
        ])
        .unwrap();

        send(&server.base_url(), "POST", "/posts", "{}");

        match server.finish() {
            Err(Error::UnplayedInteractions(unplayed)) => {
                assert_eq!(unplayed, vec!["1: GET /posts/101".to_string()]);
            }
            other => panic!("Expected UnplayedInteractions, got {:?}", other),
        }
    }
}
