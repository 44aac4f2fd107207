use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// A request as seen by the stub.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
}

/// One canned reply: `(method, path, json body)`.
pub type Route = (&'static str, String, String);

/// Minimal stand-in for the outcomes import endpoints.
pub struct CanvasStub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl CanvasStub {
    pub fn spawn(routes: Vec<Route>) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start canvas stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            let mut request = match server.recv_timeout(Duration::from_millis(50)) {
                Ok(Some(req)) => req,
                Ok(None) => continue,
                Err(_) => break,
            };

            let mut body = String::new();
            let _ = request.as_reader().read_to_string(&mut body);
            let header = |name: &'static str| {
                request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv(name))
                    .map(|h| h.value.as_str().to_string())
            };
            let recorded = Recorded {
                method: request.method().as_str().to_string(),
                path: request.url().to_string(),
                body,
                authorization: header("Authorization"),
                content_type: header("Content-Type"),
            };

            let reply = routes
                .iter()
                .find(|(method, path, _)| *method == recorded.method && *path == recorded.path)
                .map(|(_, _, json)| json.clone());
            seen.lock().expect("lock requests").push(recorded);

            let response = match reply {
                Some(json) => tiny_http::Response::from_string(json),
                None => tiny_http::Response::from_string("not found").with_status_code(404),
            };
            let _ = request.respond(response);
        });

        CanvasStub {
            base_url,
            requests,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().expect("lock requests").clone()
    }
}

impl Drop for CanvasStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
