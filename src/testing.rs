//! Test-only helpers: a scripted HTTP server and a recording wallpaper setter.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use tokio::sync::mpsc;

use crate::config::{Settings, SettingsStore};
use crate::context::{ContextEndpoints, ContextProvider};
use crate::controller::Controller;
use crate::event::Event;
use crate::pipeline::{GenerationPipeline, ImageStore};
use crate::pollinations::client::PollinationsClient;
use crate::pollinations::types::{ApiCredentials, TransportPolicy};
use crate::wallpaper::{WallpaperError, WallpaperSetter};

/// Smallest valid PNG header, enough to look like an image.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-data";

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    pub delay: Duration,
}

impl Reply {
    pub fn image() -> Self {
        Self {
            status: 200,
            content_type: "image/png",
            body: PNG_BYTES.to_vec(),
            delay: Duration::ZERO,
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: body.as_bytes().to_vec(),
            delay: Duration::ZERO,
        }
    }

    pub fn json(body: &str) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            body: body.as_bytes().to_vec(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Serves `replies` in order, one per request; the last reply repeats.
pub struct ScriptedServer {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl ScriptedServer {
    pub async fn start(replies: Vec<Reply>) -> Self {
        assert!(!replies.is_empty(), "at least one reply is required");
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let replies = Arc::new(replies);

        {
            let hits = Arc::clone(&hits);
            let requests = Arc::clone(&requests);
            tokio::spawn(async move {
                while let Ok((stream, _)) = listener.accept().await {
                    let hits = Arc::clone(&hits);
                    let requests = Arc::clone(&requests);
                    let replies = Arc::clone(&replies);
                    tokio::spawn(async move {
                        serve(stream, &hits, &requests, &replies).await;
                    });
                }
            });
        }

        Self {
            base_url: format!("http://{addr}/image"),
            hits,
            requests,
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Raw request heads (request line + headers), in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

async fn serve(
    mut stream: TcpStream,
    hits: &AtomicUsize,
    requests: &Mutex<Vec<String>>,
    replies: &[Reply],
) {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }

    let index = hits.fetch_add(1, Ordering::SeqCst);
    requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(String::from_utf8_lossy(&head).into_owned());

    let reply = &replies[index.min(replies.len() - 1)];
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }

    let response = format!(
        "HTTP/1.1 {} Scripted\r\n\
         Content-Type: {}\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n",
        reply.status,
        reply.content_type,
        reply.body.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.write_all(&reply.body).await;
    let _ = stream.shutdown().await;
}

/// Records every path it is asked to apply.
#[derive(Debug, Default)]
pub struct RecordingSetter {
    applied: Mutex<Vec<PathBuf>>,
    fail: bool,
}

impl RecordingSetter {
    pub fn failing() -> Self {
        Self {
            applied: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn applied(&self) -> Vec<PathBuf> {
        self.applied
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl WallpaperSetter for RecordingSetter {
    fn set_wallpaper(&self, path: &Path) -> Result<(), WallpaperError> {
        self.applied
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_path_buf());
        if self.fail {
            return Err(WallpaperError::SetFailed("blocked by policy".into()));
        }
        Ok(())
    }
}

/// Controller wired to `server`, with settings and images under `dir` and
/// context lookups pointed at a closed port.
pub fn build_controller(
    server: &ScriptedServer,
    dir: &Path,
    settings: Settings,
    setter: Arc<dyn WallpaperSetter>,
    sender: mpsc::UnboundedSender<Event>,
) -> Controller {
    let policy = TransportPolicy {
        backoff: Duration::from_millis(10),
        ..TransportPolicy::default()
    };
    let client =
        PollinationsClient::with_base_url(&server.base_url, ApiCredentials::default(), policy)
            .unwrap();
    let pipeline =
        GenerationPipeline::new(Arc::new(client), ImageStore::new(dir.join("cache")), setter);

    let closed = "http://127.0.0.1:9/".to_string();
    let context = ContextProvider::with_endpoints(ContextEndpoints {
        weather: closed.clone(),
        location_primary: closed.clone(),
        location_fallback: closed,
    })
    .unwrap();

    Controller::new(
        settings,
        SettingsStore::new(dir.join("settings.json")),
        Arc::new(pipeline),
        Arc::new(context),
        sender,
    )
}
