//! HTTP server.
//!
//! Pages are rendered once into a [`Site`] and shared read-only between
//! worker threads. Each request is answered by [`Site::respond`], a pure
//! function from method and URL to a [`Reply`], so routing and status codes
//! are testable without a socket.
//!
//! ## Request handling
//!
//! | Request | Status |
//! |---|---|
//! | `GET`/`HEAD` on a route | 200, `text/html` |
//! | `GET`/`HEAD` on `/static/<file>` | 200, type by extension |
//! | `OPTIONS` on a known path | 200, `Allow` header |
//! | any other method on a known path | 405, `Allow` header |
//! | anything else | 404, `text/plain` |
//!
//! `tiny_http` drops the body of `HEAD` responses itself, keeping the
//! `Content-Length` of the `GET` reply.

use crate::config::SiteConfig;
use crate::output;
use crate::pages;
use crate::routes::{self, Page};
use percent_encoding::percent_decode_str;
use std::collections::BTreeMap;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

/// Value of the `Allow` header on 405 and `OPTIONS` replies.
pub const ALLOW: &str = "GET, HEAD, OPTIONS";

const STATIC_PREFIX: &str = "/static/";

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Listener has no IP address")]
    NoAddress,
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

mod mime {
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const OCTET_STREAM: &str = "application/octet-stream";

    /// Content type for a static file, by extension.
    pub fn from_extension(ext: Option<&str>) -> &'static str {
        let Some(ext) = ext else {
            return OCTET_STREAM;
        };
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" => HTML,
            "txt" => PLAIN,
            "css" => "text/css; charset=utf-8",
            "js" => "text/javascript; charset=utf-8",
            "json" => "application/json",
            "xml" => "application/xml",
            "pdf" => "application/pdf",
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "avif" => "image/avif",
            "svg" => "image/svg+xml",
            "ico" => "image/x-icon",
            "woff" => "font/woff",
            "woff2" => "font/woff2",
            "ttf" => "font/ttf",
            "otf" => "font/otf",
            _ => OCTET_STREAM,
        }
    }
}

/// A response, independent of the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    /// Set on 405 and `OPTIONS` replies.
    pub allow: Option<&'static str>,
}

impl Reply {
    fn ok(content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type,
            body,
            allow: None,
        }
    }

    fn not_found() -> Self {
        Self {
            status: 404,
            content_type: mime::PLAIN,
            body: b"404 Not Found".to_vec(),
            allow: None,
        }
    }

    fn options() -> Self {
        Self {
            status: 200,
            content_type: mime::PLAIN,
            body: Vec::new(),
            allow: Some(ALLOW),
        }
    }

    fn method_not_allowed() -> Self {
        Self {
            status: 405,
            content_type: mime::PLAIN,
            body: b"405 Method Not Allowed".to_vec(),
            allow: Some(ALLOW),
        }
    }
}

/// What a request path points at.
enum Target {
    Page(Page),
    File(PathBuf),
}

/// The rendered site plus the directory static files are served from.
#[derive(Debug)]
pub struct Site {
    pages: BTreeMap<Page, String>,
    static_dir: PathBuf,
}

impl Site {
    pub fn new(pages: BTreeMap<Page, String>, static_dir: PathBuf) -> Self {
        Self { pages, static_dir }
    }

    /// Render every page for `config`.
    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(
            pages::render_site(config),
            config.server.static_dir.clone(),
        )
    }

    pub fn page(&self, page: Page) -> Option<&str> {
        self.pages.get(&page).map(String::as_str)
    }

    /// Answer a request.
    pub fn respond(&self, method: &Method, url: &str) -> Reply {
        let Some(target) = self.target(url) else {
            return Reply::not_found();
        };

        match method {
            Method::Get | Method::Head => {}
            Method::Options => return Reply::options(),
            _ => return Reply::method_not_allowed(),
        }

        match target {
            Target::Page(page) => match self.page(page) {
                Some(html) => Reply::ok(mime::HTML, html.as_bytes().to_vec()),
                None => Reply::not_found(),
            },
            Target::File(path) => match std::fs::read(&path) {
                Ok(body) => Reply::ok(
                    mime::from_extension(path.extension().and_then(|e| e.to_str())),
                    body,
                ),
                Err(_) => Reply::not_found(),
            },
        }
    }

    fn target(&self, url: &str) -> Option<Target> {
        if let Some(page) = routes::resolve(url) {
            return Some(Target::Page(page));
        }
        let path = routes::request_path(url);
        let relative = path.strip_prefix(STATIC_PREFIX)?;
        let file = static_file(&self.static_dir, relative)?;
        file.is_file().then_some(Target::File(file))
    }
}

/// Map a path below `/static/` onto `static_dir`.
///
/// Segments are percent-decoded one by one. Every decoded segment must be a
/// plain name: empty, `.` and `..` segments, separators and invalid UTF-8 are
/// rejected, so the result never leaves `static_dir`.
fn static_file(static_dir: &Path, relative: &str) -> Option<PathBuf> {
    let mut file = static_dir.to_path_buf();
    for raw in relative.split('/') {
        let segment = percent_decode_str(raw).decode_utf8().ok()?;
        if segment.is_empty()
            || segment == "."
            || segment == ".."
            || segment.contains(['/', '\\', '\0'])
        {
            return None;
        }
        file.push(&*segment);
    }
    Some(file)
}

/// A listening socket that has not started serving yet.
pub struct BoundServer {
    server: Server,
    addr: SocketAddr,
}

/// Bind the HTTP listener. Port 0 picks a free port; see [`BoundServer::addr`].
pub fn bind(host: IpAddr, port: u16) -> Result<BoundServer, ServeError> {
    let requested = SocketAddr::new(host, port);
    let server = Server::http(requested).map_err(|source| ServeError::Bind {
        addr: requested,
        source,
    })?;
    let addr = server.server_addr().to_ip().ok_or(ServeError::NoAddress)?;
    Ok(BoundServer { server, addr })
}

impl BoundServer {
    /// The address actually bound.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Serve requests until the listener closes (blocking).
    pub fn run(self, site: Arc<Site>, workers: usize) -> Result<(), ServeError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|i| format!("http-worker-{i}"))
            .build()?;

        for request in self.server.incoming_requests() {
            let site = Arc::clone(&site);
            pool.spawn(move || handle_request(request, &site));
        }
        Ok(())
    }
}

fn handle_request(request: Request, site: &Site) {
    let method = request.method().clone();
    let url = request.url().to_string();
    let reply = site.respond(&method, &url);
    let status = reply.status;

    let mut response = Response::from_data(reply.body).with_status_code(StatusCode(status));
    if let Some(h) = header("Content-Type", reply.content_type) {
        response.add_header(h);
    }
    if let Some(h) = reply.allow.and_then(|allow| header("Allow", allow)) {
        response.add_header(h);
    }

    println!("{}", output::format_request(&method.to_string(), &url, status));
    if let Err(e) = request.respond(response) {
        eprintln!("error: failed to respond to {} {}: {}", method, url, e);
    }
}

fn header(name: &str, value: &str) -> Option<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
}
