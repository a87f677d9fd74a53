//! HTTP surface for the renderers.
//!
//! Two routes, both taking the JSON matrix as the request body and an optional
//! `pixSize` query parameter:
//!
//! - `/renderImage` renders the block style
//! - `/renderRealistic` renders the realistic style
//!
//! The service is built explicitly with [`RenderService::new`], which binds the
//! listener; requests are only accepted once [`RenderService::serve`] runs.
//! Routing and decoding live in [`RenderService::handle`], a plain function of
//! the request, so they can be exercised without a socket.

use crate::matrix::{Matrix, PixelSize};
use crate::rendering::RenderMode;
use crate::{Error, Result, ServiceConfig};
use log::{debug, error, info, warn};
use std::io::Read;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use tiny_http::{Header, Response, Server};

/// Query parameter carrying the pixel size
pub const PIXEL_SIZE_PARAM: &str = "pixSize";

/// Transport-independent view of an incoming request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method
    pub method: String,
    /// Path plus optional query string, as sent by the client
    pub url: String,
    /// Raw request body
    pub body: Vec<u8>,
}

/// Response produced by [`RenderService::handle`]
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl HttpReply {
    fn png(data: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: "image/png",
            body: data,
        }
    }

    fn text(status: u16, message: &str) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: format!("{}\n", message).into_bytes(),
        }
    }

    fn from_error(err: &Error) -> Self {
        Self::text(err.status_code(), &err.to_string())
    }
}

/// Map a request path to its render mode. A single trailing slash is
/// accepted.
pub fn route(path: &str) -> Option<RenderMode> {
    let path = match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => path,
    };
    match path {
        "/renderImage" => Some(RenderMode::Block),
        "/renderRealistic" => Some(RenderMode::Realistic),
        _ => None,
    }
}

/// Pixel size from a raw query string. A missing or empty parameter falls
/// back to `default`; anything else must parse into `1..=29`.
pub fn pixel_size_from_query(query: &str, default: PixelSize) -> Result<PixelSize> {
    let param = url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == PIXEL_SIZE_PARAM)
        .map(|(_, value)| value.into_owned());
    match param {
        Some(value) if !value.is_empty() => value.parse(),
        _ => Ok(default),
    }
}

/// Read at most `limit + 1` bytes of a request body, so that an oversize
/// chunked body still shows up as longer than `limit`.
fn read_body(reader: impl Read, limit: usize) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    reader.take(limit as u64 + 1).read_to_end(&mut body)?;
    Ok(body)
}

/// A bound render service
pub struct RenderService {
    server: Server,
    config: ServiceConfig,
    shutting_down: AtomicBool,
}

impl RenderService {
    /// Validate `config` and bind the listener.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        config.validate()?;
        let server = Server::http(config.addr.as_str())
            .map_err(|e| Error::ServerError(format!("failed to bind {}: {}", config.addr, e)))?;
        info!(
            "render service bound to {} ({} workers, default pixel size {})",
            config.addr, config.workers, config.default_pixel_size
        );
        Ok(Self {
            server,
            config,
            shutting_down: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Actual listen address; useful when binding to port 0.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Route, decode, render and encode one request.
    pub fn handle(&self, request: &HttpRequest) -> HttpReply {
        let (path, query) = request
            .url
            .split_once('?')
            .unwrap_or((request.url.as_str(), ""));

        let Some(mode) = route(path) else {
            debug!("{} {} -> 404", request.method, path);
            return HttpReply::text(404, "404 page not found");
        };

        if request.body.len() > self.config.max_body_bytes {
            warn!(
                "{} {}: body of {} bytes exceeds limit",
                request.method,
                path,
                request.body.len()
            );
            return HttpReply::text(413, "Request body too large");
        }

        match self.render_request(mode, query, &request.body) {
            Ok(png) => {
                debug!("{} {} -> 200 ({} bytes)", request.method, path, png.len());
                HttpReply::png(png)
            }
            Err(err) => {
                if err.status_code() >= 500 {
                    error!("{} {}: {}", request.method, path, err);
                } else {
                    warn!("{} {} rejected: {}", request.method, path, err);
                }
                HttpReply::from_error(&err)
            }
        }
    }

    fn render_request(&self, mode: RenderMode, query: &str, body: &[u8]) -> Result<Vec<u8>> {
        // the parameter is checked before the body is even parsed
        let pixel_size = pixel_size_from_query(query, self.config.default_pixel_size)?;
        let matrix = Matrix::from_json(body)?;
        let (width, height) = mode.layout(pixel_size).canvas_size(&matrix)?;
        let pixels = width as u64 * height as u64;
        if pixels > self.config.max_canvas_pixels {
            return Err(Error::InvalidInput(format!(
                "Rendered image too large: {}x{} exceeds {} pixels",
                width, height, self.config.max_canvas_pixels
            )));
        }
        let image = crate::render_png(&matrix, mode, pixel_size)?;
        Ok(image.png_data)
    }

    /// Accept requests on `config.workers` threads until [`shutdown`] is
    /// called.
    ///
    /// [`shutdown`]: RenderService::shutdown
    pub fn serve(&self) -> Result<()> {
        std::thread::scope(|scope| {
            for id in 0..self.config.workers {
                scope.spawn(move || self.worker_loop(id));
            }
        });
        info!("render service on {} stopped", self.config.addr);
        Ok(())
    }

    /// Ask every worker to exit after its current request.
    pub fn shutdown(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
        // each unblock releases one waiting recv()
        for _ in 0..self.config.workers {
            self.server.unblock();
        }
    }

    fn worker_loop(&self, id: usize) {
        debug!("worker {} started", id);
        while !self.shutting_down.load(Ordering::SeqCst) {
            match self.server.recv() {
                Ok(request) => self.respond(request),
                Err(e) => {
                    if self.shutting_down.load(Ordering::SeqCst) {
                        break;
                    }
                    warn!("worker {}: accept failed: {}", id, e);
                }
            }
        }
        debug!("worker {} exiting", id);
    }

    fn respond(&self, mut request: tiny_http::Request) {
        let limit = self.config.max_body_bytes;
        let reply = if request.body_length().is_some_and(|len| len > limit) {
            HttpReply::text(413, "Request body too large")
        } else {
            let read = read_body(request.as_reader(), limit);
            match read {
                Ok(body) => self.handle(&HttpRequest {
                    method: request.method().to_string(),
                    url: request.url().to_string(),
                    body,
                }),
                Err(err) => {
                    warn!("{} {}: {}", request.method(), request.url(), err);
                    HttpReply::from_error(&err)
                }
            }
        };

        let status = reply.status;
        let mut response = Response::from_data(reply.body).with_status_code(status);
        match Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes()) {
            Ok(header) => response = response.with_header(header),
            Err(()) => error!("invalid content type {:?}", reply.content_type),
        }
        if let Err(e) = request.respond(response) {
            error!("unable to write response ({}): {}", status, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> RenderService {
        RenderService::new(ServiceConfig {
            addr: "127.0.0.1:0".to_string(),
            workers: 1,
            ..Default::default()
        })
        .expect("bind")
    }

    fn post(url: &str, body: &str) -> HttpRequest {
        HttpRequest {
            method: "POST".to_string(),
            url: url.to_string(),
            body: body.as_bytes().to_vec(),
        }
    }

    const RED: &str = r#"{"rows":1,"columns":1,"bitmap":[16711680]}"#;

    #[test]
    fn routes_map_to_modes() {
        assert_eq!(route("/renderImage"), Some(RenderMode::Block));
        assert_eq!(route("/renderImage/"), Some(RenderMode::Block));
        assert_eq!(route("/renderRealistic"), Some(RenderMode::Realistic));
        assert_eq!(route("/"), None);
        assert_eq!(route("/renderimage"), None);
        assert_eq!(route("/renderImage//"), None);
    }

    #[test]
    fn pixel_size_query_parsing() {
        let d = PixelSize::DEFAULT;
        assert_eq!(pixel_size_from_query("", d).unwrap(), d);
        assert_eq!(pixel_size_from_query("pixSize=", d).unwrap(), d);
        assert_eq!(pixel_size_from_query("other=9", d).unwrap(), d);
        assert_eq!(pixel_size_from_query("pixSize=29", d).unwrap().get(), 29);
        assert_eq!(pixel_size_from_query("a=b&pixSize=1", d).unwrap().get(), 1);
        for bad in [
            "pixSize=0",
            "pixSize=-1",
            "pixSize=30",
            "pixSize=100",
            "pixSize=big",
            "pixSize=%205",
            "pixSize=5+",
        ] {
            assert!(pixel_size_from_query(bad, d).is_err(), "{}", bad);
        }
    }

    #[test]
    fn renders_block_png() {
        let reply = service().handle(&post("/renderImage?pixSize=2", RED));
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, "image/png");
        let img = image::load_from_memory(&reply.body).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (2, 2));
        assert!(img.pixels().all(|p| p.0 == [255, 0, 0, 255]));
    }

    #[test]
    fn renders_realistic_png() {
        let reply = service().handle(&post("/renderRealistic?pixSize=2", RED));
        assert_eq!(reply.status, 200);
        let img = image::load_from_memory(&reply.body).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (3, 3));
        assert_eq!(img.get_pixel(1, 1).0, [255, 0, 0, 255]);
        // stroke written as (50, 50, 50, 185), un-premultiplied by the encoder
        assert_eq!(img.get_pixel(1, 0).0, [69, 69, 69, 185]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn default_pixel_size_applies() {
        let reply = service().handle(&post("/renderImage", RED));
        assert_eq!(reply.status, 200);
        let img = image::load_from_memory(&reply.body).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (4, 4));
    }

    #[test]
    fn bad_pixel_size_is_rejected_without_rendering() {
        let reply = service().handle(&post("/renderImage?pixSize=30", RED));
        assert_eq!(reply.status, 400);
        assert_eq!(reply.content_type, "text/plain; charset=utf-8");
        let msg = String::from_utf8(reply.body).unwrap();
        assert!(msg.contains("between 1 and 29"), "{}", msg);
        assert!(msg.ends_with(": 30\n"), "{}", msg);
    }

    #[test]
    fn bad_json_is_rejected() {
        let reply = service().handle(&post("/renderRealistic", "{not json"));
        assert_eq!(reply.status, 400);
        assert!(String::from_utf8(reply.body).unwrap().starts_with("Invalid JSON: "));
    }

    #[test]
    fn mismatched_bitmap_is_rejected() {
        let reply = service().handle(&post(
            "/renderImage",
            r#"{"rows":2,"columns":2,"bitmap":[1,2,3]}"#,
        ));
        assert_eq!(reply.status, 400);
        assert!(String::from_utf8(reply.body).unwrap().contains("expected 4"));
    }

    #[test]
    fn unknown_route_is_404() {
        let reply = service().handle(&post("/render", RED));
        assert_eq!(reply.status, 404);
    }

    #[test]
    fn oversize_body_is_413() {
        let svc = RenderService::new(ServiceConfig {
            addr: "127.0.0.1:0".to_string(),
            workers: 1,
            max_body_bytes: 8,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(svc.handle(&post("/renderImage", RED)).status, 413);
    }

    #[test]
    fn oversize_canvas_is_rejected_before_rendering() {
        // one row of a million cells is ~2 MB of JSON, under the body limit,
        // but 29_000_000 x 29 pixels at pixSize=29
        let mut body = String::from(r#"{"rows":1,"columns":1000000,"bitmap":["#);
        body.push_str(&vec!["0"; 1_000_000].join(","));
        body.push_str("]}");
        let svc = service();
        assert!(body.len() < svc.config().max_body_bytes);

        let reply = svc.handle(&post("/renderRealistic?pixSize=29", &body));
        assert_eq!(reply.status, 400);
        let msg = String::from_utf8(reply.body).unwrap();
        assert!(msg.starts_with("Rendered image too large: 29000000x29"), "{}", msg);
    }

    #[test]
    fn canvas_budget_counts_rounded_disc_cells() {
        let svc = RenderService::new(ServiceConfig {
            addr: "127.0.0.1:0".to_string(),
            workers: 1,
            max_canvas_pixels: 9,
            ..Default::default()
        })
        .unwrap();
        // 2x2 block cells fit; the realistic style rounds 2 up to 3
        assert_eq!(svc.handle(&post("/renderImage?pixSize=2", RED)).status, 200);
        assert_eq!(svc.handle(&post("/renderRealistic?pixSize=2", RED)).status, 200);
        assert_eq!(svc.handle(&post("/renderImage?pixSize=4", RED)).status, 400);
        assert_eq!(svc.handle(&post("/renderRealistic?pixSize=4", RED)).status, 400);
    }

    #[test]
    fn body_reads_stop_one_byte_past_the_limit() {
        let body = read_body(&b"0123456789"[..], 4).unwrap();
        assert_eq!(body, b"01234");
    }

    #[test]
    fn body_read_failure_is_a_client_error() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::InvalidData, "bad chunk"))
            }
        }
        let err = read_body(Broken, 16).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        let reply = HttpReply::from_error(&err);
        assert_eq!(reply.status, 400);
        assert_eq!(reply.body, b"Unable to read request body: bad chunk\n");
    }

    #[test]
    fn invalid_config_does_not_bind() {
        let err = RenderService::new(ServiceConfig {
            addr: "127.0.0.1:0".to_string(),
            workers: 0,
            ..Default::default()
        })
        .err()
        .expect("config error");
        assert!(matches!(err, Error::ConfigError(_)));
    }
}
