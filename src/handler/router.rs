//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, body size
//! check, route matching and access logging.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::site;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, HeaderValue};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request information needed for routing, detached from the request body
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub content_length: Option<String>,
    pub if_none_match: Option<String>,
}

impl RequestContext {
    pub fn from_parts(method: Method, uri: &hyper::Uri, headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };
        Self {
            method,
            path: uri.path().to_string(),
            query: uri.query().map(ToString::to_string),
            content_length: header("content-length"),
            if_none_match: header("if-none-match"),
        }
    }

    pub fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }
}

/// Response plus the page identifier it rendered, if any
pub struct Routed {
    pub response: Response<Full<Bytes>>,
    pub page: Option<String>,
}

impl From<Response<Full<Bytes>>> for Routed {
    fn from(response: Response<Full<Bytes>>) -> Self {
        Self {
            response,
            page: None,
        }
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let ctx = RequestContext::from_parts(req.method().clone(), req.uri(), req.headers());

    let Routed { mut response, page } = respond(&ctx, &state).await;

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(hyper::header::SERVER, server);
    }

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            ctx.method.to_string(),
            ctx.path.clone(),
        );
        entry.query = ctx.query.clone();
        entry.http_version = http_version(req.version()).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = usize::try_from(response.body().size_hint().exact().unwrap_or(0))
            .unwrap_or(usize::MAX);
        entry.referer = header_string(req.headers(), "referer");
        entry.user_agent = header_string(req.headers(), "user-agent");
        entry.page = page;
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route a request and build its response
pub async fn respond(ctx: &RequestContext, state: &AppState) -> Routed {
    // 1. Check HTTP method
    if let Some(resp) = check_http_method(&ctx.method, state.config.http.enable_cors) {
        return resp.into();
    }

    // 2. Check body size
    if let Some(resp) = check_body_size(ctx.content_length.as_deref(), state.config.http.max_body_size)
    {
        return resp.into();
    }

    // 3. Dispatch
    route_request(ctx, state).await
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(
    content_length: Option<&str>,
    max_body_size: u64,
) -> Option<Response<Full<Bytes>>> {
    let size_str = content_length?;
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_error(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(http::build_413_response())
        }
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            None
        }
        _ => None,
    }
}

async fn route_request(ctx: &RequestContext, state: &AppState) -> Routed {
    let routes = &state.config.routes;

    // 1. Health check endpoints
    if routes.health.enabled
        && (ctx.path == routes.health.liveness_path || ctx.path == routes.health.readiness_path)
    {
        return http::build_health_response("ok").into();
    }

    // 2. Documentation page
    if routes.page_paths.iter().any(|p| *p == ctx.path) {
        let requested = site::page_param(ctx.query.as_deref());
        let rendered = site::render_page(state, requested.as_deref()).await;
        logger::log_debug(&format!(
            "Rendered page '{}' ({} bytes)",
            rendered.page,
            rendered.html.len()
        ));
        return Routed {
            response: http::build_page_response(rendered.html, ctx.is_head()),
            page: Some(rendered.page),
        };
    }

    // 3. Static assets
    match &state.config.site.static_dir {
        Some(dir) => static_files::serve_asset(ctx, dir).await.into(),
        None => http::build_404_response().into(),
    }
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn http_version(version: hyper::Version) -> &'static str {
    if version == hyper::Version::HTTP_10 {
        "1.0"
    } else if version == hyper::Version::HTTP_09 {
        "0.9"
    } else if version == hyper::Version::HTTP_2 {
        "2"
    } else {
        "1.1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use std::fs;

    struct Fixture {
        _root: tempfile::TempDir,
        state: AppState,
    }

    fn fixture() -> Fixture {
        let root = tempfile::tempdir().unwrap();
        let content = root.path().join("content");
        let web = root.path().join("web");
        fs::create_dir_all(&content).unwrap();
        fs::create_dir_all(&web).unwrap();
        fs::write(content.join("home.ih"), "<p>d3 home</p>").unwrap();
        fs::write(content.join("manual.ih"), "<h1>Manual</h1>").unwrap();
        fs::write(web.join("d3.css"), "#top {}").unwrap();
        fs::write(root.path().join("private.txt"), "not for clients").unwrap();

        let mut config = Config::load_from("/nonexistent/d3-site-config").unwrap();
        config.site.content_dir = content.to_string_lossy().into_owned();
        config.site.static_dir = Some(web.to_string_lossy().into_owned());
        let state = AppState::new(&config).unwrap();
        Fixture { _root: root, state }
    }

    fn ctx(method: Method, uri: &str) -> RequestContext {
        let uri: hyper::Uri = uri.parse().unwrap();
        RequestContext::from_parts(method, &uri, &HeaderMap::new())
    }

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_page_routes() {
        let f = fixture();
        for uri in ["/", "/index.php", "/index.html"] {
            let routed = respond(&ctx(Method::GET, uri), &f.state).await;
            assert_eq!(routed.response.status(), 200);
            assert_eq!(routed.page.as_deref(), Some("home"));
            assert_eq!(
                routed.response.headers()["content-type"],
                "text/html; charset=UTF-8"
            );
            assert!(body_string(routed.response).await.contains("<p>d3 home</p>"));
        }
    }

    #[tokio::test]
    async fn test_page_param_selects_fragment() {
        let f = fixture();
        let routed = respond(&ctx(Method::GET, "/index.php?page=manual"), &f.state).await;
        assert_eq!(routed.page.as_deref(), Some("manual"));
        let body = body_string(routed.response).await;
        assert!(body.contains("<h1>Manual</h1>"));
        assert!(!body.contains("<p>d3 home</p>"));
    }

    #[tokio::test]
    async fn test_missing_fragment_still_200() {
        let f = fixture();
        for uri in ["/index.php?page=publication", "/index.php?page=nope", "/?page=..%2Fweb%2Fd3"] {
            let routed = respond(&ctx(Method::GET, uri), &f.state).await;
            assert_eq!(routed.response.status(), 200, "{uri}");
            let body = body_string(routed.response).await;
            assert_eq!(body, f.state.shell.render(""), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_head_page_has_empty_body() {
        let f = fixture();
        let routed = respond(&ctx(Method::HEAD, "/"), &f.state).await;
        let length: usize = routed.response.headers()["content-length"]
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        assert!(length > 0);
        assert!(body_string(routed.response).await.is_empty());
    }

    #[tokio::test]
    async fn test_static_assets_and_404() {
        let f = fixture();
        let routed = respond(&ctx(Method::GET, "/d3.css"), &f.state).await;
        assert_eq!(routed.response.status(), 200);
        assert!(routed.page.is_none());
        assert_eq!(body_string(routed.response).await, "#top {}");

        let routed = respond(&ctx(Method::GET, "/rst.css"), &f.state).await;
        assert_eq!(routed.response.status(), 404);
    }

    #[tokio::test]
    async fn test_head_static_asset_keeps_length() {
        let f = fixture();
        let routed = respond(&ctx(Method::HEAD, "/d3.css"), &f.state).await;
        assert_eq!(routed.response.status(), 200);
        assert_eq!(routed.response.headers()["content-length"], "7");
        assert_eq!(routed.response.headers()["content-type"], "text/css");
        assert!(body_string(routed.response).await.is_empty());
    }

    #[tokio::test]
    async fn test_static_traversal_is_404() {
        let f = fixture();
        for uri in ["/../private.txt", "/img/../../private.txt"] {
            let routed = respond(&ctx(Method::GET, uri), &f.state).await;
            assert_eq!(routed.response.status(), 404, "{uri}");
            assert!(!body_string(routed.response).await.contains("not for clients"));
        }
    }

    #[tokio::test]
    async fn test_static_etag_revalidation() {
        let f = fixture();
        let first = respond(&ctx(Method::GET, "/d3.css"), &f.state).await;
        let etag = first.response.headers()["etag"].to_str().unwrap().to_string();

        let mut headers = HeaderMap::new();
        headers.insert("if-none-match", HeaderValue::from_str(&etag).unwrap());
        let uri: hyper::Uri = "/d3.css".parse().unwrap();
        let revalidate = RequestContext::from_parts(Method::GET, &uri, &headers);
        let second = respond(&revalidate, &f.state).await;
        assert_eq!(second.response.status(), 304);
    }

    #[tokio::test]
    async fn test_no_static_dir_is_404() {
        let mut f = fixture();
        f.state.config.site.static_dir = None;
        let routed = respond(&ctx(Method::GET, "/d3.css"), &f.state).await;
        assert_eq!(routed.response.status(), 404);
    }

    #[tokio::test]
    async fn test_health_and_methods() {
        let f = fixture();
        let routed = respond(&ctx(Method::GET, "/healthz"), &f.state).await;
        assert_eq!(routed.response.status(), 200);
        assert_eq!(body_string(routed.response).await, "ok");
        assert_eq!(respond(&ctx(Method::GET, "/readyz"), &f.state).await.response.status(), 200);

        assert_eq!(respond(&ctx(Method::POST, "/"), &f.state).await.response.status(), 405);
        assert_eq!(respond(&ctx(Method::OPTIONS, "/"), &f.state).await.response.status(), 204);
    }

    #[tokio::test]
    async fn test_body_size_limit() {
        let f = fixture();
        let mut headers = HeaderMap::new();
        headers.insert("content-length", HeaderValue::from_static("99999999"));
        let uri: hyper::Uri = "/".parse().unwrap();
        let big = RequestContext::from_parts(Method::GET, &uri, &headers);
        assert_eq!(respond(&big, &f.state).await.response.status(), 413);
    }
}
