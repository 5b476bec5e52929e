//! Static asset serving module
//!
//! Serves the stylesheets, images and API reference the page shell links to.
//! Files are opaque: they are read and sent as-is.

use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Index file tried when a request names a directory
const INDEX_FILE: &str = "index.html";

/// Serve a file from the static directory, 404 if absent or outside it
pub async fn serve_asset(ctx: &RequestContext, static_dir: &str) -> Response<Full<Bytes>> {
    match load_from_directory(static_dir, &ctx.path).await {
        Some((content, content_type)) => {
            let etag = cache::generate_etag(&content);
            if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
                return http::build_304_response(&etag);
            }
            http::response::build_asset_response(
                Bytes::from(content),
                content_type,
                &etag,
                ctx.is_head(),
            )
        }
        None => http::build_404_response(),
    }
}

/// Load a file below `static_dir` for a request path
pub async fn load_from_directory(
    static_dir: &str,
    path: &str,
) -> Option<(Vec<u8>, &'static str)> {
    let relative_path = path.trim_start_matches('/');

    let static_dir_canonical = match Path::new(static_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    let mut file_path = static_dir_canonical.join(relative_path);
    if relative_path.is_empty() || relative_path.ends_with('/') || file_path.is_dir() {
        file_path = file_path.join(INDEX_FILE);
    }

    // File not found is common (404), no need to log at warning level
    let Ok(file_path_canonical) = file_path.canonicalize() else {
        return None;
    };
    if !file_path_canonical.starts_with(&static_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_path_canonical.display()
        ));
        return None;
    }
    if !file_path_canonical.is_file() {
        return None;
    }

    let content = match fs::read(&file_path_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_path_canonical.display(),
                e
            ));
            return None;
        }
    };

    let content_type =
        mime::get_content_type(file_path_canonical.extension().and_then(|e| e.to_str()));
    Some((content, content_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;

    fn static_tree() -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        let web = root.path().join("web");
        stdfs::create_dir_all(web.join("img")).unwrap();
        stdfs::create_dir_all(web.join("api")).unwrap();
        stdfs::write(web.join("d3.css"), "#world { width: 800px; }").unwrap();
        stdfs::write(web.join("img/favicon.png"), [0x89, b'P', b'N', b'G']).unwrap();
        stdfs::write(web.join("api/index.html"), "<html>api</html>").unwrap();
        stdfs::write(root.path().join("private.txt"), "secret").unwrap();
        root
    }

    #[tokio::test]
    async fn test_load_asset() {
        let root = static_tree();
        let web = root.path().join("web");
        let (content, content_type) = load_from_directory(web.to_str().unwrap(), "/d3.css")
            .await
            .unwrap();
        assert_eq!(content, b"#world { width: 800px; }");
        assert_eq!(content_type, "text/css");

        let (_, content_type) = load_from_directory(web.to_str().unwrap(), "/img/favicon.png")
            .await
            .unwrap();
        assert_eq!(content_type, "image/png");
    }

    #[tokio::test]
    async fn test_directory_serves_index() {
        let root = static_tree();
        let web = root.path().join("web");
        for path in ["/api/", "/api"] {
            let (content, content_type) = load_from_directory(web.to_str().unwrap(), path)
                .await
                .unwrap();
            assert_eq!(content, b"<html>api</html>");
            assert_eq!(content_type, "text/html; charset=utf-8");
        }
    }

    #[tokio::test]
    async fn test_missing_and_traversal() {
        let root = static_tree();
        let web = root.path().join("web");
        let dir = web.to_str().unwrap();
        assert!(load_from_directory(dir, "/rst.css").await.is_none());
        assert!(load_from_directory(dir, "/../private.txt").await.is_none());
        assert!(load_from_directory(dir, "/img/../../private.txt").await.is_none());
        assert!(load_from_directory(dir, "/").await.is_none());
    }

    #[tokio::test]
    async fn test_missing_static_dir() {
        assert!(load_from_directory("/nonexistent/d3-static", "/d3.css")
            .await
            .is_none());
    }
}
