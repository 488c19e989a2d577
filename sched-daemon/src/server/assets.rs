//! Static asset serving for the bundled web front-end.
//!
//! Fallback for everything the API router does not match: `GET` serves the
//! file from the static directory (`/` maps to `index.html`), bare
//! `OPTIONS` gets a permissive 200, anything else is a 404.

use axum::{
    extract::{Request, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use super::state::AppState;

pub async fn static_fallback(State(state): State<Arc<AppState>>, req: Request) -> Response {
    let method = req.method();
    if method == Method::OPTIONS {
        // CORS preflights are answered by the layer; a bare OPTIONS on any
        // path still gets a 200 here.
        StatusCode::OK.into_response()
    } else if method == Method::GET || method == Method::HEAD {
        serve_file(&state.static_dir, req.uri().path()).await
    } else {
        (StatusCode::NOT_FOUND, "Not Found").into_response()
    }
}

async fn serve_file(static_dir: &Path, uri_path: &str) -> Response {
    let Some(path) = resolve(static_dir, uri_path) else {
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    };

    match tokio::fs::read(&path).await {
        Ok(contents) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.to_string())], contents).into_response()
        }
        Err(_) => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

/// Map a request path to a file under the static directory.
///
/// The root path serves the front-end entry document. Anything trying to
/// climb out of the directory resolves to `None`.
fn resolve(static_dir: &Path, uri_path: &str) -> Option<PathBuf> {
    let trimmed = uri_path.trim_start_matches('/');
    if trimmed.is_empty() {
        return Some(static_dir.join("index.html"));
    }

    let relative = Path::new(trimmed);
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(static_dir.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_maps_to_index() {
        let dir = Path::new("/static");
        assert_eq!(resolve(dir, "/"), Some(PathBuf::from("/static/index.html")));
        assert_eq!(resolve(dir, ""), Some(PathBuf::from("/static/index.html")));
    }

    #[test]
    fn plain_files_resolve_in_place() {
        let dir = Path::new("/static");
        assert_eq!(
            resolve(dir, "/script.js"),
            Some(PathBuf::from("/static/script.js"))
        );
        assert_eq!(
            resolve(dir, "/css/style.css"),
            Some(PathBuf::from("/static/css/style.css"))
        );
    }

    #[test]
    fn traversal_is_rejected() {
        let dir = Path::new("/static");
        assert_eq!(resolve(dir, "/../secrets.txt"), None);
        assert_eq!(resolve(dir, "/a/../../b"), None);
    }
}
