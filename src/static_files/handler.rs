//! Request dispatch
//!
//! Decides the status for one parsed request: 405 for anything but `GET`,
//! 301 for directory targets missing their trailing slash, 200 with the file
//! content when it can be read, 404 otherwise.

use crate::config::StaticFilesConfig;
use crate::http::mime;
use crate::http::request::Request;
use crate::http::response::Response;
use crate::static_files::resolver::PathResolver;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

#[derive(Debug, Clone)]
pub struct StaticFileHandler {
    resolver: PathResolver,
}

impl StaticFileHandler {
    pub fn new(resolver: PathResolver) -> Self {
        Self { resolver }
    }

    pub fn from_config(cfg: &StaticFilesConfig) -> Self {
        Self::new(PathResolver::from_config(cfg))
    }

    pub async fn handle(&self, request: &Request) -> Response {
        if !request.is_get() {
            return Response::method_not_allowed();
        }

        let resolved = self.resolver.resolve(&request.target).await;

        if resolved.redirect {
            tracing::debug!(uri = %request.target, "Directory requested without trailing slash");
            return Response::moved_permanently();
        }

        if !resolved.exists {
            return Response::not_found();
        }

        file_response(&resolved.path).await
    }
}

/// Reads `path` into a 200 response.
///
/// Every read failure is answered with a bare 404; the error kind only
/// decides how loudly it is logged.
pub async fn file_response(path: &Path) -> Response {
    match fs::read(path).await {
        Ok(content) => Response::content(mime::mime_type(path), content),
        Err(e) => {
            match e.kind() {
                ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "File vanished before it could be read");
                }
                ErrorKind::PermissionDenied => {
                    tracing::warn!(path = %path.display(), "Permission denied reading file");
                }
                _ => {
                    tracing::error!(path = %path.display(), error = %e, "Failed to read file");
                }
            }
            Response::not_found()
        }
    }
}
