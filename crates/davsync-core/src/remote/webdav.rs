//! WebDAV implementation of [`RemoteStore`] on top of reqwest

use std::collections::HashSet;

use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use reqwest::header::{CONTENT_TYPE, IF_NONE_MATCH};
use reqwest::{Body, Client, Method, RequestBuilder, Response, StatusCode};
use tokio_util::io::ReaderStream;
use url::Url;

use super::multistatus;
use super::path::{normalize_root, strip_root};
use super::{ContentStream, EntryKind, RemoteEntry, RemoteStore};
use crate::config::DeploySettings;
use crate::error::{Result, SyncError};

const PROPFIND_BODY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:propfind xmlns:d="DAV:">
  <d:prop>
    <d:resourcetype/>
    <d:getlastmodified/>
  </d:prop>
</d:propfind>"#;

/// WebDAV client authenticated with HTTP basic auth
pub struct WebDavStore {
    client: Client,
    base: Url,
    username: String,
    password: Option<String>,
}

impl WebDavStore {
    /// Create a client for the server at `base`
    ///
    /// # Errors
    ///
    /// Returns an error if `base` cannot carry a path or the HTTP client
    /// cannot be built.
    pub fn new(base: Url, username: impl Into<String>, password: Option<String>) -> Result<Self> {
        if base.cannot_be_a_base() {
            return Err(SyncError::Config(format!(
                "Server URL cannot be used as a base: {base}"
            )));
        }

        let client = Client::builder()
            .user_agent(concat!("davsync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base,
            username: username.into(),
            password,
        })
    }

    /// Create a client from validated deployment settings
    ///
    /// # Errors
    ///
    /// See [`WebDavStore::new`].
    pub fn from_settings(settings: &DeploySettings) -> Result<Self> {
        Self::new(
            settings.server.clone(),
            settings.username.clone(),
            settings.password.clone(),
        )
    }

    /// Request URL of a remote path; collections get a trailing slash
    fn url_for(&self, path: &str, collection: bool) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                SyncError::Config(format!("Server URL cannot be used as a base: {}", self.base))
            })?;
            segments
                .pop_if_empty()
                .extend(path.split('/').filter(|s| !s.is_empty()));
            if collection {
                segments.push("");
            }
        }
        Ok(url)
    }

    /// Remote path of an href from a multistatus response
    fn href_to_path(&self, href: &str) -> Result<String> {
        let url = self
            .base
            .join(href)
            .map_err(|e| SyncError::protocol(format!("Invalid href '{href}': {e}")))?;

        let decoded = percent_decode_str(url.path())
            .decode_utf8()
            .map_err(|e| SyncError::protocol(format!("Invalid href '{href}': {e}")))?;
        let base_path = percent_decode_str(self.base.path().trim_end_matches('/'))
            .decode_utf8()
            .map_err(|e| SyncError::protocol(format!("Invalid server path: {e}")))?;

        match decoded.strip_prefix(base_path.as_ref()) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => Ok(normalize_root(rest)),
            _ => Err(SyncError::protocol(format!(
                "Server returned an href outside of {}: {href}",
                self.base
            ))),
        }
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .basic_auth(&self.username, self.password.as_ref())
    }

    async fn propfind(&self, url: Url, depth: &'static str) -> Result<Response> {
        let response = self
            .request(webdav_method("PROPFIND")?, url)
            .header("Depth", depth)
            .header(CONTENT_TYPE, "application/xml; charset=utf-8")
            .body(PROPFIND_BODY)
            .send()
            .await?;
        Ok(response)
    }

    /// Depth-1 listing of a single collection
    async fn list_collection(&self, dir: &str) -> Result<Vec<multistatus::PropfindEntry>> {
        let response = self.propfind(self.url_for(dir, true)?, "1").await?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error("PROPFIND", dir, status));
        }

        let body = response.text().await?;
        multistatus::parse(&body)
    }
}

#[async_trait]
impl RemoteStore for WebDavStore {
    async fn exists(&self, path: &str) -> Result<bool> {
        tracing::debug!(path, "PROPFIND depth 0");
        let response = self.propfind(self.url_for(path, false)?, "0").await?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(status_error("PROPFIND", path, status)),
        }
    }

    async fn create_directory(&self, path: &str) -> Result<()> {
        tracing::debug!(path, "MKCOL");
        let response = self
            .request(webdav_method("MKCOL")?, self.url_for(path, true)?)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(status_error("MKCOL", path, status))
        }
    }

    async fn list_recursive(&self, root: &str) -> Result<Vec<RemoteEntry>> {
        let root = normalize_root(root);

        // Depth-1 requests over a worklist; many servers refuse `Depth: infinity`
        let mut pending = vec![root];
        let mut visited = HashSet::new();
        let mut cursor = 0;
        let mut entries = Vec::new();

        while cursor < pending.len() {
            let dir = pending[cursor].clone();
            cursor += 1;
            if !visited.insert(dir.clone()) {
                continue;
            }

            tracing::debug!(path = %dir, "PROPFIND depth 1");
            for item in self.list_collection(&dir).await? {
                let full_path = self.href_to_path(&item.href)?;
                if full_path == dir {
                    continue;
                }

                let kind = if item.is_collection {
                    if strip_root(&dir, &full_path).is_some() {
                        pending.push(full_path.clone());
                    }
                    EntryKind::Directory
                } else {
                    EntryKind::File
                };

                entries.push(RemoteEntry {
                    full_path,
                    kind,
                    last_modified: item.last_modified.unwrap_or_default(),
                });
            }
        }

        Ok(entries)
    }

    async fn put_file(&self, path: &str, content: ContentStream, overwrite: bool) -> Result<()> {
        tracing::debug!(path, overwrite, "PUT");
        let mut request = self
            .request(Method::PUT, self.url_for(path, false)?)
            .body(Body::wrap_stream(ReaderStream::new(content)));
        if !overwrite {
            request = request.header(IF_NONE_MATCH, "*");
        }

        let response = request.send().await?;
        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::PRECONDITION_FAILED if !overwrite => Err(SyncError::UnexpectedRemoteState {
                path: path.to_string(),
            }),
            status => Err(status_error("PUT", path, status)),
        }
    }

    async fn delete_file(&self, path: &str) -> Result<()> {
        tracing::debug!(path, "DELETE");
        let response = self
            .request(Method::DELETE, self.url_for(path, false)?)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(status_error("DELETE", path, status))
        }
    }
}

fn webdav_method(name: &'static str) -> Result<Method> {
    Method::from_bytes(name.as_bytes()).map_err(SyncError::protocol)
}

fn status_error(method: &str, path: &str, status: StatusCode) -> SyncError {
    SyncError::protocol(format!("{method} {path} failed with status {status}"))
}

#[cfg(test)]
mod integration_tests;
