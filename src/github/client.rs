// src/github/client.rs
// =============================================================================
// HTTP implementation of ContentsApi on top of reqwest.
//
// What happens here:
// 1. Build one reqwest Client with the accept header and a timeout; the
//    token is added per request, only for the API host and the raw host
// 2. Turn (repo, path) into /repos/{owner}/{repo}/contents/{path}?ref={branch}
// 3. Follow `Link: <...>; rel="next"` headers when a listing is paginated
// 4. Map HTTP statuses and transport errors onto FetchError
//
// The token is passed in through ClientConfig. Nothing in here reads the
// environment.
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response};
use url::Url;

use super::api::ContentsApi;
use super::repo::RepoRef;
use super::types::{ContentItem, ContentsResponse, FileBlob, PutRequest, PutResponse};
use crate::error::{FetchError, Result};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// A listing that still has a next page after this many is an error
const MAX_PAGES: usize = 100;

// Download links the token may be sent to besides the API host itself
const RAW_HOST: &str = "raw.githubusercontent.com";

/// Connection settings for [`GitHubClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base: Url,
    /// Bearer token; anonymous requests when `None`
    pub token: Option<String>,
    /// Upper bound for every single request
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_base: Url::parse(DEFAULT_API_BASE).expect("default API base is a valid URL"),
            token: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("repo-porter/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Talks to a GitHub-compatible contents API.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    api_base: Url,
    auth: Option<HeaderValue>,
    max_pages: usize,
}

impl GitHubClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        // Attached per request in `authorize`, never as a default header
        let auth = match &config.token {
            Some(token) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
                    .map_err(|e| FetchError::encoding("authorization header", e))?;
                value.set_sensitive(true);
                Some(value)
            }
            None => None,
        };

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::from_transport(config.api_base.as_str(), e))?;

        Ok(GitHubClient {
            http,
            api_base: config.api_base,
            auth,
            max_pages: MAX_PAGES,
        })
    }

    // The token only goes to the API host and GitHub's raw content host
    fn is_trusted(&self, url: &Url) -> bool {
        let same_origin = url.host_str() == self.api_base.host_str()
            && url.port_or_known_default() == self.api_base.port_or_known_default();
        same_origin || url.host_str() == Some(RAW_HOST)
    }

    fn authorize(&self, request: RequestBuilder, url: &Url) -> RequestBuilder {
        match &self.auth {
            Some(value) if self.is_trusted(url) => request.header(header::AUTHORIZATION, value.clone()),
            _ => request,
        }
    }

    // Builds /repos/{owner}/{repo}/contents/{path}?ref={branch}
    //
    // Each path segment is escaped on its own, so names with spaces or '#'
    // survive; empty segments (leading/trailing/double slashes) are dropped.
    fn contents_url(&self, repo: &RepoRef, path: &str) -> Result<Url> {
        let mut url = self.api_base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| FetchError::Network {
                url: self.api_base.to_string(),
                status: None,
                message: "API base URL cannot carry a path".to_string(),
            })?;
            segments
                .pop_if_empty()
                .extend(["repos", repo.owner.as_str(), repo.repo.as_str(), "contents"])
                .extend(path.split('/').filter(|s| !s.is_empty()));
        }
        url.query_pairs_mut().append_pair("ref", &repo.branch);
        Ok(url)
    }

    // Sends a request and turns any non-2xx answer into a FetchError
    async fn send(&self, request: RequestBuilder, url: &str, path: &str) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| FetchError::from_transport(url, e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let remaining = header_u64(response.headers(), "x-ratelimit-remaining");
        let reset = header_u64(response.headers(), "x-ratelimit-reset");
        Err(FetchError::from_status(url, path, status, remaining, reset))
    }

    async fn get_contents(&self, url: &Url, path: &str) -> Result<(ContentsResponse, Option<String>)> {
        let request = self.authorize(self.http.get(url.clone()), url);
        let response = self.send(request, url.as_str(), path).await?;
        let next = response
            .headers()
            .get(header::LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_next_link);

        let body = response
            .json::<ContentsResponse>()
            .await
            .map_err(|e| FetchError::encoding(path, e))?;
        Ok((body, next))
    }
}

#[async_trait]
impl ContentsApi for GitHubClient {
    async fn list_dir(&self, repo: &RepoRef, path: &str) -> Result<Vec<ContentItem>> {
        let first = self.contents_url(repo, path)?;
        debug!("listing {} ({})", if path.is_empty() { "/" } else { path }, repo);

        let mut items = Vec::new();
        let mut next = Some(first);
        let mut pages = 0;

        while let Some(url) = next.take() {
            let (body, link) = self.get_contents(&url, path).await?;
            match body {
                ContentsResponse::Listing(page) => items.extend(page),
                ContentsResponse::File(_) => {
                    return Err(FetchError::encoding(path, "expected a directory listing, got a file"));
                }
            }

            pages += 1;
            next = match link {
                Some(link) if link != url.as_str() => Some(
                    Url::parse(&link).map_err(|e| FetchError::encoding(path, e))?,
                ),
                _ => None,
            };

            if next.is_some() && pages >= self.max_pages {
                return Err(FetchError::Network {
                    url: url.to_string(),
                    status: None,
                    message: format!(
                        "listing of '{}' still has more pages after {} pages",
                        path, self.max_pages
                    ),
                });
            }
        }

        Ok(items)
    }

    async fn get_file(&self, repo: &RepoRef, path: &str) -> Result<FileBlob> {
        let url = self.contents_url(repo, path)?;
        debug!("fetching {} ({})", path, repo);

        match self.get_contents(&url, path).await?.0 {
            ContentsResponse::File(blob) => Ok(blob),
            ContentsResponse::Listing(_) => Err(FetchError::encoding(path, "path is a directory")),
        }
    }

    async fn put_file(&self, repo: &RepoRef, path: &str, request: &PutRequest) -> Result<PutResponse> {
        let url = self.contents_url(repo, path)?;
        debug!("committing {} ({} base64 chars) to {}", path, request.content.len(), repo);

        let put = self.authorize(self.http.put(url.clone()).json(request), &url);
        let response = self.send(put, url.as_str(), path).await?;

        response
            .json::<PutResponse>()
            .await
            .map_err(|e| FetchError::encoding(path, e))
    }

    async fn get_raw(&self, url: &str) -> Result<Vec<u8>> {
        debug!("downloading {}", url);
        let parsed = Url::parse(url).map_err(|e| FetchError::encoding(url, e))?;
        let request = self.authorize(self.http.get(parsed.clone()), &parsed);
        let response = self.send(request, url, url).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_transport(url, e))?;
        Ok(bytes.to_vec())
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

// Extracts the rel="next" target from an RFC 5988 Link header
//
// Example:
//   <https://api.github.com/x?page=2>; rel="next", <https://api.github.com/x?page=5>; rel="last"
//   -> Some("https://api.github.com/x?page=2")
fn parse_next_link(value: &str) -> Option<String> {
    value.split(',').find_map(|part| {
        let mut pieces = part.split(';');
        let target = pieces.next()?.trim();
        let is_next = pieces.any(|p| {
            let p = p.trim();
            p == "rel=\"next\"" || p == "rel=next"
        });
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')?
            .strip_suffix('>')
            .map(str::to_string)
    })
}
