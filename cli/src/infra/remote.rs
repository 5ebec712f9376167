//! Remote infrastructure: GitHub-style repository contents API over `ureq`.

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::application::ports::{ContentApi, ContentUpdate};
use crate::domain::config::RemoteConfig;
use crate::domain::error::SyncError;

/// Default API root.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Environment variable overriding the API root.
pub const API_URL_ENV: &str = "AGENT_EDITOR_GITHUB_API_URL";

/// Client for `PUT/GET /repos/{owner}/{repo}/contents/{path}`.
pub struct GithubContentApi {
    base_url: String,
    token: Option<String>,
}

impl GithubContentApi {
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Client pointed at `AGENT_EDITOR_GITHUB_API_URL`, or the public API.
    #[must_use]
    pub fn from_env(token: Option<String>) -> Self {
        let url = std::env::var(API_URL_ENV).unwrap_or_else(|_| GITHUB_API_URL.to_string());
        Self::new(url, token)
    }

    fn contents_url(&self, target: &RemoteConfig) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.base_url,
            target.owner,
            target.repo,
            target.file_path.trim_start_matches('/')
        )
    }

    fn prepare(&self, req: ureq::Request) -> ureq::Request {
        let req = req
            .set("Accept", "application/vnd.github+json")
            .set("User-Agent", "agent-editor");
        match &self.token {
            Some(token) => req.set("Authorization", &format!("Bearer {token}")),
            None => req,
        }
    }
}

/// Map a `ureq` failure to a [`SyncError`], keeping the response body.
fn sync_error(action: &'static str, err: ureq::Error) -> anyhow::Error {
    match err {
        ureq::Error::Status(status, resp) => SyncError::Http {
            action,
            status,
            body: resp.into_string().unwrap_or_default(),
        }
        .into(),
        ureq::Error::Transport(t) => SyncError::Transport {
            action,
            reason: t.to_string(),
        }
        .into(),
    }
}

impl ContentApi for GithubContentApi {
    fn fetch_revision(&self, target: &RemoteConfig) -> Result<Option<String>> {
        let url = self.contents_url(target);
        tracing::debug!(%url, branch = %target.branch, "fetching remote revision");
        let req = self.prepare(ureq::get(&url)).query("ref", &target.branch);
        let body: serde_json::Value = match req.call() {
            Ok(resp) => serde_json::from_str(&resp.into_string().context("reading response")?)
                .context("parsing response")?,
            Err(ureq::Error::Status(404, _)) => return Ok(None),
            Err(e) => return Err(sync_error("fetching remote file", e)),
        };
        let sha = body["sha"]
            .as_str()
            .with_context(|| format!("remote path {} is not a file", target.file_path))?;
        Ok(Some(sha.to_string()))
    }

    fn put_content(&self, target: &RemoteConfig, update: &ContentUpdate) -> Result<()> {
        let url = self.contents_url(target);
        let mut body = serde_json::json!({
            "message": update.message,
            "content": STANDARD.encode(&update.content),
            "branch": target.branch,
        });
        if let Some(sha) = &update.revision {
            body["sha"] = serde_json::Value::String(sha.clone());
        }
        tracing::debug!(%url, creating = update.revision.is_none(), "uploading file");
        self.prepare(ureq::put(&url))
            .send_json(body)
            .map_err(|e| sync_error("uploading file", e))?;
        Ok(())
    }
}
