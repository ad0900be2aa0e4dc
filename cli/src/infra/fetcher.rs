//! Transformation API client — implements `ArtifactFetcher` with `reqwest`.
//!
//! The config file is uploaded as multipart form data and the compressed
//! archive in the response is streamed to disk chunk by chunk, hashed on the
//! way, so it is never held in memory whole.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::StreamExt as _;
use reqwest::multipart::{Form, Part};
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt as _;

use crate::application::ports::{ArtifactFetcher, FetchedArchive};
use crate::domain::{FetchError, JobRequest};

/// Longest excerpt of an error response body kept in the error message.
const ERROR_BODY_LIMIT: usize = 512;

/// Production `ArtifactFetcher` talking to the transformation endpoint.
pub struct HttpFetcher {
    client: reqwest::Client,
    url: String,
    show_progress: bool,
}

impl HttpFetcher {
    /// Create a fetcher for `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (TLS backend).
    pub fn new(url: &str, timeout: Option<Duration>, show_progress: bool) -> Result<Self> {
        let mut builder =
            reqwest::Client::builder().user_agent(concat!("stackforge/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("building HTTP client")?;
        Ok(Self {
            client,
            url: url.to_string(),
            show_progress,
        })
    }

    async fn form(job: &JobRequest) -> Result<Form> {
        let path = job.config_file();
        let contents = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading config file {}", path.display()))?;
        let file_name = path
            .file_name()
            .map_or_else(|| "config".to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Form::new()
            .part("configFile", Part::bytes(contents).file_name(file_name))
            .text("apiKey", job.api_key().expose().to_string())
            .text("stage", job.stage().as_str().to_string()))
    }
}

impl ArtifactFetcher for HttpFetcher {
    async fn fetch(&self, job: &JobRequest, dest: &Path) -> Result<FetchedArchive> {
        let form = Self::form(job).await?;
        tracing::debug!(url = %self.url, stage = %job.stage(), "posting transformation request");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(job.api_key().expose())
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                code: status.as_u16(),
                body: excerpt(&body),
            }
            .into());
        }

        let pb = make_progress_bar(self.show_progress, response.content_length());
        let write_err = |e: std::io::Error| FetchError::Write {
            path: dest.to_path_buf(),
            reason: e.to_string(),
        };

        let mut file = tokio::fs::File::create(dest).await.map_err(write_err)?;
        let mut hasher = Sha256::new();
        let mut bytes = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(transport)?;
            file.write_all(&chunk).await.map_err(write_err)?;
            hasher.update(&chunk);
            bytes += chunk.len() as u64;
            pb.inc(chunk.len() as u64);
        }
        file.flush().await.map_err(write_err)?;
        file.sync_all().await.map_err(write_err)?;
        drop(file);
        pb.finish_and_clear();

        Ok(FetchedArchive {
            path: dest.to_path_buf(),
            bytes,
            sha256: hex_encode(&hasher.finalize()),
        })
    }
}

fn transport(e: reqwest::Error) -> FetchError {
    FetchError::Transport(format!("{:#}", anyhow::Error::new(e)))
}

fn make_progress_bar(show: bool, total: Option<u64>) -> indicatif::ProgressBar {
    if !show {
        return indicatif::ProgressBar::hidden();
    }
    if let Some(t) = total {
        let pb = indicatif::ProgressBar::new(t);
        pb.set_style(
            indicatif::ProgressStyle::default_bar()
                .template("  [{bar:40}] {percent}%  {bytes}/{total_bytes}")
                .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        pb
    } else {
        indicatif::ProgressBar::new_spinner()
    }
}

fn excerpt(body: &str) -> String {
    let body = body.trim();
    if body.len() <= ERROR_BODY_LIMIT {
        return body.to_string();
    }
    let mut end = ERROR_BODY_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &body[..end])
}

/// Lowercase hex encoding.
#[must_use]
pub fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write as _;
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}
