//! Authenticated HTTP client for the TitanTV listings API.
//!
//! One [`TitanClient`] is built per run and drives the whole fetch
//! sequence: login, user validation, lineup, channel list, schedule. The
//! session cookie from the login response lives in the client's cookie
//! store and is attached to every subsequent request automatically.
//!
//! All requests are sequential; the only retry loop is the bounded 5xx
//! retry around the schedule fetch (see [`RetryPolicy`]).

mod error;
mod retry;

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::guide::models::{
    Channel, ChannelDocument, LineupDocument, LineupInfo, ProviderInfo, ScheduleDocument,
    UserDocument,
};

pub use error::ApiError;
pub use retry::{DEFAULT_MAX_RETRIES, FailureType, RetryDecision, RetryPolicy, classify_error};

const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 30;

/// Browser-like User-Agent; the listings site rejects obviously scripted
/// clients.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36";

/// Formats the schedule window start as the `YYYYMMDDHHMM` local wall-clock
/// string the schedule endpoint expects.
#[must_use]
pub fn schedule_start(now: DateTime<Local>) -> String {
    now.format("%Y%m%d%H%M").to_string()
}

/// Converts a guide window in days to the minute count used in the
/// schedule endpoint path (14 days = 20160 minutes).
#[must_use]
pub fn window_minutes(days: u8) -> u32 {
    u32::from(days) * 24 * 60
}

/// Client for the listings API, holding the HTTP session and identifiers.
#[derive(Debug, Clone)]
pub struct TitanClient {
    http: Client,
    base: String,
    user_id: String,
    dump_dir: Option<PathBuf>,
}

impl TitanClient {
    /// Creates a client for the given API base URL and provider user id.
    ///
    /// When `dump_dir` is set, every fetched document is also written to
    /// `<dump_dir>/<label>.json`, pretty-printed, before decoding.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] when the HTTP client cannot be
    /// constructed.
    pub fn new(
        base_url: &Url,
        user_id: impl Into<String>,
        dump_dir: Option<PathBuf>,
    ) -> Result<Self, ApiError> {
        let base = base_url.as_str().trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        if let Ok(referer) = HeaderValue::from_str(&format!("{base}/")) {
            headers.insert(header::REFERER, referer);
        }

        let http = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .cookie_store(true)
            .gzip(true)
            .build()
            .map_err(|source| ApiError::ClientBuild { source })?;

        Ok(Self {
            http,
            base,
            user_id: user_id.into(),
            dump_dir,
        })
    }

    /// Logs in and establishes the session cookie.
    ///
    /// Success is a 2xx response carrying a `Set-Cookie` header; a 200
    /// without one means the credentials were silently rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::LoginRejected`] on rejection, or a network-level
    /// error when the request itself fails.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let url = format!("{}/api/login", self.base);
        let payload = serde_json::json!({
            "loginName": username,
            "password": password,
        });

        debug!(%url, "logging in");
        let response = self
            .http
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|source| ApiError::request(&url, source))?;

        let status = response.status();
        if status.is_success() && response.headers().contains_key(header::SET_COOKIE) {
            info!("login successful");
            Ok(())
        } else {
            Err(ApiError::LoginRejected {
                status: status.as_u16(),
            })
        }
    }

    /// Fetches the user document and reduces it to provider info.
    ///
    /// Doubles as user-id validation: an unknown id answers with an error
    /// status, which aborts the run.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the fetch or decode fails.
    pub async fn fetch_provider(&self) -> Result<ProviderInfo, ApiError> {
        let url = format!("{}/api/user/{}", self.base, self.user_id);
        let user: UserDocument = self.get_json(&url, "user").await?;
        Ok(user.provider_info())
    }

    /// Fetches the lineup document and returns the first lineup.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingData`] when the document has no lineups,
    /// or another [`ApiError`] when the fetch or decode fails.
    pub async fn fetch_lineup(&self) -> Result<LineupInfo, ApiError> {
        let url = format!("{}/api/lineup/{}", self.base, self.user_id);
        let document: LineupDocument = self.get_json(&url, "lineup").await?;
        document
            .into_first()
            .ok_or_else(|| ApiError::missing_data("lineup", "lineups"))
    }

    /// Fetches the channel list for a lineup.
    ///
    /// An empty channel list is not an error; it yields an empty guide.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the fetch or decode fails.
    pub async fn fetch_channels(&self, lineup_id: &str) -> Result<Vec<Channel>, ApiError> {
        let url = format!("{}/api/channel/{}/{}", self.base, self.user_id, lineup_id);
        let document: ChannelDocument = self.get_json(&url, "channels").await?;
        let channels = document.channels;
        if channels.is_empty() {
            warn!("no channels found in channel response");
        } else {
            info!(count = channels.len(), "channel information fetched");
        }
        Ok(channels)
    }

    /// Fetches the schedule tree for a lineup and time window.
    ///
    /// `start` is a `YYYYMMDDHHMM` local timestamp (see [`schedule_start`])
    /// and `duration_minutes` the window length. Server-side (5xx) failures
    /// are retried per `policy`; anything else aborts immediately.
    ///
    /// # Errors
    ///
    /// Returns the last [`ApiError`] once the retry budget is exhausted or
    /// a non-retryable failure occurs.
    pub async fn fetch_schedule(
        &self,
        lineup_id: &str,
        start: &str,
        duration_minutes: u32,
        policy: &RetryPolicy,
    ) -> Result<ScheduleDocument, ApiError> {
        let url = format!(
            "{}/api/schedule/{}/{}/{}/{}",
            self.base, self.user_id, lineup_id, start, duration_minutes
        );

        let mut attempt = 1;
        loop {
            match self.get_json::<ScheduleDocument>(&url, "schedule").await {
                Ok(document) => return Ok(document),
                Err(error) => {
                    let failure = classify_error(&error);
                    match policy.should_retry(failure, attempt) {
                        RetryDecision::Retry {
                            delay,
                            attempt: next,
                        } => {
                            warn!(
                                %error,
                                attempt,
                                delay_ms = delay.as_millis(),
                                "schedule fetch failed, retrying"
                            );
                            tokio::time::sleep(delay).await;
                            attempt = next;
                        }
                        RetryDecision::DoNotRetry { reason } => {
                            warn!(%error, attempt, reason, "schedule fetch failed");
                            return Err(error);
                        }
                    }
                }
            }
        }
    }

    /// GETs a URL and decodes the JSON body, dumping it first when
    /// configured.
    async fn get_json<T: DeserializeOwned>(&self, url: &str, label: &str) -> Result<T, ApiError> {
        debug!(label, url, "fetching");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::request(url, source))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::http_status(url, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|source| ApiError::request(url, source))?;

        self.dump_document(label, &body);

        let document = serde_json::from_str(&body).map_err(|source| ApiError::decode(label, source))?;
        info!(label, "fetched successfully");
        Ok(document)
    }

    /// Writes a fetched payload to `<dump_dir>/<label>.json` when dumping
    /// is enabled. Dump failures are logged, never fatal.
    fn dump_document(&self, label: &str, body: &str) {
        let Some(dir) = &self.dump_dir else {
            return;
        };
        let path = dir.join(format!("{label}.json"));
        let pretty = serde_json::from_str::<serde_json::Value>(body)
            .and_then(|value| serde_json::to_string_pretty(&value))
            .unwrap_or_else(|_| body.to_string());
        match std::fs::write(&path, pretty) {
            Ok(()) => debug!(path = %path.display(), "saved JSON document"),
            Err(error) => warn!(path = %path.display(), %error, "failed to save JSON document"),
        }
    }
}
