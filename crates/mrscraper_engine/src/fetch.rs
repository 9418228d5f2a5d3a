use std::io::Write;
use std::sync::mpsc;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use futures_util::TryStreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::{redirect, Client, Response, Url};

use crate::decode::decode_html;
use crate::{EngineEvent, FailureKind, FetchError, ListingPage};

const MIB: u64 = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    /// Whole-request budget, body included. Items can be large archives.
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    /// Cap on a listing page body.
    pub max_listing_bytes: u64,
    /// Cap on a single item body.
    pub max_item_bytes: u64,
    pub user_agent: String,
    /// Media types accepted for listing pages. Items are not checked.
    pub listing_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30 * 60),
            redirect_limit: 5,
            max_listing_bytes: 32 * MIB,
            max_item_bytes: 16 * 1024 * MIB,
            user_agent: concat!("mrscraper/", env!("CARGO_PKG_VERSION")).to_string(),
            listing_content_types: ["text/html", "application/xhtml+xml"]
                .map(String::from)
                .to_vec(),
        }
    }
}

/// Observer of a run. The presentation layer implements it, or reads the
/// channel behind `ChannelReporter`.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: EngineEvent);
}

pub struct ChannelReporter {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelReporter {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressReporter for ChannelReporter {
    fn report(&self, event: EngineEvent) {
        // Nobody listening is not a reason to stop the run.
        let _ = self.tx.send(event);
    }
}

/// Network side of the run loop.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// GET a directory listing and decode it to text.
    async fn fetch_listing(&self, url: &str) -> Result<ListingPage, FetchError>;

    /// GET one item body and stream it into `dest` chunk by chunk. Returns
    /// the byte count. Any non-2xx status is an error.
    async fn download(&self, url: &str, dest: &mut (dyn Write + Send)) -> Result<u64, FetchError>;
}

/// `Fetcher` over one shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network(err.to_string()), ""))?;
        Ok(Self { client, settings })
    }

    /// Sends the GET and rejects non-2xx answers and bodies announced larger
    /// than `limit`.
    async fn open(&self, url: &str, limit: u64) -> Result<Response, FetchError> {
        let target = Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl(err.to_string()), url))?;
        let response = self
            .client
            .get(target)
            .send()
            .await
            .map_err(|err| classify(err, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(FailureKind::HttpStatus(status.as_u16()), url));
        }
        match response.content_length() {
            Some(announced) if announced > limit => Err(FetchError::new(
                FailureKind::TooLarge {
                    limit,
                    received: announced,
                },
                url,
            )),
            _ => Ok(response),
        }
    }

    fn accepts_listing_type(&self, header: &str) -> bool {
        let media_type = header.split(';').next().unwrap_or_default().trim();
        self.settings
            .listing_content_types
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(media_type))
    }
}

/// Drains the body, failing as soon as it grows past `limit`.
async fn read_capped(response: Response, url: &str, limit: u64) -> Result<Bytes, FetchError> {
    let mut body = BytesMut::new();
    let mut chunks = response.bytes_stream();
    while let Some(chunk) = chunks.try_next().await.map_err(|err| classify(err, url))? {
        let received = (body.len() + chunk.len()) as u64;
        if received > limit {
            return Err(FetchError::new(FailureKind::TooLarge { limit, received }, url));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body.freeze())
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch_listing(&self, url: &str) -> Result<ListingPage, FetchError> {
        let limit = self.settings.max_listing_bytes;
        let response = self.open(url, limit).await?;
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        if let Some(header) = &content_type {
            if !self.accepts_listing_type(header) {
                return Err(FetchError::new(
                    FailureKind::UnsupportedContentType(header.clone()),
                    url,
                ));
            }
        }

        let body = read_capped(response, url, limit).await?;
        let decoded = decode_html(&body, content_type.as_deref())
            .map_err(|err| FetchError::new(FailureKind::Decode(err.to_string()), url))?;
        Ok(ListingPage {
            final_url,
            html: decoded.html,
            encoding_label: decoded.encoding_label,
        })
    }

    async fn download(&self, url: &str, dest: &mut (dyn Write + Send)) -> Result<u64, FetchError> {
        let limit = self.settings.max_item_bytes;
        let response = self.open(url, limit).await?;
        let mut chunks = response.bytes_stream();
        let mut received = 0u64;
        while let Some(chunk) = chunks.try_next().await.map_err(|err| classify(err, url))? {
            received += chunk.len() as u64;
            if received > limit {
                return Err(FetchError::new(FailureKind::TooLarge { limit, received }, url));
            }
            dest.write_all(&chunk)
                .map_err(|err| FetchError::new(FailureKind::LocalWrite(err.to_string()), url))?;
        }
        Ok(received)
    }
}

fn classify(err: reqwest::Error, url: &str) -> FetchError {
    let kind = if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_redirect() {
        FailureKind::RedirectLimitExceeded
    } else {
        FailureKind::Network(err.to_string())
    };
    FetchError::new(kind, url)
}
