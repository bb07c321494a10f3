//! [`PageDriver`] backed by a real Chromium tab over CDP.
//!
//! A background listener follows the tab's `Network.*` events. It keeps the
//! set of in-flight requests for network-idle readiness and hands every
//! finished response to the registered [`ResponseSink`], with the body read
//! lazily through `Network.getResponseBody`.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent,
    EventResponseReceived, GetResponseBodyParams, Headers, RequestId, SetUserAgentOverrideParams,
};
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use log::{debug, trace, warn};
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use super::cleanup::{CleanupResult, cleanup_browser_and_data};
use super::{NavigationError, ObservedResponse, PageDriver, Readiness, ResponseBody, ResponseSink};
use crate::browser_setup::launch_browser;
use crate::config::MirrorConfig;
use crate::http_client::{DownloadError, HttpClient, RawRequest, RawResponse};
use crate::utils::constants::{ACCEPT_LANGUAGE, CHROME_USER_AGENT, NETWORK_IDLE_QUIET_MS};

const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(100);

const ANCHOR_HREFS_JS: &str =
    "Array.from(document.querySelectorAll('a[href]'), a => a.href).filter(Boolean)";

/// Response metadata held between `responseReceived` and `loadingFinished`.
struct PendingResponse {
    url: String,
    status: u16,
    content_type: Option<String>,
}

/// Network activity of the tab since the current navigation started.
struct NetworkState {
    in_flight: HashSet<String>,
    pending: HashMap<String, PendingResponse>,
    captures_running: usize,
    last_activity: Instant,
    sink: Option<Arc<dyn ResponseSink>>,
}

impl NetworkState {
    fn new() -> Self {
        Self {
            in_flight: HashSet::new(),
            pending: HashMap::new(),
            captures_running: 0,
            last_activity: Instant::now(),
            sink: None,
        }
    }

    fn reset(&mut self) {
        self.in_flight.clear();
        self.pending.clear();
        self.last_activity = Instant::now();
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    fn is_idle(&self, quiet: Duration) -> bool {
        self.in_flight.is_empty()
            && self.captures_running == 0
            && self.last_activity.elapsed() >= quiet
    }
}

type SharedState = Arc<Mutex<NetworkState>>;

/// Body of a response still held by the browser.
struct CdpBody {
    page: Page,
    request_id: RequestId,
}

#[async_trait]
impl ResponseBody for CdpBody {
    async fn bytes(&self) -> Result<Vec<u8>> {
        let response = self
            .page
            .execute(GetResponseBodyParams::new(self.request_id.clone()))
            .await
            .context("Network.getResponseBody failed")?;

        if response.result.base64_encoded {
            BASE64
                .decode(response.result.body.as_bytes())
                .context("Response body is not valid base64")
        } else {
            Ok(response.result.body.clone().into_bytes())
        }
    }
}

/// A single Chromium tab plus the browser process that owns it.
pub struct ChromiumDriver {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    listener: JoinHandle<()>,
    network: SharedState,
    http: HttpClient,
    data_dir: PathBuf,
    closed: bool,
}

impl ChromiumDriver {
    /// Launch a browser for `config` and open the tab the crawl will drive.
    ///
    /// The browser is released again if any later setup step fails.
    pub async fn launch(config: &MirrorConfig) -> Result<Self> {
        let timeout = config.navigation_timeout();
        let (mut browser, handler, data_dir) =
            launch_browser(config.headless(), config.chrome_data_dir().cloned(), timeout).await?;

        match Self::open_tab(&browser, timeout).await {
            Ok((page, listener, network, http)) => Ok(Self {
                browser,
                page,
                handler,
                listener,
                network,
                http,
                data_dir,
                closed: false,
            }),
            Err(e) => {
                let _ = cleanup_browser_and_data(&mut browser, &data_dir).await;
                handler.abort();
                Err(e)
            }
        }
    }

    async fn open_tab(
        browser: &Browser,
        timeout: Duration,
    ) -> Result<(Page, JoinHandle<()>, SharedState, HttpClient)> {
        let page = browser
            .new_page("about:blank")
            .await
            .context("Failed to open browser tab")?;

        page.execute(EnableParams::default())
            .await
            .context("Failed to enable network domain")?;
        page.execute(SetUserAgentOverrideParams {
            user_agent: CHROME_USER_AGENT.to_string(),
            accept_language: Some(ACCEPT_LANGUAGE.to_string()),
            platform: None,
            user_agent_metadata: None,
        })
        .await
        .context("Failed to set user agent")?;

        let network = Arc::new(Mutex::new(NetworkState::new()));
        let listener = spawn_network_listener(&page, Arc::clone(&network)).await?;
        let http = HttpClient::with_timeout(timeout)?;

        Ok((page, listener, network, http))
    }
}

/// Follow the tab's network events until the tab goes away.
async fn spawn_network_listener(page: &Page, state: SharedState) -> Result<JoinHandle<()>> {
    let mut requests = page
        .event_listener::<EventRequestWillBeSent>()
        .await
        .context("Failed to subscribe to requestWillBeSent")?;
    let mut responses = page
        .event_listener::<EventResponseReceived>()
        .await
        .context("Failed to subscribe to responseReceived")?;
    let mut finished = page
        .event_listener::<EventLoadingFinished>()
        .await
        .context("Failed to subscribe to loadingFinished")?;
    let mut failed = page
        .event_listener::<EventLoadingFailed>()
        .await
        .context("Failed to subscribe to loadingFailed")?;

    let page = page.clone();
    Ok(tokio::spawn(async move {
        loop {
            tokio::select! {
                Some(event) = requests.next() => {
                    let mut s = state.lock();
                    s.in_flight.insert(event.request_id.inner().clone());
                    s.touch();
                }
                Some(event) = responses.next() => {
                    let status = u16::try_from(event.response.status).unwrap_or(0);
                    let content_type = header_content_type(&event.response.headers)
                        .or_else(|| Some(event.response.mime_type.clone()).filter(|m| !m.is_empty()));
                    let mut s = state.lock();
                    s.pending.insert(
                        event.request_id.inner().clone(),
                        PendingResponse {
                            url: event.response.url.clone(),
                            status,
                            content_type,
                        },
                    );
                    s.touch();
                }
                Some(event) = finished.next() => {
                    let id = event.request_id.inner().clone();
                    let dispatch = {
                        let mut s = state.lock();
                        s.in_flight.remove(&id);
                        s.touch();
                        let pending = s.pending.remove(&id);
                        match (pending, s.sink.clone()) {
                            (Some(pending), Some(sink)) => {
                                s.captures_running += 1;
                                Some((pending, sink))
                            }
                            _ => None,
                        }
                    };

                    if let Some((pending, sink)) = dispatch {
                        let body = CdpBody {
                            page: page.clone(),
                            request_id: event.request_id.clone(),
                        };
                        let observed = ObservedResponse::new(
                            pending.url,
                            pending.status,
                            pending.content_type,
                            Box::new(body),
                        );
                        let state = Arc::clone(&state);
                        tokio::spawn(async move {
                            sink.on_response(observed).await;
                            let mut s = state.lock();
                            s.captures_running = s.captures_running.saturating_sub(1);
                            s.touch();
                        });
                    }
                }
                Some(event) = failed.next() => {
                    trace!(target: "site_mirror::browser", "Request failed: {}", event.error_text);
                    let id = event.request_id.inner().clone();
                    let mut s = state.lock();
                    s.in_flight.remove(&id);
                    s.pending.remove(&id);
                    s.touch();
                }
                else => break,
            }
        }
        debug!(target: "site_mirror::browser", "Network listener finished");
    }))
}

/// `Content-Type` header value, looked up case-insensitively.
fn header_content_type(headers: &Headers) -> Option<String> {
    headers
        .inner()
        .as_object()?
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
        .and_then(|(_, value)| value.as_str())
        .map(str::to_string)
}

async fn wait_for_network_idle(state: &SharedState) {
    let quiet = Duration::from_millis(NETWORK_IDLE_QUIET_MS);
    while !state.lock().is_idle(quiet) {
        tokio::time::sleep(IDLE_POLL_INTERVAL).await;
    }
}

#[async_trait]
impl PageDriver for ChromiumDriver {
    fn on_response(&mut self, sink: Arc<dyn ResponseSink>) {
        self.network.lock().sink = Some(sink);
    }

    async fn navigate(
        &mut self,
        url: &str,
        timeout: Duration,
        readiness: Readiness,
    ) -> std::result::Result<(), NavigationError> {
        self.network.lock().reset();

        let load = async {
            self.page
                .goto(url.to_string())
                .await
                .map_err(|e| NavigationError::Failed(e.to_string()))?;
            match readiness {
                Readiness::NetworkIdle => wait_for_network_idle(&self.network).await,
            }
            Ok(())
        };

        match tokio::time::timeout(timeout, load).await {
            Ok(result) => result,
            Err(_) => Err(NavigationError::Timeout(timeout)),
        }
    }

    async fn anchor_hrefs(&self) -> Result<Vec<String>> {
        self.page
            .evaluate(ANCHOR_HREFS_JS)
            .await
            .context("Failed to evaluate anchor query")?
            .into_value::<Vec<String>>()
            .context("Anchor query returned an unexpected value")
    }

    async fn content(&self) -> Result<String> {
        self.page
            .content()
            .await
            .context("Failed to read rendered HTML")
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        self.listener.abort();
        let result = cleanup_browser_and_data(&mut self.browser, &self.data_dir).await;
        self.handler.abort();

        match result? {
            CleanupResult::Success => Ok(()),
            CleanupResult::PartialFailure(errors) => {
                warn!(
                    target: "site_mirror::browser",
                    "Browser cleanup incomplete: {}",
                    errors.join("; ")
                );
                Ok(())
            }
        }
    }
}

#[async_trait]
impl RawRequest for ChromiumDriver {
    async fn raw_request(
        &self,
        url: &str,
        referer: Option<&str>,
    ) -> std::result::Result<RawResponse, DownloadError> {
        self.http.raw_request(url, referer).await
    }
}

impl Drop for ChromiumDriver {
    fn drop(&mut self) {
        if !self.closed {
            self.listener.abort();
            self.handler.abort();
        }
    }
}
