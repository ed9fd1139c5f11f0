//! Embed probing and external viewing
//!
//! A terminal cannot render the embed page, so "loaded" means the embed
//! host answered a request for the URL. The page itself is viewed in
//! the system browser.

use std::process::Stdio;
use std::time::Duration;

use log::{debug, info};
use reqwest::Url;
use thiserror::Error;
use tokio::process::Command;

/// Errors from probing or opening an embed
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Embed request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Failed to launch browser: {0}")]
    Launch(#[from] std::io::Error),
    #[error("Browser exited with status {0}")]
    BrowserExit(i32),
}

/// Checks whether an embed URL is reachable
#[derive(Debug, Clone)]
pub struct EmbedProbe {
    client: reqwest::Client,
}

impl EmbedProbe {
    /// Create a probe whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Request the embed page.
    ///
    /// Any HTTP response counts as loaded, error pages included; only
    /// transport failures mean the embed never loads.
    pub async fn probe(&self, url: &str) -> Result<u16, ProbeError> {
        debug!("probing embed {}", url);
        let mut request = self.client.get(url);
        if let Some(referer) = referer_for(url) {
            request = request.header("Referer", referer);
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        debug!("embed {} answered {}", url, status);
        Ok(status)
    }
}

/// Referrer sent with probes: the embed's own origin. Credentials,
/// path, query and fragment never leave with it.
fn referer_for(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(match parsed.port() {
        Some(port) => format!("{}://{}:{}/", parsed.scheme(), host, port),
        None => format!("{}://{}/", parsed.scheme(), host),
    })
}

/// Command used to hand a URL to the desktop
fn opener() -> (&'static str, &'static [&'static str]) {
    if cfg!(target_os = "macos") {
        ("open", &[])
    } else if cfg!(target_os = "windows") {
        ("cmd", &["/C", "start", ""])
    } else {
        ("xdg-open", &[])
    }
}

/// Open an embed URL in the system browser
pub async fn open_in_browser(url: &str) -> Result<(), ProbeError> {
    let (program, args) = opener();
    info!("opening {} with {}", url, program);
    let status = Command::new(program)
        .args(args)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await?;

    if status.success() {
        Ok(())
    } else {
        Err(ProbeError::BrowserExit(status.code().unwrap_or(-1)))
    }
}
