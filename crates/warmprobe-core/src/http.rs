//! HTTP reachability probe backed by curl (libcurl).
//!
//! Each [`HttpContext`] owns its own curl handle, so cookies and cached
//! connections stay private to one check. Transfers run in `spawn_blocking`;
//! waits between attempts are tokio sleeps that end early with
//! [`ContextClosed`] once the factory is shut down.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::watch;
use url::Url;

use crate::config::ProbeMethod;
use crate::context::{ContextFactory, ProbeContext};
use crate::error::HarnessError;
use crate::retry::{AttemptError, ContextClosed};

/// Resolve `target` against `base`: absolute URLs pass through, routes are joined onto the base.
pub fn resolve_target(base: Option<&Url>, target: &str) -> Result<Url, AttemptError> {
    if let Ok(url) = Url::parse(target) {
        return Ok(url);
    }
    match base {
        Some(base) => base
            .join(target)
            .map_err(|e| AttemptError::other(format!("invalid route {}: {}", target, e))),
        None => Err(AttemptError::other(format!(
            "relative target {} needs a base URL",
            target
        ))),
    }
}

/// Hands out isolated curl contexts and can tear all of them down at once.
pub struct HttpFactory {
    base_url: Option<Url>,
    method: ProbeMethod,
    shutdown: watch::Sender<bool>,
    live: Arc<AtomicUsize>,
}

impl HttpFactory {
    pub fn new(base_url: Option<&str>, method: ProbeMethod) -> Result<Self> {
        let base_url = base_url
            .map(|b| Url::parse(b).with_context(|| format!("invalid base URL {}", b)))
            .transpose()?;
        let (shutdown, _) = watch::channel(false);
        Ok(Self {
            base_url,
            method,
            shutdown,
            live: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Tear down every live context: pending waits fail and new acquisitions are refused.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    pub fn is_shut_down(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Contexts acquired and not yet dropped.
    pub fn live_contexts(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

impl ContextFactory for HttpFactory {
    type Context = HttpContext;

    async fn acquire(&self) -> Result<HttpContext, HarnessError> {
        if self.is_shut_down() {
            return Err(HarnessError::ShutDown);
        }
        let easy = new_handle()?;
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(HttpContext {
            easy: Some(easy),
            base_url: self.base_url.clone(),
            method: self.method,
            shutdown: self.shutdown.subscribe(),
            live: Arc::clone(&self.live),
        })
    }

    async fn release(&self, context: HttpContext) -> Result<(), HarnessError> {
        drop(context);
        Ok(())
    }
}

/// One isolated probe context: a private curl handle plus the shutdown signal.
pub struct HttpContext {
    easy: Option<curl::easy::Easy>,
    base_url: Option<Url>,
    method: ProbeMethod,
    shutdown: watch::Receiver<bool>,
    live: Arc<AtomicUsize>,
}

impl Drop for HttpContext {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ProbeContext for HttpContext {
    async fn invoke(&mut self, target: &str, timeout: Duration) -> Result<u32, AttemptError> {
        let url = resolve_target(self.base_url.as_ref(), target)?;
        let mut easy = match self.easy.take() {
            Some(easy) => easy,
            None => new_handle()?,
        };
        let method = self.method;

        let joined = tokio::task::spawn_blocking(move || {
            let r = perform(&mut easy, url.as_str(), method, timeout);
            (easy, r)
        })
        .await;

        match joined {
            Ok((easy, r)) => {
                self.easy = Some(easy);
                r
            }
            Err(e) => Err(AttemptError::other(format!("probe task join: {}", e))),
        }
    }

    async fn wait(&mut self, delay: Duration) -> Result<(), ContextClosed> {
        tokio::select! {
            _ = tokio::time::sleep(delay) => Ok(()),
            _ = self.shutdown.wait_for(|closed| *closed) => Err(ContextClosed),
        }
    }
}

/// Fresh curl handle; the empty path turns on an in-memory cookie jar private to it.
fn new_handle() -> Result<curl::easy::Easy, curl::Error> {
    let mut easy = curl::easy::Easy::new();
    easy.cookie_file("")?;
    Ok(easy)
}

/// Perform one request and return the final status (after redirects).
///
/// A zero `timeout` leaves curl without a transfer limit.
fn perform(
    easy: &mut curl::easy::Easy,
    url: &str,
    method: ProbeMethod,
    timeout: Duration,
) -> Result<u32, AttemptError> {
    easy.url(url)?;
    match method {
        ProbeMethod::Head => easy.nobody(true)?,
        ProbeMethod::Get => easy.get(true)?,
    }
    easy.follow_location(true)?;
    easy.connect_timeout(timeout)?;
    easy.timeout(timeout)?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| Ok(data.len()))?;
        transfer.perform().map_err(|e| {
            if e.is_operation_timedout() {
                AttemptError::Timeout(timeout)
            } else {
                AttemptError::Curl(e)
            }
        })?;
    }

    Ok(easy.response_code()?)
}
