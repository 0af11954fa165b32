//! Scripted contexts and factories for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::context::{ContextFactory, ProbeContext};
use crate::error::HarnessError;
use crate::retry::{AttemptError, ContextClosed};

type Route = Arc<dyn Fn(&str) -> Result<u32, AttemptError> + Send + Sync>;

enum Source {
    Script(VecDeque<Result<u32, AttemptError>>),
    Repeat(u32),
    Route(Route),
}

/// Context that replays canned results and records every wait instead of sleeping.
pub(crate) struct ScriptedContext {
    source: Source,
    invocations: usize,
    waits: Vec<Duration>,
    timeouts: Vec<Duration>,
    fail_wait_at: Option<usize>,
    hang_waits: bool,
    seen: Option<Arc<Mutex<Vec<String>>>>,
}

impl ScriptedContext {
    fn with_source(source: Source) -> Self {
        Self {
            source,
            invocations: 0,
            waits: Vec::new(),
            timeouts: Vec::new(),
            fail_wait_at: None,
            hang_waits: false,
            seen: None,
        }
    }

    pub(crate) fn new(script: Vec<Result<u32, AttemptError>>) -> Self {
        Self::with_source(Source::Script(script.into()))
    }

    pub(crate) fn repeating(status: u32) -> Self {
        Self::with_source(Source::Repeat(status))
    }

    /// Make the wait with this index (0-based) fail as if the context was closed.
    pub(crate) fn fail_wait_at(mut self, index: usize) -> Self {
        self.fail_wait_at = Some(index);
        self
    }

    pub(crate) fn invocations(&self) -> usize {
        self.invocations
    }

    pub(crate) fn waits(&self) -> Vec<Duration> {
        self.waits.clone()
    }

    pub(crate) fn timeouts(&self) -> Vec<Duration> {
        self.timeouts.clone()
    }
}

impl ProbeContext for ScriptedContext {
    async fn invoke(&mut self, target: &str, timeout: Duration) -> Result<u32, AttemptError> {
        self.invocations += 1;
        self.timeouts.push(timeout);
        if let Some(seen) = &self.seen {
            seen.lock().unwrap().push(target.to_string());
        }
        match &mut self.source {
            Source::Script(script) => script
                .pop_front()
                .unwrap_or_else(|| Err(AttemptError::other("script exhausted"))),
            Source::Repeat(status) => Ok(*status),
            Source::Route(route) => (**route)(target),
        }
    }

    async fn wait(&mut self, delay: Duration) -> Result<(), ContextClosed> {
        if self.fail_wait_at == Some(self.waits.len()) {
            return Err(ContextClosed);
        }
        if self.hang_waits {
            std::future::pending::<()>().await;
        }
        self.waits.push(delay);
        Ok(())
    }
}

/// Factory whose contexts answer per target through a routing closure.
pub(crate) struct ScriptedFactory {
    route: Route,
    acquired: AtomicUsize,
    released: AtomicUsize,
    released_on_drop: AtomicUsize,
    fail_acquire_at: Option<usize>,
    fail_release: bool,
    hang_waits: bool,
    seen: Arc<Mutex<Vec<String>>>,
}

impl ScriptedFactory {
    pub(crate) fn new<F>(route: F) -> Self
    where
        F: Fn(&str) -> Result<u32, AttemptError> + Send + Sync + 'static,
    {
        Self {
            route: Arc::new(route),
            acquired: AtomicUsize::new(0),
            released: AtomicUsize::new(0),
            released_on_drop: AtomicUsize::new(0),
            fail_acquire_at: None,
            fail_release: false,
            hang_waits: false,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail the acquisition with this index (0-based).
    pub(crate) fn fail_acquire_at(mut self, index: usize) -> Self {
        self.fail_acquire_at = Some(index);
        self
    }

    pub(crate) fn fail_release(mut self) -> Self {
        self.fail_release = true;
        self
    }

    /// Contexts never finish waiting, so a check only ends by being cancelled.
    pub(crate) fn hang_waits(mut self) -> Self {
        self.hang_waits = true;
        self
    }

    pub(crate) fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub(crate) fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub(crate) fn released_on_drop(&self) -> usize {
        self.released_on_drop.load(Ordering::SeqCst)
    }

    /// Targets probed so far, one entry per invocation.
    pub(crate) fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

impl ContextFactory for ScriptedFactory {
    type Context = ScriptedContext;

    async fn acquire(&self) -> Result<ScriptedContext, HarnessError> {
        let index = self.acquired.fetch_add(1, Ordering::SeqCst);
        if self.fail_acquire_at == Some(index) {
            return Err(HarnessError::Acquire("scripted failure".into()));
        }
        let mut ctx = ScriptedContext::with_source(Source::Route(Arc::clone(&self.route)));
        ctx.seen = Some(Arc::clone(&self.seen));
        ctx.hang_waits = self.hang_waits;
        Ok(ctx)
    }

    async fn release(&self, _context: ScriptedContext) -> Result<(), HarnessError> {
        self.released.fetch_add(1, Ordering::SeqCst);
        if self.fail_release {
            return Err(HarnessError::Release("scripted failure".into()));
        }
        Ok(())
    }

    fn release_on_drop(&self, _context: ScriptedContext) {
        self.released_on_drop.fetch_add(1, Ordering::SeqCst);
    }
}
