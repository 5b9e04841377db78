use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use fractex_core::{FractalKind, Viewport};

use crate::color::Rgb;
use crate::error::RenderError;
use crate::row::render_row_for;
use crate::shell::HostShell;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    Idle,
    Rendering,
}

impl RenderPhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Rendering => "Rendering\u{2026}",
        }
    }
}

// ---------------------------------------------------------------------------
// Publish gate
// ---------------------------------------------------------------------------

/// Holds the generation that is allowed to publish rows.
///
/// Starting a pass advances the generation under the lock, and every publish
/// checks and writes under the same lock, so once a newer pass has started no
/// row of an older pass can reach the shell.
#[derive(Debug, Default)]
struct PublishGate {
    current: Mutex<u64>,
}

impl PublishGate {
    fn current(&self) -> u64 {
        *lock(&self.current)
    }

    /// Run `f` while holding the gate, only if `generation` is still current.
    fn with_current(&self, generation: u64, f: impl FnOnce()) -> bool {
        let current = lock(&self.current);
        if *current != generation {
            return false;
        }
        f();
        true
    }
}

// ---------------------------------------------------------------------------
// Render pass
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct PassState {
    generation: u64,
    kind: FractalKind,
    viewport: Viewport,
    extent: u32,
    rows_remaining: AtomicU32,
    published_rows: AtomicU32,
    discarded_rows: AtomicU32,
    failed_rows: AtomicU32,
    started: Instant,
    /// `Some(elapsed)` once the last row task has finished.
    finished: Mutex<Option<Duration>>,
    done: Condvar,
}

impl PassState {
    fn new(generation: u64, kind: FractalKind, viewport: Viewport, extent: u32) -> Self {
        Self {
            generation,
            kind,
            viewport,
            extent,
            rows_remaining: AtomicU32::new(extent),
            published_rows: AtomicU32::new(0),
            discarded_rows: AtomicU32::new(0),
            failed_rows: AtomicU32::new(0),
            started: Instant::now(),
            finished: Mutex::new(None),
            done: Condvar::new(),
        }
    }
}

/// Handle to one full-image computation.
///
/// The fractal and viewport are snapshots taken when the pass started; row
/// tasks never see later changes to the session.
#[derive(Debug, Clone)]
pub struct RenderPass {
    state: Arc<PassState>,
    gate: Arc<PublishGate>,
}

impl RenderPass {
    pub fn generation(&self) -> u64 {
        self.state.generation
    }

    pub fn kind(&self) -> FractalKind {
        self.state.kind
    }

    pub fn viewport(&self) -> Viewport {
        self.state.viewport
    }

    pub fn extent(&self) -> u32 {
        self.state.extent
    }

    pub fn rows_remaining(&self) -> u32 {
        self.state.rows_remaining.load(Ordering::Acquire)
    }

    /// Rows written to the shell (including background rows for failures).
    pub fn published_rows(&self) -> u32 {
        self.state.published_rows.load(Ordering::Relaxed)
    }

    /// Rows computed after a newer pass started and therefore dropped.
    pub fn discarded_rows(&self) -> u32 {
        self.state.discarded_rows.load(Ordering::Relaxed)
    }

    /// Rows whose computation failed and were rendered as background.
    pub fn failed_rows(&self) -> u32 {
        self.state.failed_rows.load(Ordering::Relaxed)
    }

    /// `true` while no newer pass has been started.
    pub fn is_current(&self) -> bool {
        self.gate.current() == self.state.generation
    }

    pub fn is_complete(&self) -> bool {
        lock(&self.state.finished).is_some()
    }

    /// Wall time from start to the last row, once complete.
    pub fn elapsed(&self) -> Option<Duration> {
        *lock(&self.state.finished)
    }

    /// Block until every row task of this pass has finished.
    pub fn wait(&self) {
        let mut finished = lock(&self.state.finished);
        while finished.is_none() {
            finished = self
                .state
                .done
                .wait(finished)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Like [`wait`](Self::wait) with a deadline. Returns `true` if complete.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let finished = lock(&self.state.finished);
        let (finished, _) = self
            .state
            .done
            .wait_timeout_while(finished, timeout, |f| f.is_none())
            .unwrap_or_else(PoisonError::into_inner);
        finished.is_some()
    }
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Fans a render pass out as one task per row on a dedicated Rayon pool.
///
/// There is no hard cancellation: starting a new pass bumps the generation,
/// and rows of older passes finish but are discarded at publish time.
pub struct RenderScheduler {
    pool: rayon::ThreadPool,
    gate: Arc<PublishGate>,
    latest: Mutex<Option<RenderPass>>,
}

impl RenderScheduler {
    /// Build a scheduler with `threads` workers (`0` = one per CPU).
    pub fn new(threads: usize) -> crate::Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("row-worker-{i}"))
            .build()?;
        debug!(threads = pool.current_num_threads(), "Render pool ready");
        Ok(Self {
            pool,
            gate: Arc::new(PublishGate::default()),
            latest: Mutex::new(None),
        })
    }

    pub fn thread_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Generation of the most recently started pass (`0` before the first).
    pub fn current_generation(&self) -> u64 {
        self.gate.current()
    }

    pub fn phase(&self) -> RenderPhase {
        match lock(&self.latest).as_ref() {
            Some(pass) if !pass.is_complete() => RenderPhase::Rendering,
            _ => RenderPhase::Idle,
        }
    }

    /// Start a pass over `extent × extent` pixels and return immediately.
    ///
    /// Input is disabled on `shell` before any row is dispatched and
    /// re-enabled when the last row of this pass lands, unless a newer pass
    /// has started by then. Shell callbacks run while the publish gate is
    /// held and must not call back into the scheduler.
    pub fn start_render_pass(
        &self,
        kind: FractalKind,
        viewport: Viewport,
        extent: u32,
        shell: Arc<dyn HostShell>,
    ) -> crate::Result<RenderPass> {
        if extent == 0 {
            return Err(RenderError::InvalidDisplayExtent(extent));
        }

        let generation = {
            let mut current = lock(&self.gate.current);
            *current += 1;
            shell.set_input_enabled(false);
            *current
        };

        let state = Arc::new(PassState::new(generation, kind, viewport, extent));
        debug!(generation, %kind, extent, "Starting render pass");

        for row in 0..extent {
            let state = Arc::clone(&state);
            let gate = Arc::clone(&self.gate);
            let shell = Arc::clone(&shell);
            self.pool.spawn(move || {
                run_row(&state, &gate, shell.as_ref(), row, || {
                    render_row_for(state.kind, &state.viewport, state.extent, row)
                })
            });
        }

        let pass = RenderPass {
            state,
            gate: Arc::clone(&self.gate),
        };
        *lock(&self.latest) = Some(pass.clone());
        Ok(pass)
    }
}

// ---------------------------------------------------------------------------
// Row task
// ---------------------------------------------------------------------------

fn run_row<C>(state: &PassState, gate: &PublishGate, shell: &dyn HostShell, row: u32, compute: C)
where
    C: FnOnce() -> crate::Result<Vec<Rgb>>,
{
    let generation = state.generation;
    let colors = match panic::catch_unwind(AssertUnwindSafe(compute)) {
        Ok(Ok(colors)) => colors,
        Ok(Err(e)) => {
            warn!(generation, row, "{e}; leaving row as background");
            state.failed_rows.fetch_add(1, Ordering::Relaxed);
            vec![Rgb::BACKGROUND; state.extent as usize]
        }
        Err(_) => {
            warn!(generation, row, "Row task panicked; leaving row as background");
            state.failed_rows.fetch_add(1, Ordering::Relaxed);
            vec![Rgb::BACKGROUND; state.extent as usize]
        }
    };

    // A panicking shell must not skip the countdown below.
    let published = panic::catch_unwind(AssertUnwindSafe(|| {
        gate.with_current(generation, || {
            for (x, &color) in (0..).zip(colors.iter()) {
                shell.write_pixel(x, row, color);
            }
            shell.notify_region_ready(0, row, state.extent, 1);
        })
    }));
    match published {
        Ok(true) => {
            state.published_rows.fetch_add(1, Ordering::Relaxed);
        }
        Ok(false) => {
            state.discarded_rows.fetch_add(1, Ordering::Relaxed);
            debug!(generation, row, "Discarding stale row");
        }
        Err(_) => {
            warn!(generation, row, "Shell panicked while publishing row");
            state.failed_rows.fetch_add(1, Ordering::Relaxed);
            state.published_rows.fetch_add(1, Ordering::Relaxed);
        }
    }

    // Exactly one task observes the 1 → 0 transition.
    if state.rows_remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
        finish_pass(state, gate, shell);
    }
}

fn finish_pass(state: &PassState, gate: &PublishGate, shell: &dyn HostShell) {
    let elapsed = state.started.elapsed();

    // Completion and re-enabled input become visible together: anyone asking
    // for the phase blocks on `finished` until the shell has been told.
    let mut finished = lock(&state.finished);
    *finished = Some(elapsed);
    let current = panic::catch_unwind(AssertUnwindSafe(|| {
        gate.with_current(state.generation, || {
            shell.notify_region_ready(0, 0, state.extent, state.extent);
            shell.set_input_enabled(true);
        })
    }))
    .unwrap_or_else(|_| {
        warn!(generation = state.generation, "Shell panicked while finishing pass");
        false
    });
    drop(finished);
    state.done.notify_all();

    if current {
        info!(
            generation = state.generation,
            kind = %state.kind,
            extent = state.extent,
            elapsed_ms = elapsed.as_millis(),
            failed_rows = state.failed_rows.load(Ordering::Relaxed),
            "Render pass complete"
        );
    } else {
        debug!(
            generation = state.generation,
            discarded_rows = state.discarded_rows.load(Ordering::Relaxed),
            "Superseded render pass drained"
        );
    }
}
