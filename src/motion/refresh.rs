use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(200);

type Waker = Box<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct RedrawShared {
    pending: AtomicBool,
    subscribers: Mutex<Vec<Waker>>,
}

/// "Redraw requested" notifications between the refresh loop and the chart.
///
/// At most one redraw is pending at a time; publishing while one is pending
/// does nothing.
#[derive(Clone, Default)]
pub struct RedrawChannel {
    shared: Arc<RedrawShared>,
}

impl RedrawChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a wake callback, invoked whenever a new redraw becomes pending.
    pub fn subscribe(&self, wake: impl Fn() + Send + Sync + 'static) {
        if let Ok(mut subs) = self.shared.subscribers.lock() {
            subs.push(Box::new(wake));
        }
    }

    pub fn has_subscribers(&self) -> bool {
        self.shared
            .subscribers
            .lock()
            .map(|subs| !subs.is_empty())
            .unwrap_or(false)
    }

    /// Returns `true` if this call made a redraw pending.
    pub fn publish(&self) -> bool {
        if self.shared.pending.swap(true, Ordering::AcqRel) {
            return false;
        }
        if let Ok(subs) = self.shared.subscribers.lock() {
            for wake in subs.iter() {
                wake();
            }
        }
        true
    }

    /// Consumes the pending redraw, if any, so the next publish wakes the
    /// subscribers again. An immediate-mode renderer repaints the whole frame
    /// anyway and only needs this to re-arm coalescing.
    pub fn take(&self) -> bool {
        self.shared.pending.swap(false, Ordering::AcqRel)
    }

    pub fn is_pending(&self) -> bool {
        self.shared.pending.load(Ordering::Acquire)
    }
}

enum LoopState {
    Inactive,
    Active {
        stop_tx: Sender<()>,
        handle: JoinHandle<()>,
    },
}

/// Periodic chart invalidation tied to the chart's visibility.
pub struct RefreshLoop {
    interval: Duration,
    channel: RedrawChannel,
    state: LoopState,
}

impl RefreshLoop {
    pub fn new(interval: Duration, channel: RedrawChannel) -> Self {
        Self {
            interval,
            channel,
            state: LoopState::Inactive,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, LoopState::Active { .. })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Chart became visible: start ticking (first tick fires immediately).
    pub fn show(&mut self) {
        if self.is_active() {
            return;
        }
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let channel = self.channel.clone();
        let interval = self.interval;
        let spawned = thread::Builder::new()
            .name("chart-refresh".into())
            .spawn(move || loop {
                if channel.has_subscribers() {
                    channel.publish();
                }
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    _ => break,
                }
            });
        match spawned {
            Ok(handle) => {
                log::debug!("chart refresh started ({:?})", interval);
                self.state = LoopState::Active { stop_tx, handle };
            }
            Err(e) => log::warn!("could not start chart refresh: {e}"),
        }
    }

    /// Chart became hidden: cancel the tick. Safe to call repeatedly.
    pub fn hide(&mut self) {
        if let LoopState::Active { stop_tx, handle } =
            std::mem::replace(&mut self.state, LoopState::Inactive)
        {
            drop(stop_tx);
            if handle.join().is_err() {
                log::warn!("chart refresh thread panicked");
            }
            log::debug!("chart refresh stopped");
        }
    }
}

impl Drop for RefreshLoop {
    fn drop(&mut self) {
        self.hide();
    }
}
