//! Background duration probes, one per track, each individually cancellable.
//!
//! A probe reads only what the container needs to report its length.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::library::{MediaSource, TrackId};

use super::error::MediaError;
use super::source::probe_source;

struct ProbeResult {
    id: TrackId,
    cancel: Arc<AtomicBool>,
    duration: Option<Duration>,
}

/// Outstanding probes keyed by track id.
///
/// Results are collected with [`ProbeSet::drain`] from the event loop;
/// a cancelled probe never delivers, even if it already finished.
pub struct ProbeSet {
    handles: HashMap<TrackId, Arc<AtomicBool>>,
    tx: Sender<ProbeResult>,
    rx: Receiver<ProbeResult>,
}

impl Default for ProbeSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ProbeSet {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            handles: HashMap::new(),
            tx,
            rx,
        }
    }

    /// Start probing `source` for track `id`, replacing any probe already running for it.
    pub fn spawn(&mut self, id: TrackId, source: MediaSource) {
        self.cancel(id);
        let cancel = Arc::new(AtomicBool::new(false));
        self.handles.insert(id, cancel.clone());

        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("medley-probe-{id}"))
            .spawn(move || {
                if cancel.load(Ordering::Acquire) {
                    return;
                }
                let duration = match probe_source(&source, &cancel) {
                    Ok(d) => d,
                    Err(MediaError::Cancelled) => return,
                    Err(e) => {
                        debug!(%id, %source, error = %e, "probe fetch failed");
                        None
                    }
                };
                if cancel.load(Ordering::Acquire) {
                    return;
                }
                let _ = tx.send(ProbeResult {
                    id,
                    cancel,
                    duration,
                });
            });
        if let Err(e) = spawned {
            warn!(%id, error = %e, "could not start probe thread");
            self.handles.remove(&id);
        }
    }

    /// Stop delivery of the probe for `id`. Returns false if none was pending.
    pub fn cancel(&mut self, id: TrackId) -> bool {
        match self.handles.remove(&id) {
            Some(flag) => {
                flag.store(true, Ordering::Release);
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, flag) in self.handles.drain() {
            flag.store(true, Ordering::Release);
        }
    }

    pub fn pending(&self) -> usize {
        self.handles.len()
    }

    /// Durations delivered since the last call. Probes that failed are
    /// retired without a result.
    pub fn drain(&mut self) -> Vec<(TrackId, Duration)> {
        let mut out = Vec::new();
        while let Ok(r) = self.rx.try_recv() {
            if r.cancel.load(Ordering::Acquire) {
                continue;
            }
            let current = self
                .handles
                .get(&r.id)
                .is_some_and(|flag| Arc::ptr_eq(flag, &r.cancel));
            if !current {
                continue;
            }
            self.handles.remove(&r.id);
            if let Some(d) = r.duration {
                out.push((r.id, d));
            }
        }
        out
    }
}
