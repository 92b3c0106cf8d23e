//! Off-thread displacement sweeps with latest-wins delivery.
//!
//! Pointer moves can arrive faster than a full sweep completes. The worker
//! drains its queue down to the newest request before computing, and the
//! consumer only ever sees the newest finished [`DisplacementMap`], whose
//! texture and scale are published together as one value.

use crate::displacement::{compute_displacement, DisplacementMap};
use crate::error::{CompanionError, Result};
use glam::Vec2;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug)]
struct Request {
    generation: u64,
    pointer: Vec2,
}

/// A finished sweep tagged with the request generation that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct PublishedMap {
    pub generation: u64,
    pub map: DisplacementMap,
}

#[derive(Default)]
struct Slot {
    latest: Mutex<Option<PublishedMap>>,
    ready: Condvar,
}

pub struct DisplacementWorker {
    tx: Option<Sender<Request>>,
    slot: Arc<Slot>,
    handle: Option<JoinHandle<()>>,
    next_generation: u64,
    consumed_generation: u64,
    width: u32,
    height: u32,
}

impl DisplacementWorker {
    pub fn spawn(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CompanionError::EmptyOverlay { width, height });
        }
        let (tx, rx) = mpsc::channel::<Request>();
        let slot = Arc::new(Slot::default());
        let slot_worker = Arc::clone(&slot);
        let handle = thread::Builder::new()
            .name("glass-displacement".into())
            .spawn(move || run(rx, slot_worker, width, height))
            .map_err(|_| CompanionError::WorkerClosed)?;
        log::debug!("[glass] worker started for {}x{}", width, height);
        Ok(Self {
            tx: Some(tx),
            slot,
            handle: Some(handle),
            next_generation: 0,
            consumed_generation: 0,
            width,
            height,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Queue a sweep for `pointer`; returns the request generation.
    pub fn request(&mut self, pointer: Vec2) -> Result<u64> {
        if !pointer.is_finite() {
            return Err(CompanionError::NonFinitePointer {
                x: pointer.x,
                y: pointer.y,
            });
        }
        let tx = self.tx.as_ref().ok_or(CompanionError::WorkerClosed)?;
        self.next_generation += 1;
        let generation = self.next_generation;
        tx.send(Request {
            generation,
            pointer,
        })
        .map_err(|_| CompanionError::WorkerClosed)?;
        Ok(generation)
    }

    /// Newest finished map not yet handed out, if any.
    pub fn take_latest(&mut self) -> Option<PublishedMap> {
        let mut guard = self
            .slot
            .latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        take_newer(&mut guard, &mut self.consumed_generation)
    }

    /// Block until a map at least as new as `generation` is available.
    pub fn wait_for(&mut self, generation: u64, timeout: Duration) -> Option<PublishedMap> {
        let deadline = Instant::now() + timeout;
        let mut guard = self
            .slot
            .latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        loop {
            if guard.as_ref().is_some_and(|p| p.generation >= generation) {
                return take_newer(&mut guard, &mut self.consumed_generation);
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            guard = self
                .slot
                .ready
                .wait_timeout(guard, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }
}

/// Hand out `latest` only if it is newer than the last map handed out.
fn take_newer(latest: &mut Option<PublishedMap>, consumed: &mut u64) -> Option<PublishedMap> {
    match latest.as_ref() {
        Some(p) if p.generation > *consumed => {
            *consumed = p.generation;
            latest.take()
        }
        _ => None,
    }
}

impl Drop for DisplacementWorker {
    fn drop(&mut self) {
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("[glass] worker panicked");
            }
        }
    }
}

fn run(rx: Receiver<Request>, slot: Arc<Slot>, width: u32, height: u32) {
    while let Ok(mut request) = rx.recv() {
        let mut superseded = 0usize;
        while let Ok(newer) = rx.try_recv() {
            request = newer;
            superseded += 1;
        }
        if superseded > 0 {
            log::debug!("[glass] skipped {} superseded requests", superseded);
        }

        let map = match compute_displacement(request.pointer, width, height) {
            Ok(map) => map,
            Err(e) => {
                log::warn!("[glass] sweep failed: {}", e);
                continue;
            }
        };

        let mut latest = slot.latest.lock().unwrap_or_else(PoisonError::into_inner);
        if latest
            .as_ref()
            .is_some_and(|p| p.generation >= request.generation)
        {
            log::warn!("[glass] dropping stale result {}", request.generation);
            continue;
        }
        *latest = Some(PublishedMap {
            generation: request.generation,
            map,
        });
        drop(latest);
        slot.ready.notify_all();
    }
    log::debug!("[glass] worker stopped");
}
