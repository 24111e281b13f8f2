use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use crate::rotation::HeroRotation;
use crate::scheduler::Scheduler;

/// What a renderer needs to draw the banner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeroSnapshot {
    pub index: usize,
    pub progress: f64,
}

impl<T> From<&HeroRotation<T>> for HeroSnapshot {
    fn from(r: &HeroRotation<T>) -> Self {
        Self {
            index: r.current_index(),
            progress: r.progress(),
        }
    }
}

/// A [`HeroRotation`] driven by a [`Scheduler`].
///
/// Timer ticks and manual navigation serialize on one lock, and each
/// transition is published whole on a watch channel.
pub struct HeroCarousel<T, S: Scheduler> {
    rotation: Arc<Mutex<HeroRotation<T>>>,
    snapshots: Arc<watch::Sender<HeroSnapshot>>,
    scheduler: S,
}

fn lock<T>(rotation: &Mutex<HeroRotation<T>>) -> MutexGuard<'_, HeroRotation<T>> {
    rotation.lock().unwrap_or_else(|e| e.into_inner())
}

impl<T: Send + 'static, S: Scheduler> HeroCarousel<T, S> {
    pub fn new(rotation: HeroRotation<T>, scheduler: S) -> Self {
        let (tx, _) = watch::channel(HeroSnapshot::from(&rotation));
        Self {
            rotation: Arc::new(Mutex::new(rotation)),
            snapshots: Arc::new(tx),
            scheduler,
        }
    }

    /// Start auto-advancing. Restarting keeps the current position.
    pub fn start(&mut self) {
        let rotation = self.rotation.clone();
        let snapshots = self.snapshots.clone();
        self.scheduler.start(Box::new(move || {
            let mut r = lock(&rotation);
            if r.tick() {
                debug!(index = r.current_index(), "hero advanced");
            }
            snapshots.send_replace(HeroSnapshot::from(&*r));
        }));
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn subscribe(&self) -> watch::Receiver<HeroSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> HeroSnapshot {
        HeroSnapshot::from(&*lock(&self.rotation))
    }

    pub fn next(&self) {
        self.update(|r| r.next());
    }

    pub fn previous(&self) {
        self.update(|r| r.previous());
    }

    /// Show item `index`; out-of-range requests are ignored.
    pub fn jump_to(&self, index: usize) -> bool {
        self.update(|r| r.jump_to(index))
    }

    /// Run `f` against the item on screen.
    pub fn with_current<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(lock(&self.rotation).current())
    }

    fn update<R>(&self, f: impl FnOnce(&mut HeroRotation<T>) -> R) -> R {
        let mut r = lock(&self.rotation);
        let out = f(&mut r);
        self.snapshots.send_replace(HeroSnapshot::from(&*r));
        out
    }
}

impl<T: Clone + Send + 'static, S: Scheduler> HeroCarousel<T, S> {
    pub fn current(&self) -> T {
        self.with_current(T::clone)
    }
}

impl<T, S: Scheduler> Drop for HeroCarousel<T, S> {
    fn drop(&mut self) {
        self.scheduler.stop();
    }
}
