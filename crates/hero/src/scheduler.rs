use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub type TickFn = Box<dyn FnMut() + Send + 'static>;

/// A repeating timer the rotation is driven by.
pub trait Scheduler: Send {
    /// Begin calling `on_tick` periodically, replacing any previous callback.
    fn start(&mut self, on_tick: TickFn);

    /// Cancel the timer. Safe to call when not running.
    fn stop(&mut self);

    fn is_running(&self) -> bool;
}

/// Fires on a tokio interval. Needs a running tokio runtime.
#[derive(Debug)]
pub struct IntervalScheduler {
    period: Duration,
    task: Option<JoinHandle<()>>,
}

impl IntervalScheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            task: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Scheduler for IntervalScheduler {
    fn start(&mut self, mut on_tick: TickFn) {
        self.stop();
        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                on_tick();
            }
        }));
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for IntervalScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Ticks only when told to, through a [`ManualTrigger`].
#[derive(Default)]
pub struct ManualScheduler {
    slot: Arc<Mutex<Option<TickFn>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) -> ManualTrigger {
        ManualTrigger {
            slot: self.slot.clone(),
        }
    }
}

impl Scheduler for ManualScheduler {
    fn start(&mut self, on_tick: TickFn) {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(on_tick);
    }

    fn stop(&mut self) {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).take();
    }

    fn is_running(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }
}

#[derive(Clone)]
pub struct ManualTrigger {
    slot: Arc<Mutex<Option<TickFn>>>,
}

impl ManualTrigger {
    /// Run one tick. Returns `false` if the scheduler is stopped.
    pub fn fire(&self) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        match slot.as_mut() {
            Some(on_tick) => {
                on_tick();
                true
            }
            None => false,
        }
    }

    pub fn fire_n(&self, n: usize) -> usize {
        (0..n).take_while(|_| self.fire()).count()
    }
}
