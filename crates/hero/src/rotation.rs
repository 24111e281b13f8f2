use std::time::Duration;

use tracing::debug;

use crate::RotationError;
use crate::clock::Clock;

/// Timing of the rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationConfig {
    /// How long each item stays on screen.
    pub dwell: Duration,
    /// Period of the progress timer.
    pub tick_interval: Duration,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            dwell: Duration::from_secs(10),
            tick_interval: Duration::from_millis(100),
        }
    }
}

impl RotationConfig {
    pub fn ticks_per_dwell(&self) -> u32 {
        let tick = self.tick_interval.as_millis().max(1);
        let ticks = self.dwell.as_millis().div_ceil(tick);
        ticks.clamp(1, u32::MAX as u128) as u32
    }

    /// Dwell rounded down to whole seconds, for display.
    pub fn dwell_secs(&self) -> u64 {
        self.dwell.as_secs().max(1)
    }
}

/// Index shown at `now`: every viewer in the same dwell window sees the
/// same item, so a pre-rendered first paint matches the live banner.
pub fn initial_index(len: usize, dwell: Duration, now_unix_millis: u64) -> usize {
    if len == 0 {
        return 0;
    }
    let dwell_ms = dwell.as_millis().max(1);
    let window = u128::from(now_unix_millis) / dwell_ms;
    (window % len as u128) as usize
}

/// Rotation state over a fixed, non-empty set of items.
///
/// Progress is kept as a tick count so it lands exactly on 100 after a full
/// dwell instead of drifting through float accumulation.
#[derive(Debug, Clone)]
pub struct HeroRotation<T> {
    items: Vec<T>,
    current: usize,
    ticks: u32,
    ticks_per_dwell: u32,
    config: RotationConfig,
}

impl<T> HeroRotation<T> {
    /// Start at the index the clock's current dwell window selects.
    pub fn new(
        items: Vec<T>,
        config: RotationConfig,
        clock: &dyn Clock,
    ) -> Result<Self, RotationError> {
        let index = initial_index(items.len(), config.dwell, clock.now_unix_millis());
        Self::starting_at(items, index, config)
    }

    /// Start at `index`; an out-of-range index starts at 0.
    pub fn starting_at(
        items: Vec<T>,
        index: usize,
        config: RotationConfig,
    ) -> Result<Self, RotationError> {
        if items.is_empty() {
            return Err(RotationError::NoItems);
        }
        let current = if index < items.len() { index } else { 0 };
        Ok(Self {
            items,
            current,
            ticks: 0,
            ticks_per_dwell: config.ticks_per_dwell(),
            config,
        })
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn config(&self) -> RotationConfig {
        self.config
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &T {
        &self.items[self.current]
    }

    /// Share of the current dwell elapsed, in `[0, 100)`.
    pub fn progress(&self) -> f64 {
        f64::from(self.ticks) * 100.0 / f64::from(self.ticks_per_dwell)
    }

    /// Advance the progress timer by one tick. Returns `true` when the tick
    /// completed the dwell and moved to the next item.
    pub fn tick(&mut self) -> bool {
        self.ticks += 1;
        if self.ticks < self.ticks_per_dwell {
            return false;
        }
        let previous = self.current;
        self.set_index((self.current + 1) % self.items.len());
        previous != self.current
    }

    pub fn next(&mut self) {
        self.set_index((self.current + 1) % self.items.len());
    }

    pub fn previous(&mut self) {
        let len = self.items.len();
        self.set_index((self.current + len - 1) % len);
    }

    /// Show item `index`. Out-of-range requests are ignored.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            debug!(index, len = self.items.len(), "ignoring out-of-range hero jump");
            return false;
        }
        self.set_index(index);
        true
    }

    fn set_index(&mut self, index: usize) {
        self.current = index;
        self.ticks = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn rotation(len: usize) -> HeroRotation<usize> {
        HeroRotation::starting_at((0..len).collect(), 0, RotationConfig::default()).unwrap()
    }

    #[test]
    fn initial_index_follows_dwell_window() {
        let ten = Duration::from_secs(10);
        assert_eq!(initial_index(10, ten, 1_700_000_000_000), 0);
        assert_eq!(initial_index(10, ten, 1_700_000_019_999), 1);
        assert_eq!(initial_index(3, ten, 1_700_000_035_000), (170_000_003 % 3) as usize);
        assert_eq!(initial_index(1, ten, 123_456_000), 0);
        assert_eq!(initial_index(4, Duration::ZERO, 7), 3);
    }

    #[test]
    fn fractional_dwell_uses_exact_window() {
        let config = |ms| RotationConfig {
            dwell: Duration::from_millis(ms),
            ..Default::default()
        };

        // floor(3 / 1.5) mod 3 = 2
        let r = HeroRotation::new(vec![0, 1, 2], config(1_500), &FixedClock(3)).unwrap();
        assert_eq!(r.current_index(), 2);

        // floor(7 / 0.5) mod 4 = 14 mod 4 = 2
        let r = HeroRotation::new(vec![0, 1, 2, 3], config(500), &FixedClock(7)).unwrap();
        assert_eq!(r.current_index(), 2);
    }

    #[test]
    fn constructor_uses_clock() {
        let clock = FixedClock(125);
        let r = HeroRotation::new(vec!['a', 'b', 'c'], RotationConfig::default(), &clock).unwrap();
        // floor(125 / 10) = 12, 12 mod 3 = 0
        assert_eq!(r.current_index(), 0);

        let r = HeroRotation::new(vec!['a', 'b', 'c'], RotationConfig::default(), &FixedClock(135))
            .unwrap();
        assert_eq!(r.current_index(), 1);
        assert_eq!(*r.current(), 'b');
        assert_eq!(r.progress(), 0.0);
    }

    #[test]
    fn empty_items_are_rejected() {
        let err =
            HeroRotation::<u8>::starting_at(Vec::new(), 0, RotationConfig::default()).unwrap_err();
        assert_eq!(err, RotationError::NoItems);
    }

    #[test]
    fn hundred_ticks_advance_one_item() {
        let mut r = rotation(3);
        for i in 1..100 {
            assert!(!r.tick());
            assert!((r.progress() - i as f64).abs() < 1e-9);
        }
        assert!(r.tick());
        assert_eq!(r.current_index(), 1);
        assert_eq!(r.progress(), 0.0);
    }

    #[test]
    fn wraps_around_at_the_end() {
        let mut r = HeroRotation::starting_at(vec![0, 1, 2], 2, RotationConfig::default()).unwrap();
        r.next();
        assert_eq!(r.current_index(), 0);
        r.previous();
        assert_eq!(r.current_index(), 2);
    }

    #[test]
    fn manual_navigation_restarts_the_dwell() {
        let mut r = rotation(3);
        for _ in 0..60 {
            r.tick();
        }
        r.next();
        assert_eq!(r.current_index(), 1);
        assert_eq!(r.progress(), 0.0);

        for _ in 0..99 {
            r.tick();
        }
        assert_eq!(r.current_index(), 1, "a full dwell must elapse after a manual move");
        r.tick();
        assert_eq!(r.current_index(), 2);
    }

    #[test]
    fn out_of_range_jump_is_ignored() {
        let mut r = rotation(3);
        for _ in 0..10 {
            r.tick();
        }
        assert!(!r.jump_to(3));
        assert_eq!(r.current_index(), 0);
        assert!((r.progress() - 10.0).abs() < 1e-9);

        assert!(r.jump_to(2));
        assert_eq!(r.current_index(), 2);
        assert_eq!(r.progress(), 0.0);
    }

    #[test]
    fn single_item_cycles_progress_only() {
        let mut r = rotation(1);
        for _ in 0..250 {
            assert!(!r.tick());
            assert_eq!(r.current_index(), 0);
            assert!(r.progress() < 100.0);
        }
        r.next();
        r.previous();
        assert_eq!(r.current_index(), 0);
    }

    #[test]
    fn index_stays_valid_under_mixed_transitions() {
        for len in 1..6 {
            let mut r = rotation(len);
            let mut seed: u64 = 0x9e37_79b9_7f4a_7c15;
            for _ in 0..2_000 {
                seed ^= seed << 13;
                seed ^= seed >> 7;
                seed ^= seed << 17;
                let before = r.current_index();
                match seed % 5 {
                    0 => r.next(),
                    1 => r.previous(),
                    2 => {
                        r.jump_to((seed >> 8) as usize % (len + 2));
                    }
                    _ => {
                        r.tick();
                    }
                }
                assert!(r.current_index() < len);
                assert!((0.0..=100.0).contains(&r.progress()));
                if r.current_index() != before {
                    assert_eq!(r.progress(), 0.0);
                }
            }
        }
    }

    #[test]
    fn ticks_per_dwell_rounds_up_and_never_hits_zero() {
        let cfg = RotationConfig {
            dwell: Duration::from_millis(250),
            tick_interval: Duration::from_millis(100),
        };
        assert_eq!(cfg.ticks_per_dwell(), 3);

        let cfg = RotationConfig {
            dwell: Duration::ZERO,
            tick_interval: Duration::from_millis(100),
        };
        assert_eq!(cfg.ticks_per_dwell(), 1);
    }
}
