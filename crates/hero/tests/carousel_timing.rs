use std::time::Duration;

use nexplay_hero::{
    FixedClock, HeroCarousel, HeroRotation, HeroSnapshot, IntervalScheduler, RotationConfig,
};

fn three_items_from_zero() -> HeroRotation<&'static str> {
    // floor(30 / 10) mod 3 == 0
    let clock = FixedClock(30);
    HeroRotation::new(vec!["m0", "m1", "m2"], RotationConfig::default(), &clock).unwrap()
}

#[tokio::test(start_paused = true)]
async fn one_dwell_of_ticks_moves_to_next_item() {
    let rotation = three_items_from_zero();
    assert_eq!(rotation.current_index(), 0);

    let config = rotation.config();
    let mut carousel = HeroCarousel::new(rotation, IntervalScheduler::new(config.tick_interval));
    carousel.start();

    tokio::time::sleep(Duration::from_millis(10_050)).await;
    assert_eq!(carousel.snapshot(), HeroSnapshot { index: 1, progress: 0.0 });
    assert_eq!(carousel.current(), "m1");
}

#[tokio::test(start_paused = true)]
async fn subscribers_see_every_advance() {
    let mut carousel = HeroCarousel::new(
        three_items_from_zero(),
        IntervalScheduler::new(Duration::from_millis(100)),
    );
    let mut rx = carousel.subscribe();
    carousel.start();

    let mut seen = Vec::new();
    while seen.len() < 3 {
        rx.changed().await.unwrap();
        let snap = *rx.borrow_and_update();
        if snap.progress == 0.0 {
            seen.push(snap.index);
        }
    }
    assert_eq!(seen, vec![1, 2, 0]);
}

#[tokio::test(start_paused = true)]
async fn manual_move_delays_next_automatic_advance() {
    let mut carousel = HeroCarousel::new(
        three_items_from_zero(),
        IntervalScheduler::new(Duration::from_millis(100)),
    );
    carousel.start();

    tokio::time::sleep(Duration::from_millis(6_050)).await;
    carousel.next();
    assert_eq!(carousel.snapshot().index, 1);

    // 6 s after the manual move: the old schedule would have advanced by now.
    tokio::time::sleep(Duration::from_millis(6_000)).await;
    assert_eq!(carousel.snapshot().index, 1);

    tokio::time::sleep(Duration::from_millis(4_000)).await;
    assert_eq!(carousel.snapshot().index, 2);
}

#[tokio::test(start_paused = true)]
async fn stopping_freezes_the_banner() {
    let mut carousel = HeroCarousel::new(
        three_items_from_zero(),
        IntervalScheduler::new(Duration::from_millis(100)),
    );
    carousel.start();
    tokio::time::sleep(Duration::from_millis(2_050)).await;
    carousel.stop();
    let frozen = carousel.snapshot();

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(carousel.snapshot(), frozen);
    assert!(!carousel.is_running());
}
