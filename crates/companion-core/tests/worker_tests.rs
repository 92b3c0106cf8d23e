// Tests for the off-thread displacement worker.

use companion_core::*;
use glam::Vec2;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(10);

#[test]
fn empty_overlay_refuses_to_spawn() {
    let err = DisplacementWorker::spawn(0, 10).err();
    assert_eq!(err, Some(CompanionError::EmptyOverlay { width: 0, height: 10 }));
}

#[test]
fn result_matches_synchronous_sweep() {
    let mut worker = DisplacementWorker::spawn(40, 30).unwrap();
    assert_eq!(worker.size(), (40, 30));
    let generation = worker.request(Vec2::new(0.5, 0.5)).unwrap();
    let published = worker.wait_for(generation, WAIT).expect("worker result");
    assert_eq!(published.generation, generation);
    assert_eq!(
        published.map,
        compute_displacement(Vec2::new(0.5, 0.5), 40, 30).unwrap()
    );
}

#[test]
fn generations_increase_and_latest_wins() {
    let mut worker = DisplacementWorker::spawn(64, 48).unwrap();
    let mut last = 0;
    for i in 0..20 {
        let g = worker.request(Vec2::new(i as f32 / 20.0, 0.5)).unwrap();
        assert!(g > last);
        last = g;
    }
    let published = worker.wait_for(last, WAIT).expect("worker result");
    assert_eq!(published.generation, last);
    // already handed out
    assert_eq!(worker.take_latest(), None);
}

#[test]
fn texture_and_scale_arrive_together() {
    let mut worker = DisplacementWorker::spawn(32, 32).unwrap();
    let g = worker.request(Vec2::new(0.25, 0.75)).unwrap();
    let published = worker.wait_for(g, WAIT).expect("worker result");
    let map = published.map;
    assert_eq!(map.texture_bytes().len(), 32 * 32 * 4);
    assert_eq!(map.scale(), map.max_magnitude() * DISPLACEMENT_DAMPING);
}

#[test]
fn non_finite_pointer_is_rejected_without_consuming_a_generation() {
    let mut worker = DisplacementWorker::spawn(8, 8).unwrap();
    let err = worker.request(Vec2::new(f32::INFINITY, 0.0)).unwrap_err();
    assert!(matches!(err, CompanionError::NonFinitePointer { .. }));
    assert_eq!(worker.request(Vec2::ZERO).unwrap(), 1);
}

#[test]
fn nothing_published_before_any_request() {
    let mut worker = DisplacementWorker::spawn(8, 8).unwrap();
    assert_eq!(worker.take_latest(), None);
    assert_eq!(worker.wait_for(1, Duration::from_millis(20)), None);
}
