// Host-side tests for the spring animator.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;
use pincushion_core::*;

const DT: f32 = 1.0 / 60.0;

fn animator(damping_ratio: f32, response: f32, value: f32) -> SpringAnimator<f32> {
    SpringAnimator::new(SpringConfig::new(damping_ratio, response), value).unwrap()
}

#[test]
fn new_animator_rests_stopped_at_initial_value() {
    let a = animator(0.7, 0.5, 2.0);
    assert_eq!(a.value(), 2.0);
    assert_eq!(a.target(), 2.0);
    assert_eq!(a.velocity(), 0.0);
    assert!(!a.is_running());
    assert!(a.is_settled());
}

#[test]
fn tick_at_rest_is_a_no_op() {
    let mut a = animator(0.3, 0.8, 1.0);
    let notified = Rc::new(Cell::new(0));
    let n = notified.clone();
    a.set_observer(move |_| n.set(n.get() + 1));
    a.start();
    for _ in 0..100 {
        a.tick(DT).unwrap();
        assert!((a.value() - 1.0).abs() < 1e-6);
    }
    assert_eq!(a.velocity(), 0.0);
    assert_eq!(notified.get(), 0, "value never changed");
}

#[test]
fn stopped_animator_ignores_ticks() {
    let mut a = animator(0.7, 0.5, 0.0);
    a.set_target(1.0);
    a.start();
    a.tick(DT).unwrap();
    a.stop();
    let (value, velocity) = (a.value(), a.velocity());
    for _ in 0..10 {
        a.tick(DT).unwrap();
    }
    assert_eq!(a.value(), value);
    assert_eq!(a.velocity(), velocity);
    assert!(!a.is_running());

    a.start();
    a.start();
    a.tick(DT).unwrap();
    assert!(a.value() > value);
}

#[test]
fn no_overshoot_when_critically_or_over_damped() {
    for zeta in [1.0_f32, 1.0002, 1.002, 1.5, 3.0] {
        let mut a = animator(zeta, 0.5, 0.0);
        a.set_target(1.0);
        a.start();
        let mut prev = a.value();
        for step in 0..2000 {
            a.tick(DT).unwrap();
            let v = a.value();
            assert!(
                v <= 1.0 + 1e-6,
                "zeta {zeta}: overshoot to {v} at step {step}"
            );
            assert!(
                v >= prev - 1e-6,
                "zeta {zeta}: moved backwards {prev} -> {v} at step {step}"
            );
            prev = v;
        }
        assert!((a.value() - 1.0).abs() < 1e-4);
    }
}

#[test]
fn no_overshoot_for_vector_step_down() {
    let mut a = SpringAnimator::new(SpringConfig::new(1.2, 0.3), Vec2::new(1.0, 1.0)).unwrap();
    a.set_target(Vec2::ZERO);
    a.start();
    for _ in 0..1000 {
        a.tick(DT).unwrap();
        assert!(a.value().x >= -1e-6 && a.value().y >= -1e-6);
    }
    assert_eq!(a.value(), Vec2::ZERO);
}

#[test]
fn underdamped_spring_overshoots_then_returns() {
    let mut a = animator(0.3, 0.8, 0.0);
    a.set_target(1.0);
    a.start();
    let mut peak = 0.0_f32;
    for _ in 0..2000 {
        a.tick(DT).unwrap();
        peak = peak.max(a.value());
    }
    assert!(peak > 1.2, "expected visible overshoot, peak {peak}");
    assert!((a.value() - 1.0).abs() < 1e-4);
}

#[test]
fn converges_for_every_valid_config() {
    let ratios = [0.1_f32, 0.3, 0.7, 0.92, 1.0, 1.5, 3.0];
    let responses = [0.2_f32, 0.6, 0.8];
    for dt in [1.0 / 60.0, 1.0 / 120.0] {
        for zeta in ratios {
            for response in responses {
                for (from, to) in [(0.0_f32, 1.0_f32), (3.0, -2.0)] {
                    let mut a = animator(zeta, response, from);
                    a.set_target(to);
                    a.start();
                    let max_ticks = (100.0 * response / dt).ceil() as usize;
                    let mut ticks = 0;
                    while a.is_running() && ticks < max_ticks {
                        a.tick(dt).unwrap();
                        ticks += 1;
                    }
                    assert!(
                        (a.value() - to).abs() < 1e-4 && a.velocity().abs() < 1e-3,
                        "zeta {zeta} response {response} dt {dt}: value {} velocity {} after {ticks} ticks",
                        a.value(),
                        a.velocity()
                    );
                }
            }
        }
    }
}

#[test]
fn settling_snaps_onto_target_and_stops() {
    let mut a = animator(0.92, 0.2, 0.0);
    a.set_target(0.5);
    a.start();
    for _ in 0..600 {
        a.tick(DT).unwrap();
    }
    assert!(!a.is_running());
    assert_eq!(a.value(), 0.5);
    assert_eq!(a.velocity(), 0.0);
}

#[test]
fn step_is_independent_of_frame_rate() {
    let mut coarse = animator(0.5, 1.0, 0.0);
    let mut fine = animator(0.5, 1.0, 0.0);
    for a in [&mut coarse, &mut fine] {
        a.set_target(1.0);
        a.set_velocity(2.0);
        a.start();
    }
    coarse.tick(0.1).unwrap();
    for _ in 0..10 {
        fine.tick(0.01).unwrap();
    }
    assert!((coarse.value() - fine.value()).abs() < 1e-4);
    assert!((coarse.velocity() - fine.velocity()).abs() < 1e-3);
}

#[test]
fn retargeting_keeps_value_and_velocity() {
    let mut a = animator(0.7, 0.6, 0.0);
    let mut twin = animator(0.7, 0.6, 0.0);
    for x in [&mut a, &mut twin] {
        x.set_target(1.0);
        x.start();
        for _ in 0..10 {
            x.tick(DT).unwrap();
        }
    }
    let (value, velocity) = (a.value(), a.velocity());
    assert!(velocity > 0.0);

    a.set_target(-1.0);
    assert_eq!(a.value(), value);
    assert_eq!(a.velocity(), velocity);

    a.tick(DT).unwrap();
    twin.tick(DT).unwrap();
    assert!(a.value() < twin.value());
    assert!(a.velocity() < twin.velocity());
}

#[test]
fn changing_spring_keeps_value_and_velocity() {
    let mut a = animator(0.92, 0.2, 0.0);
    a.set_target(1.0);
    a.start();
    for _ in 0..5 {
        a.tick(DT).unwrap();
    }
    let (value, velocity) = (a.value(), a.velocity());
    a.set_spring(SpringConfig::new(0.3, 0.8)).unwrap();
    assert_eq!(a.value(), value);
    assert_eq!(a.velocity(), velocity);
    assert_eq!(a.target(), 1.0);
    assert!(a.is_running());
}

#[test]
fn injected_velocity_leaves_value_and_target() {
    let mut a = animator(0.7, 0.6, 0.25);
    a.set_velocity(-3.0);
    assert_eq!(a.value(), 0.25);
    assert_eq!(a.target(), 0.25);
    assert_eq!(a.velocity(), -3.0);

    a.start();
    a.tick(DT).unwrap();
    assert!(a.value() < 0.25, "momentum carries the value down first");
}

#[test]
fn apply_sets_spring_velocity_target_and_starts() {
    let mut a = animator(0.3, 0.8, 0.0);
    let spring = SpringConfig::new(0.7, 0.6);
    a.apply(Motion::toward(1.0).with_spring(spring).with_velocity(0.5))
        .unwrap();
    assert_eq!(a.spring(), spring);
    assert_eq!(a.target(), 1.0);
    assert_eq!(a.velocity(), 0.5);
    assert_eq!(a.value(), 0.0);
    assert!(a.is_running());
}

#[test]
fn apply_with_bad_spring_changes_nothing() {
    let mut a = animator(0.3, 0.8, 0.0);
    let err = a
        .apply(Motion::toward(1.0).with_spring(SpringConfig::new(0.0, 0.5)))
        .unwrap_err();
    assert!(matches!(err, AnimationError::InvalidConfiguration { .. }));
    assert_eq!(a.target(), 0.0);
    assert_eq!(a.spring(), SpringConfig::new(0.3, 0.8));
    assert!(!a.is_running());
}

#[test]
fn invalid_configs_are_rejected() {
    for (zeta, response) in [
        (0.0, 0.5),
        (-0.2, 0.5),
        (0.7, 0.0),
        (0.7, -1.0),
        (f32::NAN, 0.5),
        (0.7, f32::INFINITY),
        // finite but the step would overflow
        (1e20, 0.5),
        (2.0, 1e-39),
        (0.5, 1e-39),
        (1.0, 1e-39),
        (2.0, 1e-30),
    ] {
        let err = SpringAnimator::new(SpringConfig::new(zeta, response), 0.0_f32).unwrap_err();
        assert!(
            matches!(err, AnimationError::InvalidConfiguration { .. }),
            "({zeta}, {response}) gave {err:?}"
        );
    }

    let mut a = animator(0.7, 0.6, 0.0);
    assert!(a.set_spring(SpringConfig::new(0.7, 0.0)).is_err());
    assert!(a.set_spring(SpringConfig::new(-1.0, 0.6)).is_err());
    assert_eq!(a.spring(), SpringConfig::new(0.7, 0.6));
}

#[test]
fn invalid_ticks_are_rejected_without_side_effects() {
    let mut a = animator(0.7, 0.6, 0.0);
    let notified = Rc::new(Cell::new(0));
    let n = notified.clone();
    a.set_observer(move |_| n.set(n.get() + 1));
    a.set_target(1.0);
    a.start();
    a.tick(DT).unwrap();
    let calls = notified.get();
    let (value, velocity) = (a.value(), a.velocity());

    for dt in [0.0, -DT, f32::NAN, f32::INFINITY] {
        let err = a.tick(dt).unwrap_err();
        assert!(matches!(err, AnimationError::InvalidTick { .. }));
    }
    assert_eq!(a.value(), value);
    assert_eq!(a.velocity(), velocity);
    assert!(a.is_running());
    assert_eq!(notified.get(), calls);
}

#[test]
fn observer_sees_every_updated_value() {
    let mut a = animator(0.92, 0.2, 0.0);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = seen.clone();
    a.set_observer(move |v| s.borrow_mut().push(v));
    a.set_target(1.0);
    a.start();
    let mut ticks = 0;
    while a.is_running() {
        a.tick(DT).unwrap();
        ticks += 1;
        assert_eq!(seen.borrow().last().copied(), Some(a.value()));
    }
    assert_eq!(seen.borrow().len(), ticks);
    assert_eq!(seen.borrow().last().copied(), Some(1.0));
}

#[test]
fn new_observer_replaces_old_one() {
    let mut a = animator(0.7, 0.6, 0.0);
    let first = Rc::new(Cell::new(0));
    let second = Rc::new(Cell::new(0));
    let f = first.clone();
    a.set_observer(move |_| f.set(f.get() + 1));
    let s = second.clone();
    a.set_observer(move |_| s.set(s.get() + 1));
    a.set_target(1.0);
    a.start();
    a.tick(DT).unwrap();
    assert_eq!(first.get(), 0);
    assert_eq!(second.get(), 1);

    a.clear_observer();
    a.tick(DT).unwrap();
    assert_eq!(second.get(), 1);
}

#[test]
fn vector_animator_reaches_target() {
    let mut a = SpringAnimator::new(CENTER_SPRING, RESTING_CENTER).unwrap();
    let target = Vec2::new(0.6, 0.5);
    a.set_target(target);
    a.start();
    for _ in 0..600 {
        a.tick(DT).unwrap();
    }
    assert!(!a.is_running());
    assert_eq!(a.value(), target);
    assert_eq!(a.velocity(), Vec2::ZERO);
}

#[test]
fn accepted_extreme_configs_stay_finite() {
    for (zeta, response) in [(1e6, 0.5), (2.0, 1e-6), (0.5, 1e-6), (1.0, 1e3), (0.2, 1e6)] {
        let mut a = animator(zeta, response, 0.0);
        a.set_target(1.0);
        a.start();
        for _ in 0..100 {
            a.tick(DT).unwrap();
            assert!(
                a.value().is_finite() && a.velocity().is_finite(),
                "({zeta}, {response}): value {} velocity {}",
                a.value(),
                a.velocity()
            );
        }
    }
}
