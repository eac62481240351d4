//! Long-run invariants of the jitter step.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use nexus_core::{FixedSource, JitterProfile, MetricsSnapshot, RandomSource, SeededSource};

fn run<R: RandomSource>(initial: MetricsSnapshot, profile: JitterProfile, rng: &mut R, n: usize) -> Vec<MetricsSnapshot> {
    let mut out = Vec::with_capacity(n);
    let mut snap = initial;
    for _ in 0..n {
        snap = profile.step(&snap, rng);
        out.push(snap);
    }
    out
}

#[test]
fn ranges_hold_for_seeded_runs() {
    let profile = JitterProfile {
        gdp_growth: 0.1,
        unemployment: 5.0,
        security_level: 20.0,
    };
    for seed in 0..8u64 {
        let initial = MetricsSnapshot::new(218_541_065, 3.2, 1.0, 95.0);
        let ticks = run(initial, profile, &mut SeededSource::new(seed), 5_000);

        for s in &ticks {
            assert!(s.unemployment >= 0.0, "seed={seed} snap={s:?}");
            assert!((0.0..=100.0).contains(&s.security_level), "seed={seed} snap={s:?}");
            assert_eq!(s.population, initial.population);
        }
    }
}

#[test]
fn constant_pressure_pins_at_bounds() {
    let profile = JitterProfile::default();
    let initial = MetricsSnapshot::default();

    let low = run(initial, profile, &mut FixedSource::new(0.0), 400);
    let last = low.last().unwrap();
    assert_eq!(last.unemployment, 0.0);
    assert_eq!(last.security_level, 0.0);

    let high = run(initial, profile, &mut FixedSource::new(1.0), 400);
    let last = high.last().unwrap();
    assert_eq!(last.security_level, 100.0);
    assert!(last.unemployment > initial.unemployment);
}

#[test]
fn same_seed_same_sequence() {
    let profile = JitterProfile::default();
    let initial = MetricsSnapshot::default();

    let a = run(initial, profile, &mut SeededSource::new(42), 200);
    let b = run(initial, profile, &mut SeededSource::new(42), 200);
    assert_eq!(a, b);

    let c = run(initial, profile, &mut SeededSource::new(43), 200);
    assert_ne!(a, c);
}

#[test]
fn every_value_has_at_most_one_decimal() {
    let profile = JitterProfile::default();
    let ticks = run(MetricsSnapshot::default(), profile, &mut SeededSource::new(7), 1_000);

    for s in ticks {
        for v in [s.gdp_growth, s.unemployment, s.security_level] {
            assert_eq!(nexus_core::round1(v), v, "{v} carries more than one decimal");
        }
    }
}

#[test]
fn non_finite_amplitudes_keep_previous_values() {
    let profile = JitterProfile {
        gdp_growth: f64::NAN,
        unemployment: f64::INFINITY,
        security_level: f64::NAN,
    };
    let initial = MetricsSnapshot::default();
    for s in run(initial, profile, &mut SeededSource::new(4), 50) {
        assert_eq!(s, initial);
    }
}

#[test]
fn non_finite_previous_values_recover_into_range() {
    let mut prev = MetricsSnapshot::default();
    prev.gdp_growth = f64::NAN;
    prev.unemployment = f64::NEG_INFINITY;
    prev.security_level = f64::NAN;

    let next = JitterProfile::default().step(&prev, &mut FixedSource::new(0.5));
    assert_eq!(next.gdp_growth, 0.0);
    assert_eq!(next.unemployment, 0.0);
    assert_eq!(next.security_level, 0.0);
    assert!(next.validate().is_ok());
}

#[test]
fn non_finite_samples_never_reach_the_snapshot() {
    struct Nan;
    impl RandomSource for Nan {
        fn next_unit(&mut self) -> f64 {
            f64::NAN
        }
    }

    let initial = MetricsSnapshot::default();
    let next = JitterProfile::default().step(&initial, &mut Nan);
    assert_eq!(next, initial);
}
