use std::time::{Duration, Instant};

use approx::assert_abs_diff_eq;
use chart_stream::core::{DebounceConfig, FitPolicy, FitState, ValueRange, ViewportFitter};

fn assert_range(actual: Option<ValueRange>, low: f64, high: f64) {
    let actual = actual.expect("committed range");
    assert_abs_diff_eq!(actual.low, low, epsilon = 1e-9);
    assert_abs_diff_eq!(actual.high, high, epsilon = 1e-9);
}

#[test]
fn immediate_policy_scales_union_around_midpoint() {
    let mut fitter = ViewportFitter::new(FitPolicy::Immediate, 1.1);
    let committed = fitter.fit(
        [ValueRange::new(100.0, 130.0), ValueRange::new(90.0, 120.0)],
        Instant::now(),
    );
    assert_range(committed, 88.0, 132.0);
    assert_eq!(fitter.state(), FitState::Committed);
}

#[test]
fn nothing_committed_before_any_data() {
    let mut fitter = ViewportFitter::new(FitPolicy::default(), 1.1);
    assert_eq!(fitter.fit(std::iter::empty(), Instant::now()), None);
    assert_eq!(fitter.state(), FitState::Idle);
}

#[test]
fn non_finite_ranges_are_ignored() {
    let fitter = ViewportFitter::new(FitPolicy::Immediate, 1.0);
    let target = fitter.target_range([
        ValueRange::new(f64::NAN, 3.0),
        ValueRange::new(1.0, 2.0),
    ]);
    assert_eq!(target, Some(ValueRange::new(1.0, 2.0)));
}

#[test]
fn first_debounced_fit_commits_immediately() {
    let mut fitter = ViewportFitter::new(FitPolicy::default(), 1.0);
    let committed = fitter.fit([ValueRange::new(0.0, 10.0)], Instant::now());
    assert_range(committed, 0.0, 10.0);
    assert!(fitter.next_wakeup().is_none());
}

#[test]
fn growth_outside_committed_range_commits_immediately() {
    let mut fitter = ViewportFitter::new(FitPolicy::default(), 1.0);
    let now = Instant::now();
    fitter.fit([ValueRange::new(0.0, 10.0)], now);

    let committed = fitter.fit([ValueRange::new(0.0, 10.5)], now);
    assert_range(committed, 0.0, 10.5);
    assert!(fitter.next_wakeup().is_none());
}

#[test]
fn large_shrink_commits_immediately() {
    let mut fitter = ViewportFitter::new(FitPolicy::default(), 1.0);
    let now = Instant::now();
    fitter.fit([ValueRange::new(0.0, 10.0)], now);

    let committed = fitter.fit([ValueRange::new(2.0, 8.0)], now);
    assert_range(committed, 2.0, 8.0);
}

#[test]
fn small_shrink_waits_for_deadline() {
    let config = DebounceConfig::default().with_delay_ms(250);
    let mut fitter = ViewportFitter::new(FitPolicy::Debounced(config), 1.0);
    let start = Instant::now();
    fitter.fit([ValueRange::new(0.0, 10.0)], start);

    let drawn = fitter.fit([ValueRange::new(0.5, 9.8)], start);
    assert_range(drawn, 0.0, 10.0);
    assert_eq!(fitter.state(), FitState::Scheduled);
    assert_eq!(
        fitter.next_wakeup(),
        Some(start + Duration::from_millis(250))
    );

    assert_eq!(fitter.poll(start + Duration::from_millis(249)), None);

    let committed = fitter.poll(start + Duration::from_millis(250));
    assert_range(committed, 0.5, 9.8);
    assert_eq!(fitter.state(), FitState::Committed);
    assert!(fitter.next_wakeup().is_none());
}

#[test]
fn latest_pending_range_wins() {
    let mut fitter = ViewportFitter::new(FitPolicy::default(), 1.0);
    let start = Instant::now();
    fitter.fit([ValueRange::new(0.0, 10.0)], start);
    fitter.fit([ValueRange::new(0.5, 9.8)], start);
    fitter.fit([ValueRange::new(0.2, 9.6)], start + Duration::from_millis(10));

    let drawn = fitter.fit([ValueRange::new(0.2, 9.6)], start + Duration::from_secs(1));
    assert_range(drawn, 0.2, 9.6);
}

#[test]
fn switching_to_immediate_flushes_pending_range() {
    let mut fitter = ViewportFitter::new(FitPolicy::default(), 1.0);
    let start = Instant::now();
    fitter.fit([ValueRange::new(0.0, 10.0)], start);
    fitter.fit([ValueRange::new(0.5, 9.8)], start);

    fitter.set_policy(FitPolicy::Immediate);
    assert_range(fitter.committed(), 0.5, 9.8);
    assert!(fitter.next_wakeup().is_none());
}

#[test]
fn unchanged_target_schedules_nothing() {
    let mut fitter = ViewportFitter::new(FitPolicy::default(), 1.1);
    let now = Instant::now();
    fitter.fit([ValueRange::new(1.0, 2.0)], now);
    fitter.fit([ValueRange::new(1.0, 2.0)], now);
    assert!(fitter.next_wakeup().is_none());
}

#[test]
fn reset_forgets_everything() {
    let mut fitter = ViewportFitter::new(FitPolicy::default(), 1.0);
    let now = Instant::now();
    fitter.fit([ValueRange::new(0.0, 10.0)], now);
    fitter.fit([ValueRange::new(0.5, 9.8)], now);

    fitter.reset();
    assert_eq!(fitter.committed(), None);
    assert_eq!(fitter.next_wakeup(), None);
    assert_eq!(fitter.state(), FitState::Idle);
}

#[test]
fn threshold_below_one_is_rejected() {
    let policy = FitPolicy::Debounced(DebounceConfig::default().with_threshold_ratio(0.9));
    assert!(policy.validate().is_err());
}

#[test]
fn deferred_commit_returns_to_idle_on_next_quiet_fit() {
    let mut fitter = ViewportFitter::new(FitPolicy::default(), 1.0);
    let start = Instant::now();
    fitter.fit([ValueRange::new(0.0, 10.0)], start);
    fitter.fit([ValueRange::new(0.5, 9.8)], start);

    let later = start + Duration::from_secs(1);
    let drawn = fitter.fit([ValueRange::new(0.5, 9.8)], later);
    assert_range(drawn, 0.5, 9.8);
    assert_eq!(fitter.state(), FitState::Committed);

    fitter.fit([ValueRange::new(0.5, 9.8)], later);
    assert_eq!(fitter.state(), FitState::Idle);
    assert!(fitter.next_wakeup().is_none());
}
