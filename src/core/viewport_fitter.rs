use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::draw_config::ValueRange;
use crate::error::{ChartError, ChartResult};

/// Debounce parameters for small value-range changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceConfig {
    /// Span ratio (either direction) above which a change commits at once.
    pub threshold_ratio: f64,
    pub delay_ms: u64,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            threshold_ratio: 1.1,
            delay_ms: 300,
        }
    }
}

impl DebounceConfig {
    #[must_use]
    pub fn with_threshold_ratio(mut self, threshold_ratio: f64) -> Self {
        self.threshold_ratio = threshold_ratio;
        self
    }

    #[must_use]
    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    #[must_use]
    pub fn delay(self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn validate(self) -> ChartResult<Self> {
        if !self.threshold_ratio.is_finite() || self.threshold_ratio < 1.0 {
            return Err(ChartError::InvalidConfig(
                "debounce threshold ratio must be finite and >= 1".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// How new value ranges reach the committed viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FitPolicy {
    Immediate,
    Debounced(DebounceConfig),
}

impl Default for FitPolicy {
    fn default() -> Self {
        Self::Debounced(DebounceConfig::default())
    }
}

impl FitPolicy {
    pub fn validate(self) -> ChartResult<Self> {
        if let Self::Debounced(config) = self {
            config.validate()?;
        }
        Ok(self)
    }
}

/// Observable fitter state.
///
/// `Committed` marks the fit call that moved the committed range; the next
/// call that neither commits nor schedules returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitState {
    #[default]
    Idle,
    Scheduled,
    Committed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingFit {
    range: ValueRange,
    deadline: Instant,
}

/// Combines per-series preferred ranges into one committed value range.
///
/// The host supplies `now` so delayed commits stay deterministic: a frame
/// drawn at or after [`ViewportFitter::next_wakeup`] commits the pending
/// range.
#[derive(Debug, Clone)]
pub struct ViewportFitter {
    policy: FitPolicy,
    scale_ratio: f64,
    committed: Option<ValueRange>,
    pending: Option<PendingFit>,
    state: FitState,
}

impl ViewportFitter {
    #[must_use]
    pub fn new(policy: FitPolicy, scale_ratio: f64) -> Self {
        Self {
            policy,
            scale_ratio,
            committed: None,
            pending: None,
            state: FitState::Idle,
        }
    }

    #[must_use]
    pub fn policy(&self) -> FitPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: FitPolicy) {
        self.policy = policy;
        if matches!(policy, FitPolicy::Immediate) {
            if let Some(pending) = self.pending.take() {
                self.commit(pending.range);
            }
        }
    }

    pub fn set_scale_ratio(&mut self, scale_ratio: f64) {
        self.scale_ratio = scale_ratio;
    }

    #[must_use]
    pub fn committed(&self) -> Option<ValueRange> {
        self.committed
    }

    #[must_use]
    pub fn state(&self) -> FitState {
        self.state
    }

    /// Deadline of the scheduled commit, if any.
    #[must_use]
    pub fn next_wakeup(&self) -> Option<Instant> {
        self.pending.map(|pending| pending.deadline)
    }

    /// Forgets committed and pending ranges.
    pub fn reset(&mut self) {
        self.committed = None;
        self.pending = None;
        self.state = FitState::Idle;
    }

    /// Commits the pending range when its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<ValueRange> {
        let pending = self.pending?;
        if now < pending.deadline {
            return None;
        }
        self.pending = None;
        debug!(low = pending.range.low, high = pending.range.high, "commit deferred value range");
        self.commit(pending.range);
        Some(pending.range)
    }

    /// Headroom-scaled union of `preferred`, or `None` when nothing is visible.
    ///
    /// A zero span is widened to 1 around its value before scaling.
    #[must_use]
    pub fn target_range<I>(&self, preferred: I) -> Option<ValueRange>
    where
        I: IntoIterator<Item = ValueRange>,
    {
        let combined = preferred
            .into_iter()
            .filter(|range| range.is_finite())
            .reduce(ValueRange::union)?;
        let widened = if combined.span() <= 0.0 {
            ValueRange::new(combined.low - 0.5, combined.high + 0.5)
        } else {
            combined
        };
        Some(widened.scaled_from_mid(self.scale_ratio))
    }

    /// Feeds one frame's preferred ranges and returns the range to draw with.
    ///
    /// Returns `None` only while nothing has ever been committed.
    pub fn fit<I>(&mut self, preferred: I, now: Instant) -> Option<ValueRange>
    where
        I: IntoIterator<Item = ValueRange>,
    {
        if self.state == FitState::Committed {
            self.state = FitState::Idle;
        }
        self.poll(now);

        let Some(target) = self.target_range(preferred) else {
            trace!("no visible series data, keep committed value range");
            return self.committed;
        };

        match self.policy {
            FitPolicy::Immediate => {
                self.pending = None;
                if self.committed != Some(target) {
                    self.commit(target);
                }
            }
            FitPolicy::Debounced(config) => self.request_debounced(target, config, now),
        }

        self.committed
    }

    fn request_debounced(&mut self, target: ValueRange, config: DebounceConfig, now: Instant) {
        let Some(committed) = self.committed else {
            self.commit(target);
            return;
        };

        if !committed.contains_range(target)
            || span_ratio(committed, target) > config.threshold_ratio
        {
            self.pending = None;
            self.commit(target);
            return;
        }

        match self.pending.as_mut() {
            Some(pending) => pending.range = target,
            None if target == committed => {}
            None => {
                let deadline = now + config.delay();
                debug!(
                    low = target.low,
                    high = target.high,
                    delay_ms = config.delay_ms,
                    "defer small value range change"
                );
                self.pending = Some(PendingFit {
                    range: target,
                    deadline,
                });
                self.state = FitState::Scheduled;
            }
        }
    }

    fn commit(&mut self, range: ValueRange) {
        self.committed = Some(range);
        self.state = if self.pending.is_some() {
            FitState::Scheduled
        } else {
            FitState::Committed
        };
    }
}

fn span_ratio(a: ValueRange, b: ValueRange) -> f64 {
    let (a, b) = (a.span(), b.span());
    if a <= 0.0 || b <= 0.0 {
        return f64::INFINITY;
    }
    (a / b).max(b / a)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{FitPolicy, FitState, ViewportFitter};
    use crate::core::draw_config::ValueRange;

    #[test]
    fn single_value_is_widened_before_headroom() {
        let fitter = ViewportFitter::new(FitPolicy::Immediate, 1.0);
        let target = fitter
            .target_range([ValueRange::new(5.0, 5.0)])
            .expect("target");
        assert_eq!(target, ValueRange::new(4.5, 5.5));
    }

    #[test]
    fn no_preferred_ranges_keep_committed() {
        let mut fitter = ViewportFitter::new(FitPolicy::Immediate, 1.1);
        let now = Instant::now();
        let first = fitter.fit([ValueRange::new(0.0, 10.0)], now);
        let kept = fitter.fit(std::iter::empty(), now);
        assert_eq!(first, kept);
    }

    #[test]
    fn pending_deadline_is_not_extended() {
        let mut fitter = ViewportFitter::new(FitPolicy::default(), 1.1);
        let start = Instant::now();
        fitter.fit([ValueRange::new(0.0, 10.0)], start);

        fitter.fit([ValueRange::new(0.2, 9.9)], start);
        let deadline = fitter.next_wakeup().expect("scheduled");
        assert_eq!(fitter.state(), FitState::Scheduled);

        fitter.fit([ValueRange::new(0.1, 9.9)], start + Duration::from_millis(100));
        assert_eq!(fitter.next_wakeup(), Some(deadline));
    }

    #[test]
    fn immediate_commit_settles_back_to_idle() {
        let mut fitter = ViewportFitter::new(FitPolicy::Immediate, 1.0);
        let now = Instant::now();
        fitter.fit([ValueRange::new(0.0, 10.0)], now);
        assert_eq!(fitter.state(), FitState::Committed);

        fitter.fit([ValueRange::new(0.0, 10.0)], now);
        assert_eq!(fitter.state(), FitState::Idle);

        fitter.fit([ValueRange::new(1.0, 10.0)], now);
        assert_eq!(fitter.state(), FitState::Committed);
    }
}
