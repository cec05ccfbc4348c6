#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ThrottleDecision {
    /// Run the handler now.
    Run,
    /// Run a trailing call after this many milliseconds.
    Schedule(u32),
    /// A trailing call is already pending.
    Skip,
}

/// Leading plus trailing edge throttle driven by caller-supplied timestamps.
#[derive(Clone, Debug)]
pub struct Throttle {
    interval_ms: f64,
    last_run: Option<f64>,
    pending: bool,
}

impl Throttle {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: interval_ms as f64,
            last_run: None,
            pending: false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn poll(&mut self, now_ms: f64) -> ThrottleDecision {
        // a clock that stepped backwards counts as a full interval
        let elapsed = match self.last_run {
            Some(last) if now_ms >= last => now_ms - last,
            _ => f64::INFINITY,
        };
        if elapsed >= self.interval_ms && !self.pending {
            self.last_run = Some(now_ms);
            return ThrottleDecision::Run;
        }
        if self.pending {
            return ThrottleDecision::Skip;
        }
        self.pending = true;
        let remaining = (self.interval_ms - elapsed).clamp(0.0, self.interval_ms).ceil();
        ThrottleDecision::Schedule(remaining as u32)
    }

    /// Called when the scheduled trailing call fires.
    pub fn fire(&mut self, now_ms: f64) {
        self.pending = false;
        self.last_run = Some(now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_call_runs_immediately() {
        let mut throttle = Throttle::new(100);
        assert_eq!(throttle.poll(0.0), ThrottleDecision::Run);
        assert_eq!(throttle.poll(250.0), ThrottleDecision::Run);
    }

    #[test]
    fn burst_schedules_one_trailing_call() {
        let mut throttle = Throttle::new(100);
        assert_eq!(throttle.poll(1000.0), ThrottleDecision::Run);
        assert_eq!(throttle.poll(1030.0), ThrottleDecision::Schedule(70));
        assert_eq!(throttle.poll(1060.0), ThrottleDecision::Skip);
        assert_eq!(throttle.poll(1200.0), ThrottleDecision::Skip);
        throttle.fire(1100.0);
        assert!(!throttle.is_pending());
        assert_eq!(throttle.poll(1150.0), ThrottleDecision::Schedule(50));
    }

    #[test]
    fn clock_stepping_back_does_not_stall() {
        let mut throttle = Throttle::new(100);
        assert_eq!(throttle.poll(10_000_000.0), ThrottleDecision::Run);
        assert_eq!(throttle.poll(6_400_000.0), ThrottleDecision::Run);
        assert!(!throttle.is_pending());
        assert_eq!(throttle.poll(6_400_040.0), ThrottleDecision::Schedule(60));

        throttle.fire(9_000.0);
        assert_eq!(throttle.poll(5_000.0), ThrottleDecision::Run);
    }
}
