//! Polled timers
//!
//! The shell drives everything from one frame loop and hands in a
//! millisecond timestamp; these timers only answer "is it time yet".

/// One-shot timer that the tick loop re-arms after every advance
#[derive(Debug, Clone, Default)]
pub struct TickTimer {
    deadline: Option<f64>,
}

impl TickTimer {
    pub fn new() -> Self {
        Self { deadline: None }
    }

    /// Schedule (or reschedule) the timer to fire `delay_ms` after `now`
    pub fn arm(&mut self, now: f64, delay_ms: f64) {
        self.deadline = Some(now + delay_ms.max(0.0));
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<f64> {
        self.deadline
    }

    /// Consume the timer if it is due. A fired timer stays disarmed until
    /// the caller arms it again.
    pub fn fire(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Fixed-period timer anchored at its start time
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    period_ms: f64,
    next: Option<f64>,
}

impl IntervalTimer {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms,
            next: None,
        }
    }

    /// (Re)start the interval; the first fire is one period after `now`
    pub fn start(&mut self, now: f64) {
        self.next = Some(now + self.period_ms);
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    /// Number of whole periods that elapsed since the last poll
    pub fn fire(&mut self, now: f64) -> u32 {
        let Some(mut next) = self.next else {
            return 0;
        };
        if self.period_ms <= 0.0 {
            return 0;
        }
        let mut fired = 0;
        while now >= next {
            fired += 1;
            next += self.period_ms;
        }
        self.next = Some(next);
        fired
    }
}
