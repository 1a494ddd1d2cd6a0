use tokio::time::{Duration, Instant};

/// Deadline for the next automatic relocation.
///
/// Only one deadline is ever pending: arming replaces the previous one, so a
/// click that re-arms the timer supersedes the tick that was about to fire.
#[derive(Debug, Clone)]
pub struct RelocationTimer {
    interval: Duration,
    deadline: Option<Instant>,
}

impl RelocationTimer {
    pub fn new(interval: Duration) -> Self {
        Self { interval, deadline: None }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Schedule the next relocation one interval after `now`.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.interval);
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true when the deadline has passed, re-arming from `now`.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.arm(now);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_interval() {
        let mut timer = RelocationTimer::new(Duration::from_millis(3000));
        let start = Instant::now();
        timer.arm(start);

        assert!(!timer.fire_if_due(start + Duration::from_millis(2999)));
        assert!(timer.fire_if_due(start + Duration::from_millis(3000)));
        // re-armed from the firing instant
        assert_eq!(timer.deadline(), Some(start + Duration::from_millis(6000)));
    }

    #[test]
    fn rearming_replaces_pending_deadline() {
        let mut timer = RelocationTimer::new(Duration::from_millis(2500));
        let start = Instant::now();
        timer.arm(start);
        timer.arm(start + Duration::from_millis(2000));

        assert!(!timer.fire_if_due(start + Duration::from_millis(2500)));
        assert!(timer.fire_if_due(start + Duration::from_millis(4500)));
    }

    #[test]
    fn disarmed_timer_never_fires() {
        let mut timer = RelocationTimer::new(Duration::from_millis(3500));
        let start = Instant::now();
        timer.arm(start);
        timer.disarm();

        assert!(!timer.is_armed());
        assert!(!timer.fire_if_due(start + Duration::from_secs(60)));
    }
}
