//! Multi-click disambiguation.
//!
//! Clicks on the play surface are classified by final count inside a fixed
//! debounce window, so a double-click never also fires as two single clicks.
//! Time is injected as plain seconds, which keeps tests free of real waits.

/// Debounce window after the most recent click of a burst.
pub const CLICK_WINDOW_SECS: f64 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClickBurst {
    pub count: u32,
    pub x: f32,
    pub y: f32,
}

enum State {
    Idle,
    Armed {
        count: u32,
        deadline: f64,
        x: f32,
        y: f32,
    },
}

pub struct ClickArbiter {
    state: State,
}

impl Default for ClickArbiter {
    fn default() -> Self {
        Self::new()
    }
}

impl ClickArbiter {
    pub fn new() -> Self {
        Self { state: State::Idle }
    }

    /// Record a click. Each click re-arms the window and moves the burst
    /// position to the latest click.
    pub fn click(&mut self, x: f32, y: f32, now: f64) {
        let count = match self.state {
            State::Idle => 1,
            State::Armed { count, .. } => count + 1,
        };
        self.state = State::Armed {
            count,
            deadline: now + CLICK_WINDOW_SECS,
            x,
            y,
        };
    }

    /// Fire the burst once the window has elapsed; the counter resets.
    pub fn poll(&mut self, now: f64) -> Option<ClickBurst> {
        match self.state {
            State::Armed {
                count,
                deadline,
                x,
                y,
            } if now >= deadline => {
                self.state = State::Idle;
                Some(ClickBurst { count, x, y })
            }
            _ => None,
        }
    }

    /// Drop any pending burst (mode changes).
    pub fn reset(&mut self) {
        self.state = State::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_click_fires_after_window() {
        let mut arb = ClickArbiter::new();
        arb.click(10.0, 20.0, 0.0);
        assert_eq!(arb.poll(0.1), None);
        let burst = arb.poll(0.31).unwrap();
        assert_eq!(burst.count, 1);
        assert_eq!((burst.x, burst.y), (10.0, 20.0));
        // Counter reset after firing.
        assert_eq!(arb.poll(1.0), None);
    }

    #[test]
    fn triple_click_is_one_burst_of_three() {
        let mut arb = ClickArbiter::new();
        arb.click(5.0, 5.0, 0.0);
        arb.click(5.0, 5.0, 0.1);
        arb.click(6.0, 6.0, 0.2);
        // Window re-arms from the last click; nothing at 0.4.
        assert_eq!(arb.poll(0.4), None);
        let burst = arb.poll(0.51).unwrap();
        assert_eq!(burst.count, 3);
        // Burst position follows the latest click.
        assert_eq!((burst.x, burst.y), (6.0, 6.0));
    }

    #[test]
    fn slow_clicks_are_separate_bursts() {
        let mut arb = ClickArbiter::new();
        arb.click(0.0, 0.0, 0.0);
        assert_eq!(arb.poll(0.35).unwrap().count, 1);
        arb.click(0.0, 0.0, 0.5);
        assert_eq!(arb.poll(0.85).unwrap().count, 1);
    }

    #[test]
    fn reset_discards_pending_burst() {
        let mut arb = ClickArbiter::new();
        arb.click(1.0, 1.0, 0.0);
        arb.reset();
        assert_eq!(arb.poll(10.0), None);
    }
}
