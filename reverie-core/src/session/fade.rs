//! Volume fade-in ramp.
//!
//! When audio playback starts, gain ramps linearly from silence to the
//! target volume over a fixed number of ticks. The ramp computes each level
//! from the tick count rather than accumulating increments, so the final
//! step lands exactly on the target.

/// One step of an active ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeStep {
    /// Gain to apply for this step.
    pub level: f64,
    /// Whether the ramp has reached its target.
    pub finished: bool,
}

/// Linear gain ramp from silence to a target volume.
#[derive(Debug, Clone, PartialEq)]
pub struct FadeRamp {
    target: f64,
    total_ticks: u32,
    ticks_done: u32,
}

impl FadeRamp {
    /// Creates a ramp toward `target` spread over `total_ticks` steps.
    ///
    /// A target at or below silence needs no ramp and finishes on the first
    /// advance.
    pub fn new(target: f64, total_ticks: u32) -> Self {
        let target = target.max(0.0);
        let total_ticks = if target <= 0.0 { 0 } else { total_ticks };
        Self {
            target,
            total_ticks,
            ticks_done: 0,
        }
    }

    /// Target volume the ramp is heading toward.
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Gain level for the ticks completed so far.
    pub fn level(&self) -> f64 {
        if self.total_ticks == 0 {
            return self.target;
        }
        self.target * f64::from(self.ticks_done) / f64::from(self.total_ticks)
    }

    /// Advances one tick and returns the gain to apply.
    pub fn advance(&mut self) -> FadeStep {
        self.ticks_done = (self.ticks_done + 1).min(self.total_ticks.max(1));
        FadeStep {
            level: self.level(),
            finished: self.ticks_done >= self.total_ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_reaches_target_exactly() {
        let mut ramp = FadeRamp::new(0.7, 20);
        let mut last_level = 0.0;

        for tick in 1..=20 {
            let step = ramp.advance();
            assert!(step.level >= last_level, "ramp must be monotonic");
            last_level = step.level;
            assert_eq!(step.finished, tick == 20);
        }

        assert_eq!(last_level, 0.7);
    }

    #[test]
    fn test_zero_target_finishes_immediately() {
        let mut ramp = FadeRamp::new(0.0, 20);
        let step = ramp.advance();

        assert_eq!(step.level, 0.0);
        assert!(step.finished);
    }

    #[test]
    fn test_zero_ticks_jumps_to_target() {
        let mut ramp = FadeRamp::new(0.5, 0);
        let step = ramp.advance();

        assert_eq!(step.level, 0.5);
        assert!(step.finished);
    }

    #[test]
    fn test_negative_target_clamped_to_silence() {
        let ramp = FadeRamp::new(-0.3, 20);
        assert_eq!(ramp.target(), 0.0);
        assert_eq!(ramp.level(), 0.0);
    }
}
