//! Countdown timer driven by caller-supplied frame deltas.

/// Tracks elapsed milliseconds against a fixed duration. Never reads the clock itself: elapsed time
/// only moves through `update`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timer {
  duration: u32,
  elapsed: u32,
}

impl Timer {
  pub fn new(duration: u32) -> Self {
    Timer { duration, elapsed: 0 }
  }

  /// Advance timer by `delta` milliseconds. Elapsed time never goes past the duration.
  pub fn update(&mut self, delta: u32) {
    self.elapsed = self.elapsed.saturating_add(delta).min(self.duration);
  }

  pub fn reset(&mut self) {
    self.elapsed = 0;
  }

  pub fn is_complete(&self) -> bool {
    self.elapsed >= self.duration
  }

  /// Fraction of the duration that passed, in `[0, 1]`. Zero-length timers are always done.
  pub fn percent_done(&self) -> f32 {
    if self.duration == 0 {
      return 1.0;
    }
    (self.elapsed as f32 / self.duration as f32).min(1.0)
  }

  pub fn elapsed(&self) -> u32 {
    self.elapsed
  }
}

#[cfg(test)]
mod tests {
  use super::Timer;

  #[test]
  fn fade_timer_completes_and_clamps() {
    let mut timer = Timer::new(2000);
    for _ in 0..3 {
      timer.update(800);
    }
    assert_eq!(2000, timer.elapsed());
    assert!(timer.is_complete());
    assert_eq!(1.0, timer.percent_done());
  }

  #[test]
  fn updates_are_additive() {
    let mut split = Timer::new(1000);
    split.update(120);
    split.update(330);

    let mut single = Timer::new(1000);
    single.update(450);

    assert_eq!(single, split);
    assert_eq!(450, split.elapsed());
    assert!(!split.is_complete());
    assert!((split.percent_done() - 0.45).abs() < 1e-6);
  }

  #[test]
  fn percent_done_never_decreases() {
    let mut timer = Timer::new(777);
    let mut last = timer.percent_done();
    for delta in [0, 1, 16, 17, 0, 250, 500, 16, 3].iter() {
      timer.update(*delta);
      let now = timer.percent_done();
      assert!(now >= last, "{} went down to {}", last, now);
      last = now;
    }
    assert!(timer.is_complete());
  }

  #[test]
  fn zero_duration_is_complete() {
    let mut timer = Timer::new(0);
    assert!(timer.is_complete());
    assert_eq!(1.0, timer.percent_done());
    timer.update(16);
    assert_eq!(0, timer.elapsed());
    assert_eq!(1.0, timer.percent_done());
  }

  #[test]
  fn huge_delta_does_not_overflow() {
    let mut timer = Timer::new(100);
    timer.update(50);
    timer.update(u32::MAX);
    assert!(timer.is_complete());
    timer.reset();
    assert_eq!(0, timer.elapsed());
    assert_eq!(0.0, timer.percent_done());
  }
}
