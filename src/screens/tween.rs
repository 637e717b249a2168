use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Idle,
    Forward,
    Reverse,
}

/// Linear 0..=1 progress driven by elapsed time.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    duration: Duration,
    elapsed: Duration,
    direction: Direction,
}

impl Tween {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            elapsed: Duration::ZERO,
            direction: Direction::Idle,
        }
    }

    pub fn is_instant(&self) -> bool {
        self.duration.is_zero()
    }

    pub fn play_forward(&mut self) {
        self.direction = Direction::Forward;
        if self.is_instant() {
            self.elapsed = self.duration;
            self.direction = Direction::Idle;
        }
    }

    pub fn play_reverse(&mut self) {
        self.direction = Direction::Reverse;
        if self.is_instant() {
            self.elapsed = Duration::ZERO;
            self.direction = Direction::Idle;
        }
    }

    /// Jump back to the hidden end without playing.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.direction = Direction::Idle;
    }

    pub fn snap_to_end(&mut self) {
        self.elapsed = self.duration;
        self.direction = Direction::Idle;
    }

    /// Advance the tween. Returns `true` when a reverse play reached the start
    /// during this step.
    pub fn advance(&mut self, by: Duration) -> bool {
        match self.direction {
            Direction::Idle => false,
            Direction::Forward => {
                self.elapsed = (self.elapsed + by).min(self.duration);
                if self.elapsed == self.duration {
                    self.direction = Direction::Idle;
                }
                false
            }
            Direction::Reverse => {
                self.elapsed = self.elapsed.saturating_sub(by);
                if self.elapsed.is_zero() {
                    self.direction = Direction::Idle;
                    return true;
                }
                false
            }
        }
    }

    pub fn is_playing(&self) -> bool {
        self.direction != Direction::Idle
    }

    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return if self.elapsed.is_zero() { 0.0 } else { 1.0 };
        }
        self.elapsed.as_secs_f32() / self.duration.as_secs_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_reports_arrival_once() {
        let mut tween = Tween::new(Duration::from_millis(100));
        tween.play_forward();
        assert!(!tween.advance(Duration::from_millis(150)));
        assert_eq!(tween.progress(), 1.0);
        tween.play_reverse();
        assert!(!tween.advance(Duration::from_millis(60)));
        assert!(tween.advance(Duration::from_millis(60)));
        assert!(!tween.advance(Duration::from_millis(60)));
        assert_eq!(tween.progress(), 0.0);
    }

    #[test]
    fn instant_tween_never_plays() {
        let mut tween = Tween::new(Duration::ZERO);
        tween.play_forward();
        assert!(!tween.is_playing());
        assert_eq!(tween.progress(), 1.0);
        tween.play_reverse();
        assert!(!tween.is_playing());
        assert_eq!(tween.progress(), 0.0);
    }
}
