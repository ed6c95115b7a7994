//! Single-scalar easing for the hover uniform.
//!
//! Pointer hover drives the planet's hover uniform between 0 and 1.
//! This is the whole animation surface of the crate: one value, one easing
//! curve, retargetable mid-flight.

/// Easing curves. `ExpoInOut` matches the exponential in-out curve the
/// hover effect uses; `Linear` exists for tests and debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ease {
    Linear,
    ExpoInOut,
}

impl Ease {
    /// Map linear progress `t` in [0, 1] onto the curve.
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Ease::Linear => t,
            Ease::ExpoInOut => {
                if t <= 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else if t < 0.5 {
                    f32::powf(2.0, 20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - f32::powf(2.0, -20.0 * t + 10.0)) / 2.0
                }
            }
        }
    }
}

/// Interpolates one scalar toward a target over a fixed duration.
#[derive(Debug)]
pub struct Tween {
    start: f32,
    target: f32,
    value: f32,
    elapsed: f32,
    duration: f32,
    ease: Ease,
}

impl Tween {
    pub fn new(value: f32, duration: f32, ease: Ease) -> Self {
        Self {
            start: value,
            target: value,
            value,
            elapsed: duration,
            duration,
            ease,
        }
    }

    /// Retarget the tween. Restarts from the current value; retargeting to
    /// the value already being approached keeps the flight in progress.
    pub fn to(&mut self, target: f32) {
        if target == self.target {
            return;
        }
        self.start = self.value;
        self.target = target;
        self.elapsed = 0.0;
    }

    /// Advance by `dt` seconds and return the current value.
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        let t = if self.duration > 0.0 {
            self.elapsed / self.duration
        } else {
            1.0
        };
        self.value = self.start + (self.target - self.start) * self.ease.apply(t);
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expo_in_out_hits_its_endpoints() {
        assert_eq!(Ease::ExpoInOut.apply(0.0), 0.0);
        assert_eq!(Ease::ExpoInOut.apply(1.0), 1.0);
        assert!((Ease::ExpoInOut.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn expo_in_out_is_monotonic() {
        let mut previous = 0.0;
        for i in 1..=100 {
            let value = Ease::ExpoInOut.apply(i as f32 / 100.0);
            assert!(value >= previous);
            previous = value;
        }
    }

    #[test]
    fn tween_reaches_its_target() {
        let mut tween = Tween::new(0.0, 0.5, Ease::ExpoInOut);
        tween.to(1.0);
        for _ in 0..60 {
            tween.advance(1.0 / 60.0);
        }
        assert!((tween.value() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn retarget_mid_flight_continues_from_current_value() {
        let mut tween = Tween::new(0.0, 0.5, Ease::Linear);
        tween.to(1.0);
        tween.advance(0.25);
        let mid = tween.value();
        assert!((mid - 0.5).abs() < 1e-6);
        tween.to(0.0);
        // no jump: value is unchanged until time advances
        assert_eq!(tween.value(), mid);
        tween.advance(0.5);
        assert!(tween.value().abs() < 1e-6);
    }

    #[test]
    fn retargeting_the_same_target_does_not_restart() {
        let mut tween = Tween::new(0.0, 1.0, Ease::Linear);
        tween.to(1.0);
        tween.advance(0.5);
        tween.to(1.0);
        tween.advance(0.5);
        assert!((tween.value() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn settled_tween_stays_put() {
        let mut tween = Tween::new(0.25, 0.5, Ease::ExpoInOut);
        for _ in 0..10 {
            assert_eq!(tween.advance(0.1), 0.25);
        }
    }
}
