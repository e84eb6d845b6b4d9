use serde::{Deserialize, Serialize};

use crate::neat::error::{NeatError, Result};

/// Physical constants of the flappy game, in pixels and frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameParams {
    /// Screen width.
    pub width: f32,
    /// Screen height.
    pub height: f32,
    /// Downward acceleration per frame.
    pub gravity: f32,
    /// Upward speed set by a flap.
    pub thrust: f32,
    /// Vertical opening between the two halves of a pipe.
    pub pipe_gap: f32,
    /// Horizontal extent of a pipe column.
    pub pipe_width: f32,
    /// Leftward pipe movement per frame.
    pub pipe_speed: f32,
    /// Frames between two pipe spawns.
    pub pipe_interval: u32,
    /// Minimum distance between a gap and the top or bottom of the screen.
    pub gap_margin: f32,
    /// Fixed horizontal position of every bird.
    pub bird_x: f32,
    /// Half the side length of a bird's hit box.
    pub bird_radius: f32,
    /// Vertical position at reset.
    pub start_y: f32,
    /// Divisor applied to the vertical speed in observations.
    pub speed_scale: f32,
}

impl Default for GameParams {
    fn default() -> Self {
        Self {
            width: 276.0,
            height: 414.0,
            gravity: 0.125,
            thrust: 3.6,
            pipe_gap: 85.0,
            pipe_width: 50.0,
            pipe_speed: 2.0,
            pipe_interval: 100,
            gap_margin: 50.0,
            bird_x: 50.0,
            bird_radius: 10.0,
            start_y: 100.0,
            speed_scale: 10.0,
        }
    }
}

impl GameParams {
    /// Checks that the screen can hold a bird and a gap.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("gravity", self.gravity),
            ("thrust", self.thrust),
            ("gap_margin", self.gap_margin),
            ("bird_x", self.bird_x),
            ("start_y", self.start_y),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(NeatError::InvalidConfig(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }

        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("pipe_gap", self.pipe_gap),
            ("pipe_width", self.pipe_width),
            ("pipe_speed", self.pipe_speed),
            ("bird_radius", self.bird_radius),
            ("speed_scale", self.speed_scale),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(NeatError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        if self.pipe_interval == 0 {
            return Err(NeatError::InvalidConfig(
                "pipe_interval must be positive".to_string(),
            ));
        }

        let (lowest, highest) = self.gap_top_bounds();
        if lowest < 0.0 || highest < lowest {
            return Err(NeatError::InvalidConfig(format!(
                "pipe gap {} with margin {} does not fit a screen of height {}",
                self.pipe_gap, self.gap_margin, self.height
            )));
        }
        if self.pipe_gap <= 2.0 * self.bird_radius {
            return Err(NeatError::InvalidConfig(
                "pipe gap must be wider than a bird".to_string(),
            ));
        }
        if self.start_y - self.bird_radius < 0.0 || self.start_y + self.bird_radius > self.height {
            return Err(NeatError::InvalidConfig(
                "start_y must keep the bird on screen".to_string(),
            ));
        }

        Ok(())
    }

    /// Inclusive range of the upper edge of a pipe opening.
    pub(crate) fn gap_top_bounds(&self) -> (f32, f32) {
        (
            self.gap_margin,
            self.height - self.gap_margin - self.pipe_gap,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GameParams::default().validate().is_ok());
    }

    #[test]
    fn oversized_gap_is_rejected() {
        let params = GameParams {
            pipe_gap: 400.0,
            ..GameParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let params = GameParams {
            pipe_interval: 0,
            ..GameParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn gap_bound_is_checked_after_rounding() {
        // 1.0 - 0.1 - 0.8 rounds just below 0.1 in f32.
        let params = GameParams {
            width: 1.0,
            height: 1.0,
            gap_margin: 0.1,
            pipe_gap: 0.8,
            pipe_width: 0.1,
            pipe_speed: 0.01,
            bird_x: 0.2,
            bird_radius: 0.05,
            start_y: 0.5,
            ..GameParams::default()
        };
        let (lowest, highest) = params.gap_top_bounds();
        assert!(highest < lowest);
        assert!(matches!(params.validate(), Err(NeatError::InvalidConfig(_))));
    }

    #[test]
    fn non_finite_fields_are_rejected() {
        let mutators: [fn(&mut GameParams); 5] = [
            |p| p.gravity = f32::NAN,
            |p| p.thrust = f32::INFINITY,
            |p| p.gap_margin = f32::NAN,
            |p| p.bird_x = f32::NAN,
            |p| p.start_y = f32::NAN,
        ];
        for mutate in mutators {
            let mut params = GameParams::default();
            mutate(&mut params);
            assert!(matches!(params.validate(), Err(NeatError::InvalidConfig(_))));
        }
    }
}
