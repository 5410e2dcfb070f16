//! Wheel partition geometry
//!
//! Derives, from an ordered choice list, the division of the circle into N
//! equal arcs and maps angles back to the segment that contains them. All
//! angles are in degrees; a wheel angle is measured within the wheel's own
//! frame, before any rotation is applied.

use crate::choices::Choice;

/// Degrees in one full revolution
pub const FULL_TURN: f64 = 360.0;

/// Fixed screen angle the selection pointer sits at, in degrees.
///
/// Winner resolution and rendering both read this constant: the segment the
/// wheel rests on is the one whose arc contains `POINTER_ANGLE - rotation`,
/// normalized into `[0, 360)`. With the screen mapping used by the viewer
/// (y grows downward) this places the pointer at the top of the wheel.
pub const POINTER_ANGLE: f64 = 270.0;

/// One arc of the wheel, bound to a single choice
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub start_angle: f64,
    pub end_angle: f64,
    pub choice: Choice,
}

/// The full partition of the circle for the current choice list.
///
/// Recomputed whenever the list changes, never mutated in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WheelLayout {
    segments: Vec<Segment>,
}

impl WheelLayout {
    /// Partition the circle into `choices.len()` equal arcs, in list order
    pub fn new(choices: &[Choice]) -> Self {
        let n = choices.len();
        if n == 0 {
            return Self::default();
        }

        let width = FULL_TURN / n as f64;
        let segments = choices
            .iter()
            .enumerate()
            .map(|(index, choice)| Segment {
                index,
                start_angle: index as f64 * width,
                end_angle: (index + 1) as f64 * width,
                choice: choice.clone(),
            })
            .collect();

        Self { segments }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Arc width of one segment in degrees
    pub fn segment_width(&self) -> f64 {
        if self.segments.is_empty() {
            0.0
        } else {
            FULL_TURN / self.segments.len() as f64
        }
    }

    /// Map an angle to the index of the segment whose arc contains it.
    ///
    /// Returns `None` for an empty wheel or a non-finite angle. Negative and
    /// over-full angles are normalized into `[0, 360)`; the result is clamped
    /// to the last segment so a normalized value that rounds to exactly 360
    /// cannot index out of range.
    pub fn angle_to_index(&self, angle: f64) -> Option<usize> {
        if self.segments.is_empty() || !angle.is_finite() {
            return None;
        }

        let n = self.segments.len();
        let normalized = angle.rem_euclid(FULL_TURN);
        let index = (normalized / self.segment_width()) as usize;
        Some(index.min(n - 1))
    }

    /// The choice bound to the segment containing `angle`
    pub fn choice_at(&self, angle: f64) -> Option<&Choice> {
        self.angle_to_index(angle)
            .map(|i| &self.segments[i].choice)
    }
}
