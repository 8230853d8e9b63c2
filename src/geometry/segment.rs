use super::Point;
use serde::{Deserialize, Serialize};

/// An ordered pair of points forming a drawable stroke
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub pta: Point,
    pub ptb: Point,
}

impl Segment {
    pub const fn new(pta: Point, ptb: Point) -> Self {
        Self { pta, ptb }
    }

    pub fn length(&self) -> f64 {
        self.pta.distance(&self.ptb)
    }

    /// Segment of `length` perpendicular to this one, centered at `ptb`.
    ///
    /// Returns `None` for a zero-length segment, which has no direction.
    pub fn perpendicular(&self, length: f64) -> Option<Segment> {
        let dx = self.ptb.x - self.pta.x;
        let dy = self.ptb.y - self.pta.y;
        let norm = dx.hypot(dy);
        if norm == 0.0 {
            return None;
        }

        let half = length / 2.0;
        let (nx, ny) = (-dy / norm * half, dx / norm * half);
        Some(Segment::new(
            self.ptb.translated(nx, ny),
            self.ptb.translated(-nx, -ny),
        ))
    }

    /// Move both endpoints by `(dx, dy)`
    pub fn shift(&mut self, dx: f64, dy: f64) {
        self.pta = self.pta.translated(dx, dy);
        self.ptb = self.ptb.translated(dx, dy);
    }

    pub fn shifted(&self, dx: f64, dy: f64) -> Segment {
        let mut moved = *self;
        moved.shift(dx, dy);
        moved
    }
}
