use nalgebra::DMatrix;
use serde::Serialize;

/// Missing-value marker for coordinate cells
pub const MISSING: f64 = f64::NAN;

/// Position buffer of one team (or the ball) in one segment.
///
/// Shape is (frames × 2·slots); slot `k` occupies columns `2k` (x) and
/// `2k + 1` (y). Cells without data hold [`MISSING`].
///
/// Serialize-only: JSON writes missing cells as `null`, which cannot be read
/// back as NaN.
#[derive(Serialize, Clone, Debug)]
pub struct XY {
    pub xy: DMatrix<f64>,
    /// Sampling rate in Hz, `None` when it could not be estimated
    pub framerate: Option<u32>,
}

impl XY {
    /// All-missing buffer for `slots` objects
    pub fn missing(frames: usize, slots: usize, framerate: Option<u32>) -> Self {
        Self { xy: DMatrix::from_element(frames, slots * 2, MISSING), framerate }
    }

    pub fn frames(&self) -> usize {
        self.xy.nrows()
    }

    pub fn slots(&self) -> usize {
        self.xy.ncols() / 2
    }

    pub fn shape(&self) -> (usize, usize) {
        self.xy.shape()
    }

    /// Write one position. Returns false when the cell is outside the buffer.
    pub fn set(&mut self, frame: usize, slot: usize, (x, y): (f64, f64)) -> bool {
        if frame >= self.frames() || slot >= self.slots() {
            return false;
        }
        self.xy[(frame, slot * 2)] = x;
        self.xy[(frame, slot * 2 + 1)] = y;
        true
    }

    /// Position of a slot in a frame, `None` if either coordinate is missing
    pub fn get(&self, frame: usize, slot: usize) -> Option<(f64, f64)> {
        if frame >= self.frames() || slot >= self.slots() {
            return None;
        }
        let x = self.xy[(frame, slot * 2)];
        let y = self.xy[(frame, slot * 2 + 1)];
        if x.is_nan() || y.is_nan() {
            None
        } else {
            Some((x, y))
        }
    }

    pub fn missing_count(&self) -> usize {
        self.xy.iter().filter(|v| v.is_nan()).count()
    }

    /// Bitwise comparison; two missing cells compare equal.
    pub fn same_as(&self, other: &XY) -> bool {
        self.framerate == other.framerate
            && self.shape() == other.shape()
            && self.xy.iter().zip(other.xy.iter()).all(|(a, b)| a.to_bits() == b.to_bits())
    }
}
