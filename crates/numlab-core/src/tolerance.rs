/// Absolute and relative tolerances shared by the numerical routines.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tolerance {
    /// Absolute tolerance, used near zero
    pub absolute: f64,
    /// Relative tolerance, scaled by the magnitude of the compared value
    pub relative: f64,
}

impl Tolerance {
    pub const DEFAULT_ABSOLUTE: f64 = 1e-12;
    pub const DEFAULT_RELATIVE: f64 = 1e-10;

    pub fn new(absolute: f64, relative: f64) -> Self {
        Self { absolute, relative }
    }

    pub fn default_precision() -> Self {
        Self {
            absolute: Self::DEFAULT_ABSOLUTE,
            relative: Self::DEFAULT_RELATIVE,
        }
    }

    pub fn loose() -> Self {
        Self {
            absolute: 1e-6,
            relative: 1e-6,
        }
    }

    /// Accepted error for an estimate of magnitude `value`.
    pub fn threshold(self, value: f64) -> f64 {
        self.absolute.max(self.relative * value.abs())
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::default_precision()
    }
}
