//! Depth acceptance bounds.

use std::{error, fmt};

/// The closed interval of acceptable locus mean depths.
///
/// The bounds are derived once per run from the sample-wide mean depth and a filter factor: a
/// locus passes if its mean depth lies within `[mean / factor, mean * factor]`, both ends
/// inclusive. They are immutable afterwards and may be shared freely across chromosome tasks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthBounds {
    lower: f64,
    upper: f64,
}

impl DepthBounds {
    /// Creates depth bounds from a sample-wide mean depth and a filter factor.
    ///
    /// # Errors
    ///
    /// The filter factor must be a positive, finite number.
    pub fn new(mean_depth: f64, filter_factor: f64) -> Result<Self, InvalidFilterFactor> {
        if !filter_factor.is_finite() || filter_factor <= 0.0 {
            return Err(InvalidFilterFactor(filter_factor));
        }

        Ok(Self {
            lower: mean_depth / filter_factor,
            upper: mean_depth * filter_factor,
        })
    }

    /// Returns the lower bound.
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Returns the upper bound.
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Returns `true` if `depth` lies within the bounds, inclusive on both ends.
    pub fn contains(&self, depth: f64) -> bool {
        self.lower <= depth && depth <= self.upper
    }
}

/// An error returned when the depth filter factor is not a positive, finite number.
#[derive(Debug)]
pub struct InvalidFilterFactor(f64);

impl fmt::Display for InvalidFilterFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "depth filter factor must be positive, got {}", self.0)
    }
}

impl error::Error for InvalidFilterFactor {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_from_mean_and_factor() {
        let bounds = DepthBounds::new(44.0, 2.0).unwrap();

        assert_eq!(bounds.lower(), 22.0);
        assert_eq!(bounds.upper(), 88.0);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let bounds = DepthBounds::new(44.0, 2.0).unwrap();

        assert!(bounds.contains(22.0));
        assert!(bounds.contains(44.0));
        assert!(bounds.contains(88.0));

        assert!(!bounds.contains(21.9));
        assert!(!bounds.contains(88.1));
    }

    #[test]
    fn test_non_positive_factor() {
        assert!(DepthBounds::new(44.0, 0.0).is_err());
        assert!(DepthBounds::new(44.0, -2.0).is_err());
        assert!(DepthBounds::new(44.0, f64::NAN).is_err());
    }
}
