//! Accepted `t` ranges for analytic ray queries.

/// Range of ray parameters; hits must fall strictly inside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Minimum value of the interval
    pub min: f32,
    /// Maximum value of the interval
    pub max: f32,
}

impl Interval {
    /// Every strictly positive distance, the range used for scene queries.
    pub const POSITIVE: Interval = Interval {
        min: 0.0,
        max: f32::INFINITY,
    };

    /// Create a new interval with given min and max values
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Check if the interval surrounds the given value (exclusive bounds)
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Same interval with the upper bound pulled in to `max`.
    pub fn with_max(self, max: f32) -> Self {
        Self { min: self.min, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surrounds_excludes_bounds() {
        let i = Interval::new(0.0, 2.0);
        assert!(i.surrounds(1.0));
        assert!(!i.surrounds(0.0));
        assert!(!i.surrounds(2.0));
        assert!(!i.with_max(1.0).surrounds(1.5));
    }
}
