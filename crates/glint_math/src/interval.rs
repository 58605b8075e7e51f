/// A range of ray parameters `t`.
///
/// Intersection routines accept an interval and only report hits strictly
/// inside it, so `(0, inf)` means "anything in front of the origin".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Every distance in front of a ray origin.
    pub const FORWARD: Interval = Interval {
        min: 0.0,
        max: f32::INFINITY,
    };

    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Exclusive containment, `(min, max)`.
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Same lower bound, upper bound pulled in to `max`.
    ///
    /// Nearest-hit searches use this to shrink the search range each time a
    /// closer candidate is found.
    pub fn with_max(&self, max: f32) -> Interval {
        Interval::new(self.min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surrounds_is_exclusive() {
        let interval = Interval::new(0.0, 10.0);
        assert!(!interval.surrounds(0.0));
        assert!(!interval.surrounds(10.0));
        assert!(interval.surrounds(0.1));
        assert!(interval.surrounds(9.9));
    }

    #[test]
    fn test_forward_excludes_origin() {
        assert!(!Interval::FORWARD.surrounds(0.0));
        assert!(Interval::FORWARD.surrounds(1e-6));
        assert!(Interval::FORWARD.surrounds(1e30));
        assert!(!Interval::FORWARD.surrounds(f32::INFINITY));
    }

    #[test]
    fn test_with_max_shrinks() {
        let shrunk = Interval::FORWARD.with_max(3.0);
        assert_eq!(shrunk.min, 0.0);
        assert_eq!(shrunk.max, 3.0);
        assert!(!shrunk.surrounds(3.5));
    }
}
