/// A point on the simulation plane.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    ///
    /// ```
    /// use edgesim_core::Position;
    ///
    /// assert_eq!(Position::new(0.0, 0.0).distance_to(Position::new(3.0, 4.0)), 5.0);
    /// ```
    pub fn distance_to(self, other: Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Converts a distance into a simulated latency.
///
/// `f(d) = 2 * (floor(d / 1000) + (d mod 1000) / 1000)`: every full thousand
/// distance units costs 2, and the remainder costs proportionally.
///
/// # Examples
///
/// ```
/// use edgesim_core::latency_for_distance;
///
/// assert_eq!(latency_for_distance(1500.0), 3.0);
/// assert_eq!(latency_for_distance(0.0), 0.0);
/// ```
pub fn latency_for_distance(distance: f64) -> f64 {
    2.0 * ((distance / 1000.0).floor() + (distance % 1000.0) / 1000.0)
}
