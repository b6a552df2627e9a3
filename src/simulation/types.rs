//! Core types for the intersection simulation
//!
//! These are standalone types that don't depend on Bevy. Coordinates are in
//! screen space: the origin is the top-left corner of the field and `y` grows
//! downwards, so a north-bound vehicle moves towards smaller `y`.

/// A unique identifier for simulation entities
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimId(pub usize);

/// A wrapper type for vehicle IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub SimId);

/// A 2D position on the playing field
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offset this position by `distance` along a heading
    pub fn offset(&self, heading: Heading, distance: f32) -> Position {
        let (dx, dy) = heading.unit_vector();
        Position {
            x: self.x + dx * distance,
            y: self.y + dy * distance,
        }
    }
}

/// The axis a road runs along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// North/South traffic
    Vertical,
    /// East/West traffic
    Horizontal,
}

/// One of the four cardinal travel directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heading {
    North,
    South,
    East,
    West,
}

impl Heading {
    /// All headings, in the order spawn points are drawn from
    pub const ALL: [Heading; 4] = [Heading::North, Heading::South, Heading::East, Heading::West];

    pub fn axis(self) -> Axis {
        match self {
            Heading::North | Heading::South => Axis::Vertical,
            Heading::East | Heading::West => Axis::Horizontal,
        }
    }

    /// Direction of travel as a unit vector in screen coordinates
    pub fn unit_vector(self) -> (f32, f32) {
        match self {
            Heading::North => (0.0, -1.0),
            Heading::South => (0.0, 1.0),
            Heading::East => (1.0, 0.0),
            Heading::West => (-1.0, 0.0),
        }
    }

    /// Where vehicles with this heading enter the field: the midline of
    /// their road, on the edge they drive away from.
    pub fn spawn_point(self) -> Position {
        match self {
            Heading::North => Position::new(FIELD_CENTER.x, FIELD_HEIGHT),
            Heading::South => Position::new(FIELD_CENTER.x, 0.0),
            Heading::East => Position::new(0.0, FIELD_CENTER.y),
            Heading::West => Position::new(FIELD_WIDTH, FIELD_CENTER.y),
        }
    }

    /// Rotation about the vertical axis for renderers (radians, 0 = north)
    pub fn angle(self) -> f32 {
        match self {
            Heading::North => 0.0,
            Heading::East => -std::f32::consts::FRAC_PI_2,
            Heading::South => std::f32::consts::PI,
            Heading::West => std::f32::consts::FRAC_PI_2,
        }
    }
}

/// Width of the playing field
pub const FIELD_WIDTH: f32 = 800.0;

/// Height of the playing field
pub const FIELD_HEIGHT: f32 = 800.0;

/// Centre of the intersection
pub const FIELD_CENTER: Position = Position {
    x: FIELD_WIDTH / 2.0,
    y: FIELD_HEIGHT / 2.0,
};

/// Half-size of the square around the centre where signals apply
pub const INTERSECTION_TOLERANCE: f32 = 30.0;

/// Lateral distance under which two same-heading vehicles share a lane
pub const MIN_SAFE_DISTANCE: f32 = 30.0;

/// Drawn width of each road
pub const ROAD_WIDTH: f32 = 60.0;

/// Distance a vehicle covers per tick
pub const VEHICLE_SPEED: f32 = 2.0;

/// Length a vehicle occupies along its lane
pub const VEHICLE_FOOTPRINT: f32 = 20.0;

/// Whether a position lies inside the playing field (edges included)
pub fn in_field(position: &Position) -> bool {
    (0.0..=FIELD_WIDTH).contains(&position.x) && (0.0..=FIELD_HEIGHT).contains(&position.y)
}

/// Whether a position lies in the signal-controlled box around the centre
pub fn in_intersection(position: &Position) -> bool {
    (position.x - FIELD_CENTER.x).abs() <= INTERSECTION_TOLERANCE
        && (position.y - FIELD_CENTER.y).abs() <= INTERSECTION_TOLERANCE
}
