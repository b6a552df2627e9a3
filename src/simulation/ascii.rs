//! Terminal rendering of the intersection for headless runs

use super::model::IntersectionModel;
use super::types::{
    in_intersection, Axis, Heading, Position, FIELD_CENTER, FIELD_HEIGHT, FIELD_WIDTH, ROAD_WIDTH,
};

/// World units covered by one character cell
const CELL_SIZE: f32 = 20.0;

fn grid_size() -> (usize, usize) {
    let cols = (FIELD_WIDTH / CELL_SIZE) as usize + 1;
    let rows = (FIELD_HEIGHT / CELL_SIZE) as usize + 1;
    (rows, cols)
}

fn to_grid(position: &Position, rows: usize, cols: usize) -> (usize, usize) {
    let col = (position.x.max(0.0) / CELL_SIZE) as usize;
    let row = (position.y.max(0.0) / CELL_SIZE) as usize;
    (row.min(rows - 1), col.min(cols - 1))
}

fn cell_center(row: usize, col: usize) -> Position {
    Position::new(col as f32 * CELL_SIZE, row as f32 * CELL_SIZE)
}

fn on_road(position: &Position) -> bool {
    let half = ROAD_WIDTH / 2.0;
    (position.x - FIELD_CENTER.x).abs() <= half || (position.y - FIELD_CENTER.y).abs() <= half
}

fn vehicle_glyph(heading: Heading) -> char {
    match heading {
        Heading::North => '^',
        Heading::South => 'v',
        Heading::East => '>',
        Heading::West => '<',
    }
}

/// Draw the field as a character grid
///
/// Roads are `.`, the signal box is `+` except for its centre which shows the
/// open axis (`|` or `-`), and vehicles are arrows pointing along their heading.
pub fn render_map(model: &IntersectionModel) -> String {
    let (rows, cols) = grid_size();
    let mut grid = vec![vec![' '; cols]; rows];

    for (row, line) in grid.iter_mut().enumerate() {
        for (col, cell) in line.iter_mut().enumerate() {
            let position = cell_center(row, col);
            if in_intersection(&position) {
                *cell = '+';
            } else if on_road(&position) {
                *cell = '.';
            }
        }
    }

    let (center_row, center_col) = to_grid(&FIELD_CENTER, rows, cols);
    grid[center_row][center_col] = match model.signals().open_axis() {
        Axis::Vertical => '|',
        Axis::Horizontal => '-',
    };

    for vehicle in model.vehicles() {
        let (row, col) = to_grid(&vehicle.position, rows, cols);
        grid[row][col] = vehicle_glyph(vehicle.heading);
    }

    let mut out = String::with_capacity(rows * (cols + 1));
    for line in &grid {
        out.extend(line.iter());
        out.push('\n');
    }
    out
}

/// One-line status for the terminal
pub fn summary(model: &IntersectionModel) -> String {
    let signals = model.signals();
    format!(
        "Tick {} | open: {:?} ({} ticks left) | spawn rate: {} | active: {} | {}",
        model.tick(),
        signals.open_axis(),
        signals.ticks_until_change(),
        model.config().spawn_rate,
        model.active_count(),
        model.stats().summary()
    )
}
