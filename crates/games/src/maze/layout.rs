//! Maze layouts.
//!
//! The maze domain only needs a lookup of walls and landmarks per cell,
//! expressed by [`MazeMap`]. [`MazeLayout`] stores walls as segments per
//! direction: a cell has a wall on side `d` when it lies inside the
//! bounding box of one of the `d` segments. The outer boundary of the grid
//! always counts as a wall.

use super::types::{Direction, Position, Walls};

/// Per-cell wall and landmark lookup.
pub trait MazeMap {
    /// Walls around `position`.
    fn walls_at(&self, position: Position) -> Walls;

    fn is_goal(&self, position: Position) -> bool;

    fn is_start(&self, position: Position) -> bool;

    /// Every cell of the maze.
    fn positions(&self) -> Vec<Position>;

    /// Whether `position` is a cell of the maze.
    fn contains(&self, position: Position) -> bool {
        self.positions().contains(&position)
    }
}

/// A wall segment `[from, to]` on one side of the cells it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    side: Direction,
    from: Position,
    to: Position,
}

impl Segment {
    fn covers(&self, p: Position) -> bool {
        let (min_x, max_x) = (self.from.x.min(self.to.x), self.from.x.max(self.to.x));
        let (min_y, max_y) = (self.from.y.min(self.to.y), self.from.y.max(self.to.y));
        (min_x..=max_x).contains(&p.x) && (min_y..=max_y).contains(&p.y)
    }
}

/// A rectangular maze with segment walls.
///
/// # Example
///
/// ```rust
/// use pomdp_games::maze::{Direction, MazeLayout, MazeMap, Position};
///
/// let layout = MazeLayout::new(3, 2, Position::new(0, 1), Position::new(2, 0))
///     .with_wall(Position::new(1, 1), Direction::North);
///
/// assert!(layout.walls_at(Position::new(1, 1)).north);
/// assert!(layout.walls_at(Position::new(0, 0)).west); // boundary
/// assert!(!layout.walls_at(Position::new(1, 0)).south);
/// ```
#[derive(Debug, Clone)]
pub struct MazeLayout {
    width: i32,
    height: i32,
    start: Position,
    goal: Position,
    segments: Vec<Segment>,
}

impl MazeLayout {
    /// Create an open `width × height` maze.
    ///
    /// # Panics
    ///
    /// Panics if the grid is empty or `start` / `goal` lie outside it.
    pub fn new(width: i32, height: i32, start: Position, goal: Position) -> Self {
        assert!(width > 0 && height > 0, "Maze must have at least one cell");
        let layout = Self {
            width,
            height,
            start,
            goal,
            segments: Vec::new(),
        };
        assert!(layout.in_bounds(start), "Start {} outside the maze", start);
        assert!(layout.in_bounds(goal), "Goal {} outside the maze", goal);
        layout
    }

    /// Add a wall on `side` of a single cell.
    pub fn with_wall(self, position: Position, side: Direction) -> Self {
        self.with_wall_segment(side, position, position)
    }

    /// Add a wall on `side` of every cell in the box spanned by `from` and `to`.
    pub fn with_wall_segment(mut self, side: Direction, from: Position, to: Position) -> Self {
        self.segments.push(Segment { side, from, to });
        self
    }

    /// Wall off every side of `position`.
    pub fn with_closed_cell(self, position: Position) -> Self {
        Direction::ALL
            .iter()
            .fold(self, |layout, side| layout.with_wall(position, *side))
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn in_bounds(&self, p: Position) -> bool {
        (0..self.width).contains(&p.x) && (0..self.height).contains(&p.y)
    }

    /// Whether the move from `position` toward `side` is blocked.
    pub fn has_wall(&self, position: Position, side: Direction) -> bool {
        !self.in_bounds(position.step(side))
            || self
                .segments
                .iter()
                .any(|s| s.side == side && s.covers(position))
    }

    /// The 11 × 7 reference maze, start at (5, 6), goal at (5, 2).
    pub fn example() -> Self {
        use Direction::{East, North, South, West};

        const NORTH: &[((i32, i32), (i32, i32))] = &[
            ((0, 0), (10, 0)),
            ((0, 1), (1, 1)),
            ((3, 1), (8, 1)),
            ((0, 2), (3, 2)),
            ((6, 2), (8, 2)),
            ((10, 2), (10, 2)),
            ((0, 3), (2, 3)),
            ((4, 3), (5, 3)),
            ((8, 3), (8, 3)),
            ((0, 4), (0, 4)),
            ((3, 4), (5, 4)),
            ((8, 4), (10, 4)),
            ((1, 5), (2, 5)),
            ((4, 5), (5, 5)),
            ((8, 5), (8, 5)),
        ];
        const SOUTH: &[((i32, i32), (i32, i32))] = &[
            ((0, 7), (10, 7)),
            ((0, 2), (1, 2)),
            ((3, 2), (8, 2)),
            ((0, 3), (3, 3)),
            ((6, 3), (8, 3)),
            ((10, 3), (10, 3)),
            ((0, 4), (2, 4)),
            ((4, 4), (5, 4)),
            ((8, 4), (8, 4)),
            ((0, 5), (0, 5)),
            ((3, 5), (5, 5)),
            ((8, 5), (10, 5)),
            ((1, 6), (2, 6)),
            ((4, 6), (5, 6)),
            ((8, 6), (8, 6)),
        ];
        const EAST: &[((i32, i32), (i32, i32))] = &[
            ((11, 0), (11, 7)),
            ((1, 1), (1, 2)),
            ((3, 1), (3, 1)),
            ((5, 1), (5, 2)),
            ((6, 1), (6, 1)),
            ((9, 1), (9, 2)),
            ((10, 1), (10, 2)),
            ((2, 3), (2, 3)),
            ((4, 3), (4, 4)),
            ((7, 3), (7, 3)),
            ((9, 3), (9, 3)),
            ((1, 4), (1, 4)),
            ((3, 4), (3, 5)),
            ((6, 4), (6, 4)),
            ((9, 5), (9, 6)),
            ((10, 5), (10, 5)),
            ((2, 6), (2, 6)),
            ((5, 6), (5, 6)),
        ];
        const WEST: &[((i32, i32), (i32, i32))] = &[
            ((0, 0), (0, 7)),
            ((2, 1), (2, 2)),
            ((4, 1), (4, 1)),
            ((6, 1), (6, 2)),
            ((7, 1), (7, 1)),
            ((10, 1), (10, 2)),
            ((1, 1), (1, 1)),
            ((3, 3), (3, 3)),
            ((5, 3), (5, 4)),
            ((8, 3), (8, 3)),
            ((10, 3), (10, 3)),
            ((2, 4), (2, 4)),
            ((4, 4), (4, 5)),
            ((7, 4), (7, 4)),
            ((10, 5), (10, 6)),
            ((1, 5), (1, 5)),
            ((3, 6), (3, 6)),
            ((6, 6), (6, 6)),
        ];

        let mut layout = Self::new(11, 7, Position::new(5, 6), Position::new(5, 2));
        for (side, segments) in [(North, NORTH), (South, SOUTH), (East, EAST), (West, WEST)] {
            for &((x1, y1), (x2, y2)) in segments {
                layout = layout.with_wall_segment(side, Position::new(x1, y1), Position::new(x2, y2));
            }
        }
        layout
    }

    /// ASCII rendering: `S` start, `G` goal, `|` and `-` walls.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for y in 0..self.height {
            let mut cells = String::new();
            let mut floor = String::new();
            for x in 0..self.width {
                let p = Position::new(x, y);
                let walls = self.walls_at(p);
                cells.push(if walls.west { '|' } else { ' ' });
                cells.push(if p == self.start {
                    'S'
                } else if p == self.goal {
                    'G'
                } else {
                    '.'
                });
                floor.push_str(if walls.south { "--" } else { "  " });
            }
            let east_edge = self.walls_at(Position::new(self.width - 1, y)).east;
            cells.push(if east_edge { '|' } else { ' ' });
            out.push_str(&cells);
            out.push('\n');
            out.push_str(&floor);
            out.push('\n');
        }
        out
    }
}

impl MazeMap for MazeLayout {
    fn walls_at(&self, position: Position) -> Walls {
        let mut walls = Walls::default();
        for side in Direction::ALL {
            walls.set(side, self.has_wall(position, side));
        }
        walls
    }

    fn is_goal(&self, position: Position) -> bool {
        position == self.goal
    }

    fn is_start(&self, position: Position) -> bool {
        position == self.start
    }

    fn positions(&self) -> Vec<Position> {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| Position::new(x, y)))
            .collect()
    }

    fn contains(&self, position: Position) -> bool {
        self.in_bounds(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_dimensions() {
        let layout = MazeLayout::example();
        assert_eq!(layout.positions().len(), 77);
        assert_eq!(layout.start(), Position::new(5, 6));
        assert_eq!(layout.goal(), Position::new(5, 2));
        assert!(layout.is_start(Position::new(5, 6)));
        assert!(layout.is_goal(Position::new(5, 2)));
    }

    #[test]
    fn test_example_start_walls() {
        let layout = MazeLayout::example();
        let walls = layout.walls_at(layout.start());
        assert_eq!(walls.to_string(), "-ES-");
    }

    #[test]
    fn test_example_goal_walls() {
        let layout = MazeLayout::example();
        let walls = layout.walls_at(layout.goal());
        assert!(walls.east);
        assert!(walls.south);
        assert!(!walls.north);
        assert!(!walls.west);
    }

    #[test]
    fn test_boundary_is_walled() {
        let layout = MazeLayout::new(2, 2, Position::new(0, 0), Position::new(1, 1));
        assert_eq!(layout.walls_at(Position::new(0, 0)).to_string(), "N--W");
        assert_eq!(layout.walls_at(Position::new(1, 1)).to_string(), "-ES-");
    }

    #[test]
    fn test_segment_covers_box() {
        let layout = MazeLayout::new(5, 5, Position::new(0, 0), Position::new(4, 4))
            .with_wall_segment(Direction::East, Position::new(2, 3), Position::new(2, 1));
        for y in 1..=3 {
            assert!(layout.has_wall(Position::new(2, y), Direction::East));
        }
        assert!(!layout.has_wall(Position::new(2, 0), Direction::East));
        assert!(!layout.has_wall(Position::new(2, 2), Direction::West));
    }

    #[test]
    fn test_closed_cell() {
        let layout = MazeLayout::new(3, 3, Position::new(1, 1), Position::new(0, 0))
            .with_closed_cell(Position::new(1, 1));
        assert_eq!(layout.walls_at(Position::new(1, 1)), Walls::CLOSED);
    }

    #[test]
    #[should_panic]
    fn test_goal_out_of_bounds() {
        let _ = MazeLayout::new(2, 2, Position::new(0, 0), Position::new(2, 0));
    }

    #[test]
    fn test_render_marks_landmarks() {
        let rendered = MazeLayout::example().render();
        assert_eq!(rendered.lines().count(), 14);
        assert!(rendered.contains('S'));
        assert!(rendered.contains('G'));
    }
}
