//! Maze value types: positions, headings, states, actions and observations.
//!
//! Coordinates grow East in `x` and South in `y`, so North is `y - 1`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighboring cell in `direction`.
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A compass direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All four directions, clockwise from North.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// `(dx, dy)` of a single move.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    /// The two slip directions, in outcome order.
    pub const fn perpendicular(self) -> [Direction; 2] {
        match self {
            Direction::North | Direction::South => [Direction::East, Direction::West],
            Direction::East | Direction::West => [Direction::North, Direction::South],
        }
    }
}

/// The hidden state: where the agent is and which way it faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MazeState {
    pub position: Position,
    pub orientation: Direction,
}

impl MazeState {
    pub const fn new(position: Position, orientation: Direction) -> Self {
        Self {
            position,
            orientation,
        }
    }
}

impl fmt::Display for MazeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} facing {:?}", self.position, self.orientation)
    }
}

/// A move attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MazeAction {
    MoveNorth,
    MoveSouth,
    MoveEast,
    MoveWest,
}

impl MazeAction {
    /// Declared order; ties in planning go to the earliest entry.
    pub const ALL: [MazeAction; 4] = [
        MazeAction::MoveNorth,
        MazeAction::MoveSouth,
        MazeAction::MoveEast,
        MazeAction::MoveWest,
    ];

    pub const fn direction(self) -> Direction {
        match self {
            MazeAction::MoveNorth => Direction::North,
            MazeAction::MoveSouth => Direction::South,
            MazeAction::MoveEast => Direction::East,
            MazeAction::MoveWest => Direction::West,
        }
    }

    pub const fn toward(direction: Direction) -> Self {
        match direction {
            Direction::North => MazeAction::MoveNorth,
            Direction::South => MazeAction::MoveSouth,
            Direction::East => MazeAction::MoveEast,
            Direction::West => MazeAction::MoveWest,
        }
    }
}

/// Wall presence on the four sides of a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Walls {
    pub north: bool,
    pub east: bool,
    pub south: bool,
    pub west: bool,
}

impl Walls {
    /// Walls on every side.
    pub const CLOSED: Walls = Walls {
        north: true,
        east: true,
        south: true,
        west: true,
    };

    pub const fn get(self, direction: Direction) -> bool {
        match direction {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    pub fn set(&mut self, direction: Direction, present: bool) {
        match direction {
            Direction::North => self.north = present,
            Direction::East => self.east = present,
            Direction::South => self.south = present,
            Direction::West => self.west = present,
        }
    }

    pub fn count(self) -> usize {
        Direction::ALL.iter().filter(|d| self.get(**d)).count()
    }
}

/// `N`, `E`, `S`, `W` for walls, `-` for openings, in that order.
impl fmt::Display for Walls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (direction, letter) in Direction::ALL.iter().zip(['N', 'E', 'S', 'W']) {
            let c = if self.get(*direction) { letter } else { '-' };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// A categorical landmark the agent can perceive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationTag {
    Start,
    Goal,
}

/// What the agent perceives after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MazeObservation {
    pub walls: Walls,
    pub orientation: Direction,
    pub location: Option<LocationTag>,
}

impl MazeObservation {
    /// The goal signature: facing South in a dead end that opens South.
    pub fn looks_like_goal(&self) -> bool {
        self.orientation == Direction::South
            && self.walls.north
            && self.walls.east
            && self.walls.west
            && !self.walls.south
    }

    /// The start signature: facing North, walled East and South, open North and West.
    pub fn looks_like_start(&self) -> bool {
        self.orientation == Direction::North
            && self.walls.east
            && self.walls.south
            && !self.walls.north
            && !self.walls.west
    }
}

impl fmt::Display for MazeObservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} facing {:?}", self.walls, self.orientation)?;
        match self.location {
            Some(tag) => write!(f, " at {:?}", tag),
            None => Ok(()),
        }
    }
}
