use crate::error::{InfectionError, Result};
use crossterm::style::Color;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use uuid::Uuid;

/// One of the two opposing factions.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    pub fn char(self) -> char {
        match self {
            Team::Red => 'R',
            Team::Blue => 'B',
        }
    }

    pub fn color(self) -> Color {
        match self {
            Team::Red => Color::Red,
            Team::Blue => Color::Blue,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Red => write!(f, "RED"),
            Team::Blue => write!(f, "BLUE"),
        }
    }
}

/// Occupancy of a cell.
/// `Empty` is never a team, it only describes a cell.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Empty,
    Red,
    Blue,
}

impl Status {
    pub fn team(self) -> Option<Team> {
        match self {
            Status::Empty => None,
            Status::Red => Some(Team::Red),
            Status::Blue => Some(Team::Blue),
        }
    }

    pub fn char(self) -> char {
        self.team().map_or('.', Team::char)
    }

    pub fn color(self) -> Color {
        self.team().map_or(Color::DarkGrey, Team::color)
    }
}

impl From<Team> for Status {
    fn from(team: Team) -> Status {
        match team {
            Team::Red => Status::Red,
            Team::Blue => Status::Blue,
        }
    }
}

impl From<Option<Team>> for Status {
    fn from(team: Option<Team>) -> Status {
        team.map_or(Status::Empty, Status::from)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.team() {
            Some(team) => write!(f, "{}", team),
            None => write!(f, "EMPTY"),
        }
    }
}

/// A grid coordinate where `x` is the column and `y` is the row.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Position {
        Position { x, y }
    }

    /// Chebyshev distance, i.e. the number of king moves between two positions.
    pub fn distance(&self, other: Position) -> usize {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(usize, usize)> for Position {
    fn from((x, y): (usize, usize)) -> Position {
        Position { x, y }
    }
}

/// Opaque identity of an organism. Survives relocation and conversion.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct OrganismId(Uuid);

impl OrganismId {
    pub fn new() -> OrganismId {
        OrganismId(Uuid::new_v4())
    }
}

impl Default for OrganismId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrganismId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An organism as seen from the grid: who it is, where it is and which team it plays for.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Organism {
    pub id: OrganismId,
    pub position: Position,
    pub team: Team,
}

impl Organism {
    pub fn new(position: Position, team: Team) -> Organism {
        Organism {
            id: OrganismId::new(),
            position,
            team,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum MoveKind {
    /// A new organism appears at the destination, the origin is untouched.
    Duplicate,
    /// The organism itself moves to the destination, vacating the origin.
    Relocate,
}

impl MoveKind {
    /// The radius and the exact-ring flag used to enumerate candidates for this kind of move.
    pub fn reach(self) -> (usize, bool) {
        match self {
            MoveKind::Duplicate => (1, false),
            MoveKind::Relocate => (2, true),
        }
    }
}

/// A planned move of an organism.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub kind: MoveKind,
    pub organism: OrganismId,
    pub origin: Position,
    pub destination: Position,
}

impl Move {
    pub fn duplicate(organism: &Organism, destination: Position) -> Move {
        Move {
            kind: MoveKind::Duplicate,
            organism: organism.id,
            origin: organism.position,
            destination,
        }
    }

    pub fn relocate(organism: &Organism, destination: Position) -> Move {
        Move {
            kind: MoveKind::Relocate,
            organism: organism.id,
            origin: organism.position,
            destination,
        }
    }
}

/// Number of organisms per team.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub red: usize,
    pub blue: usize,
}

impl Score {
    pub fn of(&self, team: Team) -> usize {
        match team {
            Team::Red => self.red,
            Team::Blue => self.blue,
        }
    }

    pub fn total(&self) -> usize {
        self.red + self.blue
    }

    /// The team with strictly more organisms, `None` on a tie.
    pub fn leader(&self) -> Option<Team> {
        match self.red.cmp(&self.blue) {
            Ordering::Greater => Some(Team::Red),
            Ordering::Less => Some(Team::Blue),
            Ordering::Equal => None,
        }
    }
}

/// Converts a board layout character into the team occupying the cell, if any.
pub fn from_char(value: char) -> Result<Option<Team>> {
    match value {
        '.' | '-' => Ok(None),
        'R' | 'r' => Ok(Some(Team::Red)),
        'B' | 'b' => Ok(Some(Team::Blue)),
        _ => Err(InfectionError::MalformedBoard(format!(
            "invalid character value: {}",
            value
        ))),
    }
}
