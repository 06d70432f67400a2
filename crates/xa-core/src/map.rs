//! Grid map of rooms and barriers.
//!
//! Maps are parsed from a plain-text grid. The first line holds the
//! 1-based starting `row col`; each following line is one row of cells:
//!
//! | Symbol | Cell |
//! |--------|------|
//! | `#` | permanent barrier |
//! | `%` | excavatable barrier |
//! | `_` | simple room |
//! | `C` | simple room with a camp |
//! | `X` | treasure room |
//! | `^` | passage room (the way out) |

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// The built-in map used when no other map is configured.
pub const DEFAULT_MAP: &str = include_str!("../maps/default.txt");

/// A grid coordinate. Row 0 is the northern edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Zero-based row.
    pub row: i32,
    /// Zero-based column.
    pub col: i32,
}

impl Position {
    /// Create a position.
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The position shifted by a signed offset.
    pub fn offset(self, row_offset: i32, col_offset: i32) -> Self {
        Self {
            row: self.row + row_offset,
            col: self.col + col_offset,
        }
    }

    /// Manhattan distance.
    pub fn distance(self, other: Position) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A cardinal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Up one row.
    North,
    /// Down one row.
    South,
    /// Right one column.
    East,
    /// Left one column.
    West,
}

impl Direction {
    /// Every direction, in description order.
    pub const ALL: [Direction; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// Parse a direction name, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "north" => Some(Self::North),
            "south" => Some(Self::South),
            "east" => Some(Self::East),
            "west" => Some(Self::West),
            _ => None,
        }
    }

    /// Lowercase name, as typed after `go`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
        }
    }

    /// Signed `(row, col)` step.
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Self::North => (-1, 0),
            Self::South => (1, 0),
            Self::East => (0, 1),
            Self::West => (0, -1),
        }
    }
}

/// The flavour of a traversable cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomKind {
    /// An ordinary room.
    Simple,
    /// A room holding treasure.
    Treasure,
    /// The way out of the cave.
    Passage,
}

/// The flavour of a solid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BarrierKind {
    /// Solid rock.
    Permanent,
    /// Rock that can be dug through.
    Excavatable,
}

/// A traversable cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// What kind of room this is.
    pub kind: RoomKind,
    /// Whether characters can rest here.
    pub has_camp: bool,
}

/// One grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    /// Characters can stand here.
    Room(Room),
    /// Characters cannot pass.
    Barrier(BarrierKind),
}

impl Cell {
    /// Parse a single grid symbol.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        let room = |kind, has_camp| Some(Cell::Room(Room { kind, has_camp }));
        match symbol {
            '#' => Some(Cell::Barrier(BarrierKind::Permanent)),
            '%' => Some(Cell::Barrier(BarrierKind::Excavatable)),
            '_' => room(RoomKind::Simple, false),
            'C' => room(RoomKind::Simple, true),
            'X' => room(RoomKind::Treasure, false),
            '^' => room(RoomKind::Passage, false),
            _ => None,
        }
    }

    /// The grid symbol this cell parses from.
    pub fn symbol(&self) -> char {
        match self {
            Cell::Barrier(BarrierKind::Permanent) => '#',
            Cell::Barrier(BarrierKind::Excavatable) => '%',
            Cell::Room(Room {
                kind: RoomKind::Simple,
                has_camp: true,
            }) => 'C',
            Cell::Room(Room {
                kind: RoomKind::Simple,
                ..
            }) => '_',
            Cell::Room(Room {
                kind: RoomKind::Treasure,
                ..
            }) => 'X',
            Cell::Room(Room {
                kind: RoomKind::Passage,
                ..
            }) => '^',
        }
    }

    /// The room, if this cell is one.
    pub fn as_room(&self) -> Option<&Room> {
        match self {
            Cell::Room(room) => Some(room),
            Cell::Barrier(_) => None,
        }
    }

    /// Returns true for rooms.
    pub fn is_room(&self) -> bool {
        self.as_room().is_some()
    }
}

/// A rectangular grid with a starting position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    grid: Vec<Vec<Cell>>,
    starting_position: Position,
}

impl Map {
    /// Parse a map from its text form.
    pub fn parse(text: &str) -> CoreResult<Self> {
        let mut lines = text.lines().map(str::trim_end).filter(|l| !l.is_empty());
        let header = lines.next().ok_or(CoreError::EmptyMap)?;
        let starting_position = parse_start(header)?;

        let mut grid: Vec<Vec<Cell>> = Vec::new();
        for (index, line) in lines.enumerate() {
            let line_no = index + 2;
            let row = line
                .chars()
                .map(|symbol| {
                    Cell::from_symbol(symbol).ok_or(CoreError::UnknownCell {
                        symbol,
                        line: line_no,
                    })
                })
                .collect::<CoreResult<Vec<_>>>()?;
            if grid.first().is_some_and(|first| first.len() != row.len()) {
                return Err(CoreError::RaggedRow { line: line_no });
            }
            grid.push(row);
        }
        if grid.is_empty() {
            return Err(CoreError::EmptyMap);
        }

        let map = Self {
            grid,
            starting_position,
        };
        if !map.is_room(starting_position) {
            return Err(CoreError::StartNotRoom {
                row: starting_position.row,
                col: starting_position.col,
            });
        }
        Ok(map)
    }

    /// The built-in map.
    pub fn standard() -> CoreResult<Self> {
        Self::parse(DEFAULT_MAP)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.grid.len()
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.grid.first().map_or(0, Vec::len)
    }

    /// Where new characters appear.
    pub fn starting_position(&self) -> Position {
        self.starting_position
    }

    /// Returns true if `pos` lies inside the grid.
    pub fn is_within(&self, pos: Position) -> bool {
        self.cell(pos).is_some()
    }

    /// The cell at `pos`, if inside the grid.
    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        let row = usize::try_from(pos.row).ok()?;
        let col = usize::try_from(pos.col).ok()?;
        self.grid.get(row)?.get(col)
    }

    /// The room at `pos`, if there is one.
    pub fn room(&self, pos: Position) -> Option<&Room> {
        self.cell(pos).and_then(Cell::as_room)
    }

    /// Returns true if `pos` is a room inside the grid.
    pub fn is_room(&self, pos: Position) -> bool {
        self.room(pos).is_some()
    }

    /// Directions leading from `pos` into a neighbouring room.
    pub fn open_paths(&self, pos: Position) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|d| {
                let (dr, dc) = d.offset();
                self.is_room(pos.offset(dr, dc))
            })
            .collect()
    }

    /// A short prose description of the room at `pos`.
    pub fn describe_room(&self, pos: Position) -> String {
        let mut description = String::from("It is a dark room.\n");

        if let Some(room) = self.room(pos) {
            if room.has_camp {
                description.push_str("Someone has set up camp here.\n");
            }
            match room.kind {
                RoomKind::Treasure => description.push_str("Something glitters in the dark.\n"),
                RoomKind::Passage => description.push_str("Daylight spills in from above.\n"),
                RoomKind::Simple => {}
            }
        }

        let names: Vec<&str> = self.open_paths(pos).iter().map(Direction::name).collect();
        match names.as_slice() {
            [] => description.push_str("There are no paths out."),
            [only] => description.push_str(&format!("There is one path to the {only}.")),
            [init @ .., last] => description.push_str(&format!(
                "There are paths to the {} and {last}.",
                init.join(", ")
            )),
        }
        description
    }
}

impl std::fmt::Display for Map {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} {}",
            self.starting_position.row + 1,
            self.starting_position.col + 1
        )?;
        for row in &self.grid {
            let line: String = row.iter().map(Cell::symbol).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

fn parse_start(header: &str) -> CoreResult<Position> {
    let bad = || CoreError::BadStartingPosition(header.to_string());
    let mut parts = header.split_whitespace();
    let row: i32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(bad)?;
    let col: i32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(bad)?;
    if parts.next().is_some() {
        return Err(bad());
    }
    let row = row.checked_sub(1).ok_or_else(bad)?;
    let col = col.checked_sub(1).ok_or_else(bad)?;
    Ok(Position::new(row, col))
}
