use crate::entities::{from_char, Organism, OrganismId, Position, Score, Status, Team};
use crate::error::{InfectionError, Result};
use crossterm::{
    cursor::Hide,
    execute,
    style::{Color, Print, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, stdout, Write};

/// A change of status of a cell at a given tick.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StateChange {
    pub tick: usize,
    pub status: Status,
}

/// A flattened history entry, as consumed by exporters.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub tick: usize,
    pub x: usize,
    pub y: usize,
    pub status: Status,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
struct Occupant {
    id: OrganismId,
    team: Team,
}

/// A single slot of the grid.
///
/// The history is compressed: an entry is only appended when the status changes,
/// so its last entry always matches the current status.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Cell {
    occupant: Option<Occupant>,
    history: Vec<StateChange>,
}

impl Cell {
    fn new() -> Cell {
        Cell {
            occupant: None,
            history: vec![StateChange {
                tick: 0,
                status: Status::Empty,
            }],
        }
    }

    pub fn status(&self) -> Status {
        Status::from(self.occupant.map(|occupant| occupant.team))
    }

    pub fn organism_id(&self) -> Option<OrganismId> {
        self.occupant.map(|occupant| occupant.id)
    }

    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    pub fn history(&self) -> &[StateChange] {
        &self.history
    }

    /// Replays the history up to and including `tick` and returns the status at that point.
    pub fn status_at_tick(&self, tick: usize) -> Status {
        self.history
            .iter()
            .take_while(|change| change.tick <= tick)
            .fold(Status::Empty, |_, change| change.status)
    }

    fn set(&mut self, occupant: Option<Occupant>, tick: usize) {
        self.occupant = occupant;

        let status = self.status();
        if self.history.last().map(|change| change.status) != Some(status) {
            self.history.push(StateChange { tick, status });
        }
    }
}

/// The square board the organisms live on.
///
/// Cells are stored row-major and the dimension never changes after construction.
/// Cloning a grid yields a fully independent snapshot, history included.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(size: usize) -> Result<Grid> {
        let count = match size.checked_mul(size) {
            Some(count) if count > 0 => count,
            _ => return Err(InfectionError::InvalidDimension(size)),
        };

        let mut cells = Vec::with_capacity(count);
        cells.resize_with(count, Cell::new);

        Ok(Grid { size, cells })
    }

    /// Parses a board layout.
    ///
    /// ```text
    /// size 3
    /// m B.R
    /// m ...
    /// m R.B
    /// ```
    pub fn parse(layout: &str) -> Result<Grid> {
        let size = Regex::new(r"size (\d+)")
            .expect("static regex")
            .captures(layout)
            .and_then(|captures| captures.get(1))
            .and_then(|value| value.as_str().parse().ok())
            .ok_or_else(|| InfectionError::MalformedBoard("missing `size` header".to_string()))?;

        let mut grid = Grid::new(size)?;

        let rows: Vec<&str> = Regex::new(r"m (.*)")
            .expect("static regex")
            .captures_iter(layout)
            .filter_map(|captures| captures.get(1))
            .map(|row| row.as_str().trim())
            .collect();

        if rows.len() != size {
            return Err(InfectionError::MalformedBoard(format!(
                "expected {} rows but found {}",
                size,
                rows.len()
            )));
        }

        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != size {
                return Err(InfectionError::MalformedBoard(format!(
                    "row {} has {} cells instead of {}",
                    y,
                    row.chars().count(),
                    size
                )));
            }

            for (x, value) in row.chars().enumerate() {
                if let Some(team) = from_char(value)? {
                    grid.place(&Organism::new(Position::new(x, y), team), 0)?;
                }
            }
        }

        Ok(grid)
    }

    /// Two organisms per team on opposite corners.
    pub fn default_board(size: usize) -> Result<Grid> {
        if size < 2 {
            return Err(InfectionError::InvalidDimension(size));
        }

        let mut grid = Grid::new(size)?;
        let last = size - 1;

        for (x, y, team) in [
            (0, 0, Team::Blue),
            (last, last, Team::Blue),
            (last, 0, Team::Red),
            (0, last, Team::Red),
        ] {
            grid.place(&Organism::new(Position::new(x, y), team), 0)?;
        }

        Ok(grid)
    }

    /// Decodes a snapshot produced by [`Grid::encode`].
    pub fn decode(snapshot: &str) -> Result<Grid> {
        let grid: Grid = serde_json::from_str(snapshot)
            .map_err(|e| InfectionError::MalformedSnapshot(e.to_string()))?;

        let expected = grid.size.checked_mul(grid.size).filter(|count| *count > 0);
        if expected != Some(grid.cells.len()) {
            return Err(InfectionError::MalformedSnapshot(format!(
                "{} cells do not form a {}x{} grid",
                grid.cells.len(),
                grid.size,
                grid.size
            )));
        }

        let consistent = grid.cells.iter().all(|cell| {
            cell.history
                .last()
                .is_some_and(|change| change.status == cell.status())
        });
        if !consistent {
            return Err(InfectionError::MalformedSnapshot(
                "cell history does not match its occupant".to_string(),
            ));
        }

        Ok(grid)
    }

    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell_at(&self, x: usize, y: usize) -> Result<&Cell> {
        let index = self.index(Position::new(x, y))?;
        Ok(&self.cells[index])
    }

    pub fn status_at(&self, x: usize, y: usize) -> Result<Status> {
        Ok(self.cell_at(x, y)?.status())
    }

    pub fn organism_at(&self, position: Position) -> Result<Option<Organism>> {
        let cell = self.cell_at(position.x, position.y)?;
        Ok(cell.occupant.map(|occupant| Organism {
            id: occupant.id,
            position,
            team: occupant.team,
        }))
    }

    pub fn organism(&self, id: OrganismId) -> Option<Organism> {
        self.organisms()
            .into_iter()
            .find(|organism| organism.id == id)
    }

    /// All living organisms in row-major order.
    pub fn organisms(&self) -> Vec<Organism> {
        // Linear scan over the cells, boards are small enough for this to be fine
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| {
                cell.occupant.map(|occupant| Organism {
                    id: occupant.id,
                    position: self.position(index),
                    team: occupant.team,
                })
            })
            .collect()
    }

    pub fn place(&mut self, organism: &Organism, tick: usize) -> Result<()> {
        let index = self.index(organism.position)?;
        self.cells[index].set(
            Some(Occupant {
                id: organism.id,
                team: organism.team,
            }),
            tick,
        );
        Ok(())
    }

    pub fn clear(&mut self, x: usize, y: usize, tick: usize) -> Result<()> {
        let index = self.index(Position::new(x, y))?;
        self.cells[index].set(None, tick);
        Ok(())
    }

    /// Empty in-bounds cells around `origin`, scanned row-major.
    ///
    /// With `exact` only the ring at exactly `radius` is considered,
    /// otherwise every cell within `radius` except the origin itself.
    pub fn candidate_moves(&self, origin: Position, radius: usize, exact: bool) -> Vec<Position> {
        let radius = radius as i64;
        let mut candidates = Vec::new();

        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let distance = dx.abs().max(dy.abs());
                if distance == 0 || (exact && distance != radius) {
                    continue;
                }

                if let Some(position) = self.offset(origin, dx, dy) {
                    if self.cells[self.position_index(position)].is_empty() {
                        candidates.push(position);
                    }
                }
            }
        }

        candidates
    }

    /// How many opponents of `attacker` would be converted by an organism landing on `position`.
    pub fn potential_infections(&self, position: Position, attacker: Team) -> usize {
        self.count_neighbors(position, Status::from(attacker.opponent()))
    }

    /// Number of Moore neighbours of `position` with the given status.
    pub fn count_neighbors(&self, position: Position, status: Status) -> usize {
        self.neighbors(position)
            .filter(|neighbor| self.cells[self.position_index(*neighbor)].status() == status)
            .count()
    }

    /// Converts every opponent around `position` to `attacker` and returns the converted organisms.
    pub fn apply_infection(
        &mut self,
        position: Position,
        attacker: Team,
        tick: usize,
    ) -> Vec<Organism> {
        let opponent = Status::from(attacker.opponent());

        // Collect first so a freshly converted cell never acts as an attacker within this call
        let infected: Vec<Position> = self
            .neighbors(position)
            .filter(|neighbor| self.cells[self.position_index(*neighbor)].status() == opponent)
            .collect();

        infected
            .into_iter()
            .filter_map(|position| {
                let index = self.position_index(position);
                let id = self.cells[index].organism_id()?;
                self.cells[index].set(Some(Occupant { id, team: attacker }), tick);

                Some(Organism {
                    id,
                    position,
                    team: attacker,
                })
            })
            .collect()
    }

    pub fn count_team(&self, team: Team) -> usize {
        let status = Status::from(team);
        self.cells
            .iter()
            .filter(|cell| cell.status() == status)
            .count()
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_empty()).count()
    }

    pub fn total_occupied(&self) -> usize {
        self.cells.len() - self.count_empty()
    }

    pub fn is_full(&self) -> bool {
        self.total_occupied() == self.size * self.size
    }

    pub fn score(&self) -> Score {
        Score {
            red: self.count_team(Team::Red),
            blue: self.count_team(Team::Blue),
        }
    }

    /// Every recorded status change, cell by cell in row-major order.
    pub fn history_records(&self) -> Vec<HistoryRecord> {
        self.cells
            .iter()
            .enumerate()
            .flat_map(|(index, cell)| {
                let position = self.position(index);
                cell.history.iter().map(move |change| HistoryRecord {
                    tick: change.tick,
                    x: position.x,
                    y: position.y,
                    status: change.status,
                })
            })
            .collect()
    }

    /// Row-major status of every cell.
    pub fn occupancy(&self) -> Vec<Status> {
        self.cells.iter().map(Cell::status).collect()
    }

    pub fn draw(&self, tick: usize, score: &Score) -> io::Result<()> {
        let mut stdout = stdout();

        execute!(
            stdout,
            Clear(ClearType::All),
            Hide,
            Print("Tick: "),
            Print(tick.to_string())
        )?;

        for team in [Team::Red, Team::Blue] {
            execute!(
                stdout,
                SetForegroundColor(team.color()),
                Print("\n"),
                Print(team.to_string()),
                Print(" = "),
                Print(score.of(team).to_string()),
                SetForegroundColor(Color::Reset)
            )?;
        }
        execute!(stdout, Print("\n\n"))?;

        for y in 0..self.size {
            for x in 0..self.size {
                let status = self.cells[y * self.size + x].status();
                execute!(
                    stdout,
                    SetForegroundColor(status.color()),
                    Print(status.char()),
                    Print(' '),
                    SetForegroundColor(Color::Reset)
                )?;
            }
            execute!(stdout, Print("\n"))?;
        }

        stdout.flush()
    }

    fn index(&self, position: Position) -> Result<usize> {
        if position.x >= self.size || position.y >= self.size {
            return Err(InfectionError::OutOfBounds {
                x: position.x,
                y: position.y,
                size: self.size,
            });
        }

        Ok(self.position_index(position))
    }

    fn position_index(&self, position: Position) -> usize {
        position.y * self.size + position.x
    }

    fn position(&self, index: usize) -> Position {
        Position::new(index % self.size, index / self.size)
    }

    fn offset(&self, origin: Position, dx: i64, dy: i64) -> Option<Position> {
        let x = origin.x as i64 + dx;
        let y = origin.y as i64 + dy;
        let size = self.size as i64;

        if x < 0 || x >= size || y < 0 || y >= size {
            return None;
        }

        Some(Position::new(x as usize, y as usize))
    }

    fn neighbors(&self, position: Position) -> impl Iterator<Item = Position> + '_ {
        (-1..=1)
            .flat_map(|dy| (-1..=1).map(move |dx| (dx, dy)))
            .filter(|(dx, dy)| *dx != 0 || *dy != 0)
            .filter_map(move |(dx, dy)| self.offset(position, dx, dy))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " ")?;
        for x in 0..self.size {
            write!(f, " {}", x)?;
        }
        writeln!(f)?;

        for y in 0..self.size {
            write!(f, "{}", y)?;
            for x in 0..self.size {
                write!(f, " {}", self.cells[y * self.size + x].status().char())?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(values: &[(usize, usize)]) -> Vec<Position> {
        values.iter().copied().map(Position::from).collect()
    }

    #[test]
    fn when_creating_a_grid_every_cell_is_empty_with_a_single_history_entry() {
        let grid = Grid::new(4).unwrap();

        assert_eq!(grid.size(), 4);
        assert_eq!(grid.count_empty(), 16);
        for record in grid.history_records() {
            assert_eq!(record.tick, 0);
            assert_eq!(record.status, Status::Empty);
        }
        assert_eq!(grid.history_records().len(), 16);
    }

    #[test]
    fn when_creating_a_grid_with_a_zero_dimension_an_error_is_returned() {
        assert!(matches!(
            Grid::new(0),
            Err(InfectionError::InvalidDimension(0))
        ));
    }

    #[test]
    fn when_parsing_a_board_organisms_are_placed_on_the_correct_cells() {
        let grid = Grid::parse(
            "\
            size 3
            m B.R
            m ...
            m ..B",
        )
        .unwrap();

        assert_eq!(grid.size(), 3);
        assert_eq!(grid.status_at(0, 0).unwrap(), Status::Blue);
        assert_eq!(grid.status_at(2, 0).unwrap(), Status::Red);
        assert_eq!(grid.status_at(1, 1).unwrap(), Status::Empty);
        assert_eq!(grid.status_at(2, 2).unwrap(), Status::Blue);
        assert_eq!(grid.total_occupied(), 3);
    }

    #[test]
    fn when_parsing_a_board_with_missing_rows_an_error_is_returned() {
        let result = Grid::parse(
            "\
            size 3
            m B.R
            m ...",
        );

        assert!(matches!(result, Err(InfectionError::MalformedBoard(_))));
    }

    #[test]
    fn when_parsing_a_board_with_a_short_row_an_error_is_returned() {
        let result = Grid::parse(
            "\
            size 2
            m B
            m ..",
        );

        assert!(matches!(result, Err(InfectionError::MalformedBoard(_))));
    }

    #[test]
    fn when_parsing_a_board_without_a_size_an_error_is_returned() {
        assert!(matches!(
            Grid::parse("m .."),
            Err(InfectionError::MalformedBoard(_))
        ));
    }

    #[test]
    fn when_creating_the_default_board_two_organisms_per_team_sit_on_the_corners() {
        let grid = Grid::default_board(7).unwrap();

        assert_eq!(grid.status_at(0, 0).unwrap(), Status::Blue);
        assert_eq!(grid.status_at(6, 6).unwrap(), Status::Blue);
        assert_eq!(grid.status_at(6, 0).unwrap(), Status::Red);
        assert_eq!(grid.status_at(0, 6).unwrap(), Status::Red);
        assert_eq!(grid.score(), Score { red: 2, blue: 2 });
    }

    #[test]
    fn when_accessing_a_cell_outside_of_the_grid_an_error_is_returned() {
        let grid = Grid::new(3).unwrap();

        assert!(matches!(
            grid.cell_at(3, 0),
            Err(InfectionError::OutOfBounds { x: 3, y: 0, size: 3 })
        ));
        assert!(grid.status_at(0, 7).is_err());
    }

    #[test]
    fn when_placing_and_clearing_an_organism_the_history_records_each_change() {
        let mut grid = Grid::new(3).unwrap();
        let organism = Organism::new(Position::new(1, 1), Team::Red);

        grid.place(&organism, 2).unwrap();
        // Placing the same team again does not add history
        grid.place(&organism, 3).unwrap();
        grid.clear(1, 1, 5).unwrap();
        grid.clear(1, 1, 6).unwrap();

        let history = grid.cell_at(1, 1).unwrap().history();
        assert_eq!(
            history,
            &[
                StateChange { tick: 0, status: Status::Empty },
                StateChange { tick: 2, status: Status::Red },
                StateChange { tick: 5, status: Status::Empty },
            ]
        );
    }

    #[test]
    fn when_replaying_a_cell_history_the_status_at_each_tick_is_reconstructed() {
        let mut grid = Grid::new(3).unwrap();
        let organism = Organism::new(Position::new(0, 0), Team::Blue);
        grid.place(&organism, 1).unwrap();
        grid.apply_infection(Position::new(1, 1), Team::Red, 4);
        grid.clear(0, 0, 7).unwrap();

        let cell = grid.cell_at(0, 0).unwrap();
        assert_eq!(cell.status_at_tick(0), Status::Empty);
        assert_eq!(cell.status_at_tick(3), Status::Blue);
        assert_eq!(cell.status_at_tick(4), Status::Red);
        assert_eq!(cell.status_at_tick(100), cell.status());
    }

    #[test]
    fn when_getting_duplicate_candidates_around_a_middle_cell_all_empty_neighbours_are_returned() {
        let grid = Grid::parse(
            "\
            size 3
            m R..
            m .R.
            m ...",
        )
        .unwrap();

        let candidates = grid.candidate_moves(Position::new(1, 1), 1, false);

        assert_eq!(
            candidates,
            positions(&[(1, 0), (2, 0), (0, 1), (2, 1), (0, 2), (1, 2), (2, 2)])
        );
    }

    #[test]
    fn when_getting_duplicate_candidates_around_a_corner_cell_only_in_bounds_cells_are_returned() {
        let grid = Grid::parse(
            "\
            size 3
            m R..
            m ...
            m ...",
        )
        .unwrap();

        let candidates = grid.candidate_moves(Position::new(0, 0), 1, false);

        assert_eq!(candidates, positions(&[(1, 0), (0, 1), (1, 1)]));
    }

    #[test]
    fn when_getting_relocate_candidates_only_the_ring_at_distance_two_is_returned() {
        let grid = Grid::parse(
            "\
            size 5
            m .....
            m .....
            m ..R..
            m .....
            m B....",
        )
        .unwrap();

        let candidates = grid.candidate_moves(Position::new(2, 2), 2, true);

        // 16 cells on the ring minus the occupied corner at (0, 4)
        assert_eq!(candidates.len(), 15);
        assert!(candidates
            .iter()
            .all(|candidate| Position::new(2, 2).distance(*candidate) == 2));
        assert!(!candidates.contains(&Position::new(0, 4)));
        assert_eq!(candidates[0], Position::new(0, 0));
    }

    #[test]
    fn when_getting_relocate_candidates_from_a_corner_out_of_bounds_cells_are_skipped() {
        let grid = Grid::parse(
            "\
            size 3
            m R..
            m ...
            m ...",
        )
        .unwrap();

        let candidates = grid.candidate_moves(Position::new(0, 0), 2, true);

        assert_eq!(candidates, positions(&[(2, 0), (2, 1), (0, 2), (1, 2), (2, 2)]));
    }

    #[test]
    fn when_a_cell_has_no_empty_neighbours_no_candidates_are_returned() {
        let grid = Grid::parse(
            "\
            size 2
            m RB
            m BR",
        )
        .unwrap();

        assert!(grid.candidate_moves(Position::new(0, 0), 1, false).is_empty());
        assert!(grid.candidate_moves(Position::new(0, 0), 2, true).is_empty());
    }

    #[test]
    fn when_counting_potential_infections_only_adjacent_opponents_are_counted() {
        let grid = Grid::parse(
            "\
            size 4
            m BBR.
            m ....
            m .B..
            m ...B",
        )
        .unwrap();

        assert_eq!(grid.potential_infections(Position::new(1, 1), Team::Red), 3);
        assert_eq!(grid.potential_infections(Position::new(1, 1), Team::Blue), 1);
        assert_eq!(grid.potential_infections(Position::new(3, 1), Team::Blue), 1);
    }

    #[test]
    fn when_applying_an_infection_every_adjacent_opponent_is_converted_exactly_once() {
        let mut grid = Grid::parse(
            "\
            size 5
            m B....
            m .BB..
            m .R...
            m .B...
            m ....B",
        )
        .unwrap();
        let before = grid.organism_at(Position::new(1, 1)).unwrap().unwrap();

        let infected = grid.apply_infection(Position::new(1, 2), Team::Red, 1);

        assert_eq!(infected.len(), 3);
        assert_eq!(grid.status_at(1, 1).unwrap(), Status::Red);
        assert_eq!(grid.status_at(2, 1).unwrap(), Status::Red);
        assert_eq!(grid.status_at(1, 3).unwrap(), Status::Red);
        // Cells more than one step away are untouched, even next to converted ones
        assert_eq!(grid.status_at(0, 0).unwrap(), Status::Blue);
        assert_eq!(grid.status_at(4, 4).unwrap(), Status::Blue);
        // Conversion keeps the identity of the organism
        let after = grid.organism_at(Position::new(1, 1)).unwrap().unwrap();
        assert_eq!(after.id, before.id);
        assert_eq!(after.team, Team::Red);
        for position in positions(&[(1, 1), (2, 1), (1, 3)]) {
            assert_eq!(grid.cell_at(position.x, position.y).unwrap().history().len(), 3);
        }
    }

    #[test]
    fn when_counting_teams_the_totals_add_up_to_the_grid_size() {
        let grid = Grid::parse(
            "\
            size 3
            m RB.
            m .R.
            m ..B",
        )
        .unwrap();

        assert_eq!(grid.count_team(Team::Red), 2);
        assert_eq!(grid.count_team(Team::Blue), 2);
        assert_eq!(grid.count_empty(), 5);
        assert_eq!(grid.total_occupied(), 4);
        assert!(!grid.is_full());
    }

    #[test]
    fn when_every_cell_is_occupied_the_grid_is_full() {
        let grid = Grid::parse(
            "\
            size 2
            m RB
            m BB",
        )
        .unwrap();

        assert!(grid.is_full());
    }

    #[test]
    fn when_taking_a_snapshot_later_mutations_do_not_affect_it() {
        let mut grid = Grid::default_board(3).unwrap();
        let snapshot = grid.clone();

        grid.clear(0, 0, 1).unwrap();

        assert_eq!(snapshot.status_at(0, 0).unwrap(), Status::Blue);
        assert_eq!(snapshot.cell_at(0, 0).unwrap().history().len(), 2);
        assert_eq!(grid.cell_at(0, 0).unwrap().history().len(), 3);
    }

    #[test]
    fn when_encoding_and_decoding_a_snapshot_the_grid_is_preserved() {
        let grid = Grid::default_board(5).unwrap();

        let decoded = Grid::decode(&grid.encode().unwrap()).unwrap();

        assert_eq!(decoded.organisms(), grid.organisms());
        assert_eq!(decoded.history_records(), grid.history_records());
    }

    #[test]
    fn when_decoding_garbage_a_malformed_snapshot_error_is_returned() {
        assert!(matches!(
            Grid::decode("{\"size\": 3"),
            Err(InfectionError::MalformedSnapshot(_))
        ));
        assert!(matches!(
            Grid::decode("{\"size\": 3, \"cells\": []}"),
            Err(InfectionError::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn when_the_size_overflows_the_cell_count_an_error_is_returned() {
        assert!(matches!(
            Grid::decode("{\"size\": 4294967296, \"cells\": []}"),
            Err(InfectionError::MalformedSnapshot(_))
        ));
        assert!(matches!(
            Grid::decode("{\"size\": 0, \"cells\": []}"),
            Err(InfectionError::MalformedSnapshot(_))
        ));
        assert!(matches!(
            Grid::new(usize::MAX),
            Err(InfectionError::InvalidDimension(_))
        ));
        assert!(matches!(
            Grid::parse("size 18446744073709551615"),
            Err(InfectionError::InvalidDimension(_) | InfectionError::MalformedBoard(_))
        ));
    }

    #[test]
    fn when_listing_organisms_they_are_returned_in_row_major_order() {
        let grid = Grid::parse(
            "\
            size 3
            m ..R
            m B..
            m .R.",
        )
        .unwrap();

        let organisms = grid.organisms();

        assert_eq!(
            organisms.iter().map(|o| o.position).collect::<Vec<_>>(),
            positions(&[(2, 0), (0, 1), (1, 2)])
        );
        assert_eq!(grid.organism(organisms[1].id), Some(organisms[1]));
    }

    #[test]
    fn when_flattening_the_grid_the_occupancy_is_row_major() {
        let grid = Grid::parse(
            "\
            size 2
            m R.
            m .B",
        )
        .unwrap();

        assert_eq!(
            grid.occupancy(),
            vec![Status::Red, Status::Empty, Status::Empty, Status::Blue]
        );
        assert_eq!(grid.to_string(), "  0 1\n0 R .\n1 . B\n");
    }
}
