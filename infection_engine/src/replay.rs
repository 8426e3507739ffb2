use crate::entities::{Move, Organism, OrganismId, Position, Score, Team};
use crate::error::Result;
use crate::grid::Grid;
use crate::simulation::{Outcome, Rejection};
use serde::Serialize;
use serde_json::json;
use std::{
    collections::HashMap,
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

pub fn create_replay_logger(filename: Option<String>, size: usize) -> Box<dyn ReplayLogger> {
    match filename {
        None => Box::new(NoOpReplayLogger {}),
        Some(filename) => Box::new(JsonReplayLogger::new(filename, size)),
    }
}

/// Writes every cell history as `tick,x,y,status` rows, cells in row-major order.
pub fn write_history_csv(grid: &Grid, writer: &mut impl Write) -> Result<()> {
    writeln!(writer, "tick,x,y,status")?;
    for record in grid.history_records() {
        writeln!(writer, "{},{},{},{}", record.tick, record.x, record.y, record.status)?;
    }
    Ok(())
}

/// Saves the cell histories of `grid` as CSV, creating missing parent directories.
pub fn save_history_csv(grid: &Grid, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(&file);
    write_history_csv(grid, &mut writer)?;
    writer.flush()?;
    Ok(())
}

pub trait ReplayLogger: Send + Sync {
    #[allow(unused_variables)]
    fn log_tick(&mut self, tick: usize, score: Score) {}

    #[allow(unused_variables)]
    fn log_end(&mut self, outcome: Outcome) {}

    #[allow(unused_variables)]
    fn log_event(&mut self, tick: usize, event: Event) {}

    fn clear(&mut self) {}

    /// Writes the replay along with the cell histories of `grid`.
    #[allow(unused_variables)]
    fn save(&self, grid: &Grid) -> Result<()> {
        Ok(())
    }

    fn log_duplicate(&mut self, tick: usize, parent: &Organism, child: &Organism) {
        self.log_event(
            tick,
            Event::Duplicate {
                parent: parent.id,
                organism: child.id,
                team: child.team,
                location: parent.position,
                destination: child.position,
            },
        );
    }

    fn log_relocate(&mut self, tick: usize, location: Position, organism: &Organism) {
        self.log_event(
            tick,
            Event::Relocate {
                organism: organism.id,
                team: organism.team,
                location,
                destination: organism.position,
            },
        );
    }

    fn log_infection(&mut self, tick: usize, by: &Organism, infected: &Organism) {
        self.log_event(
            tick,
            Event::Infect {
                organism: infected.id,
                by: by.id,
                team: infected.team,
                location: infected.position,
            },
        );
    }

    fn log_rejection(&mut self, tick: usize, action: &Move, rejection: Rejection) {
        self.log_event(
            tick,
            Event::Reject {
                organism: action.organism,
                destination: action.destination,
                reason: rejection.to_string(),
            },
        );
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event_type")]
pub enum Event {
    Duplicate {
        parent: OrganismId,
        organism: OrganismId,
        team: Team,
        location: Position,
        destination: Position,
    },
    Relocate {
        organism: OrganismId,
        team: Team,
        location: Position,
        destination: Position,
    },
    Infect {
        organism: OrganismId,
        by: OrganismId,
        /// The team the organism was converted to.
        team: Team,
        location: Position,
    },
    Reject {
        organism: OrganismId,
        destination: Position,
        reason: String,
    },
}

struct Tick {
    tick: usize,
    score: Score,
}

struct NoOpReplayLogger;
impl ReplayLogger for NoOpReplayLogger {}

struct JsonReplayLogger {
    filename: String,
    size: usize,
    ticks: Vec<Tick>,
    events: HashMap<usize, Vec<Event>>,
    outcome: Option<Outcome>,
}

impl JsonReplayLogger {
    pub fn new(filename: String, size: usize) -> JsonReplayLogger {
        JsonReplayLogger {
            filename,
            size,
            ticks: Vec::new(),
            events: HashMap::new(),
            outcome: None,
        }
    }
}

impl ReplayLogger for JsonReplayLogger {
    fn log_tick(&mut self, tick: usize, score: Score) {
        self.ticks.push(Tick { tick, score });
    }

    fn log_end(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
    }

    fn log_event(&mut self, tick: usize, event: Event) {
        self.events.entry(tick).or_default().push(event);
    }

    fn clear(&mut self) {
        self.ticks.clear();
        self.events.clear();
        self.outcome = None;
    }

    fn save(&self, grid: &Grid) -> Result<()> {
        let file = File::create(&self.filename)?;
        let ticks: Vec<_> = self
            .ticks
            .iter()
            .map(|tick| {
                json!({
                    "tick": tick.tick,
                    "red": tick.score.red,
                    "blue": tick.score.blue,
                    "events": self.events.get(&tick.tick).unwrap_or(&Vec::new()),
                })
            })
            .collect();

        let data = json!({
            "size": self.size,
            "ticks": ticks,
            "history": grid.history_records(),
            "outcome": self.outcome,
        });

        let mut writer = BufWriter::new(&file);
        serde_json::to_writer_pretty(&mut writer, &data)?;
        writer.flush()?;
        Ok(())
    }
}
