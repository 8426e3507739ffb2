use crate::config::SimulationConfig;
use crate::entities::{Move, MoveKind, Organism, OrganismId, Position, Score, Status, Team};
use crate::error::{InfectionError, Result};
use crate::grid::Grid;
use crate::policy::{create_policy, DecisionContext, DecisionPolicy};
use crate::replay::{create_replay_logger, ReplayLogger};
use rand::seq::SliceRandom;
use serde::Serialize;
use std::collections::HashSet;
use std::io;
use std::ops::ControlFlow;
use thiserror::Error;
use tracing::{debug, info, trace};

/// The infection simulation.
/// Main entry point for running ticks.
pub struct Simulation {
    grid: Grid,
    initial_grid: Grid,
    policy: Box<dyn DecisionPolicy>,
    context: DecisionContext,
    seed: u64,
    max_ticks: usize,
    started: bool,
    finished: bool,
    outcome: Option<Outcome>,
    claimed: HashSet<Position>,
    replay_logger: Box<dyn ReplayLogger>,
}

/// Represents the state of the simulation at a tick boundary.
#[derive(Clone, Debug, Serialize)]
pub struct SimulationState {
    pub tick: usize,
    pub score: Score,
    /// The living organisms in row-major order.
    pub organisms: Vec<Organism>,
    /// Row-major status of every cell.
    pub occupancy: Vec<Status>,
    pub finished: bool,
    /// `None` while the simulation is running.
    pub outcome: Option<Outcome>,
}

/// Represents how the simulation ended.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum Outcome {
    /// One team was wiped out, or the grid filled up with this team ahead.
    Winner(Team),
    /// The grid filled up with both teams at the same count.
    Draw,
    /// The maximum number of ticks was reached.
    TickLimitReached,
}

/// Why a proposed move was not committed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum Rejection {
    #[error("destination {0} was already claimed this tick")]
    ClaimedDestination(Position),
    #[error("destination {0} is not empty")]
    OccupiedDestination(Position),
    #[error("destination {0} is outside of the grid")]
    OutOfBounds(Position),
    #[error("destination {0} is out of reach for this kind of move")]
    Unreachable(Position),
    #[error("organism {0} is no longer at its origin")]
    GhostOrganism(OrganismId),
    #[error("the simulation has not started")]
    NotStarted,
    #[error("the simulation is finished")]
    Finished,
}

impl Simulation {
    /// Creates a new simulation.
    ///
    /// # Arguments
    /// * `grid` - The initial board. It is restored every time the simulation starts.
    /// * `policy` - Decides the move of every organism.
    /// * `max_ticks` - The maximum number of ticks before the simulation ends.
    /// * `seed` - The seed for the random number generator.
    /// * `replay_logger` - Where the replay goes, see [`create_replay_logger`].
    pub fn new(
        grid: Grid,
        policy: Box<dyn DecisionPolicy>,
        max_ticks: usize,
        seed: u64,
        replay_logger: Box<dyn ReplayLogger>,
    ) -> Simulation {
        Simulation {
            initial_grid: grid.clone(),
            grid,
            policy,
            context: DecisionContext::new(seed),
            seed,
            max_ticks,
            started: false,
            finished: false,
            outcome: None,
            claimed: HashSet::new(),
            replay_logger,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Result<Simulation> {
        let grid = config.grid()?;
        let size = grid.size();

        Ok(Simulation::new(
            grid,
            create_policy(config.policy, config.energy),
            config.max_ticks,
            config.seed,
            create_replay_logger(config.replay_filename.clone(), size),
        ))
    }

    /// Starts the simulation.
    ///
    /// Must be called once before stepping. Calling it again restarts from the initial board.
    pub fn start(&mut self) -> SimulationState {
        self.grid = self.initial_grid.clone();
        self.context = DecisionContext::new(self.seed);
        self.started = true;
        self.finished = false;
        self.outcome = None;
        self.claimed.clear();
        self.policy.reset();
        self.replay_logger.clear();

        info!(
            policy = self.policy.name(),
            size = self.grid.size(),
            seed = self.seed,
            "Simulation started"
        );
        self.replay_logger.log_tick(0, self.grid.score());

        self.state()
    }

    /// Runs one tick: decide, execute, infect, check for the end of the simulation.
    pub fn step(&mut self) -> Result<SimulationState> {
        if !self.started {
            return Err(InfectionError::NotStarted);
        }

        if self.finished {
            return Err(InfectionError::Finished);
        }

        self.context.tick += 1;
        self.policy.begin_tick(&self.grid);

        let planned = self.decide();
        let movers = self.execute(planned);
        self.infect(&movers);
        self.check_for_end();
        self.claimed.clear();

        let score = self.grid.score();
        debug!(
            tick = self.context.tick,
            red = score.red,
            blue = score.blue,
            movers = movers.len(),
            "Tick completed"
        );
        trace!("\n{}", self.grid);
        self.replay_logger.log_tick(self.context.tick, score);

        if let Some(outcome) = self.outcome {
            info!(tick = self.context.tick, ?outcome, red = score.red, blue = score.blue, "Simulation ended");
            self.replay_logger.log_end(outcome);
        }

        Ok(self.state())
    }

    /// Steps until the simulation ends or `on_tick` breaks.
    ///
    /// `on_tick` is called after every tick, so breaking always halts at a tick boundary.
    pub fn run<F>(&mut self, mut on_tick: F) -> Result<SimulationState>
    where
        F: FnMut(&Simulation) -> ControlFlow<()>,
    {
        loop {
            let state = self.step()?;
            if on_tick(self).is_break() || state.finished {
                return Ok(state);
            }
        }
    }

    /// Commits a single move proposed from outside the tick loop, followed by its infection.
    ///
    /// Proposals made between two ticks share one set of claimed destinations, which is
    /// released when the next tick ends. Returns the organism that ended up on the destination.
    pub fn propose(&mut self, action: Move) -> std::result::Result<Organism, Rejection> {
        if !self.started {
            return Err(Rejection::NotStarted);
        }

        if self.finished {
            return Err(Rejection::Finished);
        }

        match self.commit(action) {
            Ok(mover) => {
                self.infect(&[mover]);
                Ok(self.grid.organism(mover.id).unwrap_or(mover))
            }
            Err(rejection) => {
                self.reject(&action, rejection);
                Err(rejection)
            }
        }
    }

    pub fn state(&self) -> SimulationState {
        SimulationState {
            tick: self.context.tick,
            score: self.grid.score(),
            organisms: self.grid.organisms(),
            occupancy: self.grid.occupancy(),
            finished: self.finished,
            outcome: self.outcome,
        }
    }

    /// An independent copy of the live grid, e.g. to be encoded as a perception.
    pub fn snapshot(&self) -> Grid {
        self.grid.clone()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn tick(&self) -> usize {
        self.context.tick
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn draw(&self) -> io::Result<()> {
        self.grid.draw(self.context.tick, &self.grid.score())
    }

    pub fn save_replay(&self) -> Result<()> {
        self.replay_logger.save(&self.grid)
    }

    fn decide(&mut self) -> Vec<Move> {
        // Every organism decides against the same view of the grid
        let snapshot = self.grid.clone();
        let mut organisms = snapshot.organisms();
        organisms.shuffle(&mut self.context.rng);

        let mut planned = Vec::with_capacity(organisms.len());
        for organism in &organisms {
            if let Some(action) = self.policy.decide(organism, &snapshot, &mut self.context) {
                planned.push(action);
            }
        }

        planned
    }

    fn execute(&mut self, planned: Vec<Move>) -> Vec<Organism> {
        let mut movers = Vec::with_capacity(planned.len());

        for action in planned {
            match self.commit(action) {
                Ok(mover) => movers.push(mover),
                Err(rejection) => self.reject(&action, rejection),
            }
        }

        movers
    }

    fn commit(&mut self, action: Move) -> std::result::Result<Organism, Rejection> {
        let destination = action.destination;

        if self.claimed.contains(&destination) {
            return Err(Rejection::ClaimedDestination(destination));
        }

        let organism = match self.grid.organism_at(action.origin) {
            Ok(Some(organism)) if organism.id == action.organism => organism,
            _ => return Err(Rejection::GhostOrganism(action.organism)),
        };

        let status = self
            .grid
            .status_at(destination.x, destination.y)
            .map_err(|_| Rejection::OutOfBounds(destination))?;

        let (radius, exact) = action.kind.reach();
        let distance = action.origin.distance(destination);
        if distance == 0 || distance > radius || (exact && distance != radius) {
            return Err(Rejection::Unreachable(destination));
        }

        if status != Status::Empty {
            return Err(Rejection::OccupiedDestination(destination));
        }

        self.claimed.insert(destination);
        let tick = self.context.tick;

        let mover = match action.kind {
            MoveKind::Duplicate => {
                let child = Organism::new(destination, organism.team);
                self.grid
                    .place(&child, tick)
                    .map_err(|_| Rejection::OutOfBounds(destination))?;
                self.replay_logger.log_duplicate(tick, &organism, &child);
                child
            }
            MoveKind::Relocate => {
                let moved = Organism {
                    position: destination,
                    ..organism
                };
                self.grid
                    .clear(organism.position.x, organism.position.y, tick)
                    .and_then(|_| self.grid.place(&moved, tick))
                    .map_err(|_| Rejection::OutOfBounds(destination))?;
                self.replay_logger.log_relocate(tick, organism.position, &moved);
                moved
            }
        };

        self.policy.committed(&action);
        Ok(mover)
    }

    fn reject(&mut self, action: &Move, rejection: Rejection) {
        debug!(tick = self.context.tick, organism = %action.organism, %rejection, "Move rejected");
        self.replay_logger
            .log_rejection(self.context.tick, action, rejection);
    }

    fn infect(&mut self, movers: &[Organism]) {
        let tick = self.context.tick;

        // Each mover attacks for the team it had when its move was committed
        for mover in movers {
            for infected in self.grid.apply_infection(mover.position, mover.team, tick) {
                self.replay_logger.log_infection(tick, mover, &infected);
            }
        }
    }

    fn check_for_end(&mut self) {
        let score = self.grid.score();

        self.outcome = if score.red == 0 && score.blue > 0 {
            Some(Outcome::Winner(Team::Blue))
        } else if score.blue == 0 && score.red > 0 {
            Some(Outcome::Winner(Team::Red))
        } else if self.grid.is_full() {
            Some(score.leader().map_or(Outcome::Draw, Outcome::Winner))
        } else if self.context.tick >= self.max_ticks {
            Some(Outcome::TickLimitReached)
        } else {
            None
        };

        self.finished = self.outcome.is_some();
    }
}
