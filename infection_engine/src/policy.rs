//! Decision policies.
//!
//! A policy looks at one organism and a snapshot of the grid and proposes at most one move.
//! Policies never touch the live grid, the simulation owns every mutation.

use crate::entities::{Move, MoveKind, Organism, OrganismId, Status};
use crate::grid::Grid;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::any::type_name;
use std::collections::{HashMap, HashSet};

/// Per-run state shared by every decision: the current tick and the seeded random number generator.
pub struct DecisionContext {
    pub tick: usize,
    pub rng: StdRng,
}

impl DecisionContext {
    pub fn new(seed: u64) -> DecisionContext {
        DecisionContext {
            tick: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

pub trait DecisionPolicy: Send + Sync {
    fn name(&self) -> &str {
        type_name::<Self>().rsplit("::").next().unwrap_or("DecisionPolicy")
    }

    /// Chooses the move `organism` wants to make given the `grid` snapshot, or `None` to stay idle.
    fn decide(
        &mut self,
        organism: &Organism,
        grid: &Grid,
        context: &mut DecisionContext,
    ) -> Option<Move>;

    /// Called once per tick before any decision with the grid as it is at the start of the tick.
    #[allow(unused_variables)]
    fn begin_tick(&mut self, grid: &Grid) {}

    /// Called for every move that was committed to the live grid.
    #[allow(unused_variables)]
    fn committed(&mut self, action: &Move) {}

    /// Forgets any per-organism state, called when a simulation is (re)started.
    fn reset(&mut self) {}
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    #[default]
    Infection,
    Energy,
}

pub fn create_policy(kind: PolicyKind, energy: EnergyParams) -> Box<dyn DecisionPolicy> {
    match kind {
        PolicyKind::Infection => Box::new(InfectionPolicy),
        PolicyKind::Energy => Box::new(EnergyPolicy::new(energy)),
    }
}

/// Decides from an encoded perception.
/// A snapshot that cannot be decoded means no perception this tick, so the organism stays idle.
pub fn decide_encoded(
    policy: &mut dyn DecisionPolicy,
    organism: &Organism,
    snapshot: &str,
    context: &mut DecisionContext,
) -> Option<Move> {
    match Grid::decode(snapshot) {
        Ok(grid) => policy.decide(organism, &grid, context),
        Err(e) => {
            tracing::warn!(organism = %organism.id, error = %e, "Deferring decision, no perception available");
            None
        }
    }
}

fn candidates(organism: &Organism, grid: &Grid, kind: MoveKind) -> Vec<Move> {
    let (radius, exact) = kind.reach();
    grid.candidate_moves(organism.position, radius, exact)
        .into_iter()
        .map(|destination| match kind {
            MoveKind::Duplicate => Move::duplicate(organism, destination),
            MoveKind::Relocate => Move::relocate(organism, destination),
        })
        .collect()
}

/// Highest scoring move, keeping the first one on ties. Only scores above zero count.
fn best_scoring(moves: &[Move], score: impl Fn(&Move) -> usize) -> Option<(Move, usize)> {
    moves.iter().fold(None, |best, action| {
        let value = score(action);
        match best {
            Some((_, best_value)) if best_value >= value => best,
            _ if value > 0 => Some((*action, value)),
            _ => best,
        }
    })
}

/// Subsumption policy that maximizes infections.
///
/// Layers, first one that applies wins:
/// 1. Attack: the move converting the most opponents, duplicates first on ties.
/// 2. Expansion: a random duplicate.
/// 3. Reposition: a random relocation.
/// 4. Idle.
#[derive(Clone, Copy, Debug, Default)]
pub struct InfectionPolicy;

impl DecisionPolicy for InfectionPolicy {
    fn decide(
        &mut self,
        organism: &Organism,
        grid: &Grid,
        context: &mut DecisionContext,
    ) -> Option<Move> {
        let mut moves = candidates(organism, grid, MoveKind::Duplicate);
        let duplicates = moves.len();
        moves.extend(candidates(organism, grid, MoveKind::Relocate));

        if let Some((attack, _)) = best_scoring(&moves, |action| {
            grid.potential_infections(action.destination, organism.team)
        }) {
            return Some(attack);
        }

        let (duplicates, relocations) = moves.split_at(duplicates);
        if !duplicates.is_empty() {
            return duplicates.choose(&mut context.rng).copied();
        }

        relocations.choose(&mut context.rng).copied()
    }
}

/// Tuning of the [`EnergyPolicy`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyParams {
    pub max_energy: u32,
    pub initial_energy: u32,
    /// Energy regained by every organism at the start of each tick.
    pub regen: u32,
    pub duplicate_cost: u32,
    pub relocate_cost: u32,
    /// Infections discounted from a relocation before comparing it with duplicates.
    pub relocate_penalty: usize,
}

impl Default for EnergyParams {
    fn default() -> Self {
        EnergyParams {
            max_energy: 10,
            initial_energy: 5,
            regen: 1,
            duplicate_cost: 3,
            relocate_cost: 2,
            relocate_penalty: 1,
        }
    }
}

/// Internal state of an organism driven by the [`EnergyPolicy`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mood {
    pub energy: u32,
    /// Share of the organisms on the board that belong to the opponent.
    pub aggressiveness: f64,
    /// Share of the occupied neighbours that are friendly.
    pub cohesion: f64,
}

/// Resource-budgeted alternative to the [`InfectionPolicy`].
///
/// Moves cost energy that regenerates every tick. An aggressive organism (its team is behind)
/// attacks for a single infection while a calm one waits for two, and a cohesive organism
/// expands next to its friends instead of at random.
pub struct EnergyPolicy {
    params: EnergyParams,
    moods: HashMap<OrganismId, Mood>,
}

impl EnergyPolicy {
    pub fn new(params: EnergyParams) -> EnergyPolicy {
        EnergyPolicy {
            params,
            moods: HashMap::new(),
        }
    }

    pub fn mood(&self, id: OrganismId) -> Option<&Mood> {
        self.moods.get(&id)
    }

    fn perceive(&mut self, organism: &Organism, grid: &Grid) -> Mood {
        let score = grid.score();
        let own = score.of(organism.team);
        let opponents = score.of(organism.team.opponent());
        let friends = grid.count_neighbors(organism.position, Status::from(organism.team));
        let foes = grid.potential_infections(organism.position, organism.team);

        let initial_energy = self.params.initial_energy;
        let mood = self.moods.entry(organism.id).or_insert(Mood {
            energy: initial_energy,
            aggressiveness: 0.0,
            cohesion: 0.0,
        });

        mood.aggressiveness = ratio(opponents, own + opponents);
        mood.cohesion = ratio(friends, friends + foes);

        *mood
    }
}

fn ratio(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64
}

impl DecisionPolicy for EnergyPolicy {
    fn decide(
        &mut self,
        organism: &Organism,
        grid: &Grid,
        context: &mut DecisionContext,
    ) -> Option<Move> {
        let mood = self.perceive(organism, grid);

        let duplicates = if mood.energy >= self.params.duplicate_cost {
            candidates(organism, grid, MoveKind::Duplicate)
        } else {
            Vec::new()
        };
        let relocations = if mood.energy >= self.params.relocate_cost {
            candidates(organism, grid, MoveKind::Relocate)
        } else {
            Vec::new()
        };

        let threshold = if mood.aggressiveness >= 0.5 { 1 } else { 2 };
        let moves: Vec<Move> = duplicates.iter().chain(relocations.iter()).copied().collect();
        let attack = best_scoring(&moves, |action| {
            let infections = grid.potential_infections(action.destination, organism.team);
            match action.kind {
                MoveKind::Duplicate => infections,
                MoveKind::Relocate => infections.saturating_sub(self.params.relocate_penalty),
            }
        });
        if let Some((attack, score)) = attack {
            if score >= threshold {
                return Some(attack);
            }
        }

        if !duplicates.is_empty() {
            if mood.cohesion >= 0.5 {
                let friendly = Status::from(organism.team);
                // Every duplicate touches its parent so the score is never zero
                return best_scoring(&duplicates, |action| {
                    grid.count_neighbors(action.destination, friendly)
                })
                .map(|(action, _)| action);
            }
            return duplicates.choose(&mut context.rng).copied();
        }

        relocations.choose(&mut context.rng).copied()
    }

    fn begin_tick(&mut self, grid: &Grid) {
        let living: HashSet<OrganismId> = grid
            .organisms()
            .into_iter()
            .map(|organism| organism.id)
            .collect();
        self.moods.retain(|id, _| living.contains(id));

        for mood in self.moods.values_mut() {
            mood.energy = (mood.energy + self.params.regen).min(self.params.max_energy);
        }
    }

    fn committed(&mut self, action: &Move) {
        let cost = match action.kind {
            MoveKind::Duplicate => self.params.duplicate_cost,
            MoveKind::Relocate => self.params.relocate_cost,
        };

        if let Some(mood) = self.moods.get_mut(&action.organism) {
            mood.energy = mood.energy.saturating_sub(cost);
        }
    }

    fn reset(&mut self) {
        self.moods.clear();
    }
}
