use thiserror::Error;

#[derive(Error, Debug)]
pub enum InfectionError {
    #[error("Coordinate ({x}, {y}) is outside of a {size}x{size} grid")]
    OutOfBounds { x: usize, y: usize, size: usize },

    #[error("Invalid grid dimension: {0} (must be a positive integer)")]
    InvalidDimension(usize),

    #[error("Malformed board: {0}")]
    MalformedBoard(String),

    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("Simulation has not started! Call `start` to start the simulation.")]
    NotStarted,

    #[error("Simulation is finished! Call `start` to start a new simulation.")]
    Finished,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, InfectionError>;
