use thiserror::Error;

/// Errors raised while building an element registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("element id `{0}` is defined more than once")]
    DuplicateId(String),
    #[error("no `EMPTY` element definition was provided")]
    MissingEmpty,
    #[error("`EMPTY` must have kind Empty, found {0:?}")]
    EmptyKindMismatch(crate::ElementKind),
    #[error("registry holds {0} definitions, more than a cell handle can address")]
    TooManyElements(usize),
    #[error("failed to parse element records: {0}")]
    Json(#[from] serde_json::Error),
}

/// Invalid tuning values in a [`crate::SimulationConfig`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be at least 1")]
    ZeroDispersion { field: &'static str },
    #[error("{field} is {value}, must be at most {max}")]
    DispersionTooLarge {
        field: &'static str,
        value: u32,
        max: u32,
    },
    #[error("{field} is {value}%, must be at most 100%")]
    ChanceOutOfRange { field: &'static str, value: u8 },
    #[error("gas rise chance {rise}% and settle chance {settle}% overlap")]
    OverlappingGasChances { rise: u8, settle: u8 },
}

/// Errors raised by the simulation's construction and placement surface.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("grid dimensions must be non-zero, got {width}x{height}")]
    ZeroSize { width: usize, height: usize },
    #[error("element registry has not been initialized")]
    RegistryNotInitialized,
    #[error("unknown element id `{0}`")]
    UnknownElement(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
