use std::fmt;

/// Main error type for the Battle Frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontierError {
    /// Error related to species or move table lookups
    Data(DataError),
    /// Error related to building or advancing a tournament bracket
    Bracket(BracketError),
    /// Error related to persisting the frontier state
    Save(SaveError),
    /// Error related to loading the frontier configuration
    Config(ConfigError),
}

/// Errors related to the compiled-in species and move tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    /// The specified species was not found in the registry
    SpeciesNotFound(String),
    /// The specified move was not found in the registry
    MoveNotFound(String),
    /// A data table failed to parse
    MalformedData(String),
}

/// Errors related to tournament brackets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BracketError {
    /// Bracket sizes must be a power of two, at least 2
    InvalidSize(usize),
    /// Participant index is outside the bracket
    InvalidParticipant(usize),
}

/// Errors related to saving and loading the frontier state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    Io(String),
    Encode(String),
    Decode(String),
}

/// Errors related to the configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io(String),
    Parse(String),
}

impl fmt::Display for FrontierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrontierError::Data(err) => write!(f, "Data error: {}", err),
            FrontierError::Bracket(err) => write!(f, "Bracket error: {}", err),
            FrontierError::Save(err) => write!(f, "Save error: {}", err),
            FrontierError::Config(err) => write!(f, "Config error: {}", err),
        }
    }
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::SpeciesNotFound(name) => write!(f, "Species not found: {}", name),
            DataError::MoveNotFound(name) => write!(f, "Move not found: {}", name),
            DataError::MalformedData(details) => write!(f, "Malformed data: {}", details),
        }
    }
}

impl fmt::Display for BracketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketError::InvalidSize(size) => {
                write!(f, "Bracket size {} is not a power of two of at least 2", size)
            }
            BracketError::InvalidParticipant(index) => {
                write!(f, "Invalid participant index: {}", index)
            }
        }
    }
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Io(details) => write!(f, "Could not access save file: {}", details),
            SaveError::Encode(details) => write!(f, "Could not encode frontier state: {}", details),
            SaveError::Decode(details) => write!(f, "Could not decode frontier state: {}", details),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(details) => write!(f, "Could not read config file: {}", details),
            ConfigError::Parse(details) => write!(f, "Malformed config file: {}", details),
        }
    }
}

impl std::error::Error for FrontierError {}
impl std::error::Error for DataError {}
impl std::error::Error for BracketError {}
impl std::error::Error for SaveError {}
impl std::error::Error for ConfigError {}

impl From<DataError> for FrontierError {
    fn from(err: DataError) -> Self {
        FrontierError::Data(err)
    }
}

impl From<BracketError> for FrontierError {
    fn from(err: BracketError) -> Self {
        FrontierError::Bracket(err)
    }
}

impl From<SaveError> for FrontierError {
    fn from(err: SaveError) -> Self {
        FrontierError::Save(err)
    }
}

impl From<ConfigError> for FrontierError {
    fn from(err: ConfigError) -> Self {
        FrontierError::Config(err)
    }
}

impl From<postcard::Error> for SaveError {
    fn from(err: postcard::Error) -> Self {
        SaveError::Decode(err.to_string())
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(err: ron::error::SpannedError) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Type alias for Results using FrontierError
pub type FrontierResult<T> = Result<T, FrontierError>;

/// Type alias for Results using DataError
pub type DataResult<T> = Result<T, DataError>;

/// Type alias for Results using BracketError
pub type BracketResult<T> = Result<T, BracketError>;
