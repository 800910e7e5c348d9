use chrono::{DateTime, Utc};
use geo_types::Polygon;
use serde::{Deserialize, Serialize};

/// Polarization modes reported by the catalog for Sentinel-1 products
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarization {
    VV,
    VH,
    HV,
    HH,
    /// Dual-pol SLC products (VV+VH)
    DualVV,
    /// Dual-pol SLC products (HH+HV)
    DualHH,
}

impl std::fmt::Display for Polarization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Polarization::VV => write!(f, "VV"),
            Polarization::VH => write!(f, "VH"),
            Polarization::HV => write!(f, "HV"),
            Polarization::HH => write!(f, "HH"),
            Polarization::DualVV => write!(f, "VV+VH"),
            Polarization::DualHH => write!(f, "HH+HV"),
        }
    }
}

impl std::str::FromStr for Polarization {
    type Err = StackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "VV" => Ok(Polarization::VV),
            "VH" => Ok(Polarization::VH),
            "HV" => Ok(Polarization::HV),
            "HH" => Ok(Polarization::HH),
            "VV+VH" => Ok(Polarization::DualVV),
            "HH+HV" => Ok(Polarization::DualHH),
            _ => Err(StackError::Catalog(format!("Unknown polarization: {}", s))),
        }
    }
}

/// Sentinel-1 platform (spacecraft) identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Sentinel1A,
    Sentinel1B,
    Sentinel1C,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Sentinel1A => write!(f, "Sentinel-1A"),
            Platform::Sentinel1B => write!(f, "Sentinel-1B"),
            Platform::Sentinel1C => write!(f, "Sentinel-1C"),
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = StackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SENTINEL-1A" | "SENTINEL1A" | "S1A" => Ok(Platform::Sentinel1A),
            "SENTINEL-1B" | "SENTINEL1B" | "S1B" => Ok(Platform::Sentinel1B),
            "SENTINEL-1C" | "SENTINEL1C" | "S1C" => Ok(Platform::Sentinel1C),
            _ => Err(StackError::Catalog(format!("Unknown platform: {}", s))),
        }
    }
}

/// A single catalog acquisition record: one imaging pass over the target
/// footprint. Immutable once retrieved from the search collaborator.
#[derive(Debug, Clone)]
pub struct Acquisition {
    /// Scene identifier, unique within one search result set
    pub scene_name: String,
    /// Acquisition start time
    pub start_time: DateTime<Utc>,
    /// Ground footprint in geographic coordinates (EPSG:4326)
    pub footprint: Polygon<f64>,
    /// Relative orbit (track) number
    pub relative_orbit: u32,
    pub polarization: Polarization,
    pub platform: Platform,
}

/// An acquisition annotated with its fractional overlap against the
/// reference footprint. Intermediate to filtering; discarded afterwards.
#[derive(Debug, Clone)]
pub struct OverlapRecord {
    pub acquisition: Acquisition,
    /// Intersection area divided by reference footprint area, in [0, 1]
    pub fraction: f64,
}

/// A reference/secondary acquisition pair selected for interferometric
/// processing. Serialized form matches the job-matrix contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub reference: String,
    pub secondary: String,
    /// Short name built from the date tokens of both scenes (YYYYMMDD_YYYYMMDD)
    pub name: String,
}

/// Non-fatal conditions accumulated during a planning run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackWarning {
    /// A requested pair could not be formed: not enough trailing
    /// acquisitions for the given skip distance
    InsufficientData { reference: String, skip: usize },
    /// No acquisition later than the reference lies near the offset
    /// target, so no forward pair exists for it
    OffsetTargetMissed { reference: String },
    /// Overlap filtering removed every candidate acquisition
    NoSurvivors { total: usize },
}

impl std::fmt::Display for StackWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StackWarning::InsufficientData { reference, skip } => write!(
                f,
                "Search did not return an n+{} pair for {}",
                skip, reference
            ),
            StackWarning::OffsetTargetMissed { reference } => write!(
                f,
                "No acquisition near the offset target beyond {}",
                reference
            ),
            StackWarning::NoSurvivors { total } => write!(
                f,
                "Overlap filtering removed all {} candidate acquisitions",
                total
            ),
        }
    }
}

/// Error types for acquisition pairing
#[derive(Debug, thiserror::Error)]
pub enum StackError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Catalog format error: {0}")]
    Catalog(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for pairing operations
pub type StackResult<T> = Result<T, StackError>;
