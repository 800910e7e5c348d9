use crate::core::pairing::PairingStrategy;
use crate::types::{Polarization, StackError, StackResult};

/// Overlap threshold ensuring a scene fully contains the target burst
pub const CONTAINMENT_THRESHOLD: f64 = 0.95;

/// Broader overlap threshold used when assembling pairing stacks
pub const PAIRING_THRESHOLD: f64 = 0.80;

/// Standard burst identifier: relative orbit, ESA burst number, sub-swath
/// (e.g. `135_289664_IW1`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullBurstId {
    pub relative_orbit: u32,
    pub burst_id: u64,
    pub subswath: String,
}

impl std::fmt::Display for FullBurstId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}_{}_{}",
            self.relative_orbit, self.burst_id, self.subswath
        )
    }
}

impl std::str::FromStr for FullBurstId {
    type Err = StackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('_').collect();
        if parts.len() != 3 {
            return Err(StackError::Configuration(format!(
                "Burst id must be ORBIT_BURST_SUBSWATH, got {}",
                s
            )));
        }

        let relative_orbit = parts[0].parse().map_err(|_| {
            StackError::Configuration(format!("Relative orbit is not a number: {}", parts[0]))
        })?;
        let burst_id = parts[1].parse().map_err(|_| {
            StackError::Configuration(format!("Burst number is not a number: {}", parts[1]))
        })?;
        let subswath = parts[2].to_string();
        if !subswath.starts_with("IW") && !subswath.starts_with("EW") {
            return Err(StackError::Configuration(format!(
                "Unknown sub-swath: {}",
                subswath
            )));
        }

        Ok(Self {
            relative_orbit,
            burst_id,
            subswath,
        })
    }
}

/// Workflow inputs, constructed once at the process boundary and handed
/// into the core by argument. Core logic never reads the environment.
#[derive(Debug, Clone)]
pub struct WorkflowInputs {
    /// Calendar year whose acquisitions act as candidate references
    pub year: i32,
    pub polarization: Polarization,
    pub burst: FullBurstId,
    /// Dense strategy pairing depth (n+1 .. n+n_pairs)
    pub n_pairs: usize,
    /// Presence selects the offset strategy
    pub offset_years: Option<f64>,
}

impl WorkflowInputs {
    /// Read the workflow's environment variables
    pub fn from_env() -> StackResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source. `from_env` delegates here; tests
    /// pass a closure over a map.
    pub fn from_lookup<F>(lookup: F) -> StackResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .ok_or_else(|| StackError::Configuration(format!("Missing workflow input: {}", key)))
        };

        let year = parse_number(&required("Year")?, "Year")?;
        let raw_polarization = required("Polarization")?;
        let polarization = raw_polarization.parse().map_err(|_| {
            StackError::Configuration(format!("Unknown polarization: {}", raw_polarization))
        })?;
        let burst = required("BurstId")?.parse()?;
        let n_pairs = parse_number(&required("NPairs")?, "NPairs")?;
        let offset_years = match lookup("OFFSETS_DT") {
            Some(raw) => Some(parse_number(&raw, "OFFSETS_DT")?),
            None => None,
        };

        Ok(Self {
            year,
            polarization,
            burst,
            n_pairs,
            offset_years,
        })
    }

    /// Derive the pairing strategy these inputs select. A reference
    /// window only makes sense for dense pairing, so supplying one next
    /// to an offset interval is rejected up front.
    pub fn strategy(&self, window_end: Option<usize>) -> StackResult<PairingStrategy> {
        match self.offset_years {
            Some(interval_years) => {
                if window_end.is_some() {
                    return Err(StackError::Configuration(
                        "OFFSETS_DT and a reference window cannot be combined".to_string(),
                    ));
                }
                Ok(PairingStrategy::Offset { interval_years })
            }
            None => Ok(PairingStrategy::Dense {
                max_skip: self.n_pairs,
                window_end,
            }),
        }
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, key: &str) -> StackResult<T> {
    raw.trim().parse().map_err(|_| {
        StackError::Configuration(format!("Workflow input {} is not a number: {}", key, raw))
    })
}
