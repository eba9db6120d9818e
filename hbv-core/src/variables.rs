//! Canonical HBV parameter and state definitions.
//!
//! The external engine reads parameters and initial storages positionally, so the
//! order of [`HBV_PARAMETERS`] and [`HBV_STATES`] is part of the configuration
//! format and must not change.
//!
//! # Parameters
//!
//! - `Imax` - maximum interception storage
//! - `Ce` - evaporation factor of the unsaturated root zone
//! - `Sumax` - size of the unsaturated root zone reservoir
//! - `Beta` - shape factor splitting infiltration from fast flow
//! - `Pmax` - maximum percolation to the slow reservoir
//! - `Tlag` - lag between rainfall and river response
//! - `Kf` - fast reservoir recession coefficient
//! - `Ks` - slow reservoir recession coefficient
//! - `FM` - degree-day snow melt factor
//!
//! # States
//!
//! - `Si` - interception storage
//! - `Su` - unsaturated root zone storage
//! - `Sf` - fast flow storage
//! - `Ss` - groundwater (slow flow) storage
//! - `Sp` - snowpack storage

use serde::Serialize;

/// Number of HBV parameters.
pub const N_PARAMS: usize = 9;

/// Number of HBV storages.
pub const N_STATES: usize = 5;

/// Definition of a named model quantity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDefinition {
    /// Identifier used by the engine (e.g. "Sumax")
    pub name: &'static str,
    pub unit: &'static str,
    /// Human-readable description
    pub description: &'static str,
}

impl VariableDefinition {
    pub const fn new(name: &'static str, unit: &'static str, description: &'static str) -> Self {
        Self {
            name,
            unit,
            description,
        }
    }
}

// ============================================================================
// Parameters
// ============================================================================

pub static HBV_PARAMETERS: [VariableDefinition; N_PARAMS] = [
    VariableDefinition::new(
        "Imax",
        "mm",
        "Maximum interception, all of which is assumed to evaporate",
    ),
    VariableDefinition::new(
        "Ce",
        "-",
        "Fraction of potential evaporation drawn from the unsaturated root zone",
    ),
    VariableDefinition::new(
        "Sumax",
        "mm",
        "Size of the unsaturated root zone reservoir",
    ),
    VariableDefinition::new(
        "Beta",
        "-",
        "Shape factor controlling the split between infiltration and fast flow",
    ),
    VariableDefinition::new(
        "Pmax",
        "mm",
        "Maximum percolation from the root zone to the slow reservoir",
    ),
    VariableDefinition::new(
        "Tlag",
        "d",
        "Lag time between rainfall and arrival in the river",
    ),
    VariableDefinition::new("Kf", "-", "Recession coefficient of the fast reservoir"),
    VariableDefinition::new("Ks", "-", "Recession coefficient of the slow reservoir"),
    VariableDefinition::new("FM", "mm/deg/d", "Degree-day snow melt factor"),
];

// ============================================================================
// States
// ============================================================================

pub static HBV_STATES: [VariableDefinition; N_STATES] = [
    VariableDefinition::new("Si", "mm", "Interception storage, water held on leaves"),
    VariableDefinition::new(
        "Su",
        "mm",
        "Unsaturated root zone storage, water accessible to plants",
    ),
    VariableDefinition::new(
        "Sf",
        "mm",
        "Fast flow storage along preferential flow paths",
    ),
    VariableDefinition::new("Ss", "mm", "Groundwater storage feeding slow flow"),
    VariableDefinition::new("Sp", "mm", "Snowpack storage"),
];

/// Parameter names in engine order.
pub fn parameter_names() -> [&'static str; N_PARAMS] {
    std::array::from_fn(|i| HBV_PARAMETERS[i].name)
}

/// State names in engine order.
pub fn state_names() -> [&'static str; N_STATES] {
    std::array::from_fn(|i| HBV_STATES[i].name)
}

/// Look up a parameter or state by name.
pub fn find(name: &str) -> Option<&'static VariableDefinition> {
    HBV_PARAMETERS
        .iter()
        .chain(HBV_STATES.iter())
        .find(|def| def.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_order() {
        assert_eq!(
            parameter_names(),
            ["Imax", "Ce", "Sumax", "Beta", "Pmax", "Tlag", "Kf", "Ks", "FM"]
        );
    }

    #[test]
    fn test_state_order() {
        assert_eq!(state_names(), ["Si", "Su", "Sf", "Ss", "Sp"]);
    }

    #[test]
    fn test_states_are_storages() {
        assert!(HBV_STATES.iter().all(|def| def.unit == "mm"));
    }

    #[test]
    fn test_find() {
        assert_eq!(find("FM").map(|def| def.unit), Some("mm/deg/d"));
        assert_eq!(find("Sp").map(|def| def.unit), Some("mm"));
        assert!(find("Q").is_none());
    }
}
