//! Simulation parameter definitions.

use crate::error::{Error, Result};

/// Channel widths accepted by the wifi phy, in MHz.
pub const CHANNEL_WIDTHS: [u32; 4] = [20, 40, 80, 160];

/// Guard interval used by the wifi phy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuardInterval {
    Long,
    Short,
}

impl Default for GuardInterval {
    fn default() -> Self {
        GuardInterval::Long
    }
}

impl GuardInterval {
    /// Numeric form used on the simulator command line.
    pub fn as_flag(&self) -> u32 {
        match self {
            GuardInterval::Long => 0,
            GuardInterval::Short => 1,
        }
    }
}

/// Fully-specified set of simulation parameters.
///
/// Every field carries a usable default, so a configuration only has to
/// override the fields it cares about and any subset of overrides yields
/// a well-formed set. Values are never mutated after registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSet {
    /// Number of stations per access point.
    pub stations: u32,
    /// Simulated time in seconds.
    pub simulation_time: u32,
    /// Modulation and coding scheme index.
    pub mcs: u32,
    /// Channel width in MHz.
    pub channel_width: u32,
    /// Guard interval setting.
    pub guard_interval: GuardInterval,
    /// Number of access points.
    pub access_points: u32,
    /// Distance in meters between station and access point.
    pub distance: f64,
    /// Random number seed handed to the simulator, if any.
    pub seed: Option<u32>,
    /// Use UDP traffic if true, TCP otherwise. Unset leaves the
    /// simulator's own default in place.
    pub udp: Option<bool>,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            stations: 1,
            simulation_time: 1,
            mcs: 0,
            channel_width: 20,
            guard_interval: GuardInterval::Long,
            access_points: 1,
            distance: 1.0,
            seed: None,
            udp: None,
        }
    }
}

impl ParameterSet {
    /// Checks every field against its validity constraint.
    ///
    /// A failure here is a defect in the configuration table, which is
    /// why registries run this when they are assembled rather than at
    /// dispatch time.
    pub fn validate(&self) -> Result<()> {
        if self.stations < 1 {
            return Err(Error::InvalidParameter(
                "station count must be at least 1".to_string(),
            ));
        }
        if self.simulation_time < 1 {
            return Err(Error::InvalidParameter(
                "simulation time must be at least 1 second".to_string(),
            ));
        }
        if !CHANNEL_WIDTHS.contains(&self.channel_width) {
            return Err(Error::InvalidParameter(format!(
                "channel width must be one of {:?} MHz, got {}",
                CHANNEL_WIDTHS, self.channel_width
            )));
        }
        if self.access_points < 1 {
            return Err(Error::InvalidParameter(
                "access point count must be at least 1".to_string(),
            ));
        }
        if self.distance <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "distance must be greater than zero, got {}",
                self.distance
            )));
        }
        Ok(())
    }
}

#[test]
fn default_set_is_valid() {
    assert!(ParameterSet::default().validate().is_ok());
}

#[test]
fn zero_stations_is_invalid() {
    let params = ParameterSet {
        stations: 0,
        ..ParameterSet::default()
    };
    match params.validate() {
        Err(Error::InvalidParameter(_)) => (),
        other => panic!("expected invalid parameter, got {:?}", other),
    }
}

#[test]
fn unsupported_channel_width_is_invalid() {
    let params = ParameterSet {
        channel_width: 25,
        ..ParameterSet::default()
    };
    assert!(params.validate().is_err());
}

#[test]
fn nonpositive_distance_is_invalid() {
    let params = ParameterSet {
        distance: 0.0,
        ..ParameterSet::default()
    };
    assert!(params.validate().is_err());
}

#[test]
fn zero_simulation_time_is_invalid() {
    let params = ParameterSet {
        simulation_time: 0,
        ..ParameterSet::default()
    };
    assert!(params.validate().is_err());
}
