//! Static registry of experiment configurations, logic for turning
//! deserialized manifest data into registry entries.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use fnv::FnvHashMap;

use crate::error::{Error, Result};
use crate::params::{GuardInterval, ParameterSet};

/// Execution contract for a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionMode {
    /// Wait for the child process, check its exit status and measure
    /// wall-clock duration.
    Checked,
    /// Issue the command and return without waiting for the child.
    FireAndForget,
}

impl Default for ExecutionMode {
    fn default() -> Self {
        ExecutionMode::Checked
    }
}

/// Single registered experiment: an id bound to a parameter set and an
/// execution mode.
///
/// The mode is an explicit per-entry field. It is never inferred from
/// the id value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationEntry {
    pub id: u32,
    pub params: ParameterSet,
    pub mode: ExecutionMode,
    /// Optional one-line description shown by listings.
    #[serde(default)]
    pub summary: Option<String>,
}

/// Read-only map of experiment configurations.
///
/// The registry is assembled once at startup, optionally extended from
/// a toml manifest, and only read through [`resolve`] afterwards. There
/// is no runtime mutation surface, so it can be shared across threads
/// without synchronization.
///
/// [`resolve`]: struct.Registry.html#method.resolve
#[derive(Debug, Clone)]
pub struct Registry {
    entries: FnvHashMap<u32, ConfigurationEntry>,
}

impl Registry {
    /// Creates a registry holding the built-in configuration table.
    pub fn builtin() -> Registry {
        let mut registry = Registry {
            entries: FnvHashMap::default(),
        };
        registry.insert(ConfigurationEntry {
            id: 0,
            params: ParameterSet {
                stations: 1,
                simulation_time: 2,
                ..ParameterSet::default()
            },
            mode: ExecutionMode::Checked,
            summary: Some("single station smoke run".to_string()),
        });
        registry.insert(ConfigurationEntry {
            id: 1,
            params: ParameterSet {
                stations: 1,
                mcs: 7,
                ..ParameterSet::default()
            },
            mode: ExecutionMode::Checked,
            summary: Some("single station at mcs 7".to_string()),
        });
        registry
    }

    fn insert(&mut self, entry: ConfigurationEntry) {
        self.entries.insert(entry.id, entry);
    }

    /// Looks up a configuration by id.
    pub fn resolve(&self, id: u32) -> Result<&ConfigurationEntry> {
        self.entries.get(&id).ok_or(Error::UnknownConfiguration(id))
    }

    /// Validates every registered entry, failing on the first bad one.
    pub fn validate(&self) -> Result<()> {
        for entry in self.entries.values() {
            entry
                .params
                .validate()
                .map_err(|e| name_configuration(entry.id, e))?;
        }
        Ok(())
    }

    /// Merges entries from a toml manifest string into the registry.
    ///
    /// A manifest entry reusing an already registered id replaces it.
    /// Every merged entry is validated right away, so a broken manifest
    /// fails before anything is dispatched.
    pub fn apply_manifest_str(&mut self, manifest_str: &str) -> Result<()> {
        let manifest: ExperimentManifest = toml::from_str(manifest_str)?;
        for (key, def) in manifest.experiment {
            let id: u32 = key.parse().map_err(|_| {
                Error::ManifestError(format!("experiment id is not an integer: {}", key))
            })?;
            let entry = def.into_entry(id);
            entry
                .params
                .validate()
                .map_err(|e| name_configuration(id, e))?;
            debug!("merging manifest entry for configuration {}", id);
            self.insert(entry);
        }
        Ok(())
    }

    /// Merges entries from a toml manifest file into the registry.
    pub fn apply_manifest_at<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let content = fs::read_to_string(path)?;
        self.apply_manifest_str(&content)
    }

    /// All entries in ascending id order.
    pub fn entries(&self) -> Vec<&ConfigurationEntry> {
        let mut list: Vec<&ConfigurationEntry> = self.entries.values().collect();
        list.sort_by_key(|entry| entry.id);
        list
    }
}

// prefixes a validation failure with the configuration it came from
fn name_configuration(id: u32, e: Error) -> Error {
    match e {
        Error::InvalidParameter(msg) => {
            Error::InvalidParameter(format!("configuration {}: {}", id, msg))
        }
        other => other,
    }
}

/// Deserialization target for the experiments manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentManifest {
    #[serde(default)]
    pub experiment: HashMap<String, ExperimentDef>,
}

/// Single experiment definition as written in a manifest. Parameter
/// fields are all optional and fall back to the crate defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentDef {
    pub summary: Option<String>,
    pub mode: ExecutionMode,
    pub stations: Option<u32>,
    pub simulation_time: Option<u32>,
    pub mcs: Option<u32>,
    pub channel_width: Option<u32>,
    pub guard_interval: Option<GuardInterval>,
    pub access_points: Option<u32>,
    pub distance: Option<f64>,
    pub seed: Option<u32>,
    pub udp: Option<bool>,
}

impl ExperimentDef {
    fn into_entry(self, id: u32) -> ConfigurationEntry {
        let defaults = ParameterSet::default();
        ConfigurationEntry {
            id,
            params: ParameterSet {
                stations: self.stations.unwrap_or(defaults.stations),
                simulation_time: self.simulation_time.unwrap_or(defaults.simulation_time),
                mcs: self.mcs.unwrap_or(defaults.mcs),
                channel_width: self.channel_width.unwrap_or(defaults.channel_width),
                guard_interval: self.guard_interval.unwrap_or(defaults.guard_interval),
                access_points: self.access_points.unwrap_or(defaults.access_points),
                distance: self.distance.unwrap_or(defaults.distance),
                seed: self.seed,
                udp: self.udp,
            },
            mode: self.mode,
            summary: self.summary,
        }
    }
}

#[test]
fn resolve_is_deterministic() {
    let registry = Registry::builtin();
    let first = registry.resolve(0).unwrap().clone();
    let second = registry.resolve(0).unwrap().clone();
    assert_eq!(first, second);
}

#[test]
fn unknown_id_never_resolves() {
    let registry = Registry::builtin();
    match registry.resolve(42) {
        Err(Error::UnknownConfiguration(42)) => (),
        other => panic!("expected unknown configuration, got {:?}", other),
    }
}

#[test]
fn builtin_entries_are_valid() {
    let registry = Registry::builtin();
    assert!(registry.validate().is_ok());

    let entry = registry.resolve(0).unwrap();
    assert_eq!(entry.params.stations, 1);
    assert_eq!(entry.params.simulation_time, 2);
    assert_eq!(entry.mode, ExecutionMode::Checked);

    let entry = registry.resolve(1).unwrap();
    assert_eq!(entry.params.stations, 1);
    assert_eq!(entry.params.mcs, 7);
}

#[test]
fn manifest_adds_resolvable_entry() {
    let mut registry = Registry::builtin();
    registry
        .apply_manifest_str(
            r#"
[experiment.2]
summary = "dense cell, short guard interval"
mode = "fire-and-forget"
stations = 24
mcs = 7
guard_interval = "short"
"#,
        )
        .unwrap();

    let entry = registry.resolve(2).unwrap();
    assert_eq!(entry.mode, ExecutionMode::FireAndForget);
    assert_eq!(entry.params.stations, 24);
    assert_eq!(entry.params.mcs, 7);
    assert_eq!(entry.params.guard_interval, GuardInterval::Short);
    // omitted fields fall back to the defaults
    assert_eq!(entry.params.channel_width, 20);
    assert_eq!(entry.params.simulation_time, 1);
}

#[test]
fn manifest_entry_replaces_builtin_with_same_id() {
    let mut registry = Registry::builtin();
    registry
        .apply_manifest_str("[experiment.0]\nstations = 8\n")
        .unwrap();
    let entry = registry.resolve(0).unwrap();
    assert_eq!(entry.params.stations, 8);
    // replaced entry gets the manifest defaults, not the builtin ones
    assert_eq!(entry.params.simulation_time, 1);
}

#[test]
fn manifest_rejects_invalid_parameters() {
    let mut registry = Registry::builtin();
    let result = registry.apply_manifest_str("[experiment.3]\nchannel_width = 25\n");
    match result {
        Err(Error::InvalidParameter(_)) => (),
        other => panic!("expected invalid parameter, got {:?}", other),
    }
}

#[test]
fn manifest_rejects_non_integer_id() {
    let mut registry = Registry::builtin();
    let result = registry.apply_manifest_str("[experiment.alpha]\nstations = 2\n");
    match result {
        Err(Error::ManifestError(_)) => (),
        other => panic!("expected manifest error, got {:?}", other),
    }
}

#[test]
fn entries_are_listed_in_id_order() {
    let mut registry = Registry::builtin();
    registry
        .apply_manifest_str("[experiment.7]\n[experiment.3]\n")
        .unwrap();
    let ids: Vec<u32> = registry.entries().iter().map(|entry| entry.id).collect();
    assert_eq!(ids, vec![0, 1, 3, 7]);
}
