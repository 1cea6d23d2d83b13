//! Rendering parameter sets into simulator invocations.

use std::fmt;
use std::process::Command;

use crate::params::{GuardInterval, ParameterSet};

// defaults baked into the simulator itself; matching values are not
// repeated on the command line
const SIM_DEFAULT_MCS: u32 = 0;
const SIM_DEFAULT_CHANNEL_WIDTH: u32 = 20;
const SIM_DEFAULT_DISTANCE: f64 = 1.0;

/// External process invocation: program name plus argument vector.
///
/// Arguments are kept as separate tokens and handed to process creation
/// directly. The shell is never involved, so no quoting or interpolation
/// can change the meaning of an invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Turns the invocation into a spawnable [`std::process::Command`].
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Renders a parameter set into a simulator command line.
///
/// Building is pure: equal parameter sets always produce token-identical
/// invocations. Field order is fixed independently of which fields were
/// overridden. `--stations` and `--simulationTime` are always emitted,
/// the remaining fields only when they differ from what the simulator
/// would assume anyway.
pub fn build(program: &str, params: &ParameterSet) -> CommandLine {
    let mut args = Vec::new();
    args.push(format!("--stations={}", params.stations));
    args.push(format!("--simulationTime={}", params.simulation_time));
    if params.mcs != SIM_DEFAULT_MCS {
        args.push(format!("--mcs={}", params.mcs));
    }
    if params.channel_width != SIM_DEFAULT_CHANNEL_WIDTH {
        args.push(format!("--channelWidth={}", params.channel_width));
    }
    if params.guard_interval != GuardInterval::Long {
        args.push(format!("--gi={}", params.guard_interval.as_flag()));
    }
    if params.access_points > 1 {
        args.push(format!("--aps={}", params.access_points));
    }
    if params.distance != SIM_DEFAULT_DISTANCE {
        args.push(format!("--distance={}", params.distance));
    }
    if let Some(seed) = params.seed {
        args.push(format!("--seed={}", seed));
    }
    if let Some(udp) = params.udp {
        args.push(format!("--udp={}", if udp { 1 } else { 0 }));
    }
    CommandLine {
        program: program.to_string(),
        args,
    }
}

#[test]
fn build_is_deterministic() {
    let params = ParameterSet {
        stations: 3,
        mcs: 5,
        ..ParameterSet::default()
    };
    let first = build("./sim", &params);
    let second = build("./sim", &params);
    assert_eq!(first, second);
}

#[test]
fn differing_params_build_differing_commands() {
    let base = ParameterSet::default();
    let changed = ParameterSet {
        mcs: 3,
        ..base.clone()
    };
    assert_ne!(build("./sim", &base), build("./sim", &changed));
}

#[test]
fn always_emits_stations_and_simulation_time() {
    let command_line = build("./sim", &ParameterSet::default());
    assert_eq!(command_line.args, vec!["--stations=1", "--simulationTime=1"]);
}

#[test]
fn entry_zero_contains_stations_flag() {
    let registry = crate::registry::Registry::builtin();
    let entry = registry.resolve(0).unwrap();
    let command_line = build("./sim", &entry.params);
    assert!(command_line.args.iter().any(|a| a == "--stations=1"));
}

#[test]
fn field_order_is_stable_regardless_of_overrides() {
    let registry = crate::registry::Registry::builtin();
    let entry = registry.resolve(1).unwrap();
    let command_line = build("./sim", &entry.params);
    assert_eq!(
        command_line.args,
        vec!["--stations=1", "--simulationTime=1", "--mcs=7"]
    );
}

#[test]
fn non_default_fields_are_emitted_in_order() {
    let params = ParameterSet {
        stations: 4,
        simulation_time: 10,
        mcs: 9,
        channel_width: 80,
        guard_interval: GuardInterval::Short,
        access_points: 2,
        distance: 2.5,
        seed: Some(7),
        udp: Some(false),
    };
    let command_line = build("./sim", &params);
    assert_eq!(
        command_line.args,
        vec![
            "--stations=4",
            "--simulationTime=10",
            "--mcs=9",
            "--channelWidth=80",
            "--gi=1",
            "--aps=2",
            "--distance=2.5",
            "--seed=7",
            "--udp=0",
        ]
    );
}

#[test]
fn display_joins_tokens_with_spaces() {
    let command_line = build("./build/scratch/quick-vht-wifi", &ParameterSet::default());
    assert_eq!(
        command_line.to_string(),
        "./build/scratch/quick-vht-wifi --stations=1 --simulationTime=1"
    );
}
