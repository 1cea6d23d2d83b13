//! Experiment dispatch and child process execution.

use std::time::Instant;

use crate::command::{self, CommandLine};
use crate::error::{Error, Result};
use crate::registry::{ConfigurationEntry, ExecutionMode};

/// Outcome of a single dispatched experiment.
///
/// Created at dispatch time and consumed immediately by the caller.
/// Nothing is persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Child exit code, captured in checked mode only. Stays `None` when
    /// the child was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Wall-clock duration in milliseconds, checked mode only.
    pub duration_millis: Option<u128>,
    /// Checked mode: the child was spawned, waited for and exited zero.
    /// Fire-and-forget mode: the spawn call itself worked.
    pub succeeded: bool,
}

/// Runs a single resolved configuration under its execution mode.
///
/// Checked mode blocks the calling thread until the child terminates. A
/// nonzero exit status is recorded in the result, not raised as an
/// error; the caller decides its significance. Failure to create the
/// child process at all raises [`Error::SpawnFailure`] in both modes.
///
/// No timeout is imposed here. Bounding execution time is the job of
/// whatever supervises the harness.
///
/// [`Error::SpawnFailure`]: ../error/enum.Error.html
pub fn run(entry: &ConfigurationEntry, program: &str) -> Result<ExecutionResult> {
    let command_line = command::build(program, &entry.params);
    run_command(&command_line, entry.mode)
}

/// Executes an already-built command line under the given mode.
pub fn run_command(command_line: &CommandLine, mode: ExecutionMode) -> Result<ExecutionResult> {
    let mut command = command_line.to_command();
    let start = Instant::now();
    match mode {
        ExecutionMode::Checked => {
            let mut child = command
                .spawn()
                .map_err(|e| Error::SpawnFailure(format!("{}: {}", command_line.program, e)))?;
            let status = child.wait()?;
            let duration_millis = start.elapsed().as_millis();
            debug!(
                "child exited with status {:?} after {} ms",
                status.code(),
                duration_millis
            );
            Ok(ExecutionResult {
                exit_code: status.code(),
                duration_millis: Some(duration_millis),
                succeeded: status.success(),
            })
        }
        ExecutionMode::FireAndForget => {
            let child = command
                .spawn()
                .map_err(|e| Error::SpawnFailure(format!("{}: {}", command_line.program, e)))?;
            debug!("detached child with pid {}", child.id());
            // dropping the handle leaves the child to the OS
            Ok(ExecutionResult {
                exit_code: None,
                duration_millis: None,
                succeeded: true,
            })
        }
    }
}

#[test]
fn checked_zero_exit_succeeds() {
    let command_line = CommandLine {
        program: "true".to_string(),
        args: Vec::new(),
    };
    let result = run_command(&command_line, ExecutionMode::Checked).unwrap();
    assert!(result.succeeded);
    assert_eq!(result.exit_code, Some(0));
    assert!(result.duration_millis.is_some());
}

#[test]
fn checked_nonzero_exit_is_recorded_not_raised() {
    let command_line = CommandLine {
        program: "sh".to_string(),
        args: vec!["-c".to_string(), "exit 3".to_string()],
    };
    let result = run_command(&command_line, ExecutionMode::Checked).unwrap();
    assert!(!result.succeeded);
    assert_eq!(result.exit_code, Some(3));
}

#[test]
fn checked_measures_wall_clock_duration() {
    let command_line = CommandLine {
        program: "sh".to_string(),
        args: vec!["-c".to_string(), "sleep 0.05".to_string()],
    };
    let result = run_command(&command_line, ExecutionMode::Checked).unwrap();
    assert!(result.succeeded);
    let millis = result.duration_millis.unwrap();
    assert!(
        millis >= 40 && millis <= 500,
        "duration out of range: {} ms",
        millis
    );
}

#[test]
fn fire_and_forget_returns_before_child_exits() {
    let launched = Instant::now();
    let command_line = CommandLine {
        program: "sleep".to_string(),
        args: vec!["2".to_string()],
    };
    let result = run_command(&command_line, ExecutionMode::FireAndForget).unwrap();
    assert!(result.succeeded);
    assert_eq!(result.exit_code, None);
    assert_eq!(result.duration_millis, None);
    assert!(launched.elapsed().as_millis() < 1000);
}

#[test]
fn missing_binary_is_spawn_failure() {
    let command_line = CommandLine {
        program: "./does-not-exist-anywhere".to_string(),
        args: Vec::new(),
    };
    match run_command(&command_line, ExecutionMode::Checked) {
        Err(Error::SpawnFailure(_)) => (),
        other => panic!("expected spawn failure, got {:?}", other),
    }
    match run_command(&command_line, ExecutionMode::FireAndForget) {
        Err(Error::SpawnFailure(_)) => (),
        other => panic!("expected spawn failure, got {:?}", other),
    }
}

#[test]
fn run_dispatches_resolved_entry() {
    let registry = crate::registry::Registry::builtin();
    let entry = registry.resolve(0).unwrap();
    // `true` ignores the simulator flags and exits zero
    let result = run(entry, "true").unwrap();
    assert!(result.succeeded);
    assert_eq!(result.exit_code, Some(0));
}
