//! Application definition.

#![allow(dead_code)]
#![allow(unused)]

extern crate simplelog;

use std::path::PathBuf;

use anyhow::{Error, Result};
use clap::{App, Arg, ArgMatches};

use wavelab::{ExecutionMode, Registry};

pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &'static str = env!("CARGO_PKG_AUTHORS");

pub fn app<'a, 'b>() -> App<'a, 'b> {
    App::new("wavelab")
        .version(VERSION)
        .author(AUTHORS)
        .about("Run predefined wifi simulation experiments from the command line.")
        .arg(Arg::with_name("config")
            .value_name("config")
            .required_unless("list")
            .help("Id of the experiment configuration to run"))
        .arg(Arg::with_name("list")
            .display_order(0)
            .long("list")
            .short("l")
            .conflicts_with("config")
            .help("List the registered experiment configurations"))
        .arg(Arg::with_name("dry-run")
            .display_order(1)
            .long("dry-run")
            .short("n")
            .help("Print the synthesized command without executing it"))
        .arg(Arg::with_name("program")
            .long("program")
            .short("p")
            .takes_value(true)
            .value_name("path")
            .help("Override the simulator executable"))
        .arg(Arg::with_name("manifest")
            .long("manifest")
            .short("m")
            .takes_value(true)
            .value_name("path")
            .help("Merge experiment definitions from a toml manifest"))
        .arg(Arg::with_name("verbosity")
            .long("verbosity")
            .short("v")
            .takes_value(true)
            .default_value("info")
            .value_name("verb")
            .help("Set the verbosity of the log output"))
}

pub fn app_matches() -> ArgMatches<'static> {
    app().get_matches()
}

/// Runs based on the parsed arguments.
pub fn start(matches: ArgMatches) -> Result<()> {
    setup_log_verbosity(&matches);

    let registry = assemble_registry(&matches)?;

    if matches.is_present("list") {
        print_configurations(&registry);
        return Ok(());
    }

    let id_str = matches
        .value_of("config")
        .ok_or(Error::msg("configuration id must be provided"))?;
    let id: u32 = id_str.parse().map_err(|_| {
        Error::msg(format!(
            "configuration id is not a non-negative integer: {}",
            id_str
        ))
    })?;

    let entry = registry.resolve(id)?;
    let program = matches
        .value_of("program")
        .unwrap_or(wavelab::DEFAULT_SIM_PROGRAM);

    let command_line = wavelab::command::build(program, &entry.params);
    println!("command: {}", command_line);

    if matches.is_present("dry-run") {
        return Ok(());
    }

    info!("dispatching configuration {} in {:?} mode", id, entry.mode);
    let result = wavelab::exec::run_command(&command_line, entry.mode)?;

    match entry.mode {
        ExecutionMode::Checked => {
            println!(
                "test duration: {} ms",
                result.duration_millis.unwrap_or(0)
            );
            match result.exit_code {
                Some(0) => (),
                Some(code) => println!("simulator exited with status {}", code),
                None => println!("simulator was terminated by a signal"),
            }
        }
        ExecutionMode::FireAndForget => {
            println!("simulator launched, not waiting for completion");
        }
    }

    Ok(())
}

/// Builds the registry the invocation will resolve against: the built-in
/// table, extended from a manifest when one was passed. Validation runs
/// here so a broken table fails before any dispatch.
fn assemble_registry(matches: &ArgMatches) -> Result<Registry> {
    let mut registry = Registry::builtin();
    match matches.value_of("manifest") {
        Some(manifest_path) => registry.apply_manifest_at(PathBuf::from(manifest_path))?,
        None => {
            // no explicit manifest, pick one up from the working
            // directory when present
            let default_path = PathBuf::from(wavelab::MANIFEST_FILE);
            if default_path.is_file() {
                debug!(
                    "merging manifest found at: {}",
                    default_path.to_string_lossy()
                );
                registry.apply_manifest_at(default_path)?;
            }
        }
    }
    registry.validate()?;
    Ok(registry)
}

fn print_configurations(registry: &Registry) {
    println!("registered configurations:");
    for entry in registry.entries() {
        let mode = match entry.mode {
            ExecutionMode::Checked => "checked",
            ExecutionMode::FireAndForget => "fire-and-forget",
        };
        println!(
            "   {:>3}  {:<16} {}",
            entry.id,
            mode,
            entry.summary.as_deref().unwrap_or("")
        );
    }
}

fn setup_log_verbosity(matches: &ArgMatches) {
    use self::simplelog::{Config, LevelFilter, TermLogger};
    let level_filter = match matches.value_of("verbosity") {
        Some(s) => match s {
            "0" | "none" => LevelFilter::Off,
            "1" | "err" | "error" | "min" => LevelFilter::Error,
            "2" | "warn" | "warning" | "default" => LevelFilter::Warn,
            "3" | "info" => LevelFilter::Info,
            "4" | "debug" => LevelFilter::Debug,
            "5" | "trace" | "max" | "all" => LevelFilter::Trace,
            _ => LevelFilter::Warn,
        },
        _ => LevelFilter::Warn,
    };
    let mut config_builder = simplelog::ConfigBuilder::new();
    let logger_conf = config_builder
        .set_time_level(LevelFilter::Error)
        .set_target_level(LevelFilter::Debug)
        .set_location_level(LevelFilter::Error)
        .set_time_format_str("%H:%M:%S%.6f")
        .build();
    TermLogger::init(level_filter, logger_conf, simplelog::TerminalMode::Mixed);
}
