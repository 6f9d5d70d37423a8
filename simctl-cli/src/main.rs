mod session;

use std::fs::File;
use std::path::PathBuf;

use simctl_core::api::{load_scenario, Scenario};
use simctl_core::config::{clamp_peers, Config};

use session::Session;

fn init_logging(verbose: bool) {
    use simplelog::*;

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let log_path = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("simctl")
        .join("simctl.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path).or_else(|_| File::create("/tmp/simctl.log")) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Cannot create log file: {}", e);
            return;
        }
    };

    if let Err(e) = WriteLogger::init(log_level, simplelog::Config::default(), log_file) {
        eprintln!("Failed to initialize logger: {}", e);
        return;
    }

    log::info!("simctl starting (log level: {:?})", log_level);
}

fn usage() {
    eprintln!("Usage: simctl [--scenario FILE] [--peers N] [--verbose]");
}

fn main() -> std::io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        usage();
        return Ok(());
    }
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    init_logging(verbose);

    let config = Config::load();

    let scenario_path = args
        .iter()
        .position(|a| a == "--scenario")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from);

    let peers = peer_count(&args, &config);

    let scenario = match scenario_path {
        Some(path) => match load_scenario(&path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Failed to load scenario {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => demo_scenario(),
    };

    let mut session = Session::new(&config, &scenario, peers);
    let applied = session.run(&scenario);
    log::info!("Applied {} of {} scenario steps", applied, scenario.steps.len());

    let report = session.report();
    print!("{}", report);

    if !report.converged() {
        log::error!("Clients diverged from master");
        std::process::exit(2);
    }
    Ok(())
}

/// `--peers N` if given and numeric, else the configured count; always clamped.
fn peer_count(args: &[String], config: &Config) -> usize {
    args.iter()
        .position(|a| a == "--peers")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.trim().parse().ok())
        .map(clamp_peers)
        .unwrap_or_else(|| config.peers())
}

/// Scenario used when no file is given.
fn demo_scenario() -> Scenario {
    use simctl_core::api::ControlRequest;
    use simctl_types::ControlAction;

    Scenario {
        steps: vec![
            ControlRequest {
                uid: "cone-1".into(),
                actions: vec![ControlAction::state("upright")],
            },
            ControlRequest {
                uid: "cone-2".into(),
                actions: vec![
                    ControlAction::state("upright"),
                    ControlAction::new("flash", "amber"),
                    ControlAction::state("knocked_over"),
                ],
            },
            ControlRequest {
                uid: "cone-1".into(),
                actions: vec![ControlAction::state("moved")],
            },
        ],
    }
}
