// Action set generator
// Builds an action set for a graph-search planner and prints it as JSON.

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use action_set_generator::common::{
    ActionSetBuilder, ActionSetResult, ConvergenceThresholds, ParameterKind, ParameterSupplier,
    Threshold,
};
use action_set_generator::path_planning::action_set::{
    AnyActionSet, ConsoleParameterSupplier, DifferentialDriveActionSetBuilder,
    DifferentialDriveConfig, DiscreteActionSetBuilder, DiscreteConfig, FixedParameterSupplier,
    RadiusThetaActionSetBuilder, RadiusThetaConfig,
};

#[derive(Parser)]
#[command(
    name = "action_set_generator",
    about = "Generate discrete, radius-theta or differential drive action sets",
    version
)]
struct Cli {
    /// Node-matching position tolerance
    #[arg(long, global = true, default_value_t = 0.5)]
    node_xy: f64,

    /// Node-matching heading tolerance [deg]
    #[arg(long, global = true, default_value_t = 30.0)]
    node_theta: f64,

    /// Goal-matching position tolerance
    #[arg(long, global = true, default_value_t = 1.5)]
    goal_xy: f64,

    /// Goal-matching heading tolerance [deg]
    #[arg(long, global = true, default_value_t = 30.0)]
    goal_theta: f64,

    /// Write the JSON here instead of stdout
    #[arg(long, short, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grid moves in 4 or 8 directions
    Discrete {
        /// Only the 4 cardinal directions
        #[arg(long)]
        no_diagonal: bool,

        /// Step length
        #[arg(long, default_value_t = 1.0)]
        move_amt: f64,
    },

    /// Turn by one of a fan of angles, then travel a fixed distance
    RadiusTheta {
        /// Extra cost of the sharpest turn
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        max_add_turn_cost: f64,

        /// Step size distance (prompted for when no parameter flag is given)
        #[arg(long)]
        dist: Option<i64>,

        /// Angular step [deg]
        #[arg(long)]
        theta: Option<i64>,

        /// Number of branches
        #[arg(long)]
        branches: Option<i64>,
    },

    /// Left/right wheel speed combinations
    DiffDrive {
        /// Wheel speeds as LEFT,RIGHT [rpm] (prompted for when omitted)
        #[arg(long, value_parser = parse_rpm)]
        rpm: Option<(u32, u32)>,
    },
}

fn parse_rpm(s: &str) -> Result<(u32, u32), String> {
    let (left, right) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LEFT,RIGHT but got '{}'", s))?;
    let left = left.trim().parse::<u32>().map_err(|e| e.to_string())?;
    let right = right.trim().parse::<u32>().map_err(|e| e.to_string())?;
    Ok((left, right))
}

fn thresholds(cli: &Cli) -> ConvergenceThresholds {
    ConvergenceThresholds::new(
        Threshold::new(cli.node_xy, cli.node_theta),
        Threshold::new(cli.goal_xy, cli.goal_theta),
    )
}

/// Use preset values when any were given on the command line, otherwise prompt
fn supplier(presets: Option<FixedParameterSupplier>) -> Box<dyn ParameterSupplier> {
    match presets {
        Some(fixed) => Box::new(fixed),
        None => Box::new(ConsoleParameterSupplier::stdio()),
    }
}

fn generate(cli: &Cli) -> ActionSetResult<AnyActionSet> {
    let action_set: AnyActionSet = match &cli.command {
        Commands::Discrete { no_diagonal, move_amt } => {
            let builder = DiscreteActionSetBuilder::new(DiscreteConfig {
                diagonal: !no_diagonal,
                move_amt: *move_amt,
            });
            builder.build_action_set()?.into()
        }
        Commands::RadiusTheta { max_add_turn_cost, dist, theta, branches } => {
            let builder = RadiusThetaActionSetBuilder::new(RadiusThetaConfig {
                thresholds: thresholds(cli),
                max_add_turn_cost: *max_add_turn_cost,
            });
            let presets = if dist.is_some() || theta.is_some() || branches.is_some() {
                let mut fixed = FixedParameterSupplier::new();
                for (kind, value) in [
                    (ParameterKind::Distance, dist),
                    (ParameterKind::Theta, theta),
                    (ParameterKind::Branches, branches),
                ] {
                    if let Some(value) = value {
                        fixed = fixed.with_int(kind, *value);
                    }
                }
                Some(fixed)
            } else {
                None
            };
            builder.build(&mut *supplier(presets))?.into()
        }
        Commands::DiffDrive { rpm } => {
            let builder = DifferentialDriveActionSetBuilder::new(DifferentialDriveConfig {
                thresholds: thresholds(cli),
            });
            let presets = rpm.map(|rpm| {
                FixedParameterSupplier::new().with_pair(ParameterKind::WheelRpm, rpm)
            });
            builder.build(&mut *supplier(presets))?.into()
        }
    };
    Ok(action_set)
}

fn run(cli: &Cli) -> ActionSetResult<()> {
    let action_set = generate(cli)?;
    info!(move_type = ?action_set.move_type(), actions = action_set.len(), "generated action set");

    let json = action_set.to_json()?;
    match &cli.output {
        Some(path) => {
            fs::write(path, json)?;
            info!(path = %path.display(), "action set written");
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
