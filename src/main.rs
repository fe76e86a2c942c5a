use std::{path::PathBuf, process};

use clap::{Parser, Subcommand};
use dnacalib::commands::Command;
use dnacalib::logging::{LogLevel, ResultExt, init_logging};
use dnacalib::plan::load_plan;
use dnacalib::report::{RigReport, Severity, analyze_rig};
use dnacalib::rig_file::{load_rig, save_rig};

/// Calibrate DNA rigs with JSON command plans
#[derive(Parser)]
#[command(name = "dnacalib")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log verbosity written to stderr
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a rig summary and its validation issues
    Analyze {
        /// Rig JSON file
        rig: PathBuf,
    },
    /// Run a calibration plan on a rig and write the result
    Apply {
        /// Rig JSON file
        rig: PathBuf,
        /// Calibration plan JSON file
        plan: PathBuf,
        /// Where to write the calibrated rig
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level);
    if let Err(err) = run(cli.command) {
        eprintln!("{err:#}");
        process::exit(1);
    }
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Analyze { rig } => {
            let rig = load_rig(&rig)?;
            print_report(&analyze_rig(&rig));
        }
        Commands::Apply { rig, plan, output } => {
            let mut dna = load_rig(&rig)?;
            let plan = load_plan(&plan)?;
            plan.to_sequence()
                .run(&mut dna)
                .log_error(Some("calibration plan aborted"))?;
            save_rig(&output, &dna)?;
            println!("Applied {} steps -> {}", plan.steps.len(), output.display());
            print_report(&analyze_rig(&dna));
        }
    }
    Ok(())
}

fn print_report(report: &RigReport) {
    println!("Rig: {}", report.name);
    println!(
        "Units: {:?} / {:?}, LODs: {}",
        report.translation_unit, report.rotation_unit, report.lod_count
    );
    println!(
        "Joints: {}, Joint groups: {}, Blend shapes: {}",
        report.joint_count, report.joint_group_count, report.blend_shape_channel_count
    );
    println!(
        "Meshes: {}, Vertices: {}, Blend-shape targets: {}",
        report.mesh_count, report.total_vertices, report.total_blend_shape_targets
    );
    for issue in &report.issues {
        let tag = match issue.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN",
            Severity::Info => "INFO",
        };
        println!("[{}] {}: {}", tag, issue.code, issue.message);
    }
}
