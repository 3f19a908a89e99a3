use crate::infra::InMemoryAttendanceStore;
use crate::server;
use attendance_geofence::config::AppConfig;
use attendance_geofence::error::AppError;
use attendance_geofence::geofence::{render_verdict, EmployeeId, GeofenceEvaluator};
use attendance_geofence::roster::EmployeeRosterImporter;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "Attendance Geofence",
    about = "Validate field employee attendance against their assigned work area",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Evaluate a single location against a roster without starting the server
    Check(CheckArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the employee roster CSV
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Employee roster CSV
    #[arg(long)]
    pub(crate) roster: PathBuf,
    /// Employee identifier as it appears in the roster
    #[arg(long)]
    pub(crate) employee: String,
    /// Reported latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) lat: f64,
    /// Reported longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) lon: f64,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Check(args) => run_check(args),
    }
}

fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let employees = EmployeeRosterImporter::from_path(&args.roster)?;
    let store = Arc::new(InMemoryAttendanceStore::seeded(employees));
    let evaluator = GeofenceEvaluator::new(store, config.geofence);

    let employee_id = EmployeeId::new(args.employee);
    let verdict = evaluator.evaluate(&employee_id, args.lat, args.lon);
    let display_name = verdict
        .employee_name
        .clone()
        .unwrap_or_else(|| employee_id.to_string());

    println!("{}", render_verdict(&verdict, &display_name));
    println!();
    println!("reason code     : {}", verdict.reason_code);
    println!("within area     : {}", verdict.is_within_area);
    println!("distance (m)    : {}", verdict.distance_meters);
    println!("allowed (m)     : {}", verdict.allowed_radius_meters);
    if let Some(source) = verdict.distance_source {
        println!("distance source : {source:?}");
    }
    if verdict.outside_advisory_region {
        println!("note            : location is outside the advisory region");
    }

    Ok(())
}
