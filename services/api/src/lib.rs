mod cli;
mod infra;
mod routes;
mod server;

use attendance_geofence::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
