use pomdp_datasets::{Config, Dataset, prepare_dataset};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let dataset = Dataset::cassandra();
    match prepare_dataset(&Config::default(), &dataset).await {
        Ok(report) => {
            tracing::info!(directory = ?report.directory, "done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(
                dataset = %dataset.name,
                code = e.error_code(),
                error = %e,
                "dataset preparation failed"
            );
            if e.is_network() {
                tracing::error!("the dataset link may be broken; check {}", dataset.base_url);
            }
            ExitCode::FAILURE
        }
    }
}
