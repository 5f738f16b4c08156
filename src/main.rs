use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match event_management::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Fatal: {}", e);
            eprintln!("event-management failed to start: {}", e);
            ExitCode::FAILURE
        }
    }
}
