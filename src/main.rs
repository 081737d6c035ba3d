use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match vitalmape_lib::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("vitalmape: {e}");
            ExitCode::FAILURE
        }
    }
}
