#[tokio::main]
async fn main() {
    if let Err(e) = brainscan_lib::run().await {
        tracing::error!("Startup failed: {e}");
        eprintln!("brainscan: {e}");
        std::process::exit(1);
    }
}
