#[tokio::main]
async fn main() {
    if let Err(e) = simbora_backend::run().await {
        eprintln!("simbora_backend failed to start: {}", e);
        std::process::exit(1);
    }
}
