#[tokio::main]
async fn main() {
    if let Err(e) = lifesync_lib::run().await {
        eprintln!("lifesync: {e}");
        std::process::exit(1);
    }
}
