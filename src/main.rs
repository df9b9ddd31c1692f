#[tokio::main]
async fn main() {
    if let Err(e) = signet::run().await {
        eprintln!("{:?}", e);
        std::process::exit(1);
    }
}
