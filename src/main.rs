#[tokio::main]
async fn main() {
    if let Err(e) = authmock::run().await {
        eprintln!("{:?}", e);
        std::process::exit(1);
    }
}
