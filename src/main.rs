#[tokio::main]
async fn main() {
    if let Err(e) = remedi::run().await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
