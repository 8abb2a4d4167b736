#[tokio::main]
async fn main() {
    if let Err(err) = sshops::mcp::server::run_stdio().await {
        eprintln!("sshops: {}", err);
        std::process::exit(1);
    }
}
