#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = songpitch_rust::run().await {
        eprintln!("songpitch-rust fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
