use docroot::config::Config;
use docroot::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load();
    cfg.validate()?;

    if !cfg.static_files.root.is_dir() {
        tracing::warn!(
            root = %cfg.static_files.root.display(),
            "Document root does not exist; every request will get 404"
        );
    }

    tokio::select! {
        res = server::listener::run(&cfg) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
