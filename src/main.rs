mod keeper;
mod route;
mod view;

use anyhow::{anyhow, Result};
use axum::{routing, Router};
use camino::{Utf8Path, Utf8PathBuf};
use notify::{RecursiveMode, Watcher};
use postindex_lib::SiteLayout;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Watches the directory holding the index, creating it if no build has
/// run yet.
fn watch_artifact(watcher: &mut impl Watcher, artifact: &Utf8Path) -> Result<()> {
    let dir = artifact
        .parent()
        .ok_or_else(|| anyhow!("{artifact} has no parent directory"))?;
    std::fs::create_dir_all(dir)?;
    watcher.watch(dir.as_std_path(), RecursiveMode::NonRecursive)?;
    Ok(())
}

async fn run() -> Result<()> {
    let mut args = std::env::args();
    let port = args
        .nth(1)
        .ok_or_else(|| anyhow!("Expected a port number as a first argument"))?;
    if let Some(wd) = args.next() {
        std::env::set_current_dir(wd)?;
    }

    let current_dir = std::env::current_dir()?;
    let current_dir = Utf8PathBuf::try_from(current_dir)?;

    let artifact = SiteLayout::new(&current_dir).artifact_path();

    let index = keeper::ArcMutex::new(keeper::Keeper::new(&artifact));

    let mut watcher = notify::recommended_watcher(index.clone())?;

    if let Err(err) = watch_artifact(&mut watcher, &artifact) {
        warn!("Not watching {artifact} for changes: {err}");
    }

    let app = Router::new()
        .route("/posts", routing::get(route::post_list::get))
        .route("/posts/latest", routing::get(route::post_list::latest))
        .route("/post", routing::get(route::post_single::get))
        .route("/tags", routing::get(route::collate_tags::get))
        .with_state(index);

    let socket_addr_string = format!("0.0.0.0:{port}");
    info!("Binding to {socket_addr_string}");
    axum::Server::bind(&socket_addr_string.parse()?)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = run().await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
