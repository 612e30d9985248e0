use anyhow::Result;
use camino::Utf8PathBuf;
use postindex_lib::{
    build::{self, BuildSummary},
    timestamp::GitHistory,
    SiteLayout,
};
use tracing_subscriber::EnvFilter;

fn summary_line(summary: &BuildSummary) -> String {
    format!(
        "Generated {} with {} posts.",
        summary.artifact, summary.count
    )
}

fn run() -> Result<()> {
    let mut args = std::env::args();
    if let Some(wd) = args.nth(1) {
        std::env::set_current_dir(wd)?;
    }

    let current_dir: Utf8PathBuf = std::env::current_dir()?.try_into()?;

    let layout = SiteLayout::new(&current_dir);
    let summary = build::run(&layout, GitHistory::new(&current_dir))?;

    println!("{}", summary_line(&summary));

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
