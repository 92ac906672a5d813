use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use file_downloader::{Config, DownloadRecord, PartialDownloads, Session};
use log::{info, warn};
use size::Size;
use tokio::sync::watch;

const USAGE: &str = "usage: file-downloader list | status | get <name> [single|stream|parts] [output]";

#[derive(Debug, Clone, Copy)]
enum Strategy {
    Single,
    Stream,
    Parts,
}

impl TryFrom<&str> for Strategy {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "single" => Ok(Strategy::Single),
            "stream" => Ok(Strategy::Stream),
            "parts" => Ok(Strategy::Parts),
            other => Err(anyhow!("unknown strategy {}", other)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = Config::from_env().context("invalid FILE_DOWNLOADER_SERVER")?;
    let session = Session::new(config);

    match args.first().map(String::as_str) {
        Some("list") => list(&session).await,
        Some("status") => {
            println!("{}", session.usage_quota().await?);
            Ok(())
        }
        Some("get") => {
            let name = args.get(1).ok_or_else(|| anyhow!("file name must be provided"))?;
            let strategy = match args.get(2) {
                Some(strategy) => Strategy::try_from(strategy.as_str())?,
                None => Strategy::Parts,
            };
            let output = args.get(3).map_or_else(|| PathBuf::from(name), PathBuf::from);
            get(&session, name, strategy, output).await
        }
        _ => bail!(USAGE),
    }
}

async fn list(session: &Session) -> Result<()> {
    let (files, status) = tokio::try_join!(session.list_files(), session.usage_quota())?;
    for file in files {
        println!(
            "{}\t{}\t{}",
            file.name,
            Size::from_bytes(file.size),
            file.modified.format("%Y-%m-%d %H:%M")
        );
    }
    println!("{}", status);
    Ok(())
}

async fn get(session: &Session, name: &str, strategy: Strategy, output: PathBuf) -> Result<()> {
    let files = session.list_files().await.context("failed to fetch file list")?;
    let file = files
        .into_iter()
        .find(|file| file.name == name)
        .ok_or_else(|| anyhow!("server has no file named {}", name))?;

    let reporter = tokio::spawn(report_progress(session.registry().subscribe()));
    let stopper = {
        let session = session.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("stopping downloads...");
                session.stop_downloads();
            }
        })
    };

    info!("downloading {} ({:?})", file.name, strategy);
    let result = match strategy {
        Strategy::Single => session.fetch_single_shot(&file).await,
        Strategy::Stream => {
            let partial = PartialDownloads::for_file(&file.name);
            session.fetch_with_progress(&file, partial).await
        }
        Strategy::Parts => session.fetch_multi_part(&file).await,
    };
    stopper.abort();
    session.registry().flush().await;
    reporter.abort();

    let data = result.with_context(|| format!("failed to download {}", file.name))?;
    if (data.len() as u64) < file.size {
        warn!("keeping partial download of {}", file.name);
    }
    tokio::fs::write(&output, &data)
        .await
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!("saved {} to {}", Size::from_bytes(data.len()), output.display());

    session.reset().await;
    Ok(())
}

async fn report_progress(mut rx: watch::Receiver<Vec<DownloadRecord>>) {
    while rx.changed().await.is_ok() {
        let records = rx.borrow_and_update().clone();
        for record in records {
            if record.is_complete() {
                info!("{} done", record.name);
            } else {
                info!("{} {:.0}%", record.name, record.progress * 100.0);
            }
        }
    }
}
