use std::path::{Path, PathBuf};

use chrono::Local;
use tokio::{fs, io::AsyncWriteExt};

use crate::community::Community;
use crate::request::Source;
use crate::{info_time, warn_time, Error, Result};

/// What happened to a single raw file during a run.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Downloaded and written, `bytes` long.
    Fetched { bytes: usize },
    /// Already on disk, nothing requested.
    Skipped,
    /// Transport, status or write failure. The run went on regardless.
    Failed { url: String, reason: Error },
}

#[derive(Debug)]
pub struct FileReport {
    pub community: Community,
    pub file_name: String,
    pub outcome: FetchOutcome,
}

/// One report per candidate file, in the order they were tried.
#[derive(Debug, Default)]
pub struct FetchSummary {
    pub reports: Vec<FileReport>,
}

impl FetchSummary {
    pub fn fetched(&self) -> usize {
        self.count(|o| matches!(o, FetchOutcome::Fetched { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FetchOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FetchOutcome::Failed { .. }))
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, FetchOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&FetchOutcome) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Fetches both raw files of every community into `raw_dir`, one at a time.
///
/// Files that already exist are skipped without a request, so running this
/// twice only fetches what failed the first time. A failing file is logged
/// and recorded in the summary; only failing to create `raw_dir` aborts.
/// Community 48 is expected to fail, it was never archived.
pub async fn fetch_all<S: Source>(source: &S, raw_dir: impl AsRef<Path>) -> Result<FetchSummary> {
    let raw_dir = raw_dir.as_ref();
    let start_time = Local::now();

    fs::create_dir_all(raw_dir)
        .await
        .map_err(|source| Error::CreateDir {
            path: raw_dir.to_path_buf(),
            source,
        })?;

    info_time!("Started fetching into {}", raw_dir.display());

    let mut summary = FetchSummary::default();
    for community in Community::all() {
        for file_name in community.raw_files() {
            let outcome = fetch_file(source, raw_dir, &file_name).await;
            if let FetchOutcome::Failed { url, reason } = &outcome {
                warn_time!("failed to retrieve {url}: {reason}");
            }
            summary.reports.push(FileReport {
                community,
                file_name,
                outcome,
            });
        }
        info_time!("Community {community}/{}", Community::RANGE.end());
    }

    info_time!(
        start_time,
        "DONE: {} fetched, {} already present, {} failed",
        summary.fetched(),
        summary.skipped(),
        summary.failed()
    );
    Ok(summary)
}

async fn fetch_file<S: Source>(source: &S, raw_dir: &Path, file_name: &str) -> FetchOutcome {
    let path = raw_dir.join(file_name);
    if is_file(&path).await {
        return FetchOutcome::Skipped;
    }

    let res = async {
        let body = source.fetch(file_name).await?;
        write_atomic(&path, &body).await?;
        Ok::<_, Error>(body.len())
    }
    .await;

    match res {
        Ok(bytes) => FetchOutcome::Fetched { bytes },
        Err(reason) => FetchOutcome::Failed {
            url: source.url_for(file_name),
            reason,
        },
    }
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path).await.map(|m| m.is_file()).unwrap_or(false)
}

/// Writes into `<path>.part` and renames it over `path`, so a half written
/// file never counts as fetched. The `.part` file is removed on failure.
async fn write_atomic(path: &Path, body: &[u8]) -> Result<()> {
    let part = part_path(path);
    let res = async {
        let mut file = fs::File::create(&part).await?;
        file.write_all(body).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&part, path).await
    }
    .await;

    if res.is_err() {
        let _ = fs::remove_file(&part).await;
    }
    res.map_err(Error::from)
}

fn part_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}
