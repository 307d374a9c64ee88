use addhealth::{info_time, process::fetch_all, request::ArchiveSource, Result, RAW_DIR};
use chrono::Local;

#[tokio::main]
async fn main() -> Result<()> {
    let start_time = Local::now();
    let source = ArchiveSource::new(reqwest::Client::new());

    // Per-file failures are in the summary and already logged, they don't fail the run.
    let summary = fetch_all(&source, RAW_DIR).await?;
    for report in summary.failures() {
        if report.community.is_known_missing() {
            info_time!("{} is not on the archive, as expected", report.file_name);
        }
    }
    info_time!(start_time, "Full program time:");

    Ok(())
}
