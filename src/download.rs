//! the download/resize phase
use {
    crate::{
        bucket::SelectedBucket,
        client::BooruClient,
        config::RunConfig,
        error::Result,
        models::PostRecord,
    },
    image::{GenericImageView, ImageFormat, imageops::FilterType},
    indicatif::{ProgressBar, ProgressStyle},
    std::{io::Cursor, sync::Arc, time::Duration},
    tokio::sync::Semaphore,
    tracing::{debug, info, warn},
};

/// resampling filter for the non-aspect-preserving resize
const RESIZE_FILTER: FilterType = FilterType::Lanczos3;

/// per-item tally of the download phase
#[derive(Debug, Default, PartialEq)]
pub struct DownloadReport {
    /// items written successfully
    pub succeeded: usize,
    /// items that failed to download, decode, or write
    pub failed: usize,
}

/// derive the output basename from the url's last path segment, extension
/// dropped
pub fn output_basename(source_url: &str) -> String {
    let segment = source_url.rsplit('/').next().unwrap_or(source_url);
    match segment.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => segment.to_string(),
    }
}

/// build the one-line caption for a record
///
/// trigger tags, then character tags, then general tags, joined with
/// `", "`. nothing is deduplicated.
pub fn caption_line(trigger_tags: &[String], record: &PostRecord) -> String {
    trigger_tags
        .iter()
        .chain(record.character_tags.iter())
        .chain(record.general_tags.iter())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// decode image bytes and re-encode them as png, resized to the target
/// resolution unless resizing is disabled
///
/// the resize is exact: images are stretched to the target, not fitted.
fn process_image(bytes: &[u8], target: (u32, u32), no_resize: bool) -> Result<Vec<u8>> {
    let img = image::load_from_memory(bytes)?;
    let img = if no_resize || img.dimensions() == target {
        img
    } else {
        img.resize_exact(target.0, target.1, RESIZE_FILTER)
    };

    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// writes one record's image + caption pair into the output directory
pub struct ItemWriter<'a> {
    /// run parameters, shared immutably across workers
    config: &'a RunConfig,
    /// common output resolution for the whole bucket
    target: (u32, u32),
}

impl<'a> ItemWriter<'a> {
    /// make a writer for the selected bucket's target resolution
    pub fn new(config: &'a RunConfig, target: (u32, u32)) -> Self {
        Self { config, target }
    }

    /// process downloaded bytes and write `<basename>.png` and
    /// `<basename>.txt`, overwriting existing files
    pub async fn write(&self, record: &PostRecord, bytes: &[u8]) -> Result<()> {
        let basename = output_basename(&record.source_url);
        let image_path = self.config.output_directory.join(format!("{basename}.png"));
        let caption_path = self.config.output_directory.join(format!("{basename}.txt"));

        let encoded = process_image(bytes, self.target, self.config.no_resize)?;
        tokio::fs::write(&image_path, encoded).await?;

        let mut caption = caption_line(&self.config.trigger_tags, record);
        caption.push('\n');
        tokio::fs::write(&caption_path, caption).await?;

        debug!(path = %image_path.display(), "wrote image/caption pair");
        Ok(())
    }
}

/// one bar for the whole phase, advancing as items finish
fn phase_progress(len: u64) -> ProgressBar {
    let style = ProgressStyle::with_template(
        "{spinner:.cyan} [{wide_bar:.cyan/blue}] {pos}/{len} {msg}",
    )
    .expect("static progress template is valid")
    .progress_chars("━╸─");

    let pb = ProgressBar::new(len);
    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// download every record of the selected bucket with bounded parallelism
///
/// items are independent and complete in no particular order; the only
/// shared state is the immutable configuration and target resolution. a
/// failed item is logged with its url and counted instead of aborting the
/// phase.
pub async fn download_bucket(
    client: &BooruClient,
    config: &RunConfig,
    bucket: &SelectedBucket,
) -> Result<DownloadReport> {
    tokio::fs::create_dir_all(&config.output_directory).await?;

    let writer = ItemWriter::new(config, (bucket.target_width, bucket.target_height));
    let semaphore = Arc::new(Semaphore::new(config.jobs));
    let progress = phase_progress(bucket.records.len() as u64);

    let tasks: Vec<_> = bucket
        .records
        .iter()
        .map(|record| {
            let semaphore = semaphore.clone();
            let progress = progress.clone();
            let writer = &writer;
            async move {
                let _permit = semaphore
                    .acquire()
                    .await
                    .expect("semaphore is never closed");

                debug!(url = %record.source_url, "downloading");
                let result = match client.fetch_bytes(&record.source_url).await {
                    Ok(bytes) => writer.write(record, &bytes).await,
                    Err(e) => Err(e),
                };

                progress.inc(1);
                if let Err(e) = &result {
                    warn!(url = %record.source_url, error = %e, "item failed");
                }
                result.is_ok()
            }
        })
        .collect();

    let outcomes = futures::future::join_all(tasks).await;
    progress.finish_and_clear();

    let succeeded = outcomes.iter().filter(|ok| **ok).count();
    let report = DownloadReport {
        succeeded,
        failed: outcomes.len() - succeeded,
    };
    info!(
        succeeded = report.succeeded,
        failed = report.failed,
        "download phase finished"
    );
    Ok(report)
}
