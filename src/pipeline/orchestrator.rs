// Document processing: rasterize pages in order -> parallel filtering -> ordered images

use image::RgbImage;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::settings::{DEFAULT_RENDER_SCALE, Settings};
use crate::error::UnmarkError;
use crate::filter::Thresholds;
use crate::pipeline::page_processor::{ProcessedPage, process_page};
use crate::render::PageSource;

/// Settings the page pipeline needs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Rasterization factor applied to both axes.
    pub render_scale: f32,
    pub thresholds: Thresholds,
    /// Worker threads for filtering; 0 uses one per CPU.
    pub parallel_workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            render_scale: DEFAULT_RENDER_SCALE,
            thresholds: Thresholds::default(),
            parallel_workers: 0,
        }
    }
}

impl From<&Settings> for PipelineConfig {
    fn from(settings: &Settings) -> Self {
        PipelineConfig {
            render_scale: settings.render_scale,
            thresholds: settings.thresholds,
            parallel_workers: settings.parallel_workers,
        }
    }
}

fn build_pool(workers: usize) -> crate::error::Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| UnmarkError::config(format!("failed to build worker pool: {e}")))
}

/// Rasterize and filter every page, returning results in page order.
///
/// Pages are rendered sequentially on the calling thread in batches of one
/// page per worker; each batch is then filtered in parallel. The first
/// rasterization failure aborts the run before any later page is rendered.
///
/// # Errors
/// `UnmarkError::EmptyDocument` for a zero-page source, or the first
/// `UnmarkError::Rasterization` raised by the source.
pub fn process_document_pages(
    source: &dyn PageSource,
    config: &PipelineConfig,
) -> crate::error::Result<Vec<ProcessedPage>> {
    let page_count = source.page_count();
    if page_count == 0 {
        return Err(UnmarkError::EmptyDocument);
    }

    let pool = build_pool(config.parallel_workers)?;
    let batch_size = u32::try_from(pool.current_num_threads().max(1)).unwrap_or(u32::MAX);

    let mut processed: Vec<ProcessedPage> = Vec::with_capacity(page_count as usize);
    let mut batch_start = 0u32;

    while batch_start < page_count {
        let batch_end = batch_start.saturating_add(batch_size).min(page_count);

        // --- Phase A: rasterization (sequential, source is single-threaded) ---
        let mut bitmaps: Vec<(u32, RgbImage)> =
            Vec::with_capacity((batch_end - batch_start) as usize);
        for page_index in batch_start..batch_end {
            info!(page = page_index + 1, total = page_count, "processing page");
            let bitmap =
                source.rasterize(page_index, config.render_scale, config.render_scale)?;
            bitmaps.push((page_index, bitmap));
        }

        // --- Phase B: highlight removal (rayon parallel, order-preserving collect) ---
        let thresholds = &config.thresholds;
        let batch: Vec<ProcessedPage> = pool.install(|| {
            bitmaps
                .into_par_iter()
                .map(|(page_index, bitmap)| process_page(page_index, bitmap, thresholds))
                .collect()
        });

        for page in &batch {
            debug!(
                page = page.page_index + 1,
                width = page.image.width(),
                height = page.image.height(),
                white = page.counts.white,
                erased = page.counts.highlight_erased,
                grayed = page.counts.highlight_grayed,
                highlight_percent = page.counts.highlight_percent(),
                "page filtered"
            );
        }

        processed.extend(batch);
        batch_start = batch_end;
    }

    Ok(processed)
}

/// Rasterize and filter every page of `source`, returning the filtered images
/// in page order.
pub fn process_document(
    source: &dyn PageSource,
    config: &PipelineConfig,
) -> crate::error::Result<Vec<RgbImage>> {
    let pages = process_document_pages(source, config)?;
    Ok(pages.into_iter().map(|p| p.image).collect())
}
