// Job: input PDF -> page pipeline -> output PDF next to the input

use std::path::{Path, PathBuf};

use crate::config::settings::Settings;
use crate::filter::ClassCounts;
use crate::pdf::writer::write_image_pdf;
use crate::pipeline::orchestrator::{PipelineConfig, process_document_pages};
use crate::render::PageSource;

/// Configuration for a single job.
pub struct JobConfig {
    pub input_path: PathBuf,
    pub settings: Settings,
}

impl JobConfig {
    /// Build a job for `input_path`, picking up `settings.yaml` next to it.
    pub fn for_input(input_path: impl Into<PathBuf>) -> crate::error::Result<Self> {
        let input_path = input_path.into();
        let settings = crate::config::load_settings_for_input(&input_path)?;
        Ok(Self {
            input_path,
            settings,
        })
    }
}

/// Result of processing a single job.
pub struct JobResult {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub pages_processed: usize,
    pub counts: ClassCounts,
}

/// Summary of one converted document.
pub struct ConversionSummary {
    pub pages_processed: usize,
    pub counts: ClassCounts,
}

/// Filter every page of `source` and write the result to `output_path`.
///
/// The output file is written once, only after every page succeeded.
pub fn convert_document(
    source: &dyn PageSource,
    settings: &Settings,
    output_path: &Path,
) -> crate::error::Result<ConversionSummary> {
    let pages = process_document_pages(source, &PipelineConfig::from(settings))?;

    let counts = pages
        .iter()
        .fold(ClassCounts::default(), |acc, p| acc.merge(p.counts));
    let images: Vec<_> = pages.into_iter().map(|p| p.image).collect();

    write_image_pdf(
        &images,
        output_path,
        settings.output_dpi,
        settings.output_encoding,
        settings.jpeg_quality,
    )?;

    Ok(ConversionSummary {
        pages_processed: images.len(),
        counts,
    })
}

/// Run one job: validate the input, open it with pdfium, filter all pages and
/// write `{stem} answers removed.pdf` into the output directory.
#[cfg(feature = "pdfium")]
pub fn run_job(config: &JobConfig) -> crate::error::Result<JobResult> {
    use crate::paths::{ensure_output_dir, output_dir_for, output_path_for, validate_input};
    use crate::render::pdfium::{PdfiumDocument, create_pdfium};

    let input_path = &config.input_path;
    validate_input(input_path)?;
    config.settings.validate()?;

    let output_dir = output_dir_for(input_path, &config.settings.output_dir_name);
    ensure_output_dir(&output_dir)?;
    let output_path = output_path_for(input_path, &config.settings.output_dir_name);

    tracing::info!(input = %input_path.display(), output = %output_path.display(), "processing");

    let pdfium = create_pdfium()?;
    let document = PdfiumDocument::open(&pdfium, input_path)?;
    let summary = convert_document(&document, &config.settings, &output_path)?;

    tracing::info!(
        pages = summary.pages_processed,
        highlight_pixels = summary.counts.highlight(),
        "done"
    );

    Ok(JobResult {
        input_path: input_path.clone(),
        output_path,
        pages_processed: summary.pages_processed,
        counts: summary.counts,
    })
}
