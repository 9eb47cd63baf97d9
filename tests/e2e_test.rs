// E2E tests: run the binary on generated PDFs and inspect the output.
//
// The input PDFs are built with lopdf. The output is checked with lopdf for
// structure and re-rendered with pdfium for pixel content. Tests return early
// when the pdfium library cannot be bound.

#![cfg(feature = "pdfium")]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use lopdf::{Document, Object, Stream, dictionary};
use pdf_unmarker::render::PageSource;
use pdf_unmarker::render::pdfium::{PdfiumDocument, create_pdfium};

const OUTPUT_DIR: &str = "exams with answers removed";

/// Marker band over part of a text line: yellow at PDF y 600..650, ink at x 120..160.
const MARKED_PAGE: &[u8] = b"1 1 0 rg 100 600 300 50 re f 0 0 0 rg 120 610 40 30 re f";
/// Same layout with a light orange marker.
const ORANGE_PAGE: &[u8] = b"1 0.8 0 rg 100 600 300 50 re f 0 0 0 rg 120 610 40 30 re f";

fn cargo_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pdf_unmarker"))
}

fn run(input: &Path) -> Output {
    cargo_bin()
        .arg(input)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to execute binary")
}

fn create_test_pdf(path: &Path, contents: &[&[u8]]) {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for content in contents {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
            "Contents" => content_id,
            "Resources" => dictionary! {},
        });
        kids.push(page_id.into());
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(contents.len() as i64),
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc.save(path).expect("failed to save test PDF");
}

fn expected_output(dir: &Path, stem: &str) -> PathBuf {
    dir.join(OUTPUT_DIR).join(format!("{stem} answers removed.pdf"))
}

fn pdfium_available() -> bool {
    match create_pdfium() {
        Ok(_) => true,
        Err(e) => {
            eprintln!("skipping: {e}");
            false
        }
    }
}

// ============================================================
// 1. Marker removed, ink kept, page count preserved
// ============================================================

#[test]
fn test_e2e_removes_marker_lossless() {
    if !pdfium_available() {
        return;
    }
    let dir = tempfile::tempdir().expect("create temp dir");
    std::fs::write(dir.path().join("settings.yaml"), "output_encoding: flate\n")
        .expect("write settings");
    let input = dir.path().join("quiz 3.pdf");
    create_test_pdf(&input, &[MARKED_PAGE, ORANGE_PAGE]);

    let output = run(&input);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "binary failed: {stderr}");
    assert!(stderr.contains("OK:"), "got: {stderr}");
    assert!(stderr.contains("(2 pages)"), "got: {stderr}");

    let out_path = expected_output(dir.path(), "quiz 3");
    assert!(out_path.exists(), "missing output {}", out_path.display());

    let doc = Document::load(&out_path).expect("output should be a valid PDF");
    assert_eq!(doc.get_pages().len(), 2);

    // Output pixels are 2x the input points at 150 DPI; rendering at 150/72
    // maps each output pixel back to one raster pixel.
    let pdfium = create_pdfium().expect("pdfium");
    let rendered = PdfiumDocument::open(&pdfium, &out_path).expect("open output");
    let scale = 150.0 / 72.0;
    for page in 0..2 {
        let image = rendered.rasterize(page, scale, scale).expect("render output");
        assert_eq!(image.dimensions(), (1224, 1584));

        // PDF y=625 -> input row 167 -> raster row 334.
        let band = image.get_pixel(600, 334).0;
        assert!(
            band.iter().all(|&c| c >= 250),
            "page {page}: marker should be erased, got {band:?}"
        );
        let ink = image.get_pixel(280, 334).0;
        assert!(
            ink.iter().all(|&c| c <= 5),
            "page {page}: ink should be kept, got {ink:?}"
        );
    }
}

// ============================================================
// 2. Default JPEG output
// ============================================================

#[test]
fn test_e2e_default_jpeg_output() {
    if !pdfium_available() {
        return;
    }
    let dir = tempfile::tempdir().expect("create temp dir");
    let input = dir.path().join("exam.pdf");
    create_test_pdf(&input, &[MARKED_PAGE]);

    let output = run(&input);
    assert!(
        output.status.success(),
        "binary failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let out_path = expected_output(dir.path(), "exam");
    let doc = Document::load(&out_path).expect("output should be a valid PDF");
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1);

    let has_dct_image = doc.objects.values().any(|obj| match obj {
        Object::Stream(s) => s
            .dict
            .get(b"Filter")
            .ok()
            .and_then(|f| f.as_name().ok())
            .is_some_and(|name| name == b"DCTDecode"),
        _ => false,
    });
    assert!(has_dct_image, "default output should embed a JPEG image");
}

// ============================================================
// 3. Re-running overwrites the previous output
// ============================================================

#[test]
fn test_e2e_rerun_overwrites() {
    if !pdfium_available() {
        return;
    }
    let dir = tempfile::tempdir().expect("create temp dir");
    let input = dir.path().join("exam.pdf");
    create_test_pdf(&input, &[MARKED_PAGE]);

    let out_path = expected_output(dir.path(), "exam");
    std::fs::create_dir_all(out_path.parent().expect("parent")).expect("mkdir");
    std::fs::write(&out_path, b"stale").expect("write stale output");

    let output = run(&input);
    assert!(output.status.success());
    Document::load(&out_path).expect("stale file should be replaced by a valid PDF");
}

// ============================================================
// 4. Failures leave no output file
// ============================================================

#[test]
fn test_e2e_corrupt_input_no_output() {
    if !pdfium_available() {
        return;
    }
    let dir = tempfile::tempdir().expect("create temp dir");
    let input = dir.path().join("broken.pdf");
    std::fs::write(&input, b"%PDF-1.4 garbage").expect("write");

    let output = run(&input);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR"), "got: {stderr}");
    assert!(!expected_output(dir.path(), "broken").exists());
}

#[test]
fn test_e2e_empty_document_no_output() {
    if !pdfium_available() {
        return;
    }
    let dir = tempfile::tempdir().expect("create temp dir");
    let input = dir.path().join("empty.pdf");
    create_test_pdf(&input, &[]);

    let output = run(&input);
    assert_eq!(output.status.code(), Some(1));
    assert!(!expected_output(dir.path(), "empty").exists());
}

#[test]
fn test_e2e_invalid_settings_no_output() {
    if !pdfium_available() {
        return;
    }
    let dir = tempfile::tempdir().expect("create temp dir");
    std::fs::write(dir.path().join("settings.yaml"), "output_dpi: 0\n").expect("write");
    let input = dir.path().join("exam.pdf");
    create_test_pdf(&input, &[MARKED_PAGE]);

    let output = run(&input);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("settings"), "got: {stderr}");
    assert!(!dir.path().join(OUTPUT_DIR).exists());
}
