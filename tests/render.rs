//! Integration tests: the real writers end to end, without PDFium.
//!
//! Pages come from an in-memory [`PdfEngine`]; the written files are read
//! back with `zip`, `docx_rs::read_docx` and `quick_xml` and checked for
//! the content the renderers promise.

#![cfg(all(feature = "docx", feature = "xlsx", feature = "pptx"))]

use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use edgequake_pdf2office::{
    convert_with, ConversionConfig, ImageAsset, OutputFormat, PageRecord, PdfDocumentSource,
    PdfEngine, Pdf2OfficeError,
};
use image::{DynamicImage, Rgb, RgbImage};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

// ── Test helpers ─────────────────────────────────────────────────────────────

struct InMemoryEngine {
    pages: Vec<PageRecord>,
}

struct InMemoryDocument<'a> {
    pages: &'a [PageRecord],
}

impl PdfEngine for InMemoryEngine {
    fn open<'a>(&'a self, _path: &Path) -> Result<Box<dyn PdfDocumentSource + 'a>, Pdf2OfficeError> {
        Ok(Box::new(InMemoryDocument { pages: &self.pages }))
    }
}

impl PdfDocumentSource for InMemoryDocument<'_> {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn read_page(&self, index: usize) -> Result<PageRecord, Pdf2OfficeError> {
        Ok(self.pages[index].clone())
    }
}

fn png(width: u32, height: u32) -> ImageAsset {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 40, 40])));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    ImageAsset::png(bytes)
}

/// Run a conversion into a fresh temp dir; returns (dir, output path).
fn run(pages: Vec<PageRecord>, format: OutputFormat) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.pdf");
    std::fs::write(&input, b"%PDF-1.4\n").unwrap();
    let output = dir.path().join(format!("out.{}", format));

    convert_with(
        &InMemoryEngine { pages },
        &input,
        format,
        &output,
        &ConversionConfig::default(),
    )
    .unwrap();
    (dir, output)
}

fn zip_entry(path: &Path, name: &str) -> Option<Vec<u8>> {
    let mut archive = zip::ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap();
    let mut file = archive.by_name(name).ok()?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf).unwrap();
    Some(buf)
}

fn zip_names(path: &Path) -> Vec<String> {
    let archive = zip::ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap();
    archive.file_names().map(str::to_string).collect()
}

/// Concatenated `<a:t>` / `<t>` text of an XML part, one entry per element.
fn text_elements(xml: &[u8], tag: &[u8]) -> Vec<String> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut inside = false;
    let mut out = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == tag => {
                inside = true;
                out.push(String::new());
            }
            Ok(Event::End(e)) if e.name().as_ref() == tag => inside = false,
            Ok(Event::Text(t)) if inside => {
                if let Some(last) = out.last_mut() {
                    last.push_str(&t.unescape().unwrap());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => panic!("bad XML: {e}"),
            _ => {}
        }
        buf.clear();
    }
    out
}

/// Files (not directory entries) stored under `prefix`.
fn media_files(path: &Path, prefix: &str) -> usize {
    zip_names(path)
        .iter()
        .filter(|n| n.starts_with(prefix) && !n.ends_with('/'))
        .count()
}

fn slide_count(path: &Path) -> usize {
    zip_names(path)
        .iter()
        .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
        .count()
}

fn no_stray_temp_files(dir: &Path) {
    let strays: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with(".pdf2office-img-"))
        .collect();
    assert!(strays.is_empty(), "temporary images left behind: {strays:?}");
}

// ── docx ─────────────────────────────────────────────────────────────────────

#[test]
fn docx_has_one_paragraph_per_line_and_inline_pictures() {
    let (dir, out) = run(
        vec![
            PageRecord::new("Heading\nSecond line", vec![png(40, 20), png(10, 10)]),
            PageRecord::text_only(""),
            PageRecord::text_only("Last page"),
        ],
        OutputFormat::Docx,
    );

    let docx = docx_rs::read_docx(&std::fs::read(&out).unwrap()).unwrap();
    let texts: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|c| match c {
            DocumentChild::Paragraph(p) => Some(
                p.children
                    .iter()
                    .filter_map(|pc| match pc {
                        ParagraphChild::Run(r) => Some(
                            r.children
                                .iter()
                                .filter_map(|rc| match rc {
                                    RunChild::Text(t) => Some(t.text.clone()),
                                    _ => None,
                                })
                                .collect::<String>(),
                        ),
                        _ => None,
                    })
                    .collect::<String>(),
            ),
            _ => None,
        })
        .filter(|t| !t.is_empty())
        .collect();
    assert_eq!(texts, vec!["Heading", "Second line", "Last page"]);

    assert_eq!(media_files(&out, "word/media/"), 2);
    let body = String::from_utf8(zip_entry(&out, "word/document.xml").unwrap()).unwrap();
    assert_eq!(body.matches("<w:drawing>").count(), 2);
    no_stray_temp_files(dir.path());
}

#[test]
fn docx_survives_a_broken_image() {
    let (dir, out) = run(
        vec![PageRecord::new(
            "text",
            vec![png(4, 4), ImageAsset::new(b"\xff\xd8 not really".to_vec(), Some("jpeg"))],
        )],
        OutputFormat::Docx,
    );
    assert_eq!(media_files(&out, "word/media/"), 1);
    no_stray_temp_files(dir.path());
}

// ── xlsx ─────────────────────────────────────────────────────────────────────

#[test]
fn xlsx_puts_text_in_a1_and_images_on_page_sheets() {
    let (dir, out) = run(
        vec![
            PageRecord::new("first", vec![png(8, 8), png(8, 8)]),
            PageRecord::text_only("second"),
        ],
        OutputFormat::Xlsx,
    );

    let workbook = String::from_utf8(zip_entry(&out, "xl/workbook.xml").unwrap()).unwrap();
    assert!(workbook.contains("name=\"Text\""));
    assert!(workbook.contains("name=\"Page_1\""));
    assert!(!workbook.contains("name=\"Page_2\""));

    let strings = zip_entry(&out, "xl/sharedStrings.xml").unwrap();
    assert_eq!(text_elements(&strings, b"t"), vec!["first\n\nsecond"]);

    let drawing = String::from_utf8(zip_entry(&out, "xl/drawings/drawing1.xml").unwrap()).unwrap();
    assert!(drawing.contains("<xdr:row>0</xdr:row>"));
    assert!(drawing.contains("<xdr:row>20</xdr:row>"));
    no_stray_temp_files(dir.path());
}

// ── pptx ─────────────────────────────────────────────────────────────────────

#[test]
fn pptx_text_only_pages_get_a_slide_each() {
    let (_dir, out) = run(
        vec![
            PageRecord::text_only("one"),
            PageRecord::text_only("two"),
            PageRecord::text_only("three"),
        ],
        OutputFormat::Pptx,
    );
    assert_eq!(slide_count(&out), 3);
    assert_eq!(media_files(&out, "ppt/media/"), 0);

    let slide2 = zip_entry(&out, "ppt/slides/slide2.xml").unwrap();
    assert_eq!(text_elements(&slide2, b"a:t"), vec!["two"]);
}

#[test]
fn pptx_image_slides_come_before_text_slides() {
    let (dir, out) = run(
        vec![PageRecord::new(
            "Caption & notes\n\nSecond paragraph",
            vec![png(30, 10), png(10, 30)],
        )],
        OutputFormat::Pptx,
    );
    assert_eq!(slide_count(&out), 3);

    for n in 1..=2 {
        let rels = String::from_utf8(
            zip_entry(&out, &format!("ppt/slides/_rels/slide{n}.xml.rels")).unwrap(),
        )
        .unwrap();
        assert!(rels.contains("../media/"), "slide {n} should hold a picture");
    }
    let text_slide = zip_entry(&out, "ppt/slides/slide3.xml").unwrap();
    assert_eq!(
        text_elements(&text_slide, b"a:t"),
        vec!["Caption & notes", "Second paragraph"]
    );
    no_stray_temp_files(dir.path());
}

#[test]
fn pptx_long_text_is_chunked_across_slides() {
    let paragraph = "lorem ipsum ".repeat(33); // 395 chars once trimmed
    let text = vec![paragraph.trim(); 4].join("\n\n");
    let (_dir, out) = run(vec![PageRecord::text_only(text)], OutputFormat::Pptx);
    assert_eq!(slide_count(&out), 2);
}

// ── Zero pages ───────────────────────────────────────────────────────────────

#[test]
fn zero_pages_produce_empty_but_valid_files() {
    let (_d, txt) = run(Vec::new(), OutputFormat::Txt);
    assert_eq!(std::fs::read(&txt).unwrap(), b"");

    let (_d, docx) = run(Vec::new(), OutputFormat::Docx);
    assert!(docx_rs::read_docx(&std::fs::read(&docx).unwrap()).is_ok());

    let (_d, xlsx) = run(Vec::new(), OutputFormat::Xlsx);
    assert!(zip_entry(&xlsx, "xl/workbook.xml").is_some());
    assert!(zip_entry(&xlsx, "xl/drawings/drawing1.xml").is_none());

    let (_d, pptx) = run(Vec::new(), OutputFormat::Pptx);
    assert_eq!(slide_count(&pptx), 0);
    assert!(zip_entry(&pptx, "ppt/presentation.xml").is_some());
}
