//! A minimal PresentationML package writer.
//!
//! Produces a 4:3 deck (10 in × 7.5 in) with one slide master, the eleven
//! standard slide layouts in their usual order (so layout 5 is "Title Only"
//! and layout 6 is "Blank"), a theme, and whatever slides were added.
//! Layouts carry no placeholders, so a slide shows exactly the shapes put on
//! it. Pictures are stored as PNG under `ppt/media/`.
//!
//! Parts are generated as strings and zipped with `zip`; text is escaped
//! with `quick_xml::escape`.

use crate::error::{EmbedError, Pdf2OfficeError};
use crate::pipeline::embed::{decode_source, encode_png, ImageSource};
use crate::render::pptx::{PicturePlacement, PresentationWriter, TextBoxSpec};
use crate::render::xml_safe;
use image::GenericImageView;
use quick_xml::escape::escape;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Slide width in EMUs (10 in).
pub const SLIDE_WIDTH_EMU: u64 = 9_144_000;
/// Slide height in EMUs (7.5 in).
pub const SLIDE_HEIGHT_EMU: u64 = 6_858_000;

/// `(name, type)` of each slide layout, in template order.
pub const LAYOUTS: [(&str, &str); 11] = [
    ("Title Slide", "title"),
    ("Title and Content", "obj"),
    ("Section Header", "secHead"),
    ("Two Content", "twoObj"),
    ("Comparison", "twoTxTwoObj"),
    ("Title Only", "titleOnly"),
    ("Blank", "blank"),
    ("Content with Caption", "objTx"),
    ("Picture with Caption", "picTx"),
    ("Title and Vertical Text", "vertTx"),
    ("Vertical Title and Text", "vertTitleAndTx"),
];

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const CT_BASE: &str = "application/vnd.openxmlformats-officedocument";

#[derive(Debug)]
enum Shape {
    Picture {
        media: usize,
        placement: PicturePlacement,
        height: u64,
    },
    TextBox {
        paragraphs: Vec<String>,
        spec: TextBoxSpec,
    },
}

#[derive(Debug)]
struct Slide {
    layout: usize,
    shapes: Vec<Shape>,
}

/// [`PresentationWriter`] that builds the package in memory and zips it on
/// save.
#[derive(Debug, Default)]
pub struct PptxPackage {
    slides: Vec<Slide>,
    /// PNG payloads; entry `i` is stored as `ppt/media/image{i+1}.png`.
    media: Vec<Vec<u8>>,
}

impl PptxPackage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every package part as `(zip entry name, contents)`, in write order.
    pub fn parts(&self) -> Vec<(String, Vec<u8>)> {
        let mut parts = vec![
            ("[Content_Types].xml".to_string(), self.content_types().into_bytes()),
            ("_rels/.rels".to_string(), root_rels().into_bytes()),
            ("docProps/core.xml".to_string(), core_props().into_bytes()),
            ("docProps/app.xml".to_string(), self.app_props().into_bytes()),
            ("ppt/presentation.xml".to_string(), self.presentation().into_bytes()),
            (
                "ppt/_rels/presentation.xml.rels".to_string(),
                self.presentation_rels().into_bytes(),
            ),
            ("ppt/presProps.xml".to_string(), pres_props().into_bytes()),
            ("ppt/tableStyles.xml".to_string(), table_styles().into_bytes()),
            ("ppt/theme/theme1.xml".to_string(), theme().into_bytes()),
            (
                "ppt/slideMasters/slideMaster1.xml".to_string(),
                slide_master().into_bytes(),
            ),
            (
                "ppt/slideMasters/_rels/slideMaster1.xml.rels".to_string(),
                slide_master_rels().into_bytes(),
            ),
        ];

        for (idx, (name, kind)) in LAYOUTS.iter().enumerate() {
            let n = idx + 1;
            parts.push((
                format!("ppt/slideLayouts/slideLayout{n}.xml"),
                slide_layout(name, kind).into_bytes(),
            ));
            parts.push((
                format!("ppt/slideLayouts/_rels/slideLayout{n}.xml.rels"),
                rels(&[(
                    1,
                    "slideMaster",
                    "../slideMasters/slideMaster1.xml".to_string(),
                )])
                .into_bytes(),
            ));
        }

        for (idx, slide) in self.slides.iter().enumerate() {
            let n = idx + 1;
            parts.push((format!("ppt/slides/slide{n}.xml"), slide_xml(slide).into_bytes()));
            parts.push((
                format!("ppt/slides/_rels/slide{n}.xml.rels"),
                slide_rels(slide).into_bytes(),
            ));
        }

        for (idx, png) in self.media.iter().enumerate() {
            parts.push((format!("ppt/media/image{}.png", idx + 1), png.clone()));
        }

        parts
    }

    fn content_types(&self) -> String {
        let mut xml = format!(
            "{XML_DECL}<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
             <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
             <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
             <Default Extension=\"png\" ContentType=\"image/png\"/>"
        );
        let mut over = |part: &str, kind: &str| {
            xml.push_str(&format!(
                "<Override PartName=\"{part}\" ContentType=\"{kind}\"/>"
            ));
        };

        over(
            "/ppt/presentation.xml",
            &format!("{CT_BASE}.presentationml.presentation.main+xml"),
        );
        over(
            "/ppt/slideMasters/slideMaster1.xml",
            &format!("{CT_BASE}.presentationml.slideMaster+xml"),
        );
        for n in 1..=LAYOUTS.len() {
            over(
                &format!("/ppt/slideLayouts/slideLayout{n}.xml"),
                &format!("{CT_BASE}.presentationml.slideLayout+xml"),
            );
        }
        for n in 1..=self.slides.len() {
            over(
                &format!("/ppt/slides/slide{n}.xml"),
                &format!("{CT_BASE}.presentationml.slide+xml"),
            );
        }
        over("/ppt/theme/theme1.xml", &format!("{CT_BASE}.theme+xml"));
        over(
            "/ppt/presProps.xml",
            &format!("{CT_BASE}.presentationml.presProps+xml"),
        );
        over(
            "/ppt/tableStyles.xml",
            &format!("{CT_BASE}.presentationml.tableStyles+xml"),
        );
        over(
            "/docProps/core.xml",
            "application/vnd.openxmlformats-package.core-properties+xml",
        );
        over("/docProps/app.xml", &format!("{CT_BASE}.extended-properties+xml"));

        xml.push_str("</Types>");
        xml
    }

    fn presentation(&self) -> String {
        let mut xml = format!(
            "{XML_DECL}<p:presentation xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_R}\" xmlns:p=\"{NS_P}\" saveSubsetFonts=\"1\">\
             <p:sldMasterIdLst><p:sldMasterId id=\"2147483648\" r:id=\"rId1\"/></p:sldMasterIdLst>"
        );
        // An empty sldIdLst is a schema violation; leave it out instead.
        if !self.slides.is_empty() {
            xml.push_str("<p:sldIdLst>");
            for idx in 0..self.slides.len() {
                xml.push_str(&format!(
                    "<p:sldId id=\"{}\" r:id=\"rId{}\"/>",
                    256 + idx,
                    FIRST_SLIDE_REL + idx
                ));
            }
            xml.push_str("</p:sldIdLst>");
        }
        xml.push_str(&format!(
            "<p:sldSz cx=\"{SLIDE_WIDTH_EMU}\" cy=\"{SLIDE_HEIGHT_EMU}\" type=\"screen4x3\"/>\
             <p:notesSz cx=\"{SLIDE_HEIGHT_EMU}\" cy=\"{SLIDE_WIDTH_EMU}\"/>\
             </p:presentation>"
        ));
        xml
    }

    fn presentation_rels(&self) -> String {
        let mut entries = vec![
            (1, "slideMaster", "slideMasters/slideMaster1.xml".to_string()),
            (2, "presProps", "presProps.xml".to_string()),
            (3, "tableStyles", "tableStyles.xml".to_string()),
            (4, "theme", "theme/theme1.xml".to_string()),
        ];
        for idx in 0..self.slides.len() {
            entries.push((FIRST_SLIDE_REL + idx, "slide", format!("slides/slide{}.xml", idx + 1)));
        }
        rels(&entries)
    }

    fn app_props(&self) -> String {
        format!(
            "{XML_DECL}<Properties xmlns=\"http://schemas.openxmlformats.org/officeDocument/2006/extended-properties\">\
             <Application>pdf2office</Application><Slides>{}</Slides></Properties>",
            self.slides.len()
        )
    }

    fn slide_mut(&mut self, slide: usize) -> Option<&mut Slide> {
        self.slides.get_mut(slide)
    }
}

/// Relationship id of the first slide in `presentation.xml.rels`.
const FIRST_SLIDE_REL: usize = 5;

impl PresentationWriter for PptxPackage {
    fn layout_count(&self) -> usize {
        LAYOUTS.len()
    }

    fn add_slide(&mut self, layout: usize) -> usize {
        let layout = if layout < LAYOUTS.len() { layout } else { 0 };
        self.slides.push(Slide {
            layout,
            shapes: Vec::new(),
        });
        self.slides.len() - 1
    }

    fn add_picture(
        &mut self,
        slide: usize,
        source: ImageSource<'_>,
        placement: PicturePlacement,
    ) -> Result<(), EmbedError> {
        if slide >= self.slides.len() {
            return Err(EmbedError::Rejected(format!("no slide {}", slide)));
        }

        let img = decode_source(source)?;
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(EmbedError::Rejected("image has no pixels".into()));
        }
        let png = encode_png(&img).map_err(|e| EmbedError::Rejected(e.to_string()))?;

        let shown_height = placement.width * u64::from(height) / u64::from(width);
        let media = self.media.len();
        self.media.push(png);

        if let Some(target) = self.slide_mut(slide) {
            target.shapes.push(Shape::Picture {
                media,
                placement,
                height: shown_height,
            });
        }
        Ok(())
    }

    fn add_text_box(&mut self, slide: usize, paragraphs: &[String], spec: TextBoxSpec) {
        match self.slide_mut(slide) {
            Some(target) => target.shapes.push(Shape::TextBox {
                paragraphs: paragraphs.to_vec(),
                spec,
            }),
            None => debug!("Text box for missing slide {} dropped", slide),
        }
    }

    fn save(&mut self, path: &Path) -> Result<(), Pdf2OfficeError> {
        let write_failed = |e: std::io::Error| Pdf2OfficeError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        };
        let zip_failed = |e: zip::result::ZipError| Pdf2OfficeError::RenderFailed {
            format: "pptx",
            detail: e.to_string(),
        };

        let file = File::create(path).map_err(write_failed)?;
        let mut zip = ZipWriter::new(file);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, data) in self.parts() {
            zip.start_file(name, options).map_err(zip_failed)?;
            zip.write_all(&data).map_err(write_failed)?;
        }
        zip.finish().map_err(zip_failed)?;

        debug!(
            "Wrote {} slides, {} media parts to {}",
            self.slides.len(),
            self.media.len(),
            path.display()
        );
        Ok(())
    }
}

// ── Part builders ────────────────────────────────────────────────────────

fn rels(entries: &[(usize, &str, String)]) -> String {
    let mut xml = format!("{XML_DECL}<Relationships xmlns=\"{NS_REL}\">");
    for (id, kind, target) in entries {
        xml.push_str(&format!(
            "<Relationship Id=\"rId{id}\" Type=\"{REL_BASE}/{kind}\" Target=\"{target}\"/>"
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn root_rels() -> String {
    format!(
        "{XML_DECL}<Relationships xmlns=\"{NS_REL}\">\
         <Relationship Id=\"rId1\" Type=\"{REL_BASE}/officeDocument\" Target=\"ppt/presentation.xml\"/>\
         <Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties\" Target=\"docProps/core.xml\"/>\
         <Relationship Id=\"rId3\" Type=\"{REL_BASE}/extended-properties\" Target=\"docProps/app.xml\"/>\
         </Relationships>"
    )
}

fn core_props() -> String {
    format!(
        "{XML_DECL}<cp:coreProperties \
         xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" \
         xmlns:dc=\"http://purl.org/dc/elements/1.1/\" \
         xmlns:dcterms=\"http://purl.org/dc/terms/\" \
         xmlns:dcmitype=\"http://purl.org/dc/dcmitype/\" \
         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">\
         <dc:creator>pdf2office</dc:creator></cp:coreProperties>"
    )
}

fn pres_props() -> String {
    format!("{XML_DECL}<p:presentationPr xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_R}\" xmlns:p=\"{NS_P}\"/>")
}

fn table_styles() -> String {
    format!(
        "{XML_DECL}<a:tblStyleLst xmlns:a=\"{NS_A}\" def=\"{{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}}\"/>"
    )
}

fn theme() -> String {
    let solid = "<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>";
    let line = |w: u32| format!("<a:ln w=\"{w}\">{solid}</a:ln>");
    let effect = "<a:effectStyle><a:effectLst/></a:effectStyle>";
    let srgb = |tag: &str, hex: &str| format!("<a:{tag}><a:srgbClr val=\"{hex}\"/></a:{tag}>");

    format!(
        "{XML_DECL}<a:theme xmlns:a=\"{NS_A}\" name=\"Office Theme\"><a:themeElements>\
         <a:clrScheme name=\"Office\">\
         <a:dk1><a:sysClr val=\"windowText\" lastClr=\"000000\"/></a:dk1>\
         <a:lt1><a:sysClr val=\"window\" lastClr=\"FFFFFF\"/></a:lt1>\
         {}{}{}{}{}{}{}{}{}{}\
         </a:clrScheme>\
         <a:fontScheme name=\"Office\">\
         <a:majorFont><a:latin typeface=\"Calibri Light\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:majorFont>\
         <a:minorFont><a:latin typeface=\"Calibri\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:minorFont>\
         </a:fontScheme>\
         <a:fmtScheme name=\"Office\">\
         <a:fillStyleLst>{solid}{solid}{solid}</a:fillStyleLst>\
         <a:lnStyleLst>{}{}{}</a:lnStyleLst>\
         <a:effectStyleLst>{effect}{effect}{effect}</a:effectStyleLst>\
         <a:bgFillStyleLst>{solid}{solid}{solid}</a:bgFillStyleLst>\
         </a:fmtScheme>\
         </a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>",
        srgb("dk2", "44546A"),
        srgb("lt2", "E7E6E6"),
        srgb("accent1", "4472C4"),
        srgb("accent2", "ED7D31"),
        srgb("accent3", "A5A5A5"),
        srgb("accent4", "FFC000"),
        srgb("accent5", "5B9BD5"),
        srgb("accent6", "70AD47"),
        srgb("hlink", "0563C1"),
        srgb("folHlink", "954F72"),
        line(6350),
        line(12700),
        line(19050),
    )
}

/// Empty shape tree: just the mandatory group properties.
fn sp_tree(shapes: &str) -> String {
    format!(
        "<p:spTree><p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>\
         <p:grpSpPr><a:xfrm><a:off x=\"0\" y=\"0\"/><a:ext cx=\"0\" cy=\"0\"/>\
         <a:chOff x=\"0\" y=\"0\"/><a:chExt cx=\"0\" cy=\"0\"/></a:xfrm></p:grpSpPr>\
         {shapes}</p:spTree>"
    )
}

fn slide_master() -> String {
    let mut layout_ids = String::new();
    for idx in 0..LAYOUTS.len() {
        layout_ids.push_str(&format!(
            "<p:sldLayoutId id=\"{}\" r:id=\"rId{}\"/>",
            2_147_483_649u64 + idx as u64,
            idx + 1
        ));
    }
    format!(
        "{XML_DECL}<p:sldMaster xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_R}\" xmlns:p=\"{NS_P}\">\
         <p:cSld><p:bg><p:bgRef idx=\"1001\"><a:schemeClr val=\"bg1\"/></p:bgRef></p:bg>{}</p:cSld>\
         <p:clrMap bg1=\"lt1\" tx1=\"dk1\" bg2=\"lt2\" tx2=\"dk2\" accent1=\"accent1\" accent2=\"accent2\" \
         accent3=\"accent3\" accent4=\"accent4\" accent5=\"accent5\" accent6=\"accent6\" \
         hlink=\"hlink\" folHlink=\"folHlink\"/>\
         <p:sldLayoutIdLst>{layout_ids}</p:sldLayoutIdLst>\
         <p:txStyles><p:titleStyle/><p:bodyStyle/><p:otherStyle/></p:txStyles>\
         </p:sldMaster>",
        sp_tree("")
    )
}

fn slide_master_rels() -> String {
    let mut entries: Vec<(usize, &str, String)> = (1..=LAYOUTS.len())
        .map(|n| (n, "slideLayout", format!("../slideLayouts/slideLayout{n}.xml")))
        .collect();
    entries.push((LAYOUTS.len() + 1, "theme", "../theme/theme1.xml".to_string()));
    rels(&entries)
}

fn slide_layout(name: &str, kind: &str) -> String {
    format!(
        "{XML_DECL}<p:sldLayout xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_R}\" xmlns:p=\"{NS_P}\" type=\"{kind}\" preserve=\"1\">\
         <p:cSld name=\"{name}\">{}</p:cSld>\
         <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>",
        sp_tree("")
    )
}

fn xfrm(left: u64, top: u64, width: u64, height: u64) -> String {
    format!("<a:xfrm><a:off x=\"{left}\" y=\"{top}\"/><a:ext cx=\"{width}\" cy=\"{height}\"/></a:xfrm>")
}

fn slide_xml(slide: &Slide) -> String {
    let mut shapes = String::new();
    let mut pictures = 0;
    for (idx, shape) in slide.shapes.iter().enumerate() {
        let id = idx + 2;
        match shape {
            Shape::Picture {
                placement, height, ..
            } => {
                pictures += 1;
                // rId1 is the layout; pictures follow in shape order.
                shapes.push_str(&format!(
                    "<p:pic><p:nvPicPr><p:cNvPr id=\"{id}\" name=\"Picture {pictures}\"/>\
                     <p:cNvPicPr><a:picLocks noChangeAspect=\"1\"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>\
                     <p:blipFill><a:blip r:embed=\"rId{}\"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>\
                     <p:spPr>{}<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></p:spPr></p:pic>",
                    pictures + 1,
                    xfrm(placement.left, placement.top, placement.width, *height)
                ));
            }
            Shape::TextBox { paragraphs, spec } => {
                shapes.push_str(&format!(
                    "<p:sp><p:nvSpPr><p:cNvPr id=\"{id}\" name=\"TextBox {id}\"/><p:cNvSpPr txBox=\"1\"/><p:nvPr/></p:nvSpPr>\
                     <p:spPr>{}<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>\
                     <p:txBody><a:bodyPr wrap=\"square\" rtlCol=\"0\"><a:noAutofit/></a:bodyPr><a:lstStyle/>{}</p:txBody></p:sp>",
                    xfrm(spec.left, spec.top, spec.width, spec.height),
                    text_paragraphs(paragraphs, spec.font_size_pt)
                ));
            }
        }
    }

    format!(
        "{XML_DECL}<p:sld xmlns:a=\"{NS_A}\" xmlns:r=\"{NS_R}\" xmlns:p=\"{NS_P}\">\
         <p:cSld>{}</p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>",
        sp_tree(&shapes)
    )
}

fn slide_rels(slide: &Slide) -> String {
    let mut entries = vec![(
        1,
        "slideLayout",
        format!("../slideLayouts/slideLayout{}.xml", slide.layout + 1),
    )];
    for shape in &slide.shapes {
        if let Shape::Picture { media, .. } = shape {
            entries.push((entries.len() + 1, "image", format!("../media/image{}.png", media + 1)));
        }
    }
    rels(&entries)
}

/// `<a:p>` elements for a text box. Single line breaks inside a paragraph
/// become `<a:br/>`.
fn text_paragraphs(paragraphs: &[String], font_size_pt: u32) -> String {
    let size = font_size_pt * 100;
    let rpr = format!("<a:rPr lang=\"en-US\" sz=\"{size}\" dirty=\"0\"/>");
    let end = format!("<a:endParaRPr lang=\"en-US\" sz=\"{size}\" dirty=\"0\"/></a:p>");
    if paragraphs.is_empty() {
        return format!("<a:p>{end}");
    }

    let mut xml = String::new();
    for paragraph in paragraphs {
        xml.push_str("<a:p>");
        let clean = xml_safe(paragraph);
        for (line_idx, line) in clean.split('\n').enumerate() {
            if line_idx > 0 {
                xml.push_str(&format!("<a:br>{rpr}</a:br>"));
            }
            let line = line.trim_end_matches('\r');
            if !line.is_empty() {
                xml.push_str(&format!("<a:r>{rpr}<a:t>{}</a:t></a:r>", escape(line)));
            }
        }
        xml.push_str(&end);
    }
    xml
}
