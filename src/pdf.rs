use crate::errors::{RenderError, ReportError, ResourceError};
use crate::fonts::{encode_text, Face};
use crate::layout::{Document, DrawOp, Page, LINE_WIDTH, PAGE_HEIGHT, PAGE_WIDTH};
use log::debug;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, Stream};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

const POINTS_PER_MM: f32 = 72.0 / 25.4;

/// Encodes a laid out document as PDF bytes.
///
/// The output depends only on the document, so identical documents always
/// encode to identical bytes.
pub fn encode(document: &Document, title: &str) -> Result<Vec<u8>, RenderError> {
    let mut doc = lopdf::Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let mut fonts = lopdf::Dictionary::new();
    for face in Face::ALL {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => face.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(face.resource_name(), font_id);
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
    });

    let mut kids = Vec::with_capacity(document.pages.len());
    for page in &document.pages {
        let content = Content {
            operations: page_operations(page),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::from(page_id));
    }

    let page_count = kids.len() as i64;
    let media_box: Vec<Object> = vec![
        0.into(),
        0.into(),
        (PAGE_WIDTH * POINTS_PER_MM).into(),
        (PAGE_HEIGHT * POINTS_PER_MM).into(),
    ];
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => media_box,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(encode_text(title)),
        "Producer" => Object::string_literal(env!("CARGO_PKG_NAME")),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut buf = Vec::new();
    doc.save_to(&mut buf).map_err(RenderError::from)?;

    debug!(
        "encoded {} pages into {} bytes",
        document.pages.len(),
        buf.len()
    );
    Ok(buf)
}

/// Atomically writes `bytes` to `path`, replacing any existing file.
///
/// The bytes are written to a temporary file next to `path` which is renamed
/// over it only once fully flushed. On failure the temporary file is removed
/// and whatever was at `path` before is left untouched.
pub fn persist(bytes: &[u8], path: &Path) -> Result<(), ReportError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|source| ResourceError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let write_err = |source: io::Error| ResourceError::WriteOutput {
        path: path.to_path_buf(),
        source,
    };

    let mut file = NamedTempFile::new_in(dir).map_err(write_err)?;
    file.write_all(bytes).map_err(write_err)?;
    file.as_file().sync_all().map_err(write_err)?;
    file.persist(path).map_err(|err| write_err(err.error))?;

    Ok(())
}

fn page_operations(page: &Page) -> Vec<Operation> {
    let mut ops = vec![Operation::new("w", vec![(LINE_WIDTH * POINTS_PER_MM).into()])];

    for op in &page.ops {
        match op {
            DrawOp::Text {
                x,
                baseline,
                font,
                text,
            } => {
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new(
                    "Tf",
                    vec![font.face.resource_name().into(), font.size.into()],
                ));
                ops.push(Operation::new(
                    "Td",
                    vec![
                        (x * POINTS_PER_MM).into(),
                        ((PAGE_HEIGHT - baseline) * POINTS_PER_MM).into(),
                    ],
                ));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(encode_text(text))],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
            DrawOp::Border {
                x,
                y,
                width,
                height,
            } => {
                ops.push(Operation::new(
                    "re",
                    vec![
                        (x * POINTS_PER_MM).into(),
                        ((PAGE_HEIGHT - y) * POINTS_PER_MM).into(),
                        (width * POINTS_PER_MM).into(),
                        (-height * POINTS_PER_MM).into(),
                    ],
                ));
                ops.push(Operation::new("S", vec![]));
            }
        }
    }

    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Align, Font, LayoutContext};

    fn sample_document() -> Document {
        let mut ctx = LayoutContext::new();
        ctx.set_font(Font::bold(16.0));
        ctx.text_line(10.0, "Heading", Align::Center);
        ctx.set_font(Font::regular(10.0));
        ctx.cell(40.0, 10.0, "Jan", Align::Left, true);
        ctx.cell(30.0, 10.0, "$1,000.00", Align::Right, true);
        ctx.new_line(10.0);
        ctx.break_page();
        ctx.text_line(10.0, "Second page", Align::Left);
        ctx.finish()
    }

    #[test]
    fn should_encode_a_pdf() {
        let bytes = encode(&sample_document(), "Heading").unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));

        let parsed = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 2);
    }

    #[test]
    fn should_encode_identical_documents_identically() {
        let doc = sample_document();
        assert_eq!(
            encode(&doc, "Heading").unwrap(),
            encode(&doc, "Heading").unwrap()
        );
    }

    #[test]
    fn should_emit_text_and_border_operations() {
        let doc = sample_document();
        let ops = page_operations(&doc.pages[0]);
        let operators: Vec<&str> = ops.iter().map(|op| op.operator.as_str()).collect();

        assert_eq!(operators[0], "w");
        assert_eq!(operators.iter().filter(|op| **op == "Tj").count(), 3);
        assert_eq!(operators.iter().filter(|op| **op == "re").count(), 2);
    }

    #[test]
    fn should_persist_and_replace_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.pdf");

        persist(b"first", &path).unwrap();
        persist(b"second", &path).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");

        // No temporary files are left behind.
        assert_eq!(fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn should_fail_to_persist_into_a_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();

        let err = persist(b"pdf", &blocker.join("report.pdf")).unwrap_err();
        assert!(matches!(err, ReportError::Resource(_)));
        assert_eq!(fs::read(&blocker).unwrap(), b"not a directory");
    }
}
