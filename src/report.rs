//! One-page PDF analysis report.
//!
//! Rendered with `lopdf` on an A4 page using the base-14 Helvetica fonts, so
//! no font files are embedded. Both fonts use `WinAnsiEncoding`: Latin-1
//! letters and the common typographic punctuation render as themselves, any
//! other character becomes `?`.

use anyhow::{Context, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::Path;

use crate::history::make_preview;

pub const REPORT_TITLE: &str = "ClauseEase Analysis Report";
pub const PREVIEW_CHARS: usize = 2000;

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: f64 = 56.0;
const BODY_SIZE: f64 = 10.0;
const LEADING: f64 = 14.0;
const WRAP_COLUMNS: usize = 95;

/// Render the report to PDF bytes.
pub fn render_report(text: &str, flesch: Option<f64>, fog: Option<f64>) -> Result<Vec<u8>> {
    let mut ops = Vec::new();
    let mut y = PAGE_HEIGHT as f64 - MARGIN;

    text_line(&mut ops, "F2", 18.0, y, REPORT_TITLE);
    y -= 36.0;

    text_line(&mut ops, "F2", 13.0, y, "Readability Scores");
    y -= 20.0;
    text_line(
        &mut ops,
        "F1",
        BODY_SIZE,
        y,
        &format!("Flesch Reading Ease: {}", format_score(flesch)),
    );
    y -= LEADING;
    text_line(
        &mut ops,
        "F1",
        BODY_SIZE,
        y,
        &format!("Gunning Fog: {}", format_score(fog)),
    );
    y -= 30.0;

    text_line(&mut ops, "F2", 13.0, y, "Original Text Preview");
    y -= 20.0;
    for line in wrap(&make_preview(text, PREVIEW_CHARS), WRAP_COLUMNS) {
        if y < MARGIN {
            break;
        }
        text_line(&mut ops, "F1", BODY_SIZE, y, &line);
        y -= LEADING;
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let content = Content { operations: ops };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().context("Failed to encode report content")?,
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).context("Failed to serialize report")?;
    Ok(buf)
}

/// Render the report into `dir` as `report_<unix_ts>.pdf` and return the file name.
pub fn write_report(dir: &Path, text: &str, flesch: Option<f64>, fog: Option<f64>) -> Result<String> {
    let bytes = render_report(text, flesch, fog)?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create report dir: {}", dir.display()))?;

    let filename = format!("report_{}.pdf", chrono::Utc::now().timestamp());
    let path = dir.join(&filename);
    std::fs::write(&path, bytes)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;

    log::info!("Wrote report {}", path.display());
    Ok(filename)
}

fn format_score(score: Option<f64>) -> String {
    match score {
        Some(v) => format!("{:.2}", v),
        None => "N/A".to_string(),
    }
}

fn text_line(ops: &mut Vec<Operation>, font: &str, size: f64, y: f64, text: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
    ops.push(Operation::new("Td", vec![MARGIN.into(), y.into()]));
    ops.push(Operation::new("Tj", vec![Object::string_literal(win_ansi(text))]));
    ops.push(Operation::new("ET", vec![]));
}

/// Encode `text` as WinAnsi (CP1252) bytes for the base-14 fonts.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' ' => b' ',
            c if c.is_ascii_graphic() => c as u8,
            '\u{A0}'..='\u{FF}' => c as u8,
            '\u{20AC}' => 0x80,
            '\u{201A}' => 0x82,
            '\u{201E}' => 0x84,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2122}' => 0x99,
            _ => b'?',
        })
        .collect()
}

/// Greedy word wrap at `width` characters. Words longer than a line are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for piece in chars.chunks(width) {
            let piece: String = piece.iter().collect();
            let needed = if current.is_empty() {
                piece.chars().count()
            } else {
                current.chars().count() + 1 + piece.chars().count()
            };
            if needed > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&piece);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn contains(haystack: &[u8], needle: &str) -> bool {
        haystack
            .windows(needle.len())
            .any(|w| w == needle.as_bytes())
    }

    #[test]
    fn wrap_respects_width() {
        let lines = wrap("the quick brown fox jumps over the lazy dog", 10);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
        assert_eq!(lines.join(" "), "the quick brown fox jumps over the lazy dog");
    }

    #[test]
    fn wrap_splits_long_words() {
        let lines = wrap("abcdefghijkl", 5);
        assert_eq!(lines, vec!["abcde", "fghij", "kl"]);
        assert!(wrap("   ", 5).is_empty());
    }

    #[test]
    fn scores_formatted_or_na() {
        assert_eq!(format_score(Some(61.333)), "61.33");
        assert_eq!(format_score(None), "N/A");
    }

    #[test]
    fn report_is_single_page_pdf() {
        let bytes = render_report("The tenant shall pay rent.", Some(72.5), None).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert!(contains(&bytes, REPORT_TITLE));
        assert!(contains(&bytes, "Gunning Fog: N/A"));
        assert!(contains(&bytes, "Flesch Reading Ease: 72.50"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn win_ansi_keeps_latin1_and_typographic_punctuation() {
        assert_eq!(win_ansi("plain (text)"), b"plain (text)".to_vec());
        assert_eq!(win_ansi("caf\u{e9} na\u{ef}ve \u{a7}4"), b"caf\xe9 na\xefve \xa74".to_vec());
        assert_eq!(
            win_ansi("\u{201C}a\u{201D} \u{2018}b\u{2019} \u{2013}\u{2014} \u{20ac}5\u{2026}"),
            b"\x93a\x94 \x91b\x92 \x96\x97 \x805\x85".to_vec()
        );
        assert_eq!(win_ansi("\u{4e2d}\t\u{1f600}"), b"???".to_vec());
    }

    #[test]
    fn latin1_text_survives_in_page_content() {
        let bytes = render_report("Caf\u{e9} \u{201C}d\u{e9}j\u{e0} vu\u{201D}", None, None).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let page_id = *doc.get_pages().values().next().unwrap();
        let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
        let shown: Vec<Vec<u8>> = content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .map(|op| op.operands[0].as_str().unwrap().to_vec())
            .collect();
        assert!(shown.contains(&b"Caf\xe9 \x93d\xe9j\xe0 vu\x94".to_vec()));
    }

    #[test]
    fn long_text_stays_on_one_page() {
        let text = "indemnification ".repeat(500);
        let bytes = render_report(&text, None, None).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn write_report_names_file() {
        let tmp = TempDir::new().unwrap();
        let name = write_report(tmp.path(), "Some text.", Some(1.0), Some(2.0)).unwrap();
        assert!(name.starts_with("report_") && name.ends_with(".pdf"));
        assert!(tmp.path().join(&name).exists());
    }
}
