//! DOCX text extraction
//!
//! A `.docx` file is a ZIP archive whose main content lives in
//! `word/document.xml`. The walk below collects paragraph text first and
//! table-cell text second, so front-matter paragraphs (where keyword blocks
//! live) stay ahead of tabular data in the mined text.

use crate::MineError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// Extracts all text from a DOCX: paragraphs, then table cells
pub fn extract_text(path: &Path) -> Result<String, MineError> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")?
        .read_to_string(&mut xml)?;

    parse_document_xml(&xml)
}

fn parse_document_xml(xml: &str) -> Result<String, MineError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut paragraph_text = String::new();
    let mut table_text = String::new();
    let mut table_depth = 0usize;
    let mut in_text_run = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:t" => in_text_run = true,
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                b"w:t" => in_text_run = false,
                b"w:p" => {
                    let target = if table_depth > 0 {
                        &mut table_text
                    } else {
                        &mut paragraph_text
                    };
                    target.push('\n');
                }
                _ => {}
            },
            Ok(Event::Text(e)) if in_text_run => {
                // A run whose entities fail to decode is skipped, not fatal
                if let Ok(decoded) = e.unescape() {
                    let target = if table_depth > 0 {
                        &mut table_text
                    } else {
                        &mut paragraph_text
                    };
                    target.push_str(&decoded);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            Ok(_) => {}
        }
        buf.clear();
    }

    paragraph_text.push_str(&table_text);
    Ok(paragraph_text)
}
