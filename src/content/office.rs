use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use super::text;
use crate::error::LoadError;

/// Extract text from a Word document (`.docx`).
///
/// The document body lives in `word/document.xml` inside the zip
/// container; prose is the text inside `w:t` runs, with paragraphs and
/// breaks restored as newlines. Legacy binary `.doc` files are not zip
/// archives and fail with a decode error.
pub fn extract_docx(bytes: &[u8]) -> Result<String, LoadError> {
    let body = read_zip_entry(bytes, "Word", "word/document.xml")?;
    let extracted = extract_wordml(&body).map_err(|reason| decode_err("Word", reason))?;
    if extracted.trim().is_empty() {
        return Err(decode_err("Word", "document contains no text".to_string()));
    }
    Ok(extracted)
}

/// Extract text from an OpenDocument text file (`.odt`).
///
/// Same container shape as DOCX with the body in `content.xml`; text
/// nodes inside paragraph and heading elements are the prose.
pub fn extract_odt(bytes: &[u8]) -> Result<String, LoadError> {
    let body = read_zip_entry(bytes, "OpenDocument", "content.xml")?;
    let extracted = extract_odf(&body).map_err(|reason| decode_err("OpenDocument", reason))?;
    if extracted.trim().is_empty() {
        return Err(decode_err(
            "OpenDocument",
            "document contains no text".to_string(),
        ));
    }
    Ok(extracted)
}

fn decode_err(format: &str, reason: String) -> LoadError {
    LoadError::DecodeFailure {
        format: format.to_string(),
        reason,
    }
}

fn read_zip_entry(bytes: &[u8], format: &str, name: &str) -> Result<String, LoadError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| decode_err(format, format!("not a valid {} container: {}", format, e)))?;
    let mut entry = archive
        .by_name(name)
        .map_err(|e| decode_err(format, format!("missing '{}': {}", name, e)))?;
    let mut content = Vec::new();
    entry
        .read_to_end(&mut content)
        .map_err(|e| decode_err(format, format!("cannot read '{}': {}", name, e)))?;
    Ok(text::decode_bytes(&content))
}

fn extract_wordml(xml: &str) -> Result<String, String> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.name().as_ref() == b"w:t" {
                    in_text_run = true;
                }
            }
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => out.push('\t'),
                b"w:br" => out.push('\n'),
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                out.push_str(&t.unescape().map_err(|e| e.to_string())?);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.to_string()),
            _ => {}
        }
    }
    Ok(out.trim().to_string())
}

fn extract_odf(xml: &str) -> Result<String, String> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    // Prose lives inside text:p and text:h; everything else is styling.
    let mut paragraph_depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"text:p" | b"text:h" => paragraph_depth += 1,
                _ => {}
            },
            Ok(Event::Empty(e)) if paragraph_depth > 0 => match e.name().as_ref() {
                b"text:tab" => out.push('\t'),
                b"text:s" => out.push(' '),
                b"text:line-break" => out.push('\n'),
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"text:p" | b"text:h" => {
                    paragraph_depth = paragraph_depth.saturating_sub(1);
                    out.push('\n');
                }
                _ => {}
            },
            Ok(Event::Text(t)) if paragraph_depth > 0 => {
                out.push_str(&t.unescape().map_err(|e| e.to_string())?);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.to_string()),
            _ => {}
        }
    }
    Ok(out.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn build_container(entry_name: &str, xml: &str) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(entry_name.to_string(), SimpleFileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_docx_paragraphs() {
        let xml = concat!(
            r#"<?xml version="1.0"?><w:document xmlns:w="w">"#,
            "<w:body>",
            "<w:p><w:r><w:t>Hello</w:t></w:r><w:r><w:t xml:space=\"preserve\"> World</w:t></w:r></w:p>",
            "<w:p><w:r><w:t>Second paragraph</w:t></w:r></w:p>",
            "</w:body></w:document>"
        );
        let bytes = build_container("word/document.xml", xml);

        assert_eq!(extract_docx(&bytes).unwrap(), "Hello World\nSecond paragraph");
    }

    #[test]
    fn test_docx_skips_non_text_nodes() {
        // Text outside w:t runs is formatting data, not prose.
        let xml = concat!(
            r#"<w:document xmlns:w="w"><w:body>"#,
            "<w:p><w:pPr>style-noise</w:pPr><w:r><w:t>kept</w:t></w:r></w:p>",
            "</w:body></w:document>"
        );
        let bytes = build_container("word/document.xml", xml);

        assert_eq!(extract_docx(&bytes).unwrap(), "kept");
    }

    #[test]
    fn test_legacy_doc_rejected() {
        // Old binary .doc starts with an OLE signature, not a zip.
        let err = extract_docx(&[0xd0, 0xcf, 0x11, 0xe0, 0xa1, 0xb1]).unwrap_err();
        match err {
            LoadError::DecodeFailure { format, .. } => assert_eq!(format, "Word"),
            other => panic!("Expected DecodeFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_docx_empty_document_rejected() {
        let xml = r#"<w:document xmlns:w="w"><w:body></w:body></w:document>"#;
        let bytes = build_container("word/document.xml", xml);
        assert!(extract_docx(&bytes).is_err());
    }

    #[test]
    fn test_odt_paragraphs() {
        let xml = concat!(
            r#"<?xml version="1.0"?><office:document-content xmlns:office="o" xmlns:text="t">"#,
            "<office:body><office:text>",
            "<text:h>Title</text:h>",
            "<text:p>Body with a<text:s/>gap</text:p>",
            "</office:text></office:body></office:document-content>"
        );
        let bytes = build_container("content.xml", xml);

        assert_eq!(extract_odt(&bytes).unwrap(), "Title\nBody with a gap");
    }

    #[test]
    fn test_odt_ignores_style_text() {
        let xml = concat!(
            r#"<office:document-content xmlns:office="o" xmlns:text="t" xmlns:style="s">"#,
            "<office:automatic-styles><style:style>noise</style:style></office:automatic-styles>",
            "<office:body><office:text><text:p>prose</text:p></office:text></office:body>",
            "</office:document-content>"
        );
        let bytes = build_container("content.xml", xml);

        assert_eq!(extract_odt(&bytes).unwrap(), "prose");
    }
}
