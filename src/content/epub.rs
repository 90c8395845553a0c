use std::io::{Cursor, Read};
use std::path::Path;

use log::warn;
use percent_encoding::percent_decode_str;
use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use super::{html, text};
use crate::error::LoadError;

/// Extract readable text from an EPUB archive.
///
/// Walks the standard chain: `META-INF/container.xml` names the OPF
/// package document, whose manifest maps item ids to hrefs and whose
/// spine fixes the reading order. Chapters are stripped of markup and
/// joined with blank lines. Spine items missing from the archive are
/// skipped rather than failing the whole book.
pub fn extract_text(bytes: &[u8]) -> Result<String, LoadError> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| decode_err(format!("not a valid EPUB archive: {}", e)))?;

    let container = read_entry(&mut archive, "META-INF/container.xml")?;
    let opf_path = find_opf_path(&container)?;
    let opf = read_entry(&mut archive, &opf_path)?;
    let spine_hrefs = parse_spine(&opf)?;
    if spine_hrefs.is_empty() {
        return Err(decode_err("package spine lists no chapters".to_string()));
    }

    let base_dir = Path::new(&opf_path)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let mut chapters = Vec::new();
    for href in spine_hrefs {
        let decoded = percent_decode_str(&href).decode_utf8_lossy();
        let entry_path = join_entry_path(&base_dir, &decoded);
        match read_entry(&mut archive, &entry_path) {
            Ok(markup) => {
                let chapter = html::extract_text(&markup);
                if !chapter.is_empty() {
                    chapters.push(chapter);
                }
            }
            Err(_) => warn!("EPUB spine references missing entry '{}'", entry_path),
        }
    }

    if chapters.is_empty() {
        return Err(decode_err("no text content found in any chapter".to_string()));
    }
    Ok(chapters.join("\n\n"))
}

fn decode_err(reason: String) -> LoadError {
    LoadError::DecodeFailure {
        format: "EPUB".to_string(),
        reason,
    }
}

fn read_entry(archive: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> Result<String, LoadError> {
    let mut entry = archive
        .by_name(name)
        .map_err(|e| decode_err(format!("missing archive entry '{}': {}", name, e)))?;
    let mut bytes = Vec::new();
    entry
        .read_to_end(&mut bytes)
        .map_err(|e| decode_err(format!("cannot read archive entry '{}': {}", name, e)))?;
    Ok(text::decode_bytes(&bytes))
}

/// Locate the OPF package document named by container.xml.
fn find_opf_path(container_xml: &str) -> Result<String, LoadError> {
    let mut reader = Reader::from_str(container_xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if local_name(e.name().as_ref()) == b"rootfile" {
                    if let Some(path) = attribute(&e, b"full-path") {
                        return Ok(path);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(decode_err(format!("malformed container.xml: {}", e))),
            _ => {}
        }
    }
    Err(decode_err("container.xml names no rootfile".to_string()))
}

/// Resolve the spine to an ordered list of chapter hrefs.
fn parse_spine(opf_xml: &str) -> Result<Vec<String>, LoadError> {
    let mut manifest: Vec<(String, String)> = Vec::new();
    let mut spine_ids: Vec<String> = Vec::new();

    let mut reader = Reader::from_str(opf_xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match local_name(e.name().as_ref()) {
                b"item" => {
                    if let (Some(id), Some(href)) = (attribute(&e, b"id"), attribute(&e, b"href")) {
                        manifest.push((id, href));
                    }
                }
                b"itemref" => {
                    if let Some(idref) = attribute(&e, b"idref") {
                        spine_ids.push(idref);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(decode_err(format!("malformed package document: {}", e))),
            _ => {}
        }
    }

    Ok(spine_ids
        .into_iter()
        .filter_map(|idref| {
            manifest
                .iter()
                .find(|(id, _)| *id == idref)
                .map(|(_, href)| href.clone())
        })
        .collect())
}

fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().rposition(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

fn attribute(element: &quick_xml::events::BytesStart, key: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

// Zip entry names always use forward slashes.
fn join_entry_path(base: &Path, href: &str) -> String {
    if base.as_os_str().is_empty() {
        href.to_string()
    } else {
        format!("{}/{}", base.to_string_lossy(), href)
    }
}
