//! Parsing of WebDAV `207 Multi-Status` PROPFIND responses

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::{Result, SyncError};

/// One `<response>` element of a multistatus body
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropfindEntry {
    /// Raw (still percent-encoded) href
    pub href: String,
    /// Whether `<resourcetype>` contained `<collection/>`
    pub is_collection: bool,
    /// Raw `getlastmodified` value, if the server reported one
    pub last_modified: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Capture {
    None,
    Href,
    LastModified,
}

/// Parse a multistatus document.
///
/// Element names are matched by local name so any namespace prefix the
/// server picks (`D:`, `d:`, `lp1:`) is accepted.
///
/// # Errors
///
/// Returns a protocol error if the document is not well-formed XML.
pub fn parse(xml: &str) -> Result<Vec<PropfindEntry>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut current: Option<PropfindEntry> = None;
    let mut capture = Capture::None;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"response" => current = Some(PropfindEntry::default()),
                b"href" if current.is_some() => {
                    capture = Capture::Href;
                    text.clear();
                }
                b"getlastmodified" if current.is_some() => {
                    capture = Capture::LastModified;
                    text.clear();
                }
                b"collection" => {
                    if let Some(entry) = current.as_mut() {
                        entry.is_collection = true;
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"collection" {
                    if let Some(entry) = current.as_mut() {
                        entry.is_collection = true;
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if capture != Capture::None {
                    let value = t.unescape().map_err(|e| {
                        SyncError::protocol(format!("Malformed PROPFIND response: {e}"))
                    })?;
                    text.push_str(&value);
                }
            }
            Ok(Event::CData(c)) => {
                if capture != Capture::None {
                    text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"href" if capture == Capture::Href => {
                    if let Some(entry) = current.as_mut() {
                        entry.href = text.trim().to_string();
                    }
                    capture = Capture::None;
                }
                b"getlastmodified" if capture == Capture::LastModified => {
                    let value = text.trim();
                    if let Some(entry) = current.as_mut().filter(|_| !value.is_empty()) {
                        entry.last_modified = Some(value.to_string());
                    }
                    capture = Capture::None;
                }
                b"response" => {
                    if let Some(entry) = current.take().filter(|entry| !entry.href.is_empty()) {
                        entries.push(entry);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(SyncError::protocol(format!(
                    "Malformed PROPFIND response at position {}: {e}",
                    reader.error_position()
                )));
            }
        }
    }

    Ok(entries)
}
