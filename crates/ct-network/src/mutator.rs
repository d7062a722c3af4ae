//! Lane blocking on a network definition.
//!
//! The document is streamed with `quick-xml` and copied through byte for
//! byte.  Only the start tag of a `<lane>` directly inside a top-level
//! `<edge>` whose `id` is selected gets re-emitted, with
//! `disallow="all"` and without any `allow` list (a lane may carry only
//! one of the two permission attributes).  Formatting, comments and every
//! other element are untouched.
//!
//! Selected ids that do not occur in the document are ignored.

use std::collections::BTreeSet;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, info};

use ct_core::LaneId;

use crate::{NetworkError, NetworkResult};

/// Permission value that excludes every vehicle class.
pub const BLOCK_ALL: &str = "all";

/// Return a copy of `document` with every lane in `lanes` closed to traffic.
///
/// # Errors
///
/// [`NetworkError::Xml`] / [`NetworkError::Malformed`] if the document is
/// not well-formed.
pub fn block_lanes(document: &str, lanes: &BTreeSet<LaneId>) -> NetworkResult<String> {
    let mut reader = Reader::from_str(document);
    let mut out = String::with_capacity(document.len() + lanes.len() * 16);
    // Names of the currently open elements.
    let mut open: Vec<Vec<u8>> = Vec::new();
    let mut seen_root = false;
    let mut blocked = 0usize;

    loop {
        let start = reader.buffer_position();
        let event = reader.read_event()?;
        let end = reader.buffer_position();
        let raw = &document[start..end];

        match event {
            Event::Eof => {
                // Whitespace or misc content after the root element.
                out.push_str(&document[start..]);
                break;
            }
            Event::Start(e) => {
                seen_root = true;
                if is_edge_lane(&open, &e) && selected(&e, lanes)? {
                    out.push_str(&blocked_tag(&e, false)?);
                    blocked += 1;
                } else {
                    out.push_str(raw);
                }
                open.push(e.name().as_ref().to_vec());
            }
            Event::Empty(e) => {
                seen_root = true;
                if is_edge_lane(&open, &e) && selected(&e, lanes)? {
                    out.push_str(&blocked_tag(&e, true)?);
                    blocked += 1;
                } else {
                    out.push_str(raw);
                }
            }
            Event::End(_) => {
                open.pop();
                out.push_str(raw);
            }
            _ => out.push_str(raw),
        }
    }

    if !open.is_empty() {
        return Err(NetworkError::Malformed(format!(
            "{} unclosed element(s) at end of document",
            open.len()
        )));
    }
    if !seen_root {
        return Err(NetworkError::Malformed("no root element".into()));
    }

    if blocked < lanes.len() {
        debug!(requested = lanes.len(), blocked, "some lanes to block were not in the network");
    }
    info!(blocked, "lanes blocked in network");
    Ok(out)
}

/// `<lane>` whose parent is an `<edge>` directly under the root.
fn is_edge_lane(open: &[Vec<u8>], e: &BytesStart<'_>) -> bool {
    e.name().as_ref() == b"lane" && open.len() == 2 && open[1] == b"edge"
}

fn selected(e: &BytesStart<'_>, lanes: &BTreeSet<LaneId>) -> NetworkResult<bool> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == b"id" {
            let id = attr.unescape_value()?;
            return Ok(lanes.contains(&*id));
        }
    }
    Ok(false)
}

/// Re-emit a lane start tag with all traffic disallowed.
fn blocked_tag(e: &BytesStart<'_>, empty: bool) -> NetworkResult<String> {
    let name = std::str::from_utf8(e.name().as_ref())
        .map_err(|_| NetworkError::NotUtf8)?
        .to_owned();
    let mut tag = format!("<{name}");
    let mut has_disallow = false;

    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = std::str::from_utf8(attr.key.as_ref()).map_err(|_| NetworkError::NotUtf8)?;
        match key {
            "allow" => continue,
            "disallow" => {
                tag.push_str(&format!(" disallow=\"{BLOCK_ALL}\""));
                has_disallow = true;
            }
            _ => {
                // Raw (still escaped) value; keep a quote style that cannot
                // collide with it.
                let value = std::str::from_utf8(&attr.value).map_err(|_| NetworkError::NotUtf8)?;
                let quote = if value.contains('"') { '\'' } else { '"' };
                tag.push_str(&format!(" {key}={quote}{value}{quote}"));
            }
        }
    }
    if !has_disallow {
        tag.push_str(&format!(" disallow=\"{BLOCK_ALL}\""));
    }
    tag.push_str(if empty { "/>" } else { ">" });
    Ok(tag)
}
