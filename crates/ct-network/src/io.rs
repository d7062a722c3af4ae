//! File-level helpers for the network and configuration artifacts.
//!
//! Network files are gzip-compressed when their name ends in `.gz`.  On read
//! the gzip magic bytes decide, so a plain `.net.xml` works as well.

use std::collections::BTreeSet;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tracing::info;

use ct_core::LaneId;

use crate::{NetworkError, NetworkResult, block_lanes, count_references, point_at};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Read a (possibly gzip-compressed) network document.
pub fn read_network(path: &Path) -> NetworkResult<String> {
    let raw = fs::read(path)?;
    let bytes = if raw.starts_with(&GZIP_MAGIC) {
        let mut decoded = Vec::with_capacity(raw.len() * 8);
        GzDecoder::new(raw.as_slice()).read_to_end(&mut decoded)?;
        decoded
    } else {
        raw
    };
    String::from_utf8(bytes).map_err(|_| NetworkError::NotUtf8)
}

/// Write a network document, compressing when `path` ends in `.gz`.
pub fn write_network(path: &Path, document: &str) -> NetworkResult<()> {
    let gz = path.extension().is_some_and(|ext| ext == "gz");
    if gz {
        let file = fs::File::create(path)?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(document.as_bytes())?;
        encoder.finish()?.flush()?;
    } else {
        fs::write(path, document)?;
    }
    Ok(())
}

/// Read `src`, block `lanes`, write the result to `dst`.
pub fn block_lanes_file(src: &Path, dst: &Path, lanes: &BTreeSet<LaneId>) -> NetworkResult<()> {
    let document = read_network(src)?;
    let mutated = block_lanes(&document, lanes)?;
    write_network(dst, &mutated)?;
    info!(src = %src.display(), dst = %dst.display(), "mutated network written");
    Ok(())
}

/// Read the configuration at `src`, swap `old_ref` for `new_ref`, write to
/// `dst`.  Returns how many references were replaced.
pub fn rewrite_config_file(
    src:     &Path,
    dst:     &Path,
    old_ref: &str,
    new_ref: &str,
) -> NetworkResult<usize> {
    let text = fs::read_to_string(src)?;
    let replaced = count_references(&text, old_ref);
    fs::write(dst, point_at(&text, old_ref, new_ref))?;
    info!(src = %src.display(), dst = %dst.display(), replaced, "configuration rewritten");
    Ok(replaced)
}
