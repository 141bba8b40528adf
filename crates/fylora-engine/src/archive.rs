// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory ZIP archive assembly for multi-file artifacts (split pages,
// exported page images).

use std::io::{Cursor, Write};

use fylora_core::error::{FyloraError, Result};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Builds a ZIP archive entirely in memory, entries in insertion order.
pub struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    entries: usize,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            entries: 0,
        }
    }

    /// Append one named entry.
    pub fn add_entry(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.writer
            .start_file(name, options)
            .map_err(|err| FyloraError::Archive(format!("failed to start entry {name}: {err}")))?;
        self.writer.write_all(data)?;
        self.entries += 1;
        Ok(())
    }

    /// Finalise the archive and return its bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        let entries = self.entries;
        let cursor = self
            .writer
            .finish()
            .map_err(|err| FyloraError::Archive(format!("failed to finalise archive: {err}")))?;
        let bytes = cursor.into_inner();
        debug!(entries, bytes = bytes.len(), "Archive finalised");
        Ok(bytes)
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn entries_keep_names_and_content() {
        let mut builder = ArchiveBuilder::new();
        builder.add_entry("page_1.pdf", b"first").unwrap();
        builder.add_entry("page_2.pdf", b"second").unwrap();
        let bytes = builder.finish().unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut first = String::new();
        archive
            .by_name("page_1.pdf")
            .unwrap()
            .read_to_string(&mut first)
            .unwrap();
        assert_eq!(first, "first");
    }

    #[test]
    fn empty_archive_is_still_valid() {
        let bytes = ArchiveBuilder::new().finish().unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
