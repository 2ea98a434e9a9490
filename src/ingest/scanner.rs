//! Backing-store scanner: buffered sequential and seek-based access to one
//! logical edge stream physically split across binary files.

use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::types::{EdgeRecord, IngestError, NodeId, Result};

/// Bytes occupied by one on-disk edge record: two consecutive native-endian
/// `u64`s, no delimiters, no framing.
pub const RECORD_BYTES: u64 = 16;

/// Read-ahead buffer capacity, in records.
pub const BUFFER_RECORDS: u64 = 1 << 20;

/// Naming scheme for generator output segments, keyed by file index.
pub(crate) fn segment_name(index: usize) -> String {
    format!("seg-{index:04}.bin")
}

/// How logical edge indexes map onto backing files.
#[derive(Debug)]
enum Layout {
    /// Generator output: every file holds exactly `edges_per_file` records,
    /// so the owning file of index `n` is `n / edges_per_file`.
    Uniform { edges_per_file: u64 },
    /// Plain concatenation of arbitrarily sized files; the owning file is
    /// found by advancing file-by-file.
    Concatenated,
}

/// Buffered reader presenting a multi-file edge stream as one addressable
/// record sequence.
///
/// The cursor (current file, byte offset, buffer contents, in-buffer
/// position) is reconstructible from any logical edge index via [`seek`],
/// which is what makes random access possible on top of buffered sequential
/// reads.
///
/// [`seek`]: Scanner::seek
#[derive(Debug)]
pub struct Scanner {
    files: Vec<PathBuf>,
    /// Record capacity of each backing file, derived from metadata at open.
    file_records: Vec<u64>,
    layout: Layout,
    total_edges: Option<u64>,
    total_nodes: Option<u64>,
    open_file: Option<(usize, File)>,
    buf: Vec<u8>,
    /// Logical index of the first record in `buf`.
    buf_base: u64,
    /// Number of records currently in `buf`.
    buf_len: u64,
    /// Next record to hand out, relative to `buf_base`.
    buf_cursor: u64,
}

impl Scanner {
    /// Opens synthetic generator output: a directory of uniformly sized
    /// segments named by sequential index, with a closed-form edge count
    /// `2^scale * multiplier`.
    ///
    /// The per-file record capacity is derived from the first segment's byte
    /// size; the generator promises uniform segment sizes, and that promise
    /// is verified here rather than assumed.
    pub fn open_generated(dir: &Path, scale: u32, multiplier: u64) -> Result<Self> {
        if scale >= 63 {
            return Err(IngestError::Format(format!(
                "node-count exponent {scale} out of range"
            )));
        }
        let total_nodes = 1u64 << scale;
        let total_edges = total_nodes.checked_mul(multiplier).ok_or_else(|| {
            IngestError::Format(format!(
                "edge count 2^{scale} * {multiplier} overflows"
            ))
        })?;

        let mut files = Vec::new();
        loop {
            let path = dir.join(segment_name(files.len()));
            if !path.is_file() {
                break;
            }
            files.push(path);
        }
        if files.is_empty() {
            return Err(IngestError::Environment(format!(
                "no edge segments in {}",
                dir.display()
            )));
        }

        let first_len = file_len(&files[0])?;
        if first_len == 0 || first_len % RECORD_BYTES != 0 {
            return Err(IngestError::Format(format!(
                "segment {} is not a whole number of records",
                files[0].display()
            )));
        }
        let edges_per_file = first_len / RECORD_BYTES;
        for path in &files[1..] {
            let len = file_len(path)?;
            if len != first_len {
                return Err(IngestError::Format(format!(
                    "segment {} is {len} bytes, expected {first_len}",
                    path.display()
                )));
            }
        }
        if edges_per_file * files.len() as u64 != total_edges {
            return Err(IngestError::Format(format!(
                "segments hold {} records, directory name declares {total_edges}",
                edges_per_file * files.len() as u64
            )));
        }

        trace!(
            segments = files.len(),
            edges_per_file,
            total_edges,
            "scanner.open_generated"
        );
        let file_records = vec![edges_per_file; files.len()];
        Ok(Self::assemble(
            files,
            file_records,
            Layout::Uniform { edges_per_file },
            Some(total_edges),
            Some(total_nodes),
        ))
    }

    /// Opens a plain edge-list directory: one or more flat binary record
    /// files, consumed in lexicographic name order. The total edge count is
    /// not known ahead of time and is reported as unavailable.
    pub fn open_directory(dir: &Path) -> Result<Self> {
        let entries = fs::read_dir(dir).map_err(|err| {
            IngestError::Environment(format!("cannot read {}: {err}", dir.display()))
        })?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| {
                IngestError::Environment(format!("cannot read {}: {err}", dir.display()))
            })?;
            let path = entry.path();
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        if files.is_empty() {
            return Err(IngestError::Environment(format!(
                "no edge files in {}",
                dir.display()
            )));
        }
        let file_records = record_counts(&files)?;
        trace!(files = files.len(), "scanner.open_directory");
        Ok(Self::assemble(
            files,
            file_records,
            Layout::Concatenated,
            None,
            None,
        ))
    }

    /// Opens a single flat binary record file.
    pub fn open_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(IngestError::Environment(format!(
                "{} is not a regular file",
                path.display()
            )));
        }
        let files = vec![path.to_path_buf()];
        let file_records = record_counts(&files)?;
        Ok(Self::assemble(
            files,
            file_records,
            Layout::Concatenated,
            None,
            None,
        ))
    }

    fn assemble(
        files: Vec<PathBuf>,
        file_records: Vec<u64>,
        layout: Layout,
        total_edges: Option<u64>,
        total_nodes: Option<u64>,
    ) -> Self {
        Self {
            files,
            file_records,
            layout,
            total_edges,
            total_nodes,
            open_file: None,
            buf: Vec::new(),
            buf_base: 0,
            buf_len: 0,
            buf_cursor: 0,
        }
    }

    /// Exact edge count when the format knows it ahead of time.
    pub fn total_edges(&self) -> Option<u64> {
        self.total_edges
    }

    /// Exact node count when the format knows it ahead of time.
    pub fn total_nodes(&self) -> Option<u64> {
        self.total_nodes
    }

    /// Moves the cursor to logical edge index `n`. Returns `false` if `n` is
    /// past the end of the stream.
    ///
    /// A target inside the buffered window only adjusts the in-buffer
    /// cursor; anything else computes the owning file and byte offset and
    /// refills the buffer from there.
    pub fn seek(&mut self, n: u64) -> Result<bool> {
        if let Some(total) = self.total_edges {
            if n >= total {
                return Ok(false);
            }
        }
        if n >= self.buf_base && n < self.buf_base + self.buf_len {
            self.buf_cursor = n - self.buf_base;
            return Ok(true);
        }
        // Reposition even when the target is past the end, so a subsequent
        // next() keeps reporting exhaustion from the same place.
        self.buf_base = n;
        self.buf_len = 0;
        self.buf_cursor = 0;
        match self.locate(n) {
            Some((file_idx, record_offset)) => {
                trace!(edge = n, file = file_idx, offset = record_offset, "scanner.seek");
                self.refill(file_idx, record_offset)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Returns the record at the cursor and advances by one, refilling the
    /// buffer and crossing file boundaries as needed. `Ok(None)` is clean
    /// exhaustion; read failures surface as errors, never as `None`.
    pub fn next(&mut self) -> Result<Option<EdgeRecord>> {
        if self.buf_cursor >= self.buf_len {
            let next_index = self.buf_base + self.buf_len;
            if !self.seek(next_index)? {
                return Ok(None);
            }
        }
        let at = (self.buf_cursor * RECORD_BYTES) as usize;
        let tail = NodeId(u64_at(&self.buf, at));
        let head = NodeId(u64_at(&self.buf, at + 8));
        self.buf_cursor += 1;
        Ok(Some(EdgeRecord { tail, head }))
    }

    /// Maps a logical edge index to (file index, record offset in file), or
    /// `None` past the end of the backing data.
    fn locate(&self, n: u64) -> Option<(usize, u64)> {
        match self.layout {
            Layout::Uniform { edges_per_file } => {
                let file = (n / edges_per_file) as usize;
                if file >= self.files.len() {
                    None
                } else {
                    Some((file, n % edges_per_file))
                }
            }
            Layout::Concatenated => {
                let mut base = 0u64;
                for (idx, records) in self.file_records.iter().enumerate() {
                    if n < base + records {
                        return Some((idx, n - base));
                    }
                    base += records;
                }
                None
            }
        }
    }

    /// Refills the buffer starting at the given in-file position. `locate`
    /// only produces offsets strictly inside a file, so at least one record
    /// is always read; a short read means the file shrank under us and is an
    /// I/O error, not exhaustion.
    fn refill(&mut self, file_idx: usize, record_offset: u64) -> Result<()> {
        let remaining = self.file_records[file_idx] - record_offset;
        let want = remaining.min(BUFFER_RECORDS);
        self.buf.resize((want * RECORD_BYTES) as usize, 0);
        self.ensure_open(file_idx)?;
        match self.open_file.as_mut() {
            Some((_, file)) => {
                file.seek(SeekFrom::Start(record_offset * RECORD_BYTES))?;
                file.read_exact(&mut self.buf)?;
            }
            None => return Err(IngestError::Environment("no backing file open".into())),
        }
        self.buf_len = want;
        self.buf_cursor = 0;
        trace!(
            file = file_idx,
            offset = record_offset,
            records = want,
            "scanner.refill"
        );
        Ok(())
    }

    fn ensure_open(&mut self, idx: usize) -> Result<()> {
        if matches!(&self.open_file, Some((open, _)) if *open == idx) {
            return Ok(());
        }
        let path = &self.files[idx];
        let file = File::open(path).map_err(|err| {
            IngestError::Environment(format!(
                "cannot open backing file {}: {err}",
                path.display()
            ))
        })?;
        trace!(file = idx, path = %path.display(), "scanner.open_file");
        self.open_file = Some((idx, file));
        Ok(())
    }
}

fn file_len(path: &Path) -> Result<u64> {
    let meta = fs::metadata(path).map_err(|err| {
        IngestError::Environment(format!("cannot stat {}: {err}", path.display()))
    })?;
    Ok(meta.len())
}

fn record_counts(files: &[PathBuf]) -> Result<Vec<u64>> {
    let mut counts = Vec::with_capacity(files.len());
    for path in files {
        let len = file_len(path)?;
        if len % RECORD_BYTES != 0 {
            return Err(IngestError::Format(format!(
                "{} is not a whole number of records",
                path.display()
            )));
        }
        counts.push(len / RECORD_BYTES);
    }
    Ok(counts)
}

fn u64_at(buf: &[u8], at: usize) -> u64 {
    let mut arr = [0u8; 8];
    arr.copy_from_slice(&buf[at..at + 8]);
    u64::from_ne_bytes(arr)
}
