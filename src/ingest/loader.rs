//! Format front-ends: path recognition, scanner caching, and the drive loops
//! for direct, incremental, and iterator-only loads.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::config::LoaderConfig;
use crate::sink::{ReadOnlySink, WritableGraph};
use crate::types::{IngestError, Result};

use super::partition::plan;
use super::scanner::Scanner;
use super::source::{EdgeListSource, EdgeSource};

/// Externally visible loader contract, one implementor per on-disk format.
///
/// An external dispatcher picks a loader by calling [`accepts`] on each
/// registered loader in priority order; `accepts` must therefore stay cheap
/// (stat and pattern match only, no data reads).
///
/// [`accepts`]: FileLoader::accepts
pub trait FileLoader {
    /// Whether this loader can open the given path.
    fn accepts(&self, path: &Path) -> bool;

    /// Bulk-loads the path's shard of the edge stream into the read-only
    /// graph builder.
    fn load_direct(
        &mut self,
        sink: &mut dyn ReadOnlySink,
        path: &Path,
        config: &LoaderConfig,
    ) -> Result<()>;

    /// Appends the path's shard of the edge stream to the writable graph as
    /// one all-or-nothing batch.
    fn load_incremental(
        &mut self,
        sink: &mut dyn WritableGraph,
        path: &Path,
        config: &LoaderConfig,
    ) -> Result<()>;

    /// Returns a standalone edge iterator over the whole stream, for callers
    /// that bypass both graph builders.
    fn create_data_source(&mut self, path: &Path) -> Result<Box<dyn EdgeSource>>;
}

/// Single-entry scanner cache keyed by path.
///
/// A load for the same path reuses the cached scanner (repositioned, never
/// reopened); a load for a different path discards it. The adapter owns the
/// scanner for one operation and hands it back afterwards.
#[derive(Default)]
struct ScannerCache {
    entry: Option<(PathBuf, Scanner)>,
}

impl ScannerCache {
    fn take(
        &mut self,
        path: &Path,
        open: impl FnOnce(&Path) -> Result<Scanner>,
    ) -> Result<Scanner> {
        match self.entry.take() {
            Some((cached, scanner)) if cached == path => {
                trace!(path = %path.display(), "loader.cache_hit");
                Ok(scanner)
            }
            _ => open(path),
        }
    }

    fn put(&mut self, path: &Path, scanner: Scanner) {
        self.entry = Some((path.to_path_buf(), scanner));
    }
}

/// Binds a scanner to the shard requested in `config`.
///
/// Formats that cannot report an edge count ahead of time only support
/// unsharded loads; the planner needs an exact total to cut disjoint ranges.
fn partition_source(scanner: Scanner, config: &LoaderConfig) -> Result<EdgeListSource> {
    let (begin_edge, needed_edges) = match scanner.total_edges() {
        Some(total) => {
            let partition = plan(total, config)?;
            (partition.begin_edge, Some(partition.needed_edges))
        }
        None if config.is_sharded() => {
            return Err(IngestError::Config(
                "sharded load requires an input with a known edge count".into(),
            ))
        }
        None => (0, None),
    };
    EdgeListSource::new(scanner, begin_edge, needed_edges)
}

fn run_direct(
    cache: &mut ScannerCache,
    sink: &mut dyn ReadOnlySink,
    path: &Path,
    config: &LoaderConfig,
    open: impl FnOnce(&Path) -> Result<Scanner>,
) -> Result<()> {
    let scanner = cache.take(path, open)?;
    let mut source = partition_source(scanner, config)?;
    debug!(path = %path.display(), "loader.direct");
    let outcome = sink.build_from(&mut source);
    cache.put(path, source.into_scanner());
    outcome
}

fn run_incremental(
    cache: &mut ScannerCache,
    sink: &mut dyn WritableGraph,
    path: &Path,
    config: &LoaderConfig,
    open: impl FnOnce(&Path) -> Result<Scanner>,
) -> Result<()> {
    let scanner = cache.take(path, open)?;
    let mut source = partition_source(scanner, config)?;
    debug!(path = %path.display(), "loader.incremental");
    sink.begin_batch();
    let outcome = match append_all(sink, &mut source) {
        Ok(()) => sink.commit_batch(),
        Err(err) => {
            sink.abort_batch();
            Err(err)
        }
    };
    cache.put(path, source.into_scanner());
    outcome
}

fn append_all(sink: &mut dyn WritableGraph, source: &mut EdgeListSource) -> Result<()> {
    while let Some(edge) = source.next_edge()? {
        sink.add_edge(edge.tail, edge.head)?;
    }
    Ok(())
}

fn run_data_source(
    cache: &mut ScannerCache,
    path: &Path,
    open: impl FnOnce(&Path) -> Result<Scanner>,
) -> Result<Box<dyn EdgeSource>> {
    let scanner = cache.take(path, open)?;
    let source = partition_source(scanner, &LoaderConfig::whole())?;
    Ok(Box::new(source))
}

/// Parses the `er-<n>-<m>` generator naming pattern from a directory name.
fn parse_generated_name(path: &Path) -> Option<(u32, u64)> {
    let name = path.file_name()?.to_str()?;
    let rest = name.strip_prefix("er-")?;
    let (scale, multiplier) = rest.split_once('-')?;
    Some((scale.parse().ok()?, multiplier.parse().ok()?))
}

fn open_generated(path: &Path) -> Result<Scanner> {
    let (scale, multiplier) = parse_generated_name(path).ok_or_else(|| {
        IngestError::Format(format!(
            "{} does not encode generator parameters",
            path.display()
        ))
    })?;
    Scanner::open_generated(path, scale, multiplier)
}

/// Loader for synthetic generator output: a directory named `er-<n>-<m>`
/// holding uniformly sized record segments. Node and edge totals come from
/// the name, so `stat` and sharded loads are both available.
#[derive(Default)]
pub struct GeneratedLoader {
    cache: ScannerCache,
}

impl GeneratedLoader {
    /// Creates a loader with an empty scanner cache.
    pub fn new() -> Self {
        Self::default()
    }
}

impl FileLoader for GeneratedLoader {
    fn accepts(&self, path: &Path) -> bool {
        path.is_dir() && parse_generated_name(path).is_some()
    }

    fn load_direct(
        &mut self,
        sink: &mut dyn ReadOnlySink,
        path: &Path,
        config: &LoaderConfig,
    ) -> Result<()> {
        run_direct(&mut self.cache, sink, path, config, open_generated)
    }

    fn load_incremental(
        &mut self,
        sink: &mut dyn WritableGraph,
        path: &Path,
        config: &LoaderConfig,
    ) -> Result<()> {
        run_incremental(&mut self.cache, sink, path, config, open_generated)
    }

    fn create_data_source(&mut self, path: &Path) -> Result<Box<dyn EdgeSource>> {
        run_data_source(&mut self.cache, path, open_generated)
    }
}

/// Loader for plain edge-list directories: every regular file is a flat
/// record array, consumed in name order. No size metadata exists, so `stat`
/// is unavailable and only unsharded loads are possible.
#[derive(Default)]
pub struct EdgeDirLoader {
    cache: ScannerCache,
}

impl EdgeDirLoader {
    /// Creates a loader with an empty scanner cache.
    pub fn new() -> Self {
        Self::default()
    }
}

impl FileLoader for EdgeDirLoader {
    fn accepts(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn load_direct(
        &mut self,
        sink: &mut dyn ReadOnlySink,
        path: &Path,
        config: &LoaderConfig,
    ) -> Result<()> {
        run_direct(&mut self.cache, sink, path, config, Scanner::open_directory)
    }

    fn load_incremental(
        &mut self,
        sink: &mut dyn WritableGraph,
        path: &Path,
        config: &LoaderConfig,
    ) -> Result<()> {
        run_incremental(&mut self.cache, sink, path, config, Scanner::open_directory)
    }

    fn create_data_source(&mut self, path: &Path) -> Result<Box<dyn EdgeSource>> {
        run_data_source(&mut self.cache, path, Scanner::open_directory)
    }
}

/// Loader for a single `.bin` file holding a flat record array.
#[derive(Default)]
pub struct BinFileLoader {
    cache: ScannerCache,
}

impl BinFileLoader {
    /// Creates a loader with an empty scanner cache.
    pub fn new() -> Self {
        Self::default()
    }
}

impl FileLoader for BinFileLoader {
    fn accepts(&self, path: &Path) -> bool {
        path.is_file() && path.extension().is_some_and(|ext| ext == "bin")
    }

    fn load_direct(
        &mut self,
        sink: &mut dyn ReadOnlySink,
        path: &Path,
        config: &LoaderConfig,
    ) -> Result<()> {
        run_direct(&mut self.cache, sink, path, config, Scanner::open_file)
    }

    fn load_incremental(
        &mut self,
        sink: &mut dyn WritableGraph,
        path: &Path,
        config: &LoaderConfig,
    ) -> Result<()> {
        run_incremental(&mut self.cache, sink, path, config, Scanner::open_file)
    }

    fn create_data_source(&mut self, path: &Path) -> Result<Box<dyn EdgeSource>> {
        run_data_source(&mut self.cache, path, Scanner::open_file)
    }
}

/// Prioritized list of format front-ends. The first loader whose `accepts`
/// returns true wins; more specific formats are registered ahead of the
/// catch-all directory loader.
pub struct LoaderRegistry {
    loaders: Vec<Box<dyn FileLoader>>,
}

impl LoaderRegistry {
    /// Creates a registry with the built-in loaders in priority order.
    pub fn new() -> Self {
        Self {
            loaders: vec![
                Box::new(GeneratedLoader::new()),
                Box::new(BinFileLoader::new()),
                Box::new(EdgeDirLoader::new()),
            ],
        }
    }

    /// Appends a loader at the lowest priority.
    pub fn register(&mut self, loader: Box<dyn FileLoader>) {
        self.loaders.push(loader);
    }

    /// Returns the highest-priority loader accepting `path`, if any.
    pub fn find(&mut self, path: &Path) -> Option<&mut (dyn FileLoader + 'static)> {
        self.loaders
            .iter_mut()
            .find(|loader| loader.accepts(path))
            .map(|loader| &mut **loader)
    }
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
