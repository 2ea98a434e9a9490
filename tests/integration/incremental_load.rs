#![allow(missing_docs)]

use std::fs;

use lamina_ingest::{
    config::LoaderConfig,
    ingest::{EdgeDirLoader, FileLoader, GeneratedLoader},
    testkit::{write_generated_dir, write_segment, MemoryGraph},
    types::{IngestError, Result},
};
use tempfile::tempdir;

#[test]
fn incremental_load_appends_one_committed_batch() -> Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("er-2-2");
    fs::create_dir(&input)?;
    let edges: Vec<(u64, u64)> = (0..8).map(|i| (i % 4, (i + 1) % 4)).collect();
    write_generated_dir(&input, &edges, 4)?;

    let mut graph = MemoryGraph::default();
    let mut loader = GeneratedLoader::new();
    loader.load_incremental(&mut graph, &input, &LoaderConfig::whole())?;
    assert_eq!(graph.edges(), edges);
    Ok(())
}

#[test]
fn sharded_incremental_loads_append_disjoint_ranges() -> Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("er-2-2");
    fs::create_dir(&input)?;
    let edges: Vec<(u64, u64)> = (0..8).map(|i| (i, 7 - i)).collect();
    write_generated_dir(&input, &edges, 4)?;

    let mut graph = MemoryGraph::default();
    let mut loader = GeneratedLoader::new();
    loader.load_incremental(&mut graph, &input, &LoaderConfig::shard(2, 2))?;
    assert_eq!(graph.edges(), &edges[4..]);
    Ok(())
}

#[test]
fn failed_incremental_load_leaves_the_graph_untouched() -> Result<()> {
    let dir = tempdir()?;
    write_segment(&dir.path().join("edges.dat"), &[(1, 2), (3, 4), (5, 6)])?;

    let mut graph = MemoryGraph::default();
    graph.fail_after = Some(2);
    let mut loader = EdgeDirLoader::new();
    let err = loader
        .load_incremental(&mut graph, dir.path(), &LoaderConfig::whole())
        .unwrap_err();
    assert!(matches!(err, IngestError::Format(_)), "got {err:?}");
    assert!(graph.edges().is_empty(), "aborted batch left no edges behind");

    // The same loader instance can retry the whole operation afterwards.
    graph.fail_after = None;
    loader.load_incremental(&mut graph, dir.path(), &LoaderConfig::whole())?;
    assert_eq!(graph.edges(), vec![(1, 2), (3, 4), (5, 6)]);
    Ok(())
}
