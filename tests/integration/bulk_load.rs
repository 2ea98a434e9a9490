#![allow(missing_docs)]

use std::fs;

use lamina_ingest::{
    config::LoaderConfig,
    ingest::{EdgeSource, FileLoader, GeneratedLoader, LoaderRegistry},
    testkit::{write_generated_dir, CollectingSink},
    types::{IngestError, Result},
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tempfile::tempdir;

#[test]
fn two_shards_of_a_generated_graph_reassemble_the_whole_stream() -> Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("er-2-2");
    fs::create_dir(&input)?;
    // 4 nodes, multiplier 2: 8 edges across two uniform segments.
    let edges: Vec<(u64, u64)> = (0..8).map(|i| (i % 4, (i + 3) % 4)).collect();
    write_generated_dir(&input, &edges, 4)?;

    let mut whole = CollectingSink::default();
    let mut loader = GeneratedLoader::new();
    loader.load_direct(&mut whole, &input, &LoaderConfig::whole())?;
    assert_eq!(whole.edges, edges);
    assert_eq!(whole.sized, Some(8));

    let mut reassembled = Vec::new();
    for part in 1..=2 {
        let mut shard = CollectingSink::default();
        let mut loader = GeneratedLoader::new();
        loader.load_direct(&mut shard, &input, &LoaderConfig::shard(2, part))?;
        assert_eq!(shard.edges.len(), 4, "each shard owns half the stream");
        reassembled.extend(shard.edges);
    }
    assert_eq!(reassembled, edges);
    Ok(())
}

#[test]
fn many_shards_of_a_larger_graph_cover_every_edge_once() -> Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("er-6-8");
    fs::create_dir(&input)?;
    // 64 nodes, multiplier 8: 512 edges across 8 uniform segments.
    let mut rng = ChaCha8Rng::seed_from_u64(0x1a31);
    let edges: Vec<(u64, u64)> = (0..512)
        .map(|_| (rng.gen_range(0..64), rng.gen_range(0..64)))
        .collect();
    write_generated_dir(&input, &edges, 64)?;

    let mut reassembled = Vec::new();
    for part in 1..=4 {
        let mut shard = CollectingSink::default();
        let mut loader = GeneratedLoader::new();
        loader.load_direct(&mut shard, &input, &LoaderConfig::shard(4, part))?;
        assert_eq!(shard.edges.len(), 128);
        reassembled.extend(shard.edges);
    }
    assert_eq!(reassembled, edges);
    Ok(())
}

#[test]
fn non_divisible_shard_count_fails_before_reading_data() -> Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("er-2-2");
    fs::create_dir(&input)?;
    let edges: Vec<(u64, u64)> = (0..8).map(|i| (i, i)).collect();
    write_generated_dir(&input, &edges, 4)?;

    let mut sink = CollectingSink::default();
    let mut loader = GeneratedLoader::new();
    // 8 edges do not divide into 3 parts.
    let err = loader
        .load_direct(&mut sink, &input, &LoaderConfig::shard(3, 1))
        .unwrap_err();
    assert!(matches!(err, IngestError::Config(_)), "got {err:?}");
    assert!(sink.edges.is_empty());
    assert_eq!(sink.sized, None, "builder never ran");
    Ok(())
}

#[test]
fn registry_dispatches_generated_dirs_to_the_generated_loader() -> Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("er-2-2");
    fs::create_dir(&input)?;
    let edges: Vec<(u64, u64)> = (0..8).map(|i| (i, i + 1)).collect();
    write_generated_dir(&input, &edges, 4)?;

    let mut registry = LoaderRegistry::new();
    let loader = registry.find(&input).expect("generated dir accepted");
    let source = loader.create_data_source(&input)?;
    let stat = source.stat().expect("generated inputs are sized");
    assert_eq!((stat.nodes, stat.edges), (4, 8));
    Ok(())
}
