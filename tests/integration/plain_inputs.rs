#![allow(missing_docs)]

use std::fs;

use lamina_ingest::{
    config::LoaderConfig,
    ingest::{BinFileLoader, EdgeDirLoader, EdgeSource, FileLoader},
    testkit::{write_segment, CollectingSink},
    types::{IngestError, Result},
};
use tempfile::tempdir;

#[test]
fn plain_directory_yields_records_in_file_then_offset_order() -> Result<()> {
    let dir = tempdir()?;
    write_segment(&dir.path().join("00.dat"), &[(10, 11), (12, 13), (14, 15)])?;
    write_segment(&dir.path().join("01.dat"), &[(20, 21), (22, 23)])?;

    let mut loader = EdgeDirLoader::new();
    let mut source = loader.create_data_source(dir.path())?;
    assert!(source.stat().is_none(), "plain directories report no sizes");

    let mut seen = Vec::new();
    while let Some(edge) = source.next_edge()? {
        seen.push((edge.tail.0, edge.head.0));
    }
    assert_eq!(
        seen,
        vec![(10, 11), (12, 13), (14, 15), (20, 21), (22, 23)]
    );
    Ok(())
}

#[test]
fn empty_directory_fails_fast_with_an_environment_error() -> Result<()> {
    let dir = tempdir()?;
    let mut loader = EdgeDirLoader::new();
    let mut sink = CollectingSink::default();
    let err = loader
        .load_direct(&mut sink, dir.path(), &LoaderConfig::whole())
        .unwrap_err();
    assert!(matches!(err, IngestError::Environment(_)), "got {err:?}");
    assert!(sink.edges.is_empty());
    Ok(())
}

#[test]
fn single_bin_file_loads_through_the_file_loader() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("edges.bin");
    write_segment(&path, &[(1, 2), (3, 4), (5, 6)])?;

    let mut loader = BinFileLoader::new();
    assert!(loader.accepts(&path));
    assert!(!loader.accepts(&dir.path().join("edges.txt")));

    let mut sink = CollectingSink::default();
    loader.load_direct(&mut sink, &path, &LoaderConfig::whole())?;
    assert_eq!(sink.edges, vec![(1, 2), (3, 4), (5, 6)]);
    assert_eq!(sink.sized, Some(3), "sizing pass saw every record");
    Ok(())
}

#[test]
fn truncated_backing_file_is_a_format_error() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("edges.bin");
    let mut bytes = lamina_ingest::testkit::encode_records(&[(1, 2)]);
    bytes.truncate(bytes.len() - 3);
    fs::write(&path, bytes)?;

    let mut loader = BinFileLoader::new();
    let err = loader.create_data_source(&path).unwrap_err();
    assert!(matches!(err, IngestError::Format(_)), "got {err:?}");
    Ok(())
}
