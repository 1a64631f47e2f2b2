use clap::Parser;
use inverted_index::Codec;
use inverted_index_cli::{build, query, run, Cli};
use std::fs;
use tempfile::tempdir;

fn queries(raw: &[&str]) -> Vec<Vec<String>> {
    raw.iter().map(|q| q.split_whitespace().map(str::to_string).collect()).collect()
}

#[test]
fn build_then_query_prints_one_line_per_query() {
    let dir = tempdir().unwrap();
    let dataset = dir.path().join("dataset.tsv");
    fs::write(&dataset, "1\tfirst text line\n2\tsecond text line\n3\tthird text line\n").unwrap();

    for codec in [Codec::Text, Codec::Binary] {
        let index = dir.path().join(format!("inverted.{codec}"));
        build(&dataset, codec, &index).unwrap();

        let mut out = Vec::new();
        query(&index, codec, &queries(&["text line", "FIRST", "nope"]), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1,2,3\n1\n\n");
    }
}

#[test]
fn run_dispatches_parsed_commands() {
    let dir = tempdir().unwrap();
    let dataset = dir.path().join("dataset.tsv");
    let index = dir.path().join("inverted.index");
    let query_file = dir.path().join("queries.txt");
    fs::write(&dataset, "5\tapple banana\n6\tbanana cherry\n").unwrap();
    fs::write(&query_file, "banana\n\napple banana\ncherry apple\n").unwrap();

    let argv = |args: &[&str]| {
        let mut full = vec!["inverted-index".to_string()];
        full.extend(args.iter().map(|a| a.to_string()));
        Cli::try_parse_from(full).unwrap()
    };
    let dataset = dataset.to_string_lossy().to_string();
    let index = index.to_string_lossy().to_string();
    let query_file = query_file.to_string_lossy().to_string();

    let mut out = Vec::new();
    run(argv(&["build", "-d", &dataset, "-s", "struct", "-o", &index]), &mut out).unwrap();
    assert!(out.is_empty());

    run(argv(&["query", "-i", &index, "--query-file", &query_file]), &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "5,6\n5\n\n");
}

#[test]
fn missing_dataset_reports_context() {
    let dir = tempdir().unwrap();
    let err = build(&dir.path().join("absent.tsv"), Codec::Text, &dir.path().join("out.index")).unwrap_err();
    assert!(format!("{err:#}").contains("loading dataset"));
    assert!(err.downcast_ref::<inverted_index::IndexError>().is_some());
}

#[test]
fn cp1251_query_file_is_decoded() {
    let dir = tempdir().unwrap();
    let dataset = dir.path().join("dataset.tsv");
    let index = dir.path().join("inverted.index");
    let query_file = dir.path().join("queries.cp1251");
    fs::write(&dataset, "1\tПривет мир\n2\tмир труд май\n").unwrap();
    let (encoded, _, unmappable) = encoding_rs::WINDOWS_1251.encode("привет мир\nМИР\nтруд привет\n");
    assert!(!unmappable);
    fs::write(&query_file, &encoded).unwrap();

    let mut out = Vec::new();
    build(&dataset, Codec::Binary, &index).unwrap();
    let cli = Cli::try_parse_from([
        "inverted-index".to_string(),
        "query".to_string(),
        "-i".to_string(),
        index.to_string_lossy().to_string(),
        "--query-file-cp1251".to_string(),
        query_file.to_string_lossy().to_string(),
    ])
    .unwrap();
    run(cli, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "1\n1,2\n\n");
}

#[test]
fn damaged_index_is_reported_as_such() {
    let dir = tempdir().unwrap();
    let dataset = dir.path().join("dataset.tsv");
    let index = dir.path().join("inverted.index");
    fs::write(&dataset, "1\talpha beta\n").unwrap();
    build(&dataset, Codec::Binary, &index).unwrap();

    let mut bytes = fs::read(&index).unwrap();
    bytes.pop();
    fs::write(&index, &bytes).unwrap();

    let mut out = Vec::new();
    let err = query(&index, Codec::Binary, &queries(&["alpha"]), &mut out).unwrap_err();
    assert!(format!("{err:#}").contains("is damaged or not in binary format"));
    assert!(out.is_empty());

    let err = query(&dir.path().join("absent.index"), Codec::Binary, &queries(&["alpha"]), &mut out).unwrap_err();
    assert!(format!("{err:#}").contains("loading index"));
}
