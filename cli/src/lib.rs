use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use inverted_index::{build_inverted_index, load_documents, Codec, DocId, InvertedIndex, DEFAULT_INDEX_FILENAME};
use std::collections::BTreeSet;
use encoding_rs::WINDOWS_1251;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "inverted-index")]
#[command(about = "Build and query an inverted index over a tab-separated corpus", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build an index from a dataset of `<id>\t<text>` lines
    Build {
        /// Path to the dataset
        #[arg(short, long)]
        dataset: PathBuf,
        /// Dump format: text (json) or binary (struct)
        #[arg(short, long, default_value = "text")]
        strategy: Codec,
        /// Output index file
        #[arg(short, long, default_value = DEFAULT_INDEX_FILENAME)]
        output: PathBuf,
    },
    /// Print the ids of documents matching every word of each query
    Query {
        /// Index file to load
        #[arg(short, long, default_value = DEFAULT_INDEX_FILENAME)]
        index: PathBuf,
        /// Load format: text (json) or binary (struct)
        #[arg(short, long, default_value = "binary")]
        strategy: Codec,
        #[command(flatten)]
        input: QueryInput,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct QueryInput {
    /// One or more queries; each value is split on whitespace
    #[arg(long, num_args = 1..)]
    pub query: Vec<String>,
    /// UTF-8 file with one query per line, or `-` for stdin
    #[arg(long, visible_alias = "query-file-utf8")]
    pub query_file: Option<PathBuf>,
    /// Windows-1251 encoded file with one query per line
    #[arg(long)]
    pub query_file_cp1251: Option<PathBuf>,
}

pub fn run<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    match cli.command {
        Commands::Build { dataset, strategy, output } => build(&dataset, strategy, &output),
        Commands::Query { index, strategy, input } => {
            let queries = read_queries(&input)?;
            query(&index, strategy, &queries, out)
        }
    }
}

pub fn build(dataset: &Path, codec: Codec, output: &Path) -> Result<()> {
    let documents = load_documents(dataset).with_context(|| format!("loading dataset {}", dataset.display()))?;
    let index = build_inverted_index(&documents);
    index
        .dump(output, codec)
        .with_context(|| format!("dumping index to {}", output.display()))?;
    tracing::info!(output = %output.display(), codec = %codec, "index build complete");
    Ok(())
}

/// Answer each query on its own output line; an empty result prints an empty line.
pub fn query<W: Write>(index_path: &Path, codec: Codec, queries: &[Vec<String>], out: &mut W) -> Result<()> {
    let index = InvertedIndex::load(index_path, codec).map_err(|e| {
        let context = if e.is_integrity_error() {
            format!("index {} is damaged or not in {} format", index_path.display(), codec)
        } else {
            format!("loading index {}", index_path.display())
        };
        anyhow::Error::new(e).context(context)
    })?;
    tracing::debug!(%index, "index ready");
    for terms in queries {
        tracing::debug!(?terms, "running query");
        writeln!(out, "{}", format_result(&index.query(terms)))?;
    }
    out.flush()?;
    Ok(())
}

pub fn read_queries(input: &QueryInput) -> Result<Vec<Vec<String>>> {
    if let Some(path) = &input.query_file_cp1251 {
        return read_cp1251_queries(path);
    }
    match &input.query_file {
        Some(path) if path.as_os_str() == "-" => split_lines(io::stdin().lock()),
        Some(path) => {
            let f = File::open(path).with_context(|| format!("opening query file {}", path.display()))?;
            split_lines(BufReader::new(f))
        }
        None => Ok(input.query.iter().map(|q| split_query(q)).collect()),
    }
}

fn read_cp1251_queries(path: &Path) -> Result<Vec<Vec<String>>> {
    let bytes = fs::read(path).with_context(|| format!("opening query file {}", path.display()))?;
    let (text, had_errors) = WINDOWS_1251.decode_without_bom_handling(&bytes);
    if had_errors {
        bail!("query file {} is not valid windows-1251", path.display());
    }
    split_lines(text.as_bytes())
}

fn split_lines<R: BufRead>(reader: R) -> Result<Vec<Vec<String>>> {
    let mut queries = Vec::new();
    for line in reader.lines() {
        let terms = split_query(&line?);
        if !terms.is_empty() {
            queries.push(terms);
        }
    }
    Ok(queries)
}

fn split_query(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_string).collect()
}

pub fn format_result(ids: &BTreeSet<DocId>) -> String {
    ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(",")
}
