/// Output formatting: numbered list (stdout and file) and JSON.
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use pairrank_core::Ranking;
use serde::Serialize;

#[derive(Serialize)]
struct JsonRankedItem<'a> {
    rank: usize,
    item: &'a str,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    items: Vec<JsonRankedItem<'a>>,
    comparisons: usize,
}

/// Write `{rank}. {item}` lines, most preferred first.
pub fn write_ranking<W: Write>(ranking: &Ranking, out: &mut W) -> io::Result<()> {
    for (rank, item) in ranking.ranked() {
        writeln!(out, "{rank}. {item}")?;
    }
    Ok(())
}

/// Print the ranking to stdout under a heading.
pub fn print_ranking(ranking: &Ranking) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "\nFinal ranking (best -> worst):")?;
    write_ranking(ranking, &mut out)?;
    out.flush()
}

/// Write the ranking to `path`, same format as stdout minus the heading.
pub fn write_ranking_file(ranking: &Ranking, path: &Path) -> io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    write_ranking(ranking, &mut w)?;
    w.flush()
}

pub fn render_json(ranking: &Ranking) -> serde_json::Result<String> {
    let output = JsonOutput {
        items: ranking
            .ranked()
            .map(|(rank, item)| JsonRankedItem { rank, item })
            .collect(),
        comparisons: ranking.comparisons(),
    };
    serde_json::to_string_pretty(&output)
}

/// Print results as JSON.
pub fn print_json(ranking: &Ranking) -> serde_json::Result<()> {
    println!("{}", render_json(ranking)?);
    Ok(())
}
