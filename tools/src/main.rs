use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use libcompose_core::{search_methods, search_tables, GtabTable, PhoDictionary, Registry};
use libzhuyin::{key_to_slots, parse_bopomofo, pho2key, render};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Inspect and build composition data files")]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[arg(global = true, short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize a phonetic dictionary (pho.tab2)
    InspectPho {
        file: PathBuf,
        /// Print at most this many syllables
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Summarize a GTAB table
    InspectGtab { file: PathBuf },
    /// Look up a Bopomofo syllable, e.g. ㄉㄜ˙
    Lookup { file: PathBuf, syllable: String },
    /// Build pho.tab2 from `bopomofo<TAB>text<TAB>count` lines
    BuildPho {
        input: PathBuf,
        #[arg(short, long, default_value = "pho.tab2")]
        out: PathBuf,
    },
    /// Search methods and well-known tables by name
    Search {
        query: String,
        /// Data directory used to report which tables load
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::InspectPho { file, limit } => inspect_pho(&file, limit),
        Command::InspectGtab { file } => inspect_gtab(&file),
        Command::Lookup { file, syllable } => lookup(&file, &syllable),
        Command::BuildPho { input, out } => build_pho(&input, &out),
        Command::Search {
            query,
            data_dir,
            json,
        } => search(&query, data_dir, json),
    }
}

fn inspect_pho(file: &Path, limit: usize) -> Result<()> {
    let dict = PhoDictionary::load(file).with_context(|| format!("loading {}", file.display()))?;
    println!("syllables: {}", dict.key_count());
    println!("items:     {}", dict.item_count());
    println!("phrases:   {} bytes", dict.phrase_area_len());

    let keys = dict
        .index_entries()
        .iter()
        .map(|entry| entry.key)
        .filter(|&key| !dict.items_for(key).is_empty());
    for key in keys.take(limit) {
        let texts: Vec<String> = dict.lookup(key).into_iter().map(|c| c.text).collect();
        println!("{:#06x} {}\t{}", key, render(&key_to_slots(key)), texts.join(" "));
    }
    Ok(())
}

fn inspect_gtab(file: &Path) -> Result<()> {
    let table = GtabTable::load(file).with_context(|| format!("loading {}", file.display()))?;
    println!("name:           {}", table.name);
    println!("keys:           {}", table.keys());
    println!("key count:      {}", table.key_count);
    println!("max press:      {}", table.max_press);
    println!("selection keys: {}", table.selection_keys);
    println!("items:          {}", table.items().len());
    println!("wide keys:      {}", table.is_wide());
    Ok(())
}

fn lookup(file: &Path, syllable: &str) -> Result<()> {
    let Some(slots) = parse_bopomofo(syllable) else {
        bail!("not a Bopomofo syllable: {}", syllable);
    };
    let dict = PhoDictionary::load(file).with_context(|| format!("loading {}", file.display()))?;
    let key = pho2key(&slots);
    let found = dict.lookup(key);
    if found.is_empty() {
        println!("{} ({:#06x}): no candidates", render(&slots), key);
    }
    for (i, cand) in found.iter().enumerate() {
        println!("{}. {} ({})", i + 1, cand.text, cand.usage);
    }
    Ok(())
}

fn build_pho(input: &Path, out: &Path) -> Result<()> {
    let reader = BufReader::new(File::open(input).with_context(|| format!("opening {}", input.display()))?);
    let mut rows: Vec<(u16, String, i32)> = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split('\t');
        let (Some(syllable), Some(text)) = (fields.next(), fields.next()) else {
            warn!(line = lineno + 1, "skipping line without text");
            continue;
        };
        let Some(slots) = parse_bopomofo(syllable) else {
            warn!(line = lineno + 1, syllable, "skipping unparseable syllable");
            continue;
        };
        let count = match fields.next() {
            Some(n) => n
                .trim()
                .parse()
                .with_context(|| format!("line {}: bad count {:?}", lineno + 1, n))?,
            None => 0,
        };
        rows.push((pho2key(&slots), text.to_string(), count));
    }

    let dict = PhoDictionary::from_entries(rows.iter().map(|(key, text, count)| (*key, text.as_str(), *count)))?;
    fs::write(out, dict.to_bytes()).with_context(|| format!("writing {}", out.display()))?;
    info!(items = dict.item_count(), syllables = dict.key_count(), "dictionary built");
    println!("Wrote {} items to {}", dict.item_count(), out.display());
    Ok(())
}

fn search(query: &str, data_dir: Option<PathBuf>, json: bool) -> Result<()> {
    let mut registry = match data_dir {
        Some(dir) => Registry::new([dir]),
        None => Registry::from_env(),
    };
    for table in registry.tables() {
        if let Err(e) = registry.load_gtab(table.filename) {
            info!(filename = table.filename, "not loaded: {}", e);
        }
    }

    let methods = search_methods(query, None);
    let tables = search_tables(&registry, query);
    if json {
        let doc = serde_json::json!({ "methods": methods, "tables": tables });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }
    for m in &methods {
        println!("{:>3} {} {}", m.score, m.name, m.filename);
    }
    for t in &tables {
        let state = if t.info.loaded { "loaded" } else { "missing" };
        println!("{:>3} {} {} [{}]", t.score, t.info.name, t.info.filename, state);
    }
    Ok(())
}
