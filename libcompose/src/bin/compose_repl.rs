//! Line-oriented driver for a composition context.
//!
//! Every character of an input line is sent as one key. Escapes:
//! `\b` Backspace, `\n` Enter, `\e` Escape, `\\` a literal backslash.
//! Lines starting with `:` are commands (`:method table`, `:layout hsu`,
//! `:next`, `:prev`, `:toggle`, `:charset`, `:mode big5`).

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use libcompose::{
    CompositionContext, InputMethod, IntcodeMode, KeyEvent, KeyResult, KeyboardLayout, Registry,
    ZhuyinConfig, PHO_FILE, TSIN_FILE,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Method {
    Phonetic,
    Phrase,
    Table,
    Intcode,
}

impl From<Method> for InputMethod {
    fn from(m: Method) -> Self {
        match m {
            Method::Phonetic => InputMethod::Phonetic,
            Method::Phrase => InputMethod::Phrase,
            Method::Table => InputMethod::Table,
            Method::Intcode => InputMethod::Intcode,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Type keys into a composition context", long_about = None)]
struct Cli {
    /// Data directories searched for pho.tab2, tsin32 and .gtab files
    #[arg(short, long = "data-dir")]
    data_dirs: Vec<PathBuf>,

    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keyboard layout name or alias (overrides the settings file)
    #[arg(short, long)]
    layout: Option<String>,

    #[arg(short, long, value_enum, default_value = "phonetic")]
    method: Method,

    /// GTAB file to load for the table method
    #[arg(short, long)]
    table: Option<String>,

    /// Print the full view as JSON after every line
    #[arg(long, default_value_t = false)]
    json: bool,

    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let mut registry = if cli.data_dirs.is_empty() {
        Registry::from_env()
    } else {
        Registry::new(cli.data_dirs.clone())
    };
    if let Err(e) = registry.load_pho(PHO_FILE) {
        warn!("phonetic dictionary unavailable: {}", e);
    }

    let mut config = match &cli.config {
        Some(path) => ZhuyinConfig::load_toml(path)
            .with_context(|| format!("reading settings from {}", path.display()))?,
        None => ZhuyinConfig::default(),
    };
    if let Some(name) = &cli.layout {
        config.keyboard_layout = KeyboardLayout::from_name(name)?;
    }

    let mut ctx = CompositionContext::with_config(&registry, config);
    match InputMethod::from(cli.method) {
        InputMethod::Table => {
            let Some(file) = &cli.table else {
                bail!("--table is required with --method table");
            };
            ctx.load_gtab(&mut registry, file)
                .with_context(|| format!("loading table {}", file))?;
        }
        InputMethod::Phrase => {
            if let Err(e) = ctx.load_tsin(&mut registry, TSIN_FILE) {
                warn!("phrase database unavailable: {}", e);
                ctx.set_method(InputMethod::Phrase);
            }
        }
        method => ctx.set_method(method),
    }
    info!(method = ?ctx.method(), layout = %ctx.keyboard_layout(), "ready");

    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if let Some(command) = line.strip_prefix(':') {
            if let Err(e) = run_command(&mut ctx, &mut registry, command) {
                writeln!(out, "error: {:#}", e)?;
            }
            if !ctx.commit_text().is_empty() {
                writeln!(out, "commit: {}", ctx.take_commit())?;
            }
        } else {
            for event in parse_keys(&line) {
                let result = ctx.process_event(event);
                if result == KeyResult::Commit {
                    writeln!(out, "commit: {}", ctx.take_commit())?;
                }
            }
        }
        print_state(&mut out, &ctx, cli.json)?;
    }
    Ok(())
}

fn parse_keys(line: &str) -> Vec<KeyEvent> {
    let mut events = Vec::new();
    let mut chars = line.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            events.push(KeyEvent::from_char(ch));
            continue;
        }
        match chars.next() {
            Some('b') => events.push(KeyEvent::backspace()),
            Some('n') => events.push(KeyEvent::enter()),
            Some('e') => events.push(KeyEvent::escape()),
            Some(other) => events.push(KeyEvent::from_char(other)),
            None => events.push(KeyEvent::from_char('\\')),
        }
    }
    events
}

fn run_command(ctx: &mut CompositionContext, registry: &mut Registry, command: &str) -> Result<()> {
    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();
    match (name, arg) {
        ("method", Some("phonetic")) => ctx.set_method(InputMethod::Phonetic),
        ("method", Some("phrase")) => ctx.set_method(InputMethod::Phrase),
        ("method", Some("intcode")) => ctx.set_method(InputMethod::Intcode),
        ("method", Some("table")) => ctx.set_method(InputMethod::Table),
        ("table", Some(file)) => ctx.load_gtab(registry, file)?,
        ("layout", Some(layout)) => ctx.set_keyboard_layout_by_name(layout)?,
        ("mode", Some("big5")) => ctx.set_intcode_mode(IntcodeMode::Big5),
        ("mode", Some("unicode")) => ctx.set_intcode_mode(IntcodeMode::Unicode),
        ("next", None) => {
            ctx.page_down();
        }
        ("prev", None) => {
            ctx.page_up();
        }
        ("toggle", None) => {
            ctx.toggle_chinese_mode();
        }
        ("charset", None) => {
            ctx.toggle_charset();
        }
        ("commit", None) => {
            ctx.tsin_commit_phrase();
        }
        _ => bail!("unknown command :{}", command),
    }
    Ok(())
}

fn print_state(out: &mut impl Write, ctx: &CompositionContext, json: bool) -> Result<()> {
    let view = ctx.view();
    if json {
        writeln!(out, "{}", serde_json::to_string(&view)?)?;
        return Ok(());
    }
    if !view.preedit_text.is_empty() {
        writeln!(out, "preedit: {}", view.preedit_text)?;
    }
    if !view.candidates.is_empty() {
        let keys: Vec<char> = view.selection_keys.chars().collect();
        let listed: Vec<String> = view
            .candidates
            .iter()
            .enumerate()
            .map(|(i, text)| match keys.get(i) {
                Some(key) => format!("{}.{}", key, text),
                None => text.clone(),
            })
            .collect();
        writeln!(out, "candidates: {} {}", listed.join(" "), view.auxiliary_text)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_become_control_keys() {
        let events = parse_keys(r"2k\b\n\e\\");
        assert_eq!(
            events,
            vec![
                KeyEvent::from_char('2'),
                KeyEvent::from_char('k'),
                KeyEvent::backspace(),
                KeyEvent::enter(),
                KeyEvent::escape(),
                KeyEvent::from_char('\\'),
            ]
        );
    }
}
