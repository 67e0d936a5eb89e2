//! Command-line pager on top of `piece-buffer`.
//!
//! Loads a file, optionally applies a script of edits, then prints a window of lines.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p piece-pager -- notes.txt --from-line 100 --lines 20
//! cargo run -p piece-pager -- notes.txt --edit insert:0:TODO\\n --edit delete:10:5 --edit undo
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`
//! (for example `RUST_LOG=piece_buffer=trace`).

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use piece_buffer::{Buffer, BufferConfig};
use tracing::{Level, debug, info};
use tracing_subscriber::EnvFilter;
use unicode_width::UnicodeWidthChar;

#[derive(Parser, Debug)]
#[command(name = "piece-pager")]
#[command(about = "Print a window of lines from a file, optionally after scripted edits", long_about = None)]
#[command(version)]
struct Args {
    /// File to open
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// First line to print (0-based)
    #[arg(long, default_value_t = 0, value_name = "LINE")]
    from_line: usize,

    /// Number of lines to print
    #[arg(long, default_value_t = 40, value_name = "COUNT")]
    lines: usize,

    /// Clip printed lines to this many terminal columns
    #[arg(long, value_name = "COLUMNS")]
    width: Option<usize>,

    /// Edit to apply before printing: `insert:POS:TEXT`, `delete:POS:LEN` or `undo`.
    /// May be repeated; edits run in order. `\n` in TEXT is a newline.
    #[arg(long = "edit", value_name = "EDIT", value_parser = parse_edit)]
    edits: Vec<Edit>,

    /// Verify buffer invariants after every edit
    #[arg(long)]
    check_invariants: bool,

    /// Always give inserted text its own piece
    #[arg(long)]
    no_coalesce: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Edit {
    Insert { at: usize, text: String },
    Delete { from: usize, length: usize },
    Undo,
}

fn parse_edit(s: &str) -> Result<Edit, String> {
    if s == "undo" {
        return Ok(Edit::Undo);
    }

    let (kind, rest) = s
        .split_once(':')
        .ok_or_else(|| format!("expected `insert:POS:TEXT`, `delete:POS:LEN` or `undo`, got `{s}`"))?;
    let (position, argument) = rest
        .split_once(':')
        .ok_or_else(|| format!("missing second `:` in `{s}`"))?;
    let position: usize = position
        .parse()
        .map_err(|e| format!("invalid position `{position}`: {e}"))?;

    match kind {
        "insert" => Ok(Edit::Insert {
            at: position,
            text: argument.replace("\\n", "\n"),
        }),
        "delete" => Ok(Edit::Delete {
            from: position,
            length: argument
                .parse()
                .map_err(|e| format!("invalid length `{argument}`: {e}"))?,
        }),
        other => Err(format!("unknown edit `{other}`")),
    }
}

fn apply_edits(buffer: &mut Buffer, edits: &[Edit]) -> Result<()> {
    for (step, edit) in edits.iter().enumerate() {
        debug!(step, ?edit, "applying edit");
        match edit {
            Edit::Insert { at, text } => buffer
                .insert(text, *at)
                .with_context(|| format!("edit {}: insert at {at}", step + 1))?,
            Edit::Delete { from, length } => buffer
                .delete(*from, *length)
                .with_context(|| format!("edit {}: delete {length} at {from}", step + 1))?,
            Edit::Undo => {
                if !buffer.undo() {
                    info!(step, "nothing to undo");
                }
            }
        }
    }
    Ok(())
}

/// Cut `line` (without its newline) to at most `width` terminal columns.
fn clip(line: &str, width: usize) -> &str {
    let mut used = 0;
    for (i, c) in line.char_indices() {
        used += c.width().unwrap_or(0);
        if used > width {
            return &line[..i];
        }
    }
    line
}

fn print_lines(buffer: &mut Buffer, args: &Args, out: &mut impl Write) -> io::Result<()> {
    for line in buffer.lazy_lines(args.from_line).take(args.lines) {
        let line = line.strip_suffix('\n').unwrap_or(&line);
        let line = match args.width {
            Some(width) => clip(line, width),
            None => line,
        };
        writeln!(out, "{line}")?;
    }
    out.flush()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = BufferConfig::default()
        .with_check_invariants(args.check_invariants)
        .with_coalesce_appends(!args.no_coalesce);
    let mut buffer = Buffer::from_file(&args.file, config)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    info!(
        file = %args.file.display(),
        chars = buffer.len(),
        "loaded"
    );

    apply_edits(&mut buffer, &args.edits)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    print_lines(&mut buffer, &args, &mut out).context("Failed to write output")?;
    Ok(())
}
