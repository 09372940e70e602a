//! `armtab`: decode and encode A32 instruction words from the command line.
//!
//! ```text
//! armtab decode e0810002 0xe7f000f0
//! armtab encode add rd=0 rn=1 rm=2
//! armtab --arch v7 file firmware.bin
//! armtab dump --out a32.json
//! armtab stats
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use isa::{Arch, ByteCursor, DecodeContext, Operand, OperationId, TableSet};

mod logging;

#[derive(Parser, Debug)]
#[command(name = "armtab", version, about = "A32 instruction encoding tables")]
struct Cli {
    /// Architecture to decode for (v7 or v8).
    #[arg(long, global = true, default_value = "v8")]
    arch: Arch,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Write logs to `armtab.log` in this directory instead of stderr.
    #[arg(long, global = true, value_name = "DIR")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode hex words
    Decode {
        #[arg(required = true, value_name = "HEX")]
        words: Vec<String>,
    },

    /// Encode an operation from `field=value` operands
    Encode {
        op: OperationId,

        #[arg(value_name = "FIELD=VALUE")]
        operands: Vec<Operand>,
    },

    /// Decode a little-endian binary word by word
    File {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },

    /// Write the A32 table set as JSON
    Dump {
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Print table counts and index coverage
    Stats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init(&cli.log_level, cli.log_file.as_deref())?;

    let set = isa::a32().context("building the A32 tables")?;
    let ctx = DecodeContext::new(cli.arch);
    let mut out = io::stdout().lock();

    match cli.command {
        Command::Decode { words } => {
            for text in &words {
                let word = parse_word(text)?;
                writeln!(out, "{}", describe(set, word, &ctx))?;
            }
        }
        Command::Encode { op, operands } => {
            let word = set
                .encode(op, &operands)
                .with_context(|| format!("encoding `{op}`"))?;
            writeln!(out, "{word:#010x}")?;
        }
        Command::File { path } => {
            let bytes = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            let mut cursor = ByteCursor::new(&bytes);
            for (offset, word, _) in set.decode_stream(&mut cursor, ctx) {
                writeln!(out, "{offset:08x}: {}", describe(set, word, &ctx))?;
            }
            let trailing = cursor.remaining();
            if !trailing.is_empty() {
                tracing::warn!("{}: ignoring {} trailing bytes", path.display(), trailing.len());
            }
        }
        Command::Dump { out: path } => {
            let json = serde_json::to_string_pretty(set)?;
            match path {
                Some(path) => {
                    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
                }
                None => writeln!(out, "{json}")?,
            }
        }
        Command::Stats => {
            let checked = set.verify_index().context("checking the opcode index")?;
            let stats = set.stats();
            writeln!(out, "{}", set.name)?;
            writeln!(out, "  tables        {}", stats.tables)?;
            writeln!(out, "  entries       {}", stats.entries)?;
            writeln!(out, "  chains        {} (longest {})", stats.chains, stats.longest_chain)?;
            writeln!(out, "  reserved      {}", stats.reserved)?;
            writeln!(out, "  max depth     {}", stats.max_depth)?;
            writeln!(out, "  canonical     {} (round trip ok: {checked})", stats.canonical)?;
            writeln!(out, "  decode only   {}", stats.decode_only)?;
            writeln!(out, "  unassigned    {}", stats.unassigned)?;
        }
    }

    Ok(())
}

/// Accepts `e0810002`, `0xE081_0002` and the like.
fn parse_word(text: &str) -> Result<u32> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text)
        .replace('_', "");
    u32::from_str_radix(&digits, 16).with_context(|| format!("`{text}` is not a 32-bit hex word"))
}

fn describe(set: &TableSet, word: u32, ctx: &DecodeContext) -> String {
    match set.decode(word, ctx) {
        Ok(decoded) => format!("{word:#010x}  {decoded}"),
        Err(e) => format!("{word:#010x}  <{e}>"),
    }
}
