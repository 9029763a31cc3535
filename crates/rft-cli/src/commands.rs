use std::path::Path;

use anyhow::{ensure, Context};
use colored::Colorize;
use serde::Serialize;

use rft_basics::{
    common_prefix_size, find_first_true, free_names, hash_size, names_equal, names_length,
    parse_names, HashFormat, Names, Probe,
};
use rft_blocksource::{BlockSource, BlockSourceHandle, FileBlockSource, FileSourceConfig};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Stat(args) => cmd_stat(args, format),
        Command::Read(args) => cmd_read(args, format),
        Command::Names(args) => cmd_names(args, format),
        Command::Search(args) => cmd_search(args, format),
        Command::HashSize(args) => cmd_hash_size(args, format),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct StatReport {
    path: String,
    size: u64,
}

fn cmd_stat(args: StatArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = FileSourceConfig {
        populate: args.populate,
    };
    let source = FileBlockSource::open_with(&args.path, &config)
        .with_context(|| format!("opening {}", args.path.display()))?;
    let report = StatReport {
        path: args.path.display().to_string(),
        size: source.size(),
    };
    Box::new(source).close();

    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            println!("{}: {} bytes", report.path.bold(), report.size);
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct BlockReport {
    path: String,
    backend: &'static str,
    offset: u64,
    length: u32,
    hex: String,
}

fn cmd_read(args: ReadArgs, format: OutputFormat) -> anyhow::Result<()> {
    let buffer = if args.buffer {
        Some(std::fs::read(&args.path).with_context(|| format!("reading {}", args.path.display()))?)
    } else {
        None
    };

    let mut handle = BlockSourceHandle::new();
    match &buffer {
        Some(buf) => handle.bind_buffer(buf),
        None => {
            let config = FileSourceConfig {
                populate: args.populate,
            };
            handle
                .bind_file_with(&args.path, &config)
                .with_context(|| format!("opening {}", args.path.display()))?;
        }
    }

    let size = handle.size();
    let length = block_length(args.offset, args.length, size)?;

    let block = handle.read_block(args.offset, length)?;
    let report = BlockReport {
        path: args.path.display().to_string(),
        backend: if args.buffer { "buffer" } else { "mmap" },
        offset: args.offset,
        length,
        hex: hex::encode(block.as_bytes()),
    };
    let dump = hex_dump(args.offset, block.as_bytes());
    handle.return_block(block);
    handle.close();

    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            println!(
                "{} [{}] offset {} length {}",
                report.path.bold(),
                report.backend.cyan(),
                report.offset,
                report.length
            );
            for line in dump {
                println!("{line}");
            }
            Ok(())
        }
    }
}

/// Validate a user-supplied range against the source size.
fn block_length(offset: u64, length: Option<u32>, size: u64) -> anyhow::Result<u32> {
    ensure!(offset <= size, "offset {offset} is past the end of a {size}-byte source");
    let available = size - offset;
    let length = match length {
        Some(len) => {
            ensure!(
                u64::from(len) <= available,
                "range {offset}+{len} exceeds source size {size}"
            );
            len
        }
        None => u32::try_from(available)
            .with_context(|| format!("{available} bytes remain; pass --length"))?,
    };
    Ok(length)
}

/// Classic 16-bytes-per-line dump with an ASCII column.
fn hex_dump(base: u64, bytes: &[u8]) -> Vec<String> {
    bytes
        .chunks(16)
        .enumerate()
        .map(|(i, chunk)| {
            let cells: Vec<String> = chunk.iter().map(|b| format!("{b:02x}")).collect();
            let ascii: String = chunk
                .iter()
                .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
                .collect();
            format!(
                "{:08x}  {:<47}  |{}|",
                base + (i as u64) * 16,
                cells.join(" "),
                ascii
            )
        })
        .collect()
}

fn read_names(path: &Path) -> anyhow::Result<Names> {
    let buf = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(parse_names(&buf)?)
}

#[derive(Serialize)]
struct NamesReport {
    path: String,
    count: usize,
    names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    equal: Option<bool>,
}

fn cmd_names(args: NamesArgs, format: OutputFormat) -> anyhow::Result<()> {
    let names = read_names(&args.path)?;
    let other = args.compare.as_deref().map(read_names).transpose()?;

    let report = NamesReport {
        path: args.path.display().to_string(),
        count: names_length(&names),
        names: names
            .iter()
            .map(|n| String::from_utf8_lossy(n).into_owned())
            .collect(),
        equal: other.as_ref().map(|o| names_equal(&names, o)),
    };
    free_names(Some(names));
    free_names(other);

    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            for (i, name) in report.names.iter().enumerate() {
                println!("{:>4}  {}", i, name);
            }
            println!("{} names", report.count.to_string().bold());
            match report.equal {
                Some(true) => println!("{}", "lists are identical".green()),
                Some(false) => println!("{}", "lists differ".red()),
                None => {}
            }
            Ok(())
        }
    }
}

#[derive(Debug, PartialEq, Eq, Serialize)]
struct SearchReport {
    key: String,
    index: usize,
    name: Option<String>,
    exact: bool,
    common_prefix: usize,
}

/// Locate the first name `>= key` in a sorted list.
fn search_names(names: &Names, key: &[u8]) -> SearchReport {
    let list: Vec<&[u8]> = names.iter().collect();
    if !list.windows(2).all(|w| w[0] <= w[1]) {
        tracing::warn!("name list is not sorted; search result is arbitrary");
    }

    let index = find_first_true(list.len(), |i| Probe::from(list[i] >= key));
    let found = list.get(index).copied();
    SearchReport {
        key: String::from_utf8_lossy(key).into_owned(),
        index,
        name: found.map(|n| String::from_utf8_lossy(n).into_owned()),
        exact: found == Some(key),
        common_prefix: found.map_or(0, |n| common_prefix_size(n, key)),
    }
}

fn cmd_search(args: SearchArgs, format: OutputFormat) -> anyhow::Result<()> {
    let names = read_names(&args.path)?;
    let report = search_names(&names, args.key.as_bytes());
    free_names(Some(names));

    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            match &report.name {
                Some(name) if report.exact => {
                    println!("{} {} at index {}", "found".green().bold(), name, report.index)
                }
                Some(name) => println!(
                    "{} next name is {} at index {} (shares {} bytes)",
                    "not found;".yellow(),
                    name,
                    report.index,
                    report.common_prefix
                ),
                None => println!(
                    "{} key sorts after every name (index {})",
                    "not found;".yellow(),
                    report.index
                ),
            }
            Ok(())
        }
    }
}

/// Accepts `sha1`, `sha256`, decimal, or `0x`-prefixed hex ids.
fn parse_hash_id(arg: &str) -> anyhow::Result<HashFormat> {
    if let Ok(format) = arg.parse::<HashFormat>() {
        return Ok(format);
    }
    let id = match arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X")) {
        Some(digits) => u32::from_str_radix(digits, 16),
        None => arg.parse::<u32>(),
    }
    .with_context(|| format!("not a hash format name or id: {arg}"))?;
    Ok(HashFormat::try_from(id)?)
}

#[derive(Serialize)]
struct HashReport {
    format: String,
    format_id: u32,
    size: usize,
}

fn cmd_hash_size(args: HashSizeArgs, format: OutputFormat) -> anyhow::Result<()> {
    let hash = parse_hash_id(&args.id)?;
    let report = HashReport {
        format: hash.to_string(),
        format_id: hash.format_id(),
        size: hash_size(hash.format_id()),
    };

    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            println!(
                "{} ({:#010x}): {} bytes",
                report.format.cyan(),
                report.format_id,
                report.size
            );
            Ok(())
        }
    }
}
