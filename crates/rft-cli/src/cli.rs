use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rft",
    about = "Inspect reftable files, block sources, and table name lists",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the size of a table file as seen through its mapping
    Stat(StatArgs),
    /// Dump one block of a table file
    Read(ReadArgs),
    /// Parse a newline-delimited name list such as tables.list
    Names(NamesArgs),
    /// Find the first name >= KEY in a sorted name list
    Search(SearchArgs),
    /// Print the digest size for a hash format id
    HashSize(HashSizeArgs),
}

#[derive(Args)]
pub struct StatArgs {
    pub path: PathBuf,
    /// Pre-fault the mapping
    #[arg(long)]
    pub populate: bool,
}

#[derive(Args)]
pub struct ReadArgs {
    pub path: PathBuf,
    #[arg(long, default_value = "0")]
    pub offset: u64,
    /// Bytes to read (default: to end of file)
    #[arg(long)]
    pub length: Option<u32>,
    /// Load the file into memory and read through the buffer source
    #[arg(long)]
    pub buffer: bool,
    /// Pre-fault the mapping
    #[arg(long, conflicts_with = "buffer")]
    pub populate: bool,
}

#[derive(Args)]
pub struct NamesArgs {
    pub path: PathBuf,
    /// Report whether a second list holds the same names in the same order
    #[arg(long)]
    pub compare: Option<PathBuf>,
}

#[derive(Args)]
pub struct SearchArgs {
    pub path: PathBuf,
    pub key: String,
}

#[derive(Args)]
pub struct HashSizeArgs {
    /// `sha1`, `sha256`, or a numeric format id (decimal or 0x-prefixed hex)
    pub id: String,
}
