use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod hex_utils;
mod render;

#[derive(Parser)]
#[command(name = "binscan")]
#[command(about = "Find byte patterns in binary files")]
struct Args {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a file for a pattern and list the matches
    Find {
        file: PathBuf,

        /// Pattern text, e.g. "48 8B ?? <7F+"
        pattern: String,

        /// Render a hex dump with the matches highlighted
        #[arg(long)]
        dump: bool,

        /// Emit the match list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render a region of a file as a hex+ASCII dump
    Hexdump {
        file: PathBuf,

        /// Start offset (hex, with or without 0x)
        #[arg(short, long, default_value = "0")]
        offset: String,

        /// Number of bytes to render (defaults to the rest of the file)
        #[arg(short, long)]
        size: Option<usize>,

        /// Leave out the ASCII column
        #[arg(long)]
        no_ascii: bool,
    },
    /// Scan a file against a JSON signature set
    Sigscan {
        file: PathBuf,

        /// Path to the signature set JSON
        #[arg(short = 'S', long)]
        signatures: PathBuf,

        /// Scan a single named entry instead of all of them
        #[arg(short, long)]
        name: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("binscan=info".parse()?))
        .init();

    let args = Args::parse();
    let color = !args.no_color;

    match args.command {
        Command::Find {
            file,
            pattern,
            dump,
            json,
        } => commands::find::run(&file, &pattern, dump, json, color),
        Command::Hexdump {
            file,
            offset,
            size,
            no_ascii,
        } => {
            let offset = hex_utils::parse_hex_offset(&offset)?;
            commands::hexdump::run(&file, offset, size, !no_ascii)
        }
        Command::Sigscan {
            file,
            signatures,
            name,
        } => commands::sigscan::run(&file, &signatures, name.as_deref()),
    }
}
