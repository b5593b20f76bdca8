use std::path::PathBuf;

use anyhow::Context;
use bt_ledger::ChainConfig;
use clap::Parser;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(
    name = "blocktrain",
    about = "BlockTrain: batching hash-chain ledger shell",
    version
)]
pub struct Cli {
    /// TOML file with chain settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Items per sealed block; overrides the config file
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Log tree building and chain walks
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else if self.quiet {
            Level::WARN
        } else {
            Level::INFO
        }
    }

    /// Settings from `--config` (or defaults), with `--batch-size` applied.
    pub fn chain_config(&self) -> anyhow::Result<ChainConfig> {
        let mut config = match &self.config {
            Some(path) => ChainConfig::load(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => ChainConfig::default(),
        };
        if let Some(batch_size) = self.batch_size {
            config = config.with_batch_size(batch_size);
        }
        config.validate().context("invalid --batch-size")?;
        Ok(config)
    }
}

/// What `print` shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrintTarget {
    Chain,
    Latest,
    Buffer,
    Tree,
}

/// One line of shell input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShellCommand {
    Commit(String),
    Retrieve(String),
    Verify { id: String, data: String },
    Print(PrintTarget),
    Audit,
    Help,
    Exit,
    Empty,
    /// Unrecognised or malformed; carries the hint to show.
    Usage(&'static str),
}

pub const COMMIT_USAGE: &str = "usage: commit <data>";
pub const RETRIEVE_USAGE: &str = "usage: retrieve <id>";
pub const VERIFY_USAGE: &str = "usage: verify <id> <data>";
pub const PRINT_USAGE: &str = "usage: print chain|latest|buffer|tree";
pub const UNKNOWN_USAGE: &str = "unknown command; type `help` for a list";

impl ShellCommand {
    /// Parse one input line.
    ///
    /// The command word ends at the first space. For `commit` everything after
    /// it is data, spaces included; for `verify` the id runs to the next space
    /// and the rest of the line is data.
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']).trim_start();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));

        match word {
            "" => Self::Empty,
            "commit" if !rest.is_empty() => Self::Commit(rest.to_string()),
            "commit" => Self::Usage(COMMIT_USAGE),
            "retrieve" => match rest.trim() {
                "" => Self::Usage(RETRIEVE_USAGE),
                id => Self::Retrieve(id.to_string()),
            },
            "verify" => match rest.split_once(' ') {
                Some((id, data)) if !id.is_empty() => Self::Verify {
                    id: id.to_string(),
                    data: data.to_string(),
                },
                _ => Self::Usage(VERIFY_USAGE),
            },
            "print" => match rest.trim() {
                "chain" => Self::Print(PrintTarget::Chain),
                "latest" => Self::Print(PrintTarget::Latest),
                "buffer" => Self::Print(PrintTarget::Buffer),
                "tree" => Self::Print(PrintTarget::Tree),
                _ => Self::Usage(PRINT_USAGE),
            },
            "audit" => Self::Audit,
            "help" => Self::Help,
            "exit" | "quit" => Self::Exit,
            _ => Self::Usage(UNKNOWN_USAGE),
        }
    }
}
