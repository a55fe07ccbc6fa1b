//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Build and inspect typed Account/Loan/Collateral trees
#[derive(Parser, Debug)]
#[command(name = "loantree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file (default: ~/.config/loantree/loantree.toml)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive editing session on stdin
    Shell {
        /// Use n1, n2, ... instead of random ids
        #[arg(long)]
        sequential_ids: bool,
    },

    /// Execute a file of session commands, one per line
    Run {
        /// Script file, `-` for stdin
        #[arg(value_hint = ValueHint::FilePath)]
        script: PathBuf,

        /// Use n1, n2, ... instead of random ids
        #[arg(long)]
        sequential_ids: bool,

        /// Report failing lines and continue
        #[arg(short, long)]
        keep_going: bool,
    },

    /// List node types and their containment rules
    Types,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective config
    Show,

    /// Create global config template
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show config paths
    Path,
}

/// One line of a session, parsed without a binary name.
#[derive(Parser, Debug)]
#[command(name = "loantree", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Add a root node
    Root {
        /// Node type, e.g. Account
        node_type: String,
    },

    /// Add a child node under the selection (or --parent)
    Child {
        /// Node type, e.g. Loan
        node_type: String,
        /// Parent id instead of the selection
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Delete a node and all of its descendants
    #[command(alias = "rm")]
    Delete {
        /// Node id (default: the selection)
        id: Option<String>,
    },

    /// Select a node
    Select { id: String },

    /// Clear the selection
    Clear,

    /// Show node details (default: the selection)
    Show { id: Option<String> },

    /// List direct children of a node
    Children { id: String },

    /// Print the node forest
    Tree,

    /// List node types
    Types,

    /// Print layout positions
    Layout,

    /// Node, edge and selection summary
    Status,

    /// Print the export document
    Json,

    /// Write the export document to a file
    Export {
        /// Destination (default: <output_dir>/loan-tree-YYYY-MM-DD.json)
        #[arg(value_hint = ValueHint::FilePath)]
        path: Option<PathBuf>,
    },

    /// End the session
    #[command(alias = "exit")]
    Quit,
}

impl ShellLine {
    /// Parse one input line. Blank lines and `#` comments yield `Ok(None)`.
    pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, clap::Error> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let parsed = ShellLine::try_parse_from(line.split_whitespace())?;
        Ok(Some(parsed.command))
    }
}
