//! CLI argument parsing for ap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ap")]
#[command(author, version, about = "Track section progress of document artifacts", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Override the store directory
    #[arg(short, long)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Store the sample concept.md artifact
    Seed {
        /// Artifact ID (default: new UUID)
        #[arg(long)]
        id: Option<String>,

        /// Project ID (default: sample project)
        #[arg(long)]
        project: Option<String>,
    },

    /// List stored artifacts with their progress
    List,

    /// Show an artifact's sections and progress
    Show {
        /// Artifact ID
        #[arg(required = true)]
        id: String,
    },

    /// Mark a section as done
    Done {
        /// Artifact ID
        #[arg(required = true)]
        id: String,

        /// Section slug
        #[arg(required = true)]
        slug: String,
    },

    /// Mark a section as not done
    Undone {
        /// Artifact ID
        #[arg(required = true)]
        id: String,

        /// Section slug
        #[arg(required = true)]
        slug: String,
    },

    /// Collapse a section
    Collapse {
        /// Artifact ID
        #[arg(required = true)]
        id: String,

        /// Section slug
        #[arg(required = true)]
        slug: String,
    },

    /// Expand a section
    Expand {
        /// Artifact ID
        #[arg(required = true)]
        id: String,

        /// Section slug
        #[arg(required = true)]
        slug: String,
    },

    /// Check section order, slugs and progress counters
    Validate {
        /// Artifact ID
        #[arg(required = true)]
        id: String,
    },
}
