use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use exbtag::tag::{self, TagConfig};

/// exbtag main parser
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Activate debug mode
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Insert `simple` markers into empty mod cells and write tagged copies
    Tag {
        /// Directory scanned recursively for .exb files
        #[arg(default_value = "input")]
        input: PathBuf,

        /// Directory the tagged files are written to
        #[arg(default_value = "output")]
        output: PathBuf,

        #[command(flatten)]
        options: TagOptions,
    },

    /// Report what a tag run would insert without writing anything
    Check {
        /// Directory scanned recursively for .exb files
        #[arg(default_value = "input")]
        input: PathBuf,

        #[command(flatten)]
        options: TagOptions,
    },
}

#[derive(Args, Debug)]
struct TagOptions {
    /// Optional TOML file with tier naming options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Name prefix of the parent (form) tiers
    #[arg(long)]
    form_prefix: Option<String>,

    /// Name prefix of the paired (mod) tiers
    #[arg(long)]
    mod_prefix: Option<String>,

    /// Value written into synthesized cells
    #[arg(long)]
    sentinel: Option<String>,
}

impl TagOptions {
    fn into_config(self) -> anyhow::Result<TagConfig> {
        let mut config = match &self.config {
            Some(path) => TagConfig::load(path)?,
            None => TagConfig::default(),
        };
        if let Some(prefix) = self.form_prefix {
            config.form_prefix = prefix;
        }
        if let Some(prefix) = self.mod_prefix {
            config.mod_prefix = prefix;
        }
        if let Some(sentinel) = self.sentinel {
            config.sentinel = sentinel;
        }
        Ok(config)
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.debug {
        eprintln!("Debug mode is on");
    }

    let result = match cli.command {
        Some(Commands::Tag {
            input,
            output,
            options,
        }) => options
            .into_config()
            .and_then(|config| tag::run(&input, Some(&output), &config, cli.debug)),
        Some(Commands::Check { input, options }) => options
            .into_config()
            .and_then(|config| tag::run(&input, None, &config, cli.debug)),
        None => {
            println!("exbtag: run with --help for usage");
            return;
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
