//! Command line interface for the framecap binary.

use std::path::PathBuf;

use clap::Parser;
use framecap::ExtractConfig;

/// Reassemble chunked UDP video frames from a packet capture.
#[derive(Debug, Parser)]
#[command(name = "framecap", version, about)]
pub struct Cli {
    /// Capture file (pcap or pcapng) [default: ./video.pcapng]
    pub input: Option<PathBuf>,

    /// Directory to write frames into [default: .]
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// YAML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Resolve the run configuration; flags win over the configuration file.
    pub fn resolve(&self) -> framecap::Result<ExtractConfig> {
        let mut config = match &self.config {
            Some(path) => ExtractConfig::load(path)?,
            None => ExtractConfig::default(),
        };
        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        Ok(config)
    }
}
