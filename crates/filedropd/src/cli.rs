//! Command-line arguments
//!
//! Flags override values from the config file.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;
use filedrop_core::NamingScheme;

use crate::config::DaemonConfig;

#[derive(Parser, Debug)]
#[command(name = "filedropd")]
#[command(about = "Multipart upload endpoint that stores files in a local directory")]
pub struct Args {
    /// Configuration file (TOML). Defaults apply when omitted.
    pub config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    pub bind: Option<IpAddr>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Upload directory
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Multipart field carrying the file
    #[arg(short, long)]
    pub field: Option<String>,

    /// Extra upload route (repeatable)
    #[arg(long = "alias")]
    pub aliases: Vec<String>,

    /// Disable CORS headers and OPTIONS handling
    #[arg(long)]
    pub no_cors: bool,

    /// Cap request bodies at this many bytes (unbounded by default)
    #[arg(long)]
    pub max_body_bytes: Option<usize>,

    /// Stored file naming: "unique" or "timestamp"
    #[arg(long)]
    pub naming: Option<NamingScheme>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Apply command-line overrides on top of a loaded config
    pub fn apply(&self, config: &mut DaemonConfig) {
        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = &self.dir {
            config.upload.dir = dir.clone();
        }
        if let Some(field) = &self.field {
            config.upload.field = field.clone();
        }
        config.upload.aliases.extend(self.aliases.iter().cloned());
        if self.no_cors {
            config.upload.cors = false;
        }
        if let Some(max) = self.max_body_bytes {
            config.upload.max_body_bytes = Some(max);
        }
        if let Some(naming) = self.naming {
            config.upload.naming = naming;
        }
    }
}
