use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::dataset::Dataset;
use crate::error::LoadError;
use crate::loader::{self, DEFAULT_DATA_URL};

/// Runtime configuration, read from flags with environment fallbacks.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "dashboard",
    version,
    about = "Interactive dashboard over the 2018 General Social Survey"
)]
pub struct Config {
    /// URL of the survey CSV
    #[arg(long, env = "GSS_DATA_URL", default_value = DEFAULT_DATA_URL)]
    pub data_url: String,

    /// Read the survey from a local file instead of downloading it
    #[arg(long, env = "GSS_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Address the HTTP server binds to
    #[arg(long, env = "GSS_BIND", default_value = "127.0.0.1:8051")]
    pub bind: SocketAddr,

    /// Directory served under /static
    #[arg(long, env = "GSS_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,
}

impl Config {
    /// Load the dataset from the configured source. A local file wins over
    /// the URL.
    pub async fn load_dataset(&self) -> Result<Dataset, LoadError> {
        match &self.data_file {
            Some(path) => loader::from_path(path),
            None => loader::fetch(&self.data_url).await,
        }
    }
}
