// CLI argument definitions using clap

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ossflow")]
#[command(author = "hatlonely <hatlonely@foxmail.com>")]
#[command(version = "0.1.0")]
#[command(about = "Object storage workflow check for OpenStack compatible services", long_about = None)]
pub struct Cli {
    /// Path to config file (default: ~/.ossflow/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the whole workflow with a local file as the object content
    Run(RunArgs),
    /// Authenticate and print the object store endpoint
    Endpoint,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Local file to upload
    #[arg(short, long)]
    pub file: String,

    /// Object name (default: file name)
    #[arg(short, long)]
    pub object: Option<String>,
}
