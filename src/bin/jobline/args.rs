use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(about, long_about = None, version)]
pub(crate) struct Args {
    /// Command file to run, or `-` for stdin.
    #[arg(default_value = "input1-2.txt")]
    pub(crate) input: PathBuf,
    /// Prints a YAML summary of the run and the remaining jobs once done.
    #[arg(short, long, default_value_t)]
    pub(crate) stats: bool,
    /// Stops at the first dequeue from an empty queue instead of carrying on.
    #[arg(long, default_value_t)]
    pub(crate) halt_on_empty: bool,
    /// Enables human-friendly logging.
    #[arg(short, long, default_value_t)]
    pub(crate) debug: bool,
}
