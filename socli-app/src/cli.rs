use clap::Parser;
use std::path::PathBuf;

/// Search Stack Overflow and read answers without leaving the terminal.
#[derive(Parser, Debug, Clone)]
#[command(name = "socli", version, about)]
pub struct Cli {
    /// Search terms.
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Use Stack Overflow's own search instead of Google.
    #[arg(short = 's', long)]
    pub stackoverflow: bool,

    /// Print the N-th result (counting from 1) instead of browsing.
    #[arg(short = 'i', long, value_name = "N", allow_negative_numbers = true)]
    pub index: Option<i64>,

    /// Settings file. Must exist when given.
    #[arg(long, value_name = "PATH", env = "SOCLI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Browser command used by `o`.
    #[arg(long, value_name = "COMMAND")]
    pub browser: Option<String>,

    /// Line-based browsing even on a capable terminal.
    #[arg(long)]
    pub line: bool,
}

impl Cli {
    pub fn query_text(&self) -> String {
        self.query.join(" ")
    }
}
