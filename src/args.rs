use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "page-scout")]
#[command(about = "Renders a page and ranks its links by relevance to a query")]
#[command(version)]
pub struct Args {
    /// Page to analyze (http or https URL)
    pub url: String,

    /// What you are looking for, in plain language
    pub query: String,

    /// Number of links handed to the analyzer [default: from config, 20]
    #[arg(short, long)]
    pub max_links: Option<usize>,

    /// Render timeout in seconds [default: from config, 30]
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// WebDriver endpoint (overrides config and WEBDRIVER_URL)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Print the full report as JSON instead of markdown
    #[arg(long)]
    pub json: bool,
}
