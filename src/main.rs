use clap::Parser;
use page_scout::{Crawl, CrawlReport};

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();
    let json = args.json;

    let crawl = match build(args) {
        Ok(crawl) => crawl,
        Err(e) => {
            ::log::error!("Failed to load configuration: {}", e);
            std::process::exit(2);
        }
    };

    let start_time = std::time::Instant::now();
    match crawl.run().await {
        Ok(report) => {
            ::log::info!(
                "Crawl complete in {:.2} seconds",
                start_time.elapsed().as_secs_f64()
            );
            print_report(&report, json);
        }
        Err(e) => {
            ::log::error!("Crawl failed: {}", e);
            eprintln!("Error: {}", e);
            eprintln!(
                "Note: rendering requires a WebDriver server (e.g., ChromeDriver). \
                 Set WEBDRIVER_URL if not using the default http://localhost:4444"
            );
            std::process::exit(1);
        }
    }
}

/// Create a Crawl builder from command-line arguments
fn build(args: Args) -> Result<Crawl, Box<dyn std::error::Error>> {
    let mut crawl = Crawl::new(args.url, args.query);
    if let Some(path) = &args.config {
        crawl = crawl.with_config_file(path)?;
    }
    if let Some(max_links) = args.max_links {
        crawl = crawl.with_max_links(max_links);
    }
    if let Some(timeout) = args.timeout {
        crawl = crawl.with_timeout(timeout);
    }
    if let Some(webdriver_url) = args.webdriver_url {
        crawl = crawl.with_webdriver_url(webdriver_url);
    }
    Ok(crawl)
}

fn print_report(report: &CrawlReport, json: bool) {
    if !json {
        print!("{}", report.to_markdown());
        return;
    }

    match serde_json::to_string_pretty(report) {
        Ok(out) => println!("{}", out),
        Err(e) => ::log::error!("Failed to serialize report: {}", e),
    }
}
