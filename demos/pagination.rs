//! Page-driven fetching from a public fake API.
//!
//! Run with:
//!     RUST_LOG=pagewise=debug cargo run --example pagination

use pagewise::{PageConfig, paginate_with};
use tracing_subscriber::EnvFilter;

const API_URL: &str = "https://jsonplaceholder.typicode.com/posts"; // Fake API

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = PageConfig::new(3)?;

    for page in paginate_with(API_URL, config)?.pages() {
        let page = page?;
        println!("Page {}: {} records", page.number, page.len());
        for body in page.records.iter().take(2) {
            let preview: String = body.as_str().unwrap_or_default().chars().take(60).collect();
            println!("  {}...", preview.replace('\n', " "));
        }
    }

    Ok(())
}
