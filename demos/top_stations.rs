//! Mirror discovery and a small station search.
//!
//! Run with `cargo run --example top_stations [search term]`.

use radiobrowser::query::SearchQuery;
use radiobrowser::RadioBrowser;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let term = std::env::args().nth(1).unwrap_or_else(|| "Radio Record".to_string());

    let client = RadioBrowser::builder()
        .user_agent("radiobrowser-demo/0.1")
        .timeout(Duration::from_secs(15))
        .build()?;

    // Every mirror currently behind the discovery name
    let mirrors = client.discover_mirrors().await?;
    println!("Discovered {} mirrors:", mirrors.len());
    for host in mirrors.iter() {
        println!("  {}", host);
    }

    client.init().await?;
    if let Some(base_url) = client.base_url() {
        println!("Using {}", base_url);
    }

    let query = SearchQuery::new()
        .name(&term)
        .order("votes")
        .reverse(true)
        .limit(5)
        .hidebroken(true);
    let resp = client.search(&query).await?;

    println!("Top stations for {:?}:", term);
    if let Some(stations) = resp.as_json().and_then(|v| v.as_array()) {
        for station in stations {
            println!(
                "  {} ({} votes) {}",
                station["name"].as_str().unwrap_or("?"),
                station["votes"],
                station["url_resolved"].as_str().unwrap_or("")
            );
        }
    }

    client.close();
    Ok(())
}
