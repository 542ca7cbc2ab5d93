//! Element querying demonstration.
//!
//! Demonstrates:
//! - Find single element (find_element)
//! - Find multiple elements (find_elements)
//! - Nested element search
//! - Lookups that suppress failures (find_element_or_default)
//! - Script arguments carrying element handles
//!
//! Usage:
//!   cargo run --example element_query -- ws://127.0.0.1:4444/session
//!   cargo run --example element_query -- ws://127.0.0.1:4444/session --legacy
//!   cargo run --example element_query -- ws://127.0.0.1:4444/session --debug

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use remote_webdriver::{By, Dialect, Query, Result, ScriptArg, SearchContext, Session};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Constants
// ============================================================================

const DEFAULT_ENDPOINT: &str = "ws://127.0.0.1:4444/session";
const TEST_URL: &str = "https://example.com";

// ============================================================================
// Args
// ============================================================================

/// Command-line arguments.
#[derive(Debug, Clone)]
struct Args {
    endpoint: String,
    legacy: bool,
    debug: bool,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self {
            endpoint: args
                .iter()
                .find(|a| !a.starts_with("--"))
                .cloned()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            legacy: args.iter().any(|a| a == "--legacy"),
            debug: args.iter().any(|a| a == "--debug"),
        }
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        "remote_webdriver=debug"
    } else {
        "remote_webdriver=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    if let Err(e) = run(args).await {
        eprintln!("\n[ERROR] {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    println!("=== Element Query ===\n");

    // ========================================================================
    // Setup
    // ========================================================================

    let dialect = if args.legacy {
        Dialect::Legacy
    } else {
        Dialect::W3c
    };

    println!("[Setup] Connecting to {} ({dialect:?})...", args.endpoint);
    let session = Session::builder()
        .endpoint(&args.endpoint)
        .dialect(dialect)
        .connect()
        .await?;
    println!("        ✓ Connected\n");

    session.goto(TEST_URL).await?;
    println!("        ✓ Navigated to {TEST_URL}\n");

    // ========================================================================
    // Find single element
    // ========================================================================

    println!("[1] find_element(By::tag_name(\"h1\"))");
    let h1 = session.find_element(By::tag_name("h1")).await?;
    println!("    ✓ Found element: {}", h1.id());
    println!("    Text: '{}'\n", h1.text().await?);

    // ========================================================================
    // Find multiple elements
    // ========================================================================

    println!("[2] find_elements(By::css(\"p\"))");
    let paragraphs = session.find_elements(By::css("p")).await?;
    println!("    ✓ Found {} paragraph(s)\n", paragraphs.len());

    // ========================================================================
    // Nested search
    // ========================================================================

    println!("[3] Nested search under <body>");
    let body = session.find_element(By::tag_name("body")).await?;
    let links = body
        .find_elements(Query::new(By::tag_name("a")).timeout(Duration::from_secs(2)))
        .await?;
    for link in &links {
        let href = link.attribute("href").await?.unwrap_or_default();
        println!("    link: {href}");
    }
    println!();

    // ========================================================================
    // Missing elements
    // ========================================================================

    println!("[4] find_element_or_default(By::id(\"does-not-exist\"))");
    match session.find_element_or_default(By::id("does-not-exist")).await {
        Some(element) => println!("    unexpected match: {}", element.id()),
        None => println!("    ✓ None\n"),
    }

    // ========================================================================
    // Script with element argument
    // ========================================================================

    println!("[5] execute_script with element argument");
    let tag = session
        .execute_script(
            "return arguments[0].tagName",
            vec![ScriptArg::from(&h1)],
        )
        .await?;
    println!("    ✓ tagName: {:?}\n", tag.as_str());

    session.close().await?;
    println!("=== Done ===");
    Ok(())
}
