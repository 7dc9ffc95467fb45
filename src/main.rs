use anyhow::Context;
use buildsite_listings::backend::{BackendClient, InMemoryBackend, SupabaseClient};
use buildsite_listings::config::load_config;
use buildsite_listings::listing::{find_page, CategorySelection, LISTING_PAGES};
use buildsite_listings::site::{ListingSite, PageLoad};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "buildsite-listings", about = "Browse the site's listing pages")]
struct Args {
    /// Listing page to show; omit to list the available pages
    #[arg(value_name = "PAGE_SLUG")]
    slug: Option<String>,

    /// Free-text search over title, description and location
    #[arg(long, short, default_value = "")]
    query: String,

    /// Category to include (repeatable)
    #[arg(long = "category", short)]
    categories: Vec<String>,

    /// 1-indexed page number
    #[arg(long = "page", short = 'n', value_name = "N", default_value_t = 1)]
    page_number: usize,

    #[arg(long, env = "BUILDSITE_CONFIG")]
    config: Option<PathBuf>,

    /// Print the visible page as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let Some(slug) = args.slug.as_deref() else {
        println!("Available listing pages:");
        for page in LISTING_PAGES {
            println!("  {:<24} {} ({} per page)", page.slug, page.title, page.page_size);
        }
        return Ok(());
    };
    let config_page = find_page(slug).with_context(|| format!("Unknown listing page: {}", slug))?;

    let config = load_config(args.config.as_deref())?;
    let backend: Arc<dyn BackendClient> = if config.uses_demo_backend() {
        info!("No backend url configured, using demo content");
        Arc::new(InMemoryBackend::with_demo_data())
    } else {
        Arc::new(
            SupabaseClient::new(&config.backend.url, &config.backend.anon_key, config.timeout())
                .context("Failed to create backend client")?,
        )
    };

    let site = ListingSite::new(backend, config.transform_options());
    let mut page = match site.load(config_page).await {
        PageLoad::Ready(page) => page,
        PageLoad::Failed(message) => anyhow::bail!(message),
    };

    page.controller.set_query(args.query.as_str());
    page.controller
        .set_categories(args.categories.iter().map(String::as_str).collect::<CategorySelection>());
    page.controller.go_to_page(args.page_number);

    if args.json {
        let json = serde_json::to_string_pretty(&page.controller.view())?;
        println!("{}", json);
        return Ok(());
    }

    println!("{}", page.config.title);
    println!("{}", "=".repeat(page.config.title.len()));
    let categories = page.controller.available_categories();
    if !categories.is_empty() {
        println!("Categories: {}", categories.join(", "));
    }
    println!();

    if let Some(message) = page.empty_message() {
        println!("{}", message);
        return Ok(());
    }

    let offset = (page.controller.current_page() - 1) * page.controller.page_size().get();
    for (i, item) in page.controller.page_items().iter().enumerate() {
        println!("{}. {} ({})", offset + i + 1, item.title, item.price);
        if !item.location.is_empty() {
            println!("   Location: {}", item.location);
        }
        if let Some(category) = &item.category {
            println!("   Category: {}", category);
        }
        if let Some(duration) = &item.duration {
            println!("   Duration: {}", duration);
        }
        if !item.tags.is_empty() {
            println!("   Tags: {}", item.tags.join(", "));
        }
        println!("   ID: {}", item.id);
        println!();
    }

    println!(
        "Page {} of {} ({} of {} items match)",
        page.controller.current_page(),
        page.controller.total_pages(),
        page.controller.filtered_count(),
        page.controller.total_count()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_flag_sets_the_page_number() {
        let args = Args::try_parse_from(["buildsite-listings", "projects", "--page", "2"]).unwrap();

        assert_eq!(args.slug.as_deref(), Some("projects"));
        assert_eq!(args.page_number, 2);
    }

    #[test]
    fn page_number_defaults_to_first_page() {
        let args = Args::try_parse_from(["buildsite-listings", "deals", "-n", "3"]).unwrap();
        let default = Args::try_parse_from(["buildsite-listings"]).unwrap();

        assert_eq!(args.page_number, 3);
        assert_eq!(default.slug, None);
        assert_eq!(default.page_number, 1);
    }
}
