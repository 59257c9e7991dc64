//! Trending headline scraper.
//!
//! Fetches one page (by default the [HR Technologist](https://www.hrtechnologist.com/)
//! homepage) and uses the text of its `<h2>` elements as candidate topics.
//!
//! # Fallbacks
//!
//! The two fallback paths are deliberately different lists:
//!
//! - The page loaded but had no `<h2>`: [`EMPTY_PAGE_FALLBACK`]
//! - The request failed (connect error, timeout, non-2xx): [`FETCH_ERROR_FALLBACK`]

use crate::config::ScrapeConfig;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};

/// Returned when the page is fetched but contains no headings.
pub const EMPTY_PAGE_FALLBACK: &[&str] = &["Latest HR Trends 2025"];

/// Returned when the page cannot be fetched.
pub const FETCH_ERROR_FALLBACK: &[&str] = &["Future of HR Tech", "Remote Work Trends 2025"];

static HEADING_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h2").unwrap());

/// Fetch the configured page and return up to `max_topics` headline topics.
///
/// Never fails; see the module docs for the fallback lists.
#[instrument(level = "info", skip_all, fields(url = %config.url))]
pub async fn fetch_trending_topics(config: &ScrapeConfig) -> Vec<String> {
    let html = match fetch_page(config).await {
        Ok(html) => html,
        Err(e) => {
            error!(error = %e, "Error fetching topics; using fallback list");
            return fallback(FETCH_ERROR_FALLBACK);
        }
    };

    let headings = all_headings(&html);
    if headings.is_empty() {
        warn!(bytes = html.len(), "No <h2> headings found; using fallback topic");
        return fallback(EMPTY_PAGE_FALLBACK);
    }

    let found = headings.len();
    let topics: Vec<String> = headings.into_iter().take(config.max_topics).collect();
    info!(count = topics.len(), found, "Scraped trending topics");
    debug!(?topics, "Trending topics");
    topics
}

async fn fetch_page(config: &ScrapeConfig) -> Result<String, Box<dyn Error>> {
    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout())
        .build()?;
    let response = client.get(&config.url).send().await?.error_for_status()?;
    let html = response.text().await?;
    debug!(bytes = html.len(), "Fetched page");
    Ok(html)
}

/// Text of every `<h2>` element, trimmed, in document order.
///
/// Nested markup inside a heading is flattened into its text. Headings whose
/// text is blank are kept as empty strings.
pub fn all_headings(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&HEADING_SELECTOR)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .collect()
}

/// The first `limit` entries of [`all_headings`].
pub fn extract_headings(html: &str, limit: usize) -> Vec<String> {
    let mut headings = all_headings(html);
    headings.truncate(limit);
    headings
}

fn fallback(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CannedResponse, closed_port_url, serve, serve_silent};

    const SEVEN_HEADINGS: &str = r#"
        <html><body>
          <h1>Site title</h1>
          <h2>  Skills-Based Hiring Goes Mainstream </h2>
          <div class="card"><h2><a href="/a">AI <em>Copilots</em> for Recruiters</a></h2></div>
          <h2>
            Pay Transparency Laws
          </h2>
          <h3>Not a topic</h3>
          <h2>Employee Wellbeing Budgets</h2>
          <h2>Four-Day Week Pilots</h2>
          <h2>Sixth Heading</h2>
          <h2>Seventh Heading</h2>
        </body></html>
    "#;

    fn config_for(url: String, timeout_secs: u64) -> ScrapeConfig {
        ScrapeConfig {
            url,
            timeout_secs,
            ..ScrapeConfig::default()
        }
    }

    #[test]
    fn test_extract_first_five_trimmed_in_order() {
        let topics = extract_headings(SEVEN_HEADINGS, 5);
        assert_eq!(
            topics,
            vec![
                "Skills-Based Hiring Goes Mainstream",
                "AI Copilots for Recruiters",
                "Pay Transparency Laws",
                "Employee Wellbeing Budgets",
                "Four-Day Week Pilots",
            ]
        );
    }

    #[test]
    fn test_extract_fewer_than_limit() {
        let html = "<h2>Only One</h2><p>text</p>";
        assert_eq!(extract_headings(html, 5), vec!["Only One"]);
    }

    #[test]
    fn test_extract_no_headings() {
        assert!(extract_headings("<html><body><h1>x</h1><p>y</p></body></html>", 5).is_empty());
        assert!(extract_headings("", 5).is_empty());
    }

    #[tokio::test]
    async fn test_fetch_returns_scraped_headings_and_sends_user_agent() {
        let (base_url, server) = serve(vec![CannedResponse::html(200, SEVEN_HEADINGS)]).await;
        let topics = fetch_trending_topics(&config_for(format!("{base_url}/"), 5)).await;
        assert_eq!(topics.len(), 5);
        assert_eq!(topics[0], "Skills-Based Hiring Goes Mainstream");

        let requests = server.await.unwrap();
        let request = requests[0].to_lowercase();
        assert!(request.starts_with("get / http/1.1"));
        assert!(request.contains("user-agent: mozilla/5.0"));
    }

    #[tokio::test]
    async fn test_fetch_page_without_headings_uses_empty_page_fallback() {
        let (base_url, server) =
            serve(vec![CannedResponse::html(200, "<html><body><p>nothing</p></body></html>")]).await;
        let topics = fetch_trending_topics(&config_for(base_url, 5)).await;
        assert_eq!(topics, vec!["Latest HR Trends 2025"]);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_zero_limit_is_not_mistaken_for_empty_page() {
        let (base_url, server) = serve(vec![CannedResponse::html(200, SEVEN_HEADINGS)]).await;
        let config = ScrapeConfig {
            max_topics: 0,
            ..config_for(base_url, 5)
        };
        // Headings exist, so the empty-page fallback must not kick in.
        let topics = fetch_trending_topics(&config).await;
        assert!(topics.is_empty());
        server.await.unwrap();
    }

    #[test]
    fn test_all_headings_ignores_limit() {
        assert_eq!(all_headings(SEVEN_HEADINGS).len(), 7);
        assert_eq!(extract_headings(SEVEN_HEADINGS, 0), Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_fetch_unreachable_uses_error_fallback() {
        let topics = fetch_trending_topics(&config_for(closed_port_url().await, 5)).await;
        assert_eq!(topics, vec!["Future of HR Tech", "Remote Work Trends 2025"]);
    }

    #[tokio::test]
    async fn test_fetch_non_2xx_uses_error_fallback() {
        let (base_url, server) =
            serve(vec![CannedResponse::html(503, "<h2>Maintenance</h2>")]).await;
        let topics = fetch_trending_topics(&config_for(base_url, 5)).await;
        assert_eq!(topics, vec!["Future of HR Tech", "Remote Work Trends 2025"]);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_timeout_uses_error_fallback() {
        let (base_url, _server) = serve_silent().await;
        let topics = fetch_trending_topics(&config_for(base_url, 1)).await;
        assert_eq!(topics, vec!["Future of HR Tech", "Remote Work Trends 2025"]);
    }

    #[tokio::test]
    async fn test_fetch_invalid_url_uses_error_fallback() {
        let topics = fetch_trending_topics(&config_for("not a url".to_string(), 5)).await;
        assert_eq!(topics, vec!["Future of HR Tech", "Remote Work Trends 2025"]);
    }
}
