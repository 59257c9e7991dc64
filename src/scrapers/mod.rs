//! Topic scrapers.
//!
//! Each scraper fetches a single page and turns it into a short list of
//! candidate blog topics. Scrapers never fail: network and parse problems
//! are logged and replaced with a hardcoded fallback list.
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | HR Technologist (default) | [`trending`] | HTML `<h2>` headings | Any page URL can be configured |

pub mod trending;
