use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;

use crate::model::ITCH_BASE_URL;

const USER_AGENT: &str = concat!("itch-jam-scan/", env!("CARGO_PKG_VERSION"));
const TIMEOUT: Duration = Duration::from_secs(30);

/// Which public jam listing to walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    Upcoming,
    InProgress,
}

impl Listing {
    fn path(self) -> &'static str {
        match self {
            Listing::Upcoming => "jams/upcoming",
            Listing::InProgress => "jams/in-progress",
        }
    }
}

pub struct JamClient {
    client: Client,
}

impl JamClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }

    /// Fetch one page of a jam listing. Pages past the end render with
    /// no jam entries, which is the caller's stop signal.
    pub fn listing_page(&self, listing: Listing, page: u32) -> Result<String> {
        let url = format!("{}/{}", ITCH_BASE_URL, listing.path());
        let response = self
            .client
            .get(&url)
            .query(&[("page", page)])
            .send()
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("Failed to fetch {} page {}", listing.path(), page))?;
        response.text().context("Failed to read listing body")
    }

    /// Fetch an individual jam page.
    pub fn jam_page(&self, jam_id: &str) -> Result<String> {
        let url = format!("{ITCH_BASE_URL}/jam/{jam_id}");
        let response = self
            .client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("Failed to fetch jam page: {url}"))?;
        response.text().context("Failed to read jam page body")
    }
}
