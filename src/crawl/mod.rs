pub mod client;
pub mod parse;

pub use client::{JamClient, Listing};
pub use parse::JamFields;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::classify::Keywords;
use crate::model::{GameType, JamDraft};
use crate::store::JamStore;

/// Fetch one jam page and convert it into a draft record.
pub fn fetch_jam(client: &JamClient, jam_id: &str) -> Result<JamDraft> {
    let html = client.jam_page(jam_id)?;
    let fields = parse::jam_fields(&html)?;
    Ok(JamDraft {
        id: jam_id.to_string(),
        name: fields.name,
        start_ts: fields.start_ts,
        duration_days: fields.duration_days,
        hashtag: fields.hashtag,
        description: fields.description,
        owners: fields.owners,
    })
}

/// Crawl a single jam: fetch, keyword-classify, persist. Returns the
/// gametype the jam ended up with (an already-classified jam keeps its
/// classification, see [`JamStore::upsert_jam`]).
pub fn crawl_one(
    store: &mut JamStore,
    client: &JamClient,
    keywords: &Keywords,
    jam_id: &str,
) -> Result<GameType> {
    let draft = fetch_jam(client, jam_id)?;
    let gametype = keywords.classify(
        &draft.name,
        draft.description.as_deref().unwrap_or(""),
        draft.hashtag.as_deref().unwrap_or(""),
    );
    let stored = store.upsert_jam(&draft, gametype)?;
    store.set_owners(&draft.id, &draft.owners)?;
    Ok(stored.gametype)
}

/// Walk the in-progress and upcoming listings page by page and crawl
/// every jam not already stored (all of them with `force`). A fetch
/// failure for one jam is reported and skipped, not fatal to the run.
/// Returns the number of jams fetched.
pub fn crawl_listings(
    store: &mut JamStore,
    client: &JamClient,
    keywords: &Keywords,
    force: bool,
) -> Result<usize> {
    let mut ids: Vec<String> = Vec::new();
    for listing in [Listing::InProgress, Listing::Upcoming] {
        let mut page = 1;
        loop {
            let html = client.listing_page(listing, page)?;
            let page_ids = parse::listing_jam_ids(&html);
            if page_ids.is_empty() {
                break;
            }
            for id in page_ids {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
            page += 1;
        }
    }

    if !force {
        let known = store.jam_ids()?;
        ids.retain(|id| !known.contains(id));
    }

    let pb = ProgressBar::new(ids.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:30} [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut fetched = 0;
    for jam_id in &ids {
        pb.set_message(jam_id.clone());
        match crawl_one(store, client, keywords, jam_id) {
            Ok(gametype) => {
                fetched += 1;
                pb.println(format!("{jam_id}: {gametype}"));
            }
            Err(err) => pb.println(format!("skipping {jam_id}: {err:#}")),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(fetched)
}
