//! Field extraction from itch.io listing and jam pages.
//!
//! The markup we rely on is a handful of stable class names, so targeted
//! string scanning is enough; no DOM parse. Tag and attribute matching is
//! case-insensitive on ASCII.

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDateTime;

const SECS_PER_DAY: i64 = 86_400;

/// Everything a jam page yields before classification.
#[derive(Debug, Clone)]
pub struct JamFields {
    pub name: String,
    /// Raw inner HTML of the jam description.
    pub description: Option<String>,
    pub hashtag: Option<String>,
    pub start_ts: i64,
    pub duration_days: i64,
    /// `(owner_id, owner_name)` in page order.
    pub owners: Vec<(String, String)>,
}

/// Jam ids linked from a listing page, deduplicated, in page order.
/// Each entry looks like `<div class="jam" ...> ... <a href="/jam/<id>">`.
pub fn listing_jam_ids(html: &str) -> Vec<String> {
    let lower = html.to_ascii_lowercase();
    let mut ids = Vec::new();
    let mut from = 0;

    while let Some(rel) = lower[from..].find("class=\"jam\"") {
        let at = from + rel;
        let Some(href_rel) = lower[at..].find("href=\"/jam/") else {
            from = at + 1;
            continue;
        };
        let id_start = at + href_rel + "href=\"/jam/".len();
        let Some(end_rel) = html[id_start..].find('"') else {
            break;
        };
        let id = html[id_start..id_start + end_rel]
            .split(['/', '?', '#'])
            .next()
            .unwrap_or("")
            .to_string();
        if !id.is_empty() && !ids.contains(&id) {
            ids.push(id);
        }
        from = id_start;
    }

    ids
}

/// Extract all fields from a jam page.
pub fn jam_fields(html: &str) -> Result<JamFields> {
    let name = slice_element(html, "h1", "jam_title_header")
        .map(|s| strip_tags(s).trim().to_string())
        .ok_or_else(|| anyhow!("jam page has no title header"))?;

    let description = slice_div_balanced(html, "jam_content")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let host_header = slice_div_balanced(html, "jam_host_header").unwrap_or("");
    let mut owners = Vec::new();
    let mut hashtag = None;
    for (href, text) in anchors(host_header) {
        if let Some(owner_id) = owner_id_from_profile_url(&href) {
            owners.push((owner_id.to_string(), text));
        } else if href.contains("twitter.com/hashtag/") && hashtag.is_none() {
            hashtag = Some(text);
        }
    }

    let (start_ts, end_ts) = date_range(html)?;
    let duration_days = (end_ts - start_ts) / SECS_PER_DAY;

    Ok(JamFields {
        name,
        description,
        hashtag,
        start_ts,
        duration_days,
        owners,
    })
}

/// Strip tags and decode the handful of entities itch emits, for plain
/// text output of names and descriptions.
pub fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
}

/// Inner HTML of the first `tag` element whose opening tag contains
/// `marker`. Does not balance nested same-name tags; the elements we
/// target with this (h1, span) do not nest.
fn slice_element<'a>(html: &'a str, tag: &str, marker: &str) -> Option<&'a str> {
    let lower = html.to_ascii_lowercase();
    let open = format!("<{tag}");
    let close = format!("</{tag}");
    let marker = marker.to_ascii_lowercase();

    let mut from = 0;
    while let Some(rel) = lower[from..].find(&open) {
        let start = from + rel;
        let tag_end = start + lower[start..].find('>')? + 1;
        if lower[start..tag_end].contains(&marker) {
            let close_rel = lower[tag_end..].find(&close)?;
            return Some(&html[tag_end..tag_end + close_rel]);
        }
        from = tag_end;
    }
    None
}

/// Inner HTML of the first `<div>` whose opening tag contains `marker`,
/// with nested divs balanced.
fn slice_div_balanced<'a>(html: &'a str, marker: &str) -> Option<&'a str> {
    let lower = html.to_ascii_lowercase();
    let marker = marker.to_ascii_lowercase();

    let mut from = 0;
    let inner_start = loop {
        let rel = lower[from..].find("<div")?;
        let start = from + rel;
        let tag_end = start + lower[start..].find('>')? + 1;
        if lower[start..tag_end].contains(&marker) {
            break tag_end;
        }
        from = tag_end;
    };

    let mut depth = 1usize;
    let mut pos = inner_start;
    loop {
        let next_open = lower[pos..].find("<div");
        let next_close = lower[pos..].find("</div");
        match (next_open, next_close) {
            (Some(o), Some(c)) if o < c => {
                depth += 1;
                pos += o + "<div".len();
            }
            (_, Some(c)) => {
                depth -= 1;
                if depth == 0 {
                    return Some(&html[inner_start..pos + c]);
                }
                pos += c + "</div".len();
            }
            _ => return None,
        }
    }
}

/// All `(href, inner text)` pairs of anchors inside `html`.
fn anchors(html: &str) -> Vec<(String, String)> {
    let lower = html.to_ascii_lowercase();
    let mut out = Vec::new();
    let mut from = 0;

    while let Some(rel) = lower[from..].find("<a") {
        let start = from + rel;
        // word boundary so <abbr> and friends don't match
        match html.as_bytes().get(start + 2) {
            Some(b' ') | Some(b'>') | Some(b'\t') | Some(b'\n') | Some(b'\r') => {}
            _ => {
                from = start + 2;
                continue;
            }
        }
        let Some(tag_end_rel) = lower[start..].find('>') else {
            break;
        };
        let tag_end = start + tag_end_rel + 1;
        let Some(close_rel) = lower[tag_end..].find("</a") else {
            break;
        };
        let close = tag_end + close_rel;

        if let Some(href) = attr_value(&html[start..tag_end], "href") {
            let text = strip_tags(&html[tag_end..close]).trim().to_string();
            out.push((href.to_string(), text));
        }
        from = close + "</a".len();
    }

    out
}

/// Value of a double-quoted attribute inside an opening tag.
fn attr_value<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let lower = tag.to_ascii_lowercase();
    let pat = format!("{name}=\"");
    let at = lower.find(&pat)? + pat.len();
    let end = at + tag[at..].find('"')?;
    Some(&tag[at..end])
}

/// `https://<user>.itch.io` profile link → `<user>`.
fn owner_id_from_profile_url(href: &str) -> Option<&str> {
    let rest = href
        .strip_prefix("https://")
        .or_else(|| href.strip_prefix("http://"))?;
    let user = rest.strip_suffix('/').unwrap_or(rest).strip_suffix(".itch.io")?;
    (!user.is_empty() && !user.contains('/')).then_some(user)
}

/// Start and end timestamps from the two `span.date_format` values on a
/// jam page.
fn date_range(html: &str) -> Result<(i64, i64)> {
    let lower = html.to_ascii_lowercase();
    let mut dates = Vec::new();
    let mut from = 0;

    while let Some(rel) = lower[from..].find("date_format") {
        let at = from + rel;
        let tag_end = lower[at..]
            .find('>')
            .map(|i| at + i + 1)
            .context("unterminated date span")?;
        let close = lower[tag_end..]
            .find("</span")
            .map(|i| tag_end + i)
            .context("unterminated date span")?;
        dates.push(parse_utc(html[tag_end..close].trim())?);
        from = close;
    }

    if dates.len() < 2 {
        bail!("jam page has {} date span(s), expected start and end", dates.len());
    }
    Ok((dates[0], dates[1]))
}

/// itch date spans carry a bare ISO timestamp with UTC implied.
fn parse_utc(text: &str) -> Result<i64> {
    let dt = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
        .with_context(|| format!("unparseable date: {text}"))?;
    Ok(dt.and_utc().timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <div class="jam_grid">
          <div class="jam" data-jam_id="1">
            <h3><a href="/jam/autumn-ttrpg-jam">Autumn TTRPG Jam</a></h3>
          </div>
          <div class="jam" data-jam_id="2">
            <h3><a href="/jam/pixel-week">Pixel Week</a></h3>
          </div>
          <div class="jam" data-jam_id="3">
            <h3><a href="/jam/pixel-week">Pixel Week (dupe)</a></h3>
          </div>
        </div>"#;

    const JAM_PAGE: &str = r#"
        <h1 class="jam_title_header"><a href="/jam/autumn-ttrpg-jam">Autumn TTRPG Jam</a></h1>
        <div class="jam_host_header">
          Hosted by <a href="https://alice.itch.io">Alice</a> and
          <a href="https://bob.itch.io">Bob &amp; Co</a>
          <a href="https://twitter.com/hashtag/autumnjam">#autumnjam</a>
        </div>
        <span class="date_format">2026-09-01 00:00:00</span> to
        <span class="date_format">2026-09-10 00:00:00</span>
        <div class="jam_content">
          <p>Write a <strong>pamphlet</strong> adventure.</p>
          <div class="nested">With nested markup.</div>
        </div>"#;

    #[test]
    fn test_listing_jam_ids() {
        let ids = listing_jam_ids(LISTING);
        assert_eq!(ids, vec!["autumn-ttrpg-jam", "pixel-week"]);
    }

    #[test]
    fn test_listing_without_jams_is_empty() {
        assert!(listing_jam_ids("<div class=\"jam_grid\"></div>").is_empty());
    }

    #[test]
    fn test_jam_fields() {
        let fields = jam_fields(JAM_PAGE).unwrap();
        assert_eq!(fields.name, "Autumn TTRPG Jam");
        assert_eq!(
            fields.owners,
            vec![
                ("alice".to_string(), "Alice".to_string()),
                ("bob".to_string(), "Bob & Co".to_string()),
            ]
        );
        assert_eq!(fields.hashtag.as_deref(), Some("#autumnjam"));
        assert_eq!(fields.duration_days, 9);

        let description = fields.description.unwrap();
        assert!(description.contains("pamphlet"));
        assert!(description.contains("With nested markup."));
    }

    #[test]
    fn test_jam_fields_requires_title() {
        let err = jam_fields("<p>not a jam page</p>").unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_owner_id_from_profile_url() {
        assert_eq!(owner_id_from_profile_url("https://alice.itch.io"), Some("alice"));
        assert_eq!(owner_id_from_profile_url("https://alice.itch.io/"), Some("alice"));
        assert_eq!(owner_id_from_profile_url("https://twitter.com/alice"), None);
        assert_eq!(owner_id_from_profile_url("/jam/other"), None);
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(
            strip_tags("<p>Dungeons &amp; <strong>Dragons</strong></p>"),
            "Dungeons & Dragons"
        );
    }

    #[test]
    fn test_parse_utc() {
        assert_eq!(parse_utc("1970-01-02 00:00:00").unwrap(), 86_400);
        assert!(parse_utc("next tuesday").is_err());
    }
}
