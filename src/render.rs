//! Plain-text output for the list and show commands.

use chrono::DateTime;

use crate::crawl::parse::strip_tags;
use crate::model::Jam;

/// Aligned listing table: name, id, url, owners, type.
pub fn listing_table(jams: &[Jam]) -> String {
    let mut rows: Vec<[String; 5]> = vec![[
        "Name".into(),
        "ID".into(),
        "URL".into(),
        "Owner(s)".into(),
        "Type".into(),
    ]];
    for jam in jams {
        rows.push([
            jam.name.clone(),
            jam.id.clone(),
            jam.url(),
            jam.owner_ids(),
            jam.gametype.to_string(),
        ]);
    }

    let mut widths = [0usize; 5];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in &rows {
        let line = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Multi-line detail block for a single jam, description rendered as
/// plain text.
pub fn detail(jam: &Jam) -> String {
    let start = DateTime::from_timestamp(jam.start_ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| jam.start_ts.to_string());
    let description = jam
        .description
        .as_deref()
        .map(|html| collapse_blank_lines(strip_tags(html).trim()))
        .unwrap_or_default();

    format!(
        "Jam: {} ({})\n\
         Owner(s): {}\n\
         URL: {}\n\
         Type: {}\n\
         Hashtag: {}\n\
         Start: {}\n\
         Duration: {} days\n\
         \n\
         {}",
        jam.name,
        jam.id,
        jam.owner_ids(),
        jam.url(),
        jam.gametype,
        jam.hashtag.as_deref().unwrap_or("-"),
        start,
        jam.duration_days,
        description,
    )
}

/// Squash runs of blank lines left over from stripped block elements.
fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = false;
    for line in text.lines() {
        if line.trim().is_empty() {
            blank_run = true;
            continue;
        }
        if blank_run && !out.is_empty() {
            out.push('\n');
        }
        blank_run = false;
        out.push_str(line.trim());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GameType, Owner};

    fn jam() -> Jam {
        Jam {
            id: "autumn-jam".into(),
            name: "Autumn Jam".into(),
            start_ts: 86_400,
            duration_days: 9,
            gametype: GameType::Tabletop,
            hashtag: Some("#autumnjam".into()),
            description: Some("<p>Write a <em>pamphlet</em>.</p>\n\n\n<p>Have fun.</p>".into()),
            owners: vec![Owner {
                id: "alice".into(),
                name: "Alice".into(),
            }],
        }
    }

    #[test]
    fn test_listing_table_alignment() {
        let table = listing_table(&[jam()]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Name"));
        assert!(lines[1].contains("autumn-jam"));
        assert!(lines[1].contains("https://itch.io/jam/autumn-jam"));
        assert!(lines[1].ends_with("tabletop"));
        // the id column starts where its header does
        let col = lines[0].find("ID").unwrap();
        assert_eq!(&lines[1][col..col + 10], "autumn-jam");
    }

    #[test]
    fn test_detail_block() {
        let text = detail(&jam());
        assert!(text.contains("Jam: Autumn Jam (autumn-jam)"));
        assert!(text.contains("Owner(s): alice"));
        assert!(text.contains("Type: tabletop"));
        assert!(text.contains("Start: 1970-01-02 00:00:00 UTC"));
        assert!(text.contains("Duration: 9 days"));
        assert!(text.contains("Write a pamphlet."));
        assert!(!text.contains("<p>"));
    }
}
