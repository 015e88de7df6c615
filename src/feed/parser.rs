use crate::jobs::RawFeedItem;
use crate::util::html_to_snippet;
use anyhow::Result;
use chrono::SecondsFormat;
use feed_rs::parser;

/// Parses RSS or Atom bytes into loosely-typed items.
///
/// Nothing is rejected here: items missing a title or link are passed on and
/// left for the normalizer to drop. Items without a `<guid>`/`<id>` get no
/// guid, so the normalizer falls back to the link.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<RawFeedItem>> {
    // feed-rs hashes a substitute id for items that lack one; suppress it
    let feed = parser::Builder::new()
        .id_generator(|_, _, _| String::new())
        .build()
        .parse(bytes)?;

    let items = feed
        .entries
        .into_iter()
        .map(|entry| {
            let link = entry.links.first().map(|l| l.href.clone());
            let iso_date = entry
                .published
                .or(entry.updated)
                .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true));
            let content_snippet = entry
                .summary
                .map(|s| s.content)
                .or_else(|| entry.content.and_then(|c| c.body))
                .map(|html| html_to_snippet(&html));
            let creator = entry
                .authors
                .into_iter()
                .map(|p| p.name.trim().to_string())
                .find(|name| !name.is_empty());
            let guid = Some(entry.id.trim().to_string()).filter(|id| !id.is_empty());

            RawFeedItem {
                title: entry.title.map(|t| t.content.trim().to_string()),
                link,
                guid,
                creator,
                iso_date,
                content_snippet,
            }
        })
        .collect();

    Ok(items)
}
