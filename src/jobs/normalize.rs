use super::record::{JobRecord, RawFeedItem, SourceId, UNKNOWN_COMPANY};

/// Maps one raw feed item into a [`JobRecord`].
///
/// Returns `None` when the item has no title or link, or when `query` is
/// non-empty and is not a case-insensitive substring of `"{title} {summary}"`.
/// Rejection is ordinary filtering, not an error.
pub fn normalize(item: &RawFeedItem, source: &SourceId, query: Option<&str>) -> Option<JobRecord> {
    let title = non_empty(item.title.as_deref())?;
    let link = non_empty(item.link.as_deref())?;

    if let Some(query) = query.filter(|q| !q.is_empty()) {
        let text = format!(
            "{} {}",
            title,
            item.content_snippet.as_deref().unwrap_or("")
        )
        .to_lowercase();
        if !text.contains(&query.to_lowercase()) {
            return None;
        }
    }

    let company = non_empty(item.creator.as_deref()).unwrap_or(UNKNOWN_COMPANY);
    let identity = non_empty(item.guid.as_deref()).unwrap_or(link);

    Some(JobRecord {
        id: format!("{}-{}", source, identity),
        title: title.to_string(),
        company: company.to_string(),
        location: String::new(),
        link: link.to_string(),
        source: source.clone(),
        published_at: item.iso_date.clone(),
        summary: item.content_snippet.clone(),
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn item(title: &str, link: &str) -> RawFeedItem {
        RawFeedItem {
            title: Some(title.to_string()),
            link: Some(link.to_string()),
            ..Default::default()
        }
    }

    fn source() -> SourceId {
        SourceId::new("RemoteOK")
    }

    #[test]
    fn test_full_item_maps_every_field() {
        let raw = RawFeedItem {
            title: Some("Junior Rust Developer".to_string()),
            link: Some("https://remoteok.com/jobs/1".to_string()),
            guid: Some("abc".to_string()),
            creator: Some("Acme".to_string()),
            iso_date: Some("2024-03-01T00:00:00.000Z".to_string()),
            content_snippet: Some("Work on async services".to_string()),
        };

        let job = normalize(&raw, &source(), None).unwrap();
        assert_eq!(
            job,
            JobRecord {
                id: "RemoteOK-abc".to_string(),
                title: "Junior Rust Developer".to_string(),
                company: "Acme".to_string(),
                location: String::new(),
                link: "https://remoteok.com/jobs/1".to_string(),
                source: source(),
                published_at: Some("2024-03-01T00:00:00.000Z".to_string()),
                summary: Some("Work on async services".to_string()),
            }
        );
    }

    #[test]
    fn test_missing_title_rejected() {
        let mut raw = item("x", "https://example.com");
        raw.title = None;
        assert!(normalize(&raw, &source(), None).is_none());
    }

    #[test]
    fn test_empty_link_rejected() {
        assert!(normalize(&item("Dev", ""), &source(), None).is_none());
    }

    #[test]
    fn test_id_falls_back_to_link_without_guid() {
        let job = normalize(&item("Dev", "https://example.com/7"), &source(), None).unwrap();
        assert_eq!(job.id, "RemoteOK-https://example.com/7");
    }

    #[test]
    fn test_empty_guid_falls_back_to_link() {
        let mut raw = item("Dev", "https://example.com/7");
        raw.guid = Some(String::new());
        let job = normalize(&raw, &source(), None).unwrap();
        assert_eq!(job.id, "RemoteOK-https://example.com/7");
    }

    #[test]
    fn test_missing_creator_uses_unknown_company() {
        let job = normalize(&item("Dev", "l"), &source(), None).unwrap();
        assert_eq!(job.company, UNKNOWN_COMPANY);

        let mut raw = item("Dev", "l");
        raw.creator = Some(String::new());
        let job = normalize(&raw, &source(), None).unwrap();
        assert_eq!(job.company, UNKNOWN_COMPANY);
    }

    #[test]
    fn test_query_matches_title_case_insensitively() {
        let raw = item("Senior REACT Engineer", "l");
        assert!(normalize(&raw, &source(), Some("react")).is_some());
        assert!(normalize(&raw, &source(), Some("vue")).is_none());
    }

    #[test]
    fn test_query_matches_summary() {
        let mut raw = item("Frontend Engineer", "l");
        raw.content_snippet = Some("We use TypeScript daily".to_string());
        assert!(normalize(&raw, &source(), Some("typescript")).is_some());
    }

    #[test]
    fn test_query_is_substring_not_token_match() {
        let raw = item("Reactive systems engineer", "l");
        assert!(normalize(&raw, &source(), Some("react")).is_some());
        // The joining space is part of the searched text
        assert!(normalize(&raw, &source(), Some("engineer ")).is_some());
    }

    #[test]
    fn test_empty_query_filters_nothing() {
        assert!(normalize(&item("Anything", "l"), &source(), Some("")).is_some());
    }

    #[test]
    fn test_location_always_empty() {
        let job = normalize(&item("Dev", "l"), &source(), None).unwrap();
        assert_eq!(job.location, "");
    }

    #[test]
    fn test_distinct_guids_give_distinct_ids_and_repeat_is_stable() {
        let mut a = item("Dev", "l");
        a.guid = Some("1".to_string());
        let mut b = item("Dev", "l");
        b.guid = Some("2".to_string());

        let first = normalize(&a, &source(), None).unwrap();
        let second = normalize(&b, &source(), None).unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(first.id, normalize(&a, &source(), None).unwrap().id);
    }

    fn opt_text() -> impl Strategy<Value = Option<String>> {
        proptest::option::of("[a-zA-Z0-9 ]{0,24}")
    }

    proptest! {
        #[test]
        fn prop_missing_title_or_link_always_rejected(
            link in opt_text(),
            guid in opt_text(),
            creator in opt_text(),
            snippet in opt_text(),
            drop_title in any::<bool>(),
        ) {
            let raw = RawFeedItem {
                title: if drop_title { None } else { Some("Title".to_string()) },
                link: if drop_title { link } else { None },
                guid,
                creator,
                iso_date: None,
                content_snippet: snippet,
            };
            prop_assert!(normalize(&raw, &source(), None).is_none());
        }

        #[test]
        fn prop_accepted_records_contain_query(
            title in "[a-zA-Z ]{1,24}",
            snippet in opt_text(),
            query in "[a-zA-Z]{0,4}",
        ) {
            let raw = RawFeedItem {
                title: Some(title),
                link: Some("https://example.com".to_string()),
                content_snippet: snippet,
                ..Default::default()
            };
            match normalize(&raw, &source(), Some(&query)) {
                Some(job) => prop_assert!(job
                    .search_text()
                    .to_lowercase()
                    .contains(&query.to_lowercase())),
                None => prop_assert!(!query.is_empty()),
            }
        }
    }
}
