#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use hyper::HeaderMap;

    use crate::middleware::{capture_headers, restore_headers, sync_content_length, tag_cache_status};
    use crate::models::{CacheStatus, StoredHeaderValue};

    #[test]
    fn test_tag_cache_status_overwrites_origin_value() {
        let mut headers = HeaderMap::new();
        headers.append("x-cache", "HIT".parse().unwrap());
        headers.append("x-cache", "STALE".parse().unwrap());

        tag_cache_status(&mut headers, CacheStatus::Miss);

        let values: Vec<_> = headers.get_all("x-cache").iter().collect();
        assert_eq!(values, vec!["MISS"]);

        tag_cache_status(&mut headers, CacheStatus::Hit);
        assert_eq!(headers.get("x-cache").unwrap(), "HIT");
    }

    #[test]
    fn test_capture_headers_groups_repeated_names() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "text/plain".parse().unwrap());
        headers.append("set-cookie", "a=1".parse().unwrap());
        headers.append("set-cookie", "b=2".parse().unwrap());

        let captured = capture_headers(&headers);

        assert_eq!(
            captured["content-type"],
            StoredHeaderValue::One("text/plain".to_string())
        );
        assert_eq!(
            captured["set-cookie"],
            StoredHeaderValue::Many(vec!["a=1".to_string(), "b=2".to_string()])
        );
    }

    #[test]
    fn test_restore_headers_skips_invalid_entries() {
        let mut stored = BTreeMap::new();
        stored.insert(
            "content-type".to_string(),
            StoredHeaderValue::One("text/plain".to_string()),
        );
        stored.insert(
            "set-cookie".to_string(),
            StoredHeaderValue::Many(vec!["a=1".to_string(), "b=2".to_string()]),
        );
        stored.insert(
            "bad name".to_string(),
            StoredHeaderValue::One("x".to_string()),
        );
        stored.insert(
            "x-broken".to_string(),
            StoredHeaderValue::One("line\nbreak".to_string()),
        );

        let headers = restore_headers(&stored);

        assert_eq!(headers.get("content-type").unwrap(), "text/plain");
        assert_eq!(headers.get_all("set-cookie").iter().count(), 2);
        assert!(headers.get("x-broken").is_none());
        assert_eq!(headers.len(), 3);
    }

    #[test]
    fn test_sync_content_length_only_touches_existing_header() {
        let mut headers = HeaderMap::new();
        sync_content_length(&mut headers, 3);
        assert!(headers.get("content-length").is_none());

        headers.insert("content-length", "5".parse().unwrap());
        sync_content_length(&mut headers, 3);
        assert_eq!(headers.get("content-length").unwrap(), "3");
    }
}
