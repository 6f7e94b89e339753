#[cfg(test)]
mod tests {
    use crate::{read_json_or_default, LinkStore, ProgressStore};
    use chrono::NaiveDate;
    use reelscope_core::{Comment, CoreError, ItemRecord, Likes, ProgressMap, StoreError};
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    fn temp_file(name: &str) -> PathBuf {
        env::temp_dir()
            .join(format!("test_reelscope_{}", uuid::Uuid::new_v4()))
            .join(name)
    }

    fn record(id: &str, likes: u64) -> ItemRecord {
        ItemRecord {
            id: id.to_string(),
            url: format!("https://www.instagram.com/reel/{}/", id),
            likes: Likes::Count(likes),
            meta_likes: Some(likes.to_string()),
            meta_comments: Some("2".to_string()),
            post_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            comments: vec![
                Comment::new("ana", "so good 😂"),
                Comment::new("bo", "café vibes"),
            ],
        }
    }

    fn map_of(records: &[ItemRecord]) -> ProgressMap {
        records.iter().map(|r| (r.id.clone(), r.clone())).collect()
    }

    #[test]
    fn test_load_missing_is_empty() {
        let store = ProgressStore::new(temp_file("missing.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_corrupt_is_empty() {
        let path = temp_file("corrupt.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ \"abc\": { \"url\": ").unwrap();

        let store = ProgressStore::new(&path);
        assert!(store.load().unwrap().is_empty());

        let report = store.merge_and_save(&map_of(&[record("abc", 1)])).unwrap();
        assert_eq!(report.total_records, 1);
    }

    #[test]
    fn test_merge_is_right_biased() {
        let store = ProgressStore::new(temp_file("data.json"));
        store
            .merge_and_save(&map_of(&[record("a", 1), record("b", 2)]))
            .unwrap();
        let report = store
            .merge_and_save(&map_of(&[record("b", 20), record("c", 3)]))
            .unwrap();

        assert_eq!(report.new_records, 2);
        assert_eq!(report.total_records, 3);

        let loaded = store.load().unwrap();
        assert_eq!(loaded["a"].likes, Likes::Count(1));
        assert_eq!(loaded["b"].likes, Likes::Count(20));
        assert_eq!(loaded["c"].likes, Likes::Count(3));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let store = ProgressStore::new(temp_file("data.json"));
        let results = map_of(&[record("x", 5), record("y", 6)]);

        store.merge_and_save(&results).unwrap();
        let first = fs::read(store.path()).unwrap();
        store.merge_and_save(&results).unwrap();
        let second = fs::read(store.path()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_saved_file_preserves_non_ascii_and_leaves_no_temp() {
        let store = ProgressStore::new(temp_file("data.json"));
        store.merge_and_save(&map_of(&[record("z", 1)])).unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("😂"));
        assert!(content.contains("café"));
        assert!(content.contains("\n  \"z\": {"));

        let mut temp = store.path().as_os_str().to_owned();
        temp.push(".tmp");
        assert!(!PathBuf::from(temp).exists());
    }

    #[test]
    fn test_ids_filled_from_keys() {
        let path = temp_file("legacy.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            r#"{"legacy1": {"url": "https://www.instagram.com/reel/legacy1/", "likes": "1,204", "meta_likes": "1204", "meta_comments": "12", "post_date": "2024-01-05", "comments": []}}"#,
        )
        .unwrap();

        let loaded = ProgressStore::new(&path).load().unwrap();
        assert_eq!(loaded["legacy1"].id, "legacy1");
        assert_eq!(loaded["legacy1"].likes, Likes::Text("1,204".to_string()));
    }

    #[test]
    fn test_pending_is_set_difference() {
        let store = ProgressStore::new(temp_file("data.json"));
        store.merge_and_save(&map_of(&[record("done1", 1)])).unwrap();

        let urls = vec![
            "https://www.instagram.com/reel/done1/".to_string(),
            "https://www.instagram.com/reel/todo1/".to_string(),
            "https://www.instagram.com/reel/todo1/".to_string(),
            "https://www.instagram.com/p/notareel/".to_string(),
            "https://www.instagram.com/reel/todo2/".to_string(),
        ];
        let work = store.pending(&urls).unwrap();

        assert_eq!(
            work.pending,
            vec![
                "https://www.instagram.com/reel/todo1/".to_string(),
                "https://www.instagram.com/reel/todo2/".to_string(),
            ]
        );
        assert_eq!(work.already_done, 1);
        assert_eq!(work.unrecognized.len(), 1);
    }

    #[test]
    fn test_load_required_missing_is_fatal() {
        let store = ProgressStore::new(temp_file("absent.json"));
        let err = store.load_required().unwrap_err();
        assert!(matches!(err, CoreError::Store(StoreError::MissingInput { .. })));
    }

    #[test]
    fn test_link_store_union_preserves_order() {
        let links = LinkStore::new(temp_file("reels.json"));
        assert!(links.load().unwrap().is_empty());

        links
            .save_union(&["https://x/reel/a/".to_string(), "https://x/reel/b/".to_string()])
            .unwrap();
        let saved = links
            .save_union(&["https://x/reel/b/".to_string(), "https://x/reel/c/".to_string()])
            .unwrap();

        assert_eq!(
            saved,
            vec![
                "https://x/reel/a/".to_string(),
                "https://x/reel/b/".to_string(),
                "https://x/reel/c/".to_string(),
            ]
        );
        assert_eq!(links.load().unwrap(), saved);
    }

    #[test]
    fn test_read_json_or_default_on_wrong_shape() {
        let path = temp_file("shape.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{\"not\": \"a list\"}").unwrap();
        let links: Vec<String> = read_json_or_default(&path).unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn test_unreadable_progress_file_is_an_error() {
        let dir = temp_file("occupied");
        fs::create_dir_all(&dir).unwrap();

        // A directory where the file should be cannot be read or replaced
        let store = ProgressStore::new(&dir);
        assert!(matches!(store.load(), Err(CoreError::Io(_))));
        assert!(store.merge_and_save(&map_of(&[record("a", 1)])).is_err());
        assert!(dir.is_dir());
    }
}
