use chrono::{NaiveDateTime, TimeZone, Utc};
use notes_core::{LoadStatus, NoteId, NoteStore, INDEX_FILE_NAME};
use serde_json::Value;

const LEGACY_INDEX: &str = r#"[
  {
    "content" : "Pick up the dry cleaning",
    "createdAt" : "2024-05-01T09:15:00Z",
    "id" : "6F9619FF-8B86-4011-B42D-00C04FC964FF",
    "modifiedAt" : "2024-05-02T18:40:12Z",
    "title" : "Errands"
  },
  {
    "content" : "",
    "createdAt" : "2024-04-20T07:00:00+02:00",
    "id" : "1B4E28BA-2FA1-41D2-883F-0016D3CCA427",
    "modifiedAt" : "2024-04-20T07:00:00+02:00",
    "title" : "Empty"
  }
]"#;

#[test]
fn loads_index_written_by_earlier_versions() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(INDEX_FILE_NAME), LEGACY_INDEX).unwrap();

    let store = NoteStore::open(dir.path()).unwrap();
    assert_eq!(store.load_status(), &LoadStatus::Loaded { notes: 2 });

    let errands = store
        .load_by_id(&NoteId::from("6F9619FF-8B86-4011-B42D-00C04FC964FF"))
        .unwrap();
    assert_eq!(errands.title, "Errands");
    assert_eq!(
        errands.created_at,
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 15, 0).unwrap()
    );

    let empty = store
        .load_by_id(&NoteId::from("1B4E28BA-2FA1-41D2-883F-0016D3CCA427"))
        .unwrap();
    assert_eq!(
        empty.created_at,
        Utc.with_ymd_and_hms(2024, 4, 20, 5, 0, 0).unwrap()
    );
    assert_eq!(store.list_titles(), vec!["Errands", "Empty"]);
}

#[test]
fn written_index_is_title_sorted_array_with_camel_case_fields() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = NoteStore::open(dir.path()).unwrap();
    store.save(None, "zeta", "last").unwrap();
    let alpha = store.save(None, "alpha", "first").unwrap();

    let raw = std::fs::read_to_string(dir.path().join(INDEX_FILE_NAME)).unwrap();
    let json: Value = serde_json::from_str(&raw).unwrap();
    let records = json.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["title"], "alpha");
    assert_eq!(records[1]["title"], "zeta");

    let first = records[0].as_object().unwrap();
    let mut keys = first.keys().map(String::as_str).collect::<Vec<_>>();
    keys.sort_unstable();
    assert_eq!(keys, vec!["content", "createdAt", "id", "modifiedAt", "title"]);
    assert_eq!(first["id"], alpha.as_str());
    assert!(first["createdAt"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn legacy_ids_survive_a_rewrite_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(INDEX_FILE_NAME), LEGACY_INDEX).unwrap();
    let legacy = NoteId::from("6F9619FF-8B86-4011-B42D-00C04FC964FF");

    let mut store = NoteStore::open(dir.path()).unwrap();
    store.save(Some(&legacy), "Errands", "done").unwrap();

    let raw = std::fs::read_to_string(dir.path().join(INDEX_FILE_NAME)).unwrap();
    assert!(raw.contains("6F9619FF-8B86-4011-B42D-00C04FC964FF"));

    let reopened = NoteStore::open(dir.path()).unwrap();
    let note = reopened.load_by_id(&legacy).unwrap();
    assert_eq!(note.content, "done");
    assert_eq!(
        note.created_at,
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 15, 0).unwrap()
    );
    assert_eq!(reopened.list_titles()[0], "Errands");
}

#[test]
fn duplicate_ids_in_file_keep_the_last_record() {
    let dir = tempfile::tempdir().unwrap();
    let index = r#"[
      {"id": "DUP", "title": "old", "content": "1",
       "createdAt": "2024-01-01T00:00:00Z", "modifiedAt": "2024-01-01T00:00:00Z"},
      {"id": "DUP", "title": "new", "content": "2",
       "createdAt": "2024-01-01T00:00:00Z", "modifiedAt": "2024-01-02T00:00:00Z"}
    ]"#;
    std::fs::write(dir.path().join(INDEX_FILE_NAME), index).unwrap();

    let store = NoteStore::open(dir.path()).unwrap();
    assert_eq!(store.load_status(), &LoadStatus::Loaded { notes: 1 });
    assert_eq!(store.load_by_id(&NoteId::from("DUP")).unwrap().title, "new");
}

#[test]
fn malformed_index_recovers_to_empty_and_is_left_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let index_path = dir.path().join(INDEX_FILE_NAME);
    std::fs::write(&index_path, "{ this is not json").unwrap();

    let store = NoteStore::open(dir.path()).unwrap();
    assert!(store.is_empty());
    assert!(store.load_status().is_recovered());
    assert_eq!(
        std::fs::read_to_string(&index_path).unwrap(),
        "{ this is not json"
    );
}

#[test]
fn save_after_recovery_writes_a_fresh_valid_index() {
    let dir = tempfile::tempdir().unwrap();
    let index_path = dir.path().join(INDEX_FILE_NAME);
    std::fs::write(&index_path, "[{\"id\": 42}]").unwrap();

    let mut store = NoteStore::open(dir.path()).unwrap();
    assert!(store.load_status().is_recovered());
    let id = store.save(None, "fresh", "start over").unwrap();

    let reopened = NoteStore::open(dir.path()).unwrap();
    assert_eq!(reopened.load_status(), &LoadStatus::Loaded { notes: 1 });
    assert_eq!(reopened.load_by_id(&id).unwrap().content, "start over");
}

#[test]
fn written_timestamps_are_whole_second_utc_date_times() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = NoteStore::open(dir.path()).unwrap();
    let id = store.save(None, "stamp", "body").unwrap();

    let raw = std::fs::read_to_string(dir.path().join(INDEX_FILE_NAME)).unwrap();
    let json: Value = serde_json::from_str(&raw).unwrap();
    let record = &json.as_array().unwrap()[0];
    for field in ["createdAt", "modifiedAt"] {
        let text = record[field].as_str().unwrap();
        assert_eq!(text.len(), "2024-05-01T09:15:00Z".len(), "{field}={text}");
        let parsed = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%SZ").unwrap();
        assert_eq!(
            parsed.and_utc(),
            store.load_by_id(&id).unwrap().created_at
        );
    }
}
