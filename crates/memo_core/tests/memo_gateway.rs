use memo_core::db::open_db_in_memory;
use memo_core::{
    CategoryFilter, Locale, MemoCategory, MemoFormData, MemoGateway, MemoOperation, RepoError,
    SqliteMemoRepository,
};
use memo_core::service::memo_filter::memo_matches;
use rusqlite::{params, Connection};
use uuid::Uuid;

fn gateway(conn: &Connection) -> MemoGateway<SqliteMemoRepository<'_>> {
    MemoGateway::new(SqliteMemoRepository::try_new(conn).unwrap())
}

fn trip_form() -> MemoFormData {
    MemoFormData::new("Trip", "Plan the trip")
        .with_category(MemoCategory::Personal)
        .with_tags(["travel"])
}

#[test]
fn create_then_get_returns_input_fields_and_server_values() {
    let conn = open_db_in_memory().unwrap();
    let gateway = gateway(&conn);

    let form = MemoFormData::new("Groceries", "- milk\n- eggs")
        .with_category(MemoCategory::Other)
        .with_tags(["home", "home", "weekly"]);
    let created = gateway.create(&form).unwrap();
    let loaded = gateway.get_by_id(created.id).unwrap().unwrap();

    assert_eq!(loaded, created);
    assert_eq!(loaded.form_data(), form);
    assert!(!loaded.id.is_nil());
    assert!(loaded.created_at > 0);
    assert_eq!(loaded.created_at, loaded.updated_at);
    assert!(!loaded.is_edited());
}

#[test]
fn create_accepts_default_category_and_empty_tags() {
    let conn = open_db_in_memory().unwrap();
    let gateway = gateway(&conn);

    let created = gateway.create(&MemoFormData::new("bare", "")).unwrap();
    assert_eq!(created.category, MemoCategory::Other);
    assert!(created.tags.is_empty());
}

#[test]
fn update_preserves_identity_and_bumps_updated_at() {
    let conn = open_db_in_memory().unwrap();
    let gateway = gateway(&conn);
    let created = gateway.create(&trip_form()).unwrap();

    let form = MemoFormData::new("Work trip", "Book flights")
        .with_category(MemoCategory::Work)
        .with_tags(["travel", "q3"]);
    let updated = gateway.update(created.id, &form).unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
    assert!(updated.is_edited());
    assert_eq!(updated.form_data(), form);
    assert_eq!(gateway.get_by_id(created.id).unwrap().unwrap(), updated);
}

#[test]
fn repeated_updates_keep_moving_updated_at_forward() {
    let conn = open_db_in_memory().unwrap();
    let gateway = gateway(&conn);
    let created = gateway.create(&trip_form()).unwrap();

    conn.execute(
        "UPDATE memos SET updated_at = 9999999999999 WHERE id = ?1;",
        params![created.id.to_string()],
    )
    .unwrap();
    let updated = gateway.update(created.id, &trip_form()).unwrap();
    assert_eq!(updated.updated_at, 10_000_000_000_000);
}

#[test]
fn update_missing_memo_is_a_persistence_error() {
    let conn = open_db_in_memory().unwrap();
    let gateway = gateway(&conn);

    let missing = Uuid::new_v4();
    let err = gateway.update(missing, &trip_form()).unwrap_err();
    assert_eq!(err.operation(), MemoOperation::Update);
    assert!(matches!(err.cause(), RepoError::NotFound(id) if *id == missing));
    assert_eq!(err.user_message(Locale::Ko), "메모 수정에 실패했습니다.");
}

#[test]
fn delete_then_get_is_not_found_and_delete_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let gateway = gateway(&conn);
    let created = gateway.create(&trip_form()).unwrap();

    gateway.delete(created.id).unwrap();
    assert_eq!(gateway.get_by_id(created.id).unwrap(), None);
    gateway.delete(created.id).unwrap();
    gateway.delete(Uuid::new_v4()).unwrap();
}

#[test]
fn list_all_orders_by_created_at_descending() {
    let conn = open_db_in_memory().unwrap();
    let gateway = gateway(&conn);
    let first = gateway.create(&MemoFormData::new("first", "")).unwrap();
    let second = gateway.create(&MemoFormData::new("second", "")).unwrap();
    let third = gateway.create(&MemoFormData::new("third", "")).unwrap();

    conn.execute(
        "UPDATE memos SET created_at = 3000 WHERE id = ?1;",
        params![first.id.to_string()],
    )
    .unwrap();
    conn.execute(
        "UPDATE memos SET created_at = 1000 WHERE id = ?1;",
        params![second.id.to_string()],
    )
    .unwrap();
    conn.execute(
        "UPDATE memos SET created_at = 2000 WHERE id = ?1;",
        params![third.id.to_string()],
    )
    .unwrap();

    let ids = gateway
        .list_all()
        .unwrap()
        .into_iter()
        .map(|memo| memo.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![first.id, third.id, second.id]);
}

#[test]
fn newest_insert_is_first_even_within_the_same_millisecond() {
    let conn = open_db_in_memory().unwrap();
    let gateway = gateway(&conn);
    gateway.create(&MemoFormData::new("older", "")).unwrap();
    let newer = gateway.create(&trip_form()).unwrap();
    conn.execute("UPDATE memos SET created_at = 5000;", []).unwrap();

    assert_eq!(gateway.list_all().unwrap()[0].id, newer.id);
}

#[test]
fn list_by_category_filters_exactly_and_all_means_unfiltered() {
    let conn = open_db_in_memory().unwrap();
    let gateway = gateway(&conn);
    gateway
        .create(&MemoFormData::new("w", "").with_category(MemoCategory::Work))
        .unwrap();
    gateway
        .create(&MemoFormData::new("s", "").with_category(MemoCategory::Study))
        .unwrap();

    let work = gateway
        .list_by_category(CategoryFilter::Only(MemoCategory::Work))
        .unwrap();
    assert_eq!(work.len(), 1);
    assert_eq!(work[0].title, "w");

    assert_eq!(gateway.list_by_category(CategoryFilter::All).unwrap().len(), 2);
    assert!(gateway
        .list_by_category(CategoryFilter::Only(MemoCategory::Idea))
        .unwrap()
        .is_empty());
}

#[test]
fn search_matches_title_or_content_ignoring_case() {
    let conn = open_db_in_memory().unwrap();
    let gateway = gateway(&conn);
    let trip = gateway.create(&trip_form()).unwrap();
    let planner = gateway
        .create(&MemoFormData::new("PLANNER", "weekly review"))
        .unwrap();
    gateway
        .create(&MemoFormData::new("misc", "nothing here").with_tags(["plan"]))
        .unwrap();

    let hits = gateway
        .search("plan")
        .unwrap()
        .into_iter()
        .map(|memo| memo.id)
        .collect::<Vec<_>>();
    assert_eq!(hits, vec![planner.id, trip.id]);
}

#[test]
fn search_treats_like_wildcards_literally() {
    let conn = open_db_in_memory().unwrap();
    let gateway = gateway(&conn);
    gateway.create(&MemoFormData::new("50% off", "")).unwrap();
    gateway.create(&MemoFormData::new("500 units", "")).unwrap();

    let hits = gateway.search("50%").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "50% off");
    assert!(gateway.search("_").unwrap().is_empty());
}

#[test]
fn clear_all_removes_every_row_including_empty_ids() {
    let conn = open_db_in_memory().unwrap();
    let gateway = gateway(&conn);
    gateway.create(&trip_form()).unwrap();
    gateway.create(&MemoFormData::new("second", "")).unwrap();
    conn.execute(
        "INSERT INTO memos (id, title, content) VALUES ('', 'odd', '');",
        [],
    )
    .unwrap();

    let removed = gateway.clear_all().unwrap();
    assert_eq!(removed, 3);
    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM memos;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 0);
}

#[test]
fn unknown_persisted_category_maps_to_other() {
    let conn = open_db_in_memory().unwrap();
    let gateway = gateway(&conn);
    let created = gateway.create(&trip_form()).unwrap();
    conn.execute(
        "UPDATE memos SET category = 'shopping' WHERE id = ?1;",
        params![created.id.to_string()],
    )
    .unwrap();

    let loaded = gateway.get_by_id(created.id).unwrap().unwrap();
    assert_eq!(loaded.category, MemoCategory::Other);
}

#[test]
fn corrupted_tags_surface_as_persistence_error() {
    let conn = open_db_in_memory().unwrap();
    let gateway = gateway(&conn);
    let created = gateway.create(&trip_form()).unwrap();
    conn.execute(
        "UPDATE memos SET tags = 'not json' WHERE id = ?1;",
        params![created.id.to_string()],
    )
    .unwrap();

    let err = gateway.list_all().unwrap_err();
    assert_eq!(err.operation(), MemoOperation::ListAll);
    assert!(matches!(err.cause(), RepoError::InvalidData(_)));
    assert_eq!(err.to_string(), "Failed to load memos.");
}

#[test]
fn search_folds_case_beyond_ascii() {
    let conn = open_db_in_memory().unwrap();
    let gateway = gateway(&conn);
    let memo = gateway
        .create(&MemoFormData::new("ÉTÉ Plans", "Привет МИР"))
        .unwrap();
    gateway
        .create(&MemoFormData::new("winter", "nothing in common"))
        .unwrap();

    for query in ["été", "ÉtÉ", "мир", "ПРИВЕТ"] {
        let hits = gateway.search(query).unwrap();
        assert_eq!(hits.len(), 1, "query {query}");
        assert_eq!(hits[0].id, memo.id);
    }
}

#[test]
fn server_search_agrees_with_local_filter_for_non_ascii_text() {
    let conn = open_db_in_memory().unwrap();
    let gateway = gateway(&conn);
    gateway
        .create(&MemoFormData::new("Ωμέγα notes", "Straße"))
        .unwrap();

    let all = gateway.list_all().unwrap();
    for query in ["ωμέγα", "STRASSE", "straße"] {
        let server = gateway.search(query).unwrap().len();
        let local = all
            .iter()
            .filter(|memo| memo_matches(memo, CategoryFilter::All, query))
            .count();
        assert_eq!(server, local, "query {query}");
    }
}
