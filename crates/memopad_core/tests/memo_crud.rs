use memopad_core::{Memo, MemoId, MemoStore, NewMemo, SqliteMemoStore, StoreError};
use rusqlite::Connection;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

fn setup() -> (TempDir, SqliteMemoStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteMemoStore::open(dir.path().join("memo.sqlite3")).unwrap();
    (dir, store)
}

#[test]
fn create_then_read_all_roundtrip() {
    let (_dir, store) = setup();
    store.create(&NewMemo::new("first memo", 1_234)).unwrap();

    let memos = store.read_all().unwrap();
    assert_eq!(memos.len(), 1);
    assert_eq!(memos[0].content, "first memo");
    assert_eq!(memos[0].created_at, 1_234);
}

#[test]
fn create_assigns_fresh_id_each_time() {
    let (_dir, store) = setup();
    let mut seen = HashSet::new();

    for index in 0..20 {
        store
            .create(&NewMemo::new(format!("memo {index}"), index))
            .unwrap();
        let memos = store.read_all().unwrap();
        let new_ids = memos
            .iter()
            .map(|memo| memo.id)
            .filter(|id| !seen.contains(id))
            .collect::<Vec<_>>();
        assert_eq!(new_ids.len(), 1, "exactly one unseen id per create");
        seen.insert(new_ids[0]);
    }

    assert_eq!(seen.len(), 20);
}

#[test]
fn create_is_not_idempotent() {
    let (_dir, store) = setup();
    let draft = NewMemo::new("same", 10);
    store.create(&draft).unwrap();
    store.create(&draft).unwrap();

    let memos = store.read_all().unwrap();
    assert_eq!(memos.len(), 2);
    assert_ne!(memos[0].id, memos[1].id);
    assert_eq!(store.count().unwrap(), 2);
}

#[test]
fn read_all_is_ordered_by_id() {
    let (_dir, store) = setup();
    store.create(&NewMemo::new("a", 300)).unwrap();
    store.create(&NewMemo::new("b", 100)).unwrap();
    store.create(&NewMemo::new("c", 200)).unwrap();

    let ids = store
        .read_all()
        .unwrap()
        .into_iter()
        .map(|memo| memo.id.get())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn delete_removes_exactly_one_row() {
    let (_dir, store) = setup();
    store.create(&NewMemo::new("one", 1)).unwrap();
    store.create(&NewMemo::new("two", 2)).unwrap();

    let memos = store.read_all().unwrap();
    let first = memos.iter().find(|memo| memo.id == MemoId::new(1)).unwrap();
    store.delete(first).unwrap();

    let remaining = store.read_all().unwrap();
    assert_eq!(remaining, vec![Memo::new(MemoId::new(2), "two", 2)]);
}

#[test]
fn delete_of_missing_id_is_noop() {
    let (_dir, store) = setup();
    store.create(&NewMemo::new("stay", 1)).unwrap();
    let before = store.read_all().unwrap();

    store
        .delete(&Memo::new(MemoId::new(99), "ghost", 0))
        .unwrap();
    store
        .delete(&Memo::new(MemoId::new(99), "ghost", 0))
        .unwrap();

    assert_eq!(store.read_all().unwrap(), before);
}

#[test]
fn update_overwrites_in_place_without_changing_id() {
    let (_dir, store) = setup();
    store.create(&NewMemo::new("a", 100)).unwrap();

    store
        .update(&Memo::new(MemoId::new(1), "b", 200))
        .unwrap();

    assert_eq!(
        store.read_all().unwrap(),
        vec![Memo::new(MemoId::new(1), "b", 200)]
    );
}

#[test]
fn update_of_missing_id_is_silent() {
    let (_dir, store) = setup();
    store.create(&NewMemo::new("a", 100)).unwrap();
    let before = store.read_all().unwrap();

    store
        .update(&Memo::new(MemoId::new(42), "nobody", 1))
        .unwrap();

    assert_eq!(store.read_all().unwrap(), before);
}

#[test]
fn ids_are_not_reused_after_deleting_highest_row() {
    let (_dir, store) = setup();
    store.create(&NewMemo::new("one", 1)).unwrap();
    store.create(&NewMemo::new("two", 2)).unwrap();
    store.delete(&Memo::new(MemoId::new(2), "two", 2)).unwrap();

    store.create(&NewMemo::new("three", 3)).unwrap();

    let ids = store
        .read_all()
        .unwrap()
        .into_iter()
        .map(|memo| memo.id.get())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn end_to_end_create_create_delete() {
    let (_dir, store) = setup();

    store.create(&NewMemo::new("buy milk", 1_000)).unwrap();
    assert_eq!(
        store.read_all().unwrap(),
        vec![Memo::new(MemoId::new(1), "buy milk", 1_000)]
    );

    store.create(&NewMemo::new("call mom", 2_000)).unwrap();
    let memos = store.read_all().unwrap();
    assert_eq!(
        memos.iter().map(|memo| memo.id.get()).collect::<Vec<_>>(),
        vec![1, 2]
    );

    store.delete(&memos[0]).unwrap();
    assert_eq!(
        store.read_all().unwrap(),
        vec![Memo::new(MemoId::new(2), "call mom", 2_000)]
    );
}

#[test]
fn null_content_is_reported_as_invalid_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memo.sqlite3");
    let store = SqliteMemoStore::open(&path).unwrap();

    let conn = Connection::open(&path).unwrap();
    conn.execute("INSERT INTO memo (content, datetime) VALUES (NULL, 5);", [])
        .unwrap();
    drop(conn);

    let err = store.read_all().unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(message) if message.contains("content")));
}

#[test]
fn store_reaches_database_written_by_other_handles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memo.sqlite3");
    let store = SqliteMemoStore::open(&path).unwrap();

    let conn = Connection::open(&path).unwrap();
    conn.execute(
        "INSERT INTO memo (content, datetime) VALUES ('outside', 7);",
        [],
    )
    .unwrap();
    drop(conn);

    let memos = store.read_all().unwrap();
    assert_eq!(memos.len(), 1);
    assert_eq!(memos[0].content, "outside");
}

#[test]
fn concurrent_creates_are_serialized() {
    let (_dir, store) = setup();
    let store = Arc::new(store);

    let workers = (0..4)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for index in 0..10 {
                    store
                        .create(&NewMemo::new(format!("w{worker}-{index}"), index))
                        .unwrap();
                }
            })
        })
        .collect::<Vec<_>>();
    for worker in workers {
        worker.join().unwrap();
    }

    let memos = store.read_all().unwrap();
    assert_eq!(memos.len(), 40);
    let ids = memos.iter().map(|memo| memo.id).collect::<HashSet<_>>();
    assert_eq!(ids.len(), 40);
}

#[test]
fn store_works_through_shared_reference() {
    let (_dir, store) = setup();
    let by_ref: &SqliteMemoStore = &store;
    MemoStore::create(&by_ref, &NewMemo::new("via ref", 1)).unwrap();
    assert_eq!(store.count().unwrap(), 1);
}
