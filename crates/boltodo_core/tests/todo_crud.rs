use boltodo_core::codec::encode_key;
use boltodo_core::db::{open_db, open_db_in_memory, Bucket};
use boltodo_core::{
    CodecError, RemoveOutcome, RepoError, SqliteTodoRepository, Todo, TodoRepository,
    TodoService, TODOS_BUCKET,
};

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let created = repo.create("first todo").unwrap();
    assert_eq!(created, Todo::new(1, "first todo"));
    assert_eq!(repo.get(created.id).unwrap(), created);
}

#[test]
fn ids_are_sequential_from_one_and_never_reused() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let first = repo.create("a").unwrap();
    let second = repo.create("b").unwrap();
    assert!(repo.delete(second.id).unwrap());
    let third = repo.create("c").unwrap();
    assert!(repo.delete(first.id).unwrap());
    let fourth = repo.create("d").unwrap();

    let ids: Vec<u64> = [first, second, third, fourth]
        .iter()
        .map(|todo| todo.id)
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[test]
fn put_and_update_do_not_advance_the_sequence() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let first = repo.create("first").unwrap();
    repo.put(&first.with_text("rewritten")).unwrap();
    repo.update(&first.with_text("edited")).unwrap();

    assert_eq!(repo.create("second").unwrap().id, 2);
    assert_eq!(repo.get(1).unwrap().text, "edited");
}

#[test]
fn sequence_survives_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("my.db");

    {
        let conn = open_db(&path).unwrap();
        let repo = SqliteTodoRepository::try_new(&conn).unwrap();
        repo.create("one").unwrap();
        let two = repo.create("two").unwrap();
        repo.delete(two.id).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    assert_eq!(repo.create("three").unwrap().id, 3);
    assert_eq!(repo.get(1).unwrap().text, "one");
}

#[test]
fn put_overwrites_existing_value() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let todo = repo.create("draft").unwrap();
    repo.put(&todo.with_text("final")).unwrap();
    assert_eq!(repo.get(todo.id).unwrap().text, "final");
}

#[test]
fn update_existing_todo() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let todo = repo.create("draft").unwrap();
    repo.update(&todo.with_text("")).unwrap();
    assert_eq!(repo.get(todo.id).unwrap(), Todo::new(todo.id, ""));
}

#[test]
fn update_not_found_returns_not_found_and_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let err = repo.update(&Todo::new(42, "ghost")).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(42)));
    assert!(matches!(repo.get(42).unwrap_err(), RepoError::NotFound(42)));
    assert_eq!(repo.create("real").unwrap().id, 1);
}

#[test]
fn delete_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    assert!(!repo.delete(9).unwrap());
    assert!(!repo.delete(9).unwrap());
    assert!(repo.list().unwrap().entries.is_empty());
    assert_eq!(repo.create("first").unwrap().id, 1);
}

#[test]
fn get_after_delete_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let todo = repo.create("temporary").unwrap();
    assert!(repo.delete(todo.id).unwrap());
    assert!(matches!(repo.get(todo.id).unwrap_err(), RepoError::NotFound(1)));
}

#[test]
fn list_returns_all_records_in_id_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    for text in ["a", "b", "c"] {
        repo.create(text).unwrap();
    }

    let listing = repo.list().unwrap();
    assert!(listing.is_clean());
    assert_eq!(
        listing.todos().cloned().collect::<Vec<_>>(),
        vec![Todo::new(1, "a"), Todo::new(2, "b"), Todo::new(3, "c")]
    );
}

#[test]
fn list_orders_numerically_across_byte_boundaries() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    for id in [256_u64, 1, 1 << 40, 255, 2] {
        repo.put(&Todo::new(id, format!("todo {id}"))).unwrap();
    }

    let ids: Vec<u64> = repo.list().unwrap().todos().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2, 255, 256, 1 << 40]);
}

#[test]
fn corrupt_value_is_reported_by_get_and_isolated_by_list() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    for text in ["a", "b", "c"] {
        repo.create(text).unwrap();
    }

    Bucket::open(&conn, TODOS_BUCKET)
        .unwrap()
        .put(&encode_key(2), b"\x00garbage")
        .unwrap();

    let err = repo.get(2).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Format {
            id: 2,
            source: CodecError::Json(_)
        }
    ));

    let listing = repo.list().unwrap();
    assert_eq!(listing.entries.len(), 3);
    assert_eq!(listing.entries[0].as_ref().unwrap(), &Todo::new(1, "a"));
    let corrupt = listing.entries[1].as_ref().unwrap_err();
    assert_eq!(corrupt.id, Some(2));
    assert_eq!(corrupt.key, encode_key(2).to_vec());
    assert_eq!(listing.entries[2].as_ref().unwrap(), &Todo::new(3, "c"));
    assert_eq!(listing.corrupt().count(), 1);
}

#[test]
fn list_reports_malformed_keys_and_misfiled_records() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    repo.create("kept").unwrap();

    let bucket = Bucket::open(&conn, TODOS_BUCKET).unwrap();
    bucket.put(b"short", br#"{"v":1,"id":5,"text":"x"}"#).unwrap();
    bucket
        .put(&encode_key(7), br#"{"v":1,"id":8,"text":"misfiled"}"#)
        .unwrap();

    let listing = repo.list().unwrap();
    assert_eq!(
        listing.todos().cloned().collect::<Vec<_>>(),
        vec![Todo::new(1, "kept")]
    );
    assert_eq!(listing.corrupt().count(), 2);
    assert!(listing
        .corrupt()
        .any(|entry| entry.id.is_none() && matches!(entry.error, CodecError::KeyWidth { actual: 5 })));
    assert!(listing.corrupt().any(|entry| entry.id == Some(7)
        && matches!(
            entry.error,
            CodecError::KeyMismatch {
                key_id: 7,
                record_id: 8
            }
        )));
}

#[test]
fn failed_write_transaction_leaves_no_partial_state() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    repo.create("before").unwrap();

    conn.execute_batch(
        "CREATE TRIGGER reject_writes BEFORE INSERT ON entries
         BEGIN SELECT RAISE(ABORT, 'writes disabled'); END;",
    )
    .unwrap();

    let err = repo.create("blocked").unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));

    conn.execute_batch("DROP TRIGGER reject_writes;").unwrap();
    // The sequence bump from the failed create was rolled back with it.
    assert_eq!(repo.create("after").unwrap().id, 2);
}

#[test]
fn service_scenario_add_get_edit_remove_list() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    let added = service.add("buy milk").unwrap();
    assert_eq!(added.id, 1);
    assert_eq!(service.get(1).unwrap(), Todo::new(1, "buy milk"));

    service.edit(1, "buy oat milk").unwrap();
    assert_eq!(service.get(1).unwrap(), Todo::new(1, "buy oat milk"));

    assert_eq!(service.remove(1).unwrap(), RemoveOutcome::Removed);
    assert!(matches!(service.get(1).unwrap_err(), RepoError::NotFound(1)));
    assert_eq!(service.remove(1).unwrap(), RemoveOutcome::AlreadyAbsent);

    let listing = service.list().unwrap();
    assert!(listing.entries.is_empty());
}

#[test]
fn service_edit_of_missing_id_does_not_create_it() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    let err = service.edit(1, "invented").unwrap_err();
    assert!(matches!(err, RepoError::NotFound(1)));
    assert_eq!(service.add("real").unwrap().id, 1);
}
