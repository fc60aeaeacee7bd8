use quillfeed_search::db::open_db_in_memory;
use quillfeed_search::{
    DocumentId, RepoError, SqliteTagRepository, SyncError, TagDiff, TagRepository, TagSyncService,
};

#[test]
fn sync_on_create_creates_tags_and_associations() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteTagRepository::try_new(&mut conn).unwrap();
    let mut service = TagSyncService::new(repo);
    let document = DocumentId::new_v4();

    let outcome = service.sync_tags(document, "", "#a #b hello").unwrap();
    assert_eq!(outcome.added, vec!["#a".to_string(), "#b".to_string()]);
    assert!(outcome.removed.is_empty());

    let repo = SqliteTagRepository::try_new(&mut conn).unwrap();
    assert_eq!(
        repo.tags_for_document(document).unwrap(),
        vec!["#a".to_string(), "#b".to_string()]
    );
    assert_eq!(
        repo.list_tags().unwrap(),
        vec!["#a".to_string(), "#b".to_string()]
    );
}

#[test]
fn edit_replaces_associations_but_keeps_orphan_tag_rows() {
    let mut conn = open_db_in_memory().unwrap();
    let document = DocumentId::new_v4();

    {
        let repo = SqliteTagRepository::try_new(&mut conn).unwrap();
        let mut service = TagSyncService::new(repo);
        service.sync_tags(document, "", "#a #b hello").unwrap();
        service
            .sync_tags(document, "#a #b hello", "#b #c world")
            .unwrap();
    }

    let repo = SqliteTagRepository::try_new(&mut conn).unwrap();
    assert_eq!(
        repo.tags_for_document(document).unwrap(),
        vec!["#b".to_string(), "#c".to_string()]
    );
    // The #a association is gone, the #a row survives.
    assert_eq!(
        repo.list_tags().unwrap(),
        vec!["#a".to_string(), "#b".to_string(), "#c".to_string()]
    );
    assert_eq!(
        repo.list_active_tags().unwrap(),
        vec!["#b".to_string(), "#c".to_string()]
    );
}

#[test]
fn unchanged_content_is_a_noop() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteTagRepository::try_new(&mut conn).unwrap();
    let mut service = TagSyncService::new(repo);
    let document = DocumentId::new_v4();

    service.sync_tags(document, "", "#same tags").unwrap();
    let outcome = service
        .sync_tags(document, "#same tags", "#same tags edited body")
        .unwrap();
    assert!(outcome.is_noop());
}

#[test]
fn reapplying_the_same_diff_does_not_duplicate_associations() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteTagRepository::try_new(&mut conn).unwrap();
    let document = DocumentId::new_v4();

    let mut diff = TagDiff::default();
    diff.to_add.insert("#twice".to_string());
    repo.apply_tag_diff(document, &diff).unwrap();
    repo.apply_tag_diff(document, &diff).unwrap();

    assert_eq!(
        repo.tags_for_document(document).unwrap(),
        vec!["#twice".to_string()]
    );
    assert_eq!(repo.documents_with_tag("#twice").unwrap(), vec![document]);
}

#[test]
fn delete_cleanup_removes_associations_and_keeps_tags() {
    let mut conn = open_db_in_memory().unwrap();
    let document = DocumentId::new_v4();

    {
        let repo = SqliteTagRepository::try_new(&mut conn).unwrap();
        let mut service = TagSyncService::new(repo);
        service.sync_tags(document, "", "#keepme body").unwrap();
        service.on_document_delete(document).unwrap();
    }

    let repo = SqliteTagRepository::try_new(&mut conn).unwrap();
    assert!(repo.tags_for_document(document).unwrap().is_empty());
    assert_eq!(repo.list_tags().unwrap(), vec!["#keepme".to_string()]);
    assert!(repo.list_active_tags().unwrap().is_empty());
}

#[test]
fn documents_sharing_a_tag_are_all_returned() {
    let mut conn = open_db_in_memory().unwrap();
    let first = DocumentId::new_v4();
    let second = DocumentId::new_v4();

    {
        let repo = SqliteTagRepository::try_new(&mut conn).unwrap();
        let mut service = TagSyncService::new(repo);
        service.sync_tags(first, "", "#shared one").unwrap();
        service.sync_tags(second, "", "#shared two").unwrap();
    }

    let repo = SqliteTagRepository::try_new(&mut conn).unwrap();
    let mut found = repo.documents_with_tag("#shared").unwrap();
    found.sort();
    let mut expected = vec![first, second];
    expected.sort();
    assert_eq!(found, expected);
}

#[test]
fn unknown_tag_resolves_to_an_empty_list() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteTagRepository::try_new(&mut conn).unwrap();
    assert!(repo.documents_with_tag("#nonexistent").unwrap().is_empty());
}

#[test]
fn tag_lookup_is_case_sensitive() {
    let mut conn = open_db_in_memory().unwrap();
    let document = DocumentId::new_v4();

    {
        let repo = SqliteTagRepository::try_new(&mut conn).unwrap();
        let mut service = TagSyncService::new(repo);
        service.sync_tags(document, "", "#Work notes").unwrap();
    }

    let repo = SqliteTagRepository::try_new(&mut conn).unwrap();
    assert_eq!(repo.documents_with_tag("#Work").unwrap(), vec![document]);
    assert!(repo.documents_with_tag("#work").unwrap().is_empty());
}

#[test]
fn blank_tag_names_are_rejected_before_the_transaction() {
    let mut conn = open_db_in_memory().unwrap();
    let mut repo = SqliteTagRepository::try_new(&mut conn).unwrap();
    let document = DocumentId::new_v4();

    let mut diff = TagDiff::default();
    diff.to_add.insert("   ".to_string());
    let err = repo.apply_tag_diff(document, &diff).unwrap_err();
    assert!(matches!(err, RepoError::InvalidTag(_)));
    assert!(repo.list_tags().unwrap().is_empty());
}

#[test]
fn repository_preflight_rejects_unmigrated_connections() {
    let mut conn = rusqlite::Connection::open_in_memory().unwrap();
    let err = SqliteTagRepository::try_new(&mut conn).unwrap_err();
    assert!(matches!(err, RepoError::MissingRequiredTable(_)));
}

#[test]
fn sync_error_reports_the_rolled_back_transaction() {
    let mut conn = open_db_in_memory().unwrap();
    // Inject a mid-transaction failure: the tag row insert succeeds, the
    // association insert aborts.
    conn.execute_batch(
        "CREATE TRIGGER inject_assoc_failure BEFORE INSERT ON document_tags BEGIN
            SELECT RAISE(ABORT, 'injected failure');
         END;",
    )
    .unwrap();

    let repo = SqliteTagRepository::try_new(&mut conn).unwrap();
    let mut service = TagSyncService::new(repo);
    let err = service
        .sync_tags(DocumentId::new_v4(), "", "#boom body")
        .unwrap_err();
    assert!(matches!(err, SyncError::Transaction(_)));

    // Full rollback: not even the tag row from the first statement stuck.
    let repo = SqliteTagRepository::try_new(&mut conn).unwrap();
    assert!(repo.list_tags().unwrap().is_empty());
}
