use bookshelf_core::{CatalogStore, FlatFileStore, LibraryManager};
use std::fs;

#[test]
fn load_creates_missing_storage_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = FlatFileStore::in_dir(dir.path());

    let loaded = store.load_books().unwrap();
    assert!(loaded.records.is_empty());
    assert_eq!(loaded.skipped, 0);
    assert!(dir.path().join("books.txt").exists());

    store.load_members().unwrap();
    assert!(dir.path().join("members.txt").exists());
}

#[test]
fn malformed_lines_are_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("books.txt"),
        "101,Dune,Herbert,Sci-Fi,false\nbroken,line\n\n",
    )
    .unwrap();
    let store = FlatFileStore::in_dir(dir.path());

    let loaded = store.load_books().unwrap();
    assert_eq!(loaded.records.len(), 1);
    assert_eq!(loaded.records[0].title, "Dune");
    assert_eq!(loaded.skipped, 1);
}

#[test]
fn malformed_member_lines_are_skipped_too() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("members.txt"),
        "201,Ada,ada@example.org,101|102\n202,Grace\n203,Bad,bad@example.org,101|oops\n",
    )
    .unwrap();
    let store = FlatFileStore::in_dir(dir.path());

    let loaded = store.load_members().unwrap();
    assert_eq!(loaded.records.len(), 1);
    assert_eq!(loaded.records[0].issued_books, vec![101, 102]);
    assert_eq!(loaded.skipped, 2);
}

#[test]
fn catalog_state_survives_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();

    let book_id;
    let member_id;
    {
        let mut manager = LibraryManager::new(FlatFileStore::in_dir(dir.path()));
        manager.load_all();
        let book = manager
            .add_book("Dune, Messiah", "Herbert, Frank", "Sci-Fi")
            .unwrap();
        let member = manager.add_member("Ada", "ada@example.org").unwrap();
        manager.issue_book(book.id, member.id).unwrap();
        book_id = book.id;
        member_id = member.id;
    }

    let mut manager = LibraryManager::new(FlatFileStore::in_dir(dir.path()));
    let report = manager.load_all();
    assert!(report.errors.is_empty());
    assert_eq!(report.books_loaded, 1);
    assert_eq!(report.members_loaded, 1);
    assert_eq!(report.skipped_lines, 0);

    let book = manager.get_book(book_id).unwrap();
    assert_eq!(book.title, "Dune, Messiah");
    assert_eq!(book.author, "Herbert, Frank");
    assert!(book.issued);

    let member = manager.get_member(member_id).unwrap();
    assert_eq!(member.issued_books, vec![book_id]);

    // Categories are rebuilt from the loaded books.
    assert_eq!(manager.list_categories(), vec!["Sci-Fi"]);
}

#[test]
fn id_generation_resumes_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("books.txt"), "150,High,Author,Cat,false\n").unwrap();

    let mut manager = LibraryManager::new(FlatFileStore::in_dir(dir.path()));
    manager.load_all();

    let book = manager.add_book("Next", "Author", "Cat").unwrap();
    assert_eq!(book.id, 151);
}

#[test]
fn load_failure_falls_back_to_empty_collection() {
    let dir = tempfile::tempdir().unwrap();
    // A directory at the books path makes the read fail outright.
    fs::create_dir(dir.path().join("books.txt")).unwrap();
    fs::write(
        dir.path().join("members.txt"),
        "201,Ada,ada@example.org,\n",
    )
    .unwrap();

    let mut manager = LibraryManager::new(FlatFileStore::in_dir(dir.path()));
    let report = manager.load_all();

    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.books_loaded, 0);
    assert!(manager.list_books().is_empty());
    // The healthy collection still loads.
    assert_eq!(report.members_loaded, 1);
}

#[test]
fn save_rewrites_the_whole_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut manager = LibraryManager::new(FlatFileStore::in_dir(dir.path()));
    manager.load_all();
    manager.add_book("Dune", "Herbert", "Sci-Fi").unwrap();

    let contents = fs::read_to_string(dir.path().join("books.txt")).unwrap();
    assert_eq!(contents, "101,Dune,Herbert,Sci-Fi,false\n");

    manager.add_book("Emma", "Austen", "Classics").unwrap();
    let contents = fs::read_to_string(dir.path().join("books.txt")).unwrap();
    assert_eq!(contents.lines().count(), 2);
    assert!(contents.contains("102,Emma,Austen,Classics,false"));
}
