use booklib::{
    book::BookDraft,
    session::{EditState, LibrarySession, EMPTY_LIBRARY_MESSAGE, NO_MATCHES_MESSAGE},
};

fn add(session: &mut LibrarySession, title: &str, author: &str) -> u64 {
    *session.add_form_mut() = BookDraft::new(title, author);
    session.submit_add().expect("add")
}

#[test]
fn add_form_clears_only_on_success() {
    let mut session = LibrarySession::new();

    *session.add_form_mut() = BookDraft::new("Dune", "   ");
    assert!(session.submit_add().is_none());
    assert_eq!(session.add_form(), &BookDraft::new("Dune", "   "));
    assert!(session.store().is_empty());

    session.add_form_mut().author = "Frank Herbert".to_string();
    assert!(session.submit_add().is_some());
    assert_eq!(session.add_form(), &BookDraft::default());
    assert_eq!(session.store().len(), 1);
}

#[test]
fn edit_save_cancel_flow() {
    let mut session = LibrarySession::new();
    let dune = add(&mut session, "Dune", "Frank Herbert");
    let orwell = add(&mut session, "1984", "George Orwell");

    assert!(!session.begin_edit(999));
    assert_eq!(session.edit_state(), &EditState::NotEditing);

    assert!(session.begin_edit(dune));
    assert_eq!(
        session.edit_state(),
        &EditState::Editing {
            id: dune,
            draft: BookDraft::new("Dune", "Frank Herbert"),
        }
    );

    session.edit_draft_mut().expect("draft").title = "  ".to_string();
    assert!(!session.save_edit());
    assert_eq!(session.edit_state().editing_id(), Some(dune));
    assert_eq!(session.store().get(dune).map(|b| b.title.as_str()), Some("Dune"));

    session.edit_draft_mut().expect("draft").title = "Dune Messiah".to_string();
    assert!(session.save_edit());
    assert_eq!(session.edit_state(), &EditState::NotEditing);
    assert_eq!(
        session.store().get(dune).map(|b| b.title.as_str()),
        Some("Dune Messiah")
    );
    assert_eq!(session.store().ordered_ids(), &[orwell, dune]);

    assert!(session.begin_edit(orwell));
    session.edit_draft_mut().expect("draft").title = "Animal Farm".to_string();
    let revision = session.store().revision();
    session.cancel_edit();
    assert_eq!(session.edit_state(), &EditState::NotEditing);
    assert_eq!(session.store().revision(), revision);
    assert_eq!(session.store().get(orwell).map(|b| b.title.as_str()), Some("1984"));
}

#[test]
fn removing_edited_record_closes_edit() {
    let mut session = LibrarySession::new();
    let dune = add(&mut session, "Dune", "Frank Herbert");
    let orwell = add(&mut session, "1984", "George Orwell");

    assert!(session.begin_edit(dune));
    assert!(session.remove(orwell));
    assert_eq!(session.edit_state().editing_id(), Some(dune));

    assert!(session.remove(dune));
    assert_eq!(session.edit_state(), &EditState::NotEditing);
    assert!(session.edit_draft_mut().is_none());
    assert!(!session.save_edit());
}

#[test]
fn visible_books_follow_search_text() {
    let mut session = LibrarySession::new();
    let dune = add(&mut session, "Dune", "Frank Herbert");
    add(&mut session, "1984", "George Orwell");

    session.set_search("HERB");
    let visible: Vec<u64> = session.visible_books().iter().map(|b| b.id).collect();
    assert_eq!(visible, vec![dune]);
    assert_eq!(session.empty_message(), None);

    session.set_search("tolkien");
    assert!(session.visible_books().is_empty());
    assert_eq!(session.empty_message(), Some(NO_MATCHES_MESSAGE));

    session.set_search("");
    assert_eq!(session.visible_books().len(), 2);

    assert!(session.remove(dune));
    session.undo().expect("undo");
    assert_eq!(session.visible_books().len(), 2);

    let mut emptied = LibrarySession::with_store(session.into_store());
    for id in emptied.store().ordered_ids().to_vec() {
        emptied.remove(id);
    }
    assert_eq!(emptied.empty_message(), Some(EMPTY_LIBRARY_MESSAGE));
}

#[test]
fn begin_edit_replaces_open_edit_and_drops_its_draft() {
    let mut session = LibrarySession::new();
    let dune = add(&mut session, "Dune", "Frank Herbert");
    let orwell = add(&mut session, "1984", "George Orwell");

    assert!(session.begin_edit(dune));
    session.edit_draft_mut().expect("draft").title = "Dune Messiah".to_string();

    assert!(session.begin_edit(orwell));
    assert_eq!(
        session.edit_state(),
        &EditState::Editing {
            id: orwell,
            draft: BookDraft::new("1984", "George Orwell"),
        }
    );
    assert_eq!(session.store().get(dune).map(|b| b.title.as_str()), Some("Dune"));
}

#[test]
fn redo_closes_edit_on_removed_record() {
    let mut session = LibrarySession::new();
    let dune = add(&mut session, "Dune", "Frank Herbert");

    assert!(session.remove(dune));
    session.undo().expect("undo");
    assert!(session.begin_edit(dune));

    session.redo().expect("redo");
    assert!(session.store().get(dune).is_none());
    assert_eq!(session.edit_state(), &EditState::NotEditing);
}
