use docnav::model::document::{is_root_document, Document};
use docnav::service::events::Event;
use docnav::NavErrKind;
use test_utils::*;

/// A document as the server would send it. `None` leaves `folder_id` out of the body entirely.
fn from_wire(company: docnav::Uuid, name: &str, folder_id: Option<serde_json::Value>) -> Document {
    let mut json = serde_json::json!({
        "id": docnav::Uuid::new_v4(),
        "company_id": company,
        "name": name,
        "file_path": "x",
        "file_size": 1,
        "mime_type": "text/plain",
        "checksum": "c",
        "created_at": "2024-03-01T10:00:00Z",
        "updated_at": "2024-03-01T10:00:00Z",
        "tags": null,
    });
    if let Some(folder_id) = folder_id {
        json["folder_id"] = folder_id;
    }
    serde_json::from_value(json).unwrap()
}

#[tokio::test]
async fn root_shows_exactly_the_root_documents() {
    let (nav, backend) = signed_in_navigator().await;
    let company = backend.company.id;
    let finance = backend.add_folder("Finance", None);
    backend.insert_document(from_wire(company, "missing.txt", None));
    backend.insert_document(from_wire(company, "null.txt", Some(serde_json::Value::Null)));
    backend.insert_document(from_wire(company, "empty.txt", Some("".into())));
    backend.insert_document(from_wire(company, "filed.txt", Some(finance.id.to_string().into())));
    nav.load_folders().await.unwrap();

    let shown = nav.select_folder(None).await.unwrap();

    let expected: Vec<_> = backend
        .stored_documents()
        .into_iter()
        .filter(is_root_document)
        .map(|d| d.id)
        .collect();
    assert_same_set(shown.iter().map(|d| d.id), expected);
    assert_same_set(names(&nav.documents().await), ["missing.txt", "null.txt", "empty.txt"]);
    assert_eq!(backend.calls("list_documents_by_company"), 1);
    assert_eq!(backend.calls("list_documents_by_folder"), 0);
}

#[tokio::test]
async fn folder_is_fetched_directly() {
    let (nav, backend) = signed_in_navigator().await;
    let finance = backend.add_folder("Finance", None);
    backend.add_document("q1.pdf", Some(finance.id));
    backend.add_document("root.pdf", None);

    nav.select_folder(Some(finance.id)).await.unwrap();

    assert_eq!(names(&nav.documents().await), vec!["q1.pdf"]);
    assert_eq!(backend.calls("list_documents_by_folder"), 1);
    assert_eq!(backend.calls("list_documents_by_company"), 0);
}

#[tokio::test]
async fn selecting_twice_shows_the_same_list() {
    let (nav, backend) = signed_in_navigator().await;
    let finance = backend.add_folder("Finance", None);
    backend.add_document("q1.pdf", Some(finance.id));
    backend.add_document("q2.pdf", Some(finance.id));

    nav.select_folder(Some(finance.id)).await.unwrap();
    let once = nav.documents().await;
    nav.select_folder(Some(finance.id)).await.unwrap();
    let twice = nav.documents().await;

    assert_eq!(once, twice);
    assert_eq!(backend.calls("list_documents_by_folder"), 2);
}

#[tokio::test]
async fn last_selection_wins() {
    let (nav, backend) = signed_in_navigator().await;
    let a = backend.add_folder("A", None);
    let b = backend.add_folder("B", None);
    backend.add_document("from-a.pdf", Some(a.id));
    backend.add_document("from-b.pdf", Some(b.id));
    backend.hold(Gate::Listing(Some(a.id)));

    let slow = tokio::spawn({
        let nav = nav.clone();
        async move { nav.select_folder(Some(a.id)).await }
    });
    until_called(&backend, "list_documents_by_folder", 1).await;

    nav.select_folder(Some(b.id)).await.unwrap();
    assert_eq!(names(&nav.documents().await), vec!["from-b.pdf"]);

    backend.release(Gate::Listing(Some(a.id)));
    slow.await.unwrap().unwrap();

    assert_eq!(nav.selected_folder().await, Some(b.id));
    assert_eq!(names(&nav.documents().await), vec!["from-b.pdf"]);
    assert!(!nav.status().await.documents_loading);
}

#[tokio::test]
async fn late_root_load_does_not_overwrite_a_folder() {
    let (nav, backend) = signed_in_navigator().await;
    let a = backend.add_folder("A", None);
    backend.add_document("root.pdf", None);
    backend.add_document("from-a.pdf", Some(a.id));
    backend.hold(Gate::Listing(None));

    let slow = tokio::spawn({
        let nav = nav.clone();
        async move { nav.select_folder(None).await }
    });
    until_called(&backend, "list_documents_by_company", 1).await;
    nav.select_folder(Some(a.id)).await.unwrap();
    backend.release(Gate::Listing(None));
    slow.await.unwrap().unwrap();

    assert_eq!(names(&nav.documents().await), vec!["from-a.pdf"]);
}

#[tokio::test]
async fn loading_is_flagged_while_pending() {
    let (nav, backend) = signed_in_navigator().await;
    let a = backend.add_folder("A", None);
    backend.hold(Gate::Listing(Some(a.id)));

    let pending = tokio::spawn({
        let nav = nav.clone();
        async move { nav.select_folder(Some(a.id)).await }
    });
    until_called(&backend, "list_documents_by_folder", 1).await;
    assert!(nav.status().await.documents_loading);

    backend.release(Gate::Listing(Some(a.id)));
    pending.await.unwrap().unwrap();
    assert!(!nav.status().await.documents_loading);
}

#[tokio::test]
async fn failed_load_empties_the_list() {
    let (nav, backend) = signed_in_navigator().await;
    let a = backend.add_folder("A", None);
    backend.add_document("q1.pdf", Some(a.id));
    nav.select_folder(Some(a.id)).await.unwrap();
    assert_eq!(nav.documents().await.len(), 1);

    let mut events = nav.subscribe();
    backend.fail("list_documents_by_folder", NavErrKind::ServerUnreachable);
    let result = nav.reload_documents().await;

    assert_matches!(result.unwrap_err().kind, NavErrKind::ServerUnreachable);
    assert!(nav.documents().await.is_empty());
    assert!(!nav.status().await.documents_loading);
    assert_eq!(events.recv().await.unwrap(), Event::DocumentsLoaded(Some(a.id)));

    backend.heal("list_documents_by_folder");
    nav.reload_documents().await.unwrap();
    assert_eq!(nav.documents().await.len(), 1);
}

#[tokio::test]
async fn loading_another_folder_leaves_the_display_alone() {
    let (nav, backend) = signed_in_navigator().await;
    let a = backend.add_folder("A", None);
    let b = backend.add_folder("B", None);
    backend.add_document("from-a.pdf", Some(a.id));
    backend.add_document("from-b.pdf", Some(b.id));
    nav.select_folder(Some(a.id)).await.unwrap();

    let other = nav.load_documents(Some(b.id)).await.unwrap();

    assert_eq!(names(&other), vec!["from-b.pdf"]);
    assert_eq!(names(&nav.documents().await), vec!["from-a.pdf"]);
}

#[tokio::test]
async fn selection_events_are_published() {
    let (nav, backend) = signed_in_navigator().await;
    let a = backend.add_folder("A", None);
    let mut events = nav.subscribe();

    nav.select_folder(Some(a.id)).await.unwrap();

    assert_eq!(events.recv().await.unwrap(), Event::FolderSelected(Some(a.id)));
    assert_eq!(events.recv().await.unwrap(), Event::DocumentsLoaded(Some(a.id)));
}
