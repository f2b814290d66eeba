use docnav::model::tree::FolderTree;
use docnav::NavErrKind;
use test_utils::*;

#[tokio::test]
async fn empty_company_is_not_an_error() {
    let (nav, _backend) = signed_in_navigator().await;
    let folders = nav.load_folders().await.unwrap();
    assert!(folders.is_empty());
    assert!(nav.children_of(None).await.is_empty());
}

#[tokio::test]
async fn children_of_filters_by_exact_parent() {
    let (nav, backend) = signed_in_navigator().await;
    let finance = backend.add_folder("Finance", None);
    let legal = backend.add_folder("Legal", None);
    let invoices = backend.add_folder("Invoices", Some(finance.id));
    let receipts = backend.add_folder("Receipts", Some(finance.id));
    let y2024 = backend.add_folder("2024", Some(invoices.id));

    nav.load_folders().await.unwrap();

    let top: Vec<_> = nav.children_of(None).await.into_iter().map(|f| f.id).collect();
    assert_same_set(top.clone(), [finance.id, legal.id]);

    let below_finance: Vec<_> = nav
        .children_of(Some(finance.id))
        .await
        .into_iter()
        .map(|f| f.id)
        .collect();
    assert_same_set(below_finance, [invoices.id, receipts.id]);

    for f in nav.folders().await {
        let siblings = nav.children_of(f.parent_folder_id).await;
        assert!(siblings.contains(&f), "{} missing from its parent's children", f.name);
    }
    assert!(!top.contains(&y2024.id));
}

#[tokio::test]
async fn children_reflect_edits_without_invalidation() {
    let (nav, backend) = signed_in_navigator().await;
    let finance = backend.add_folder("Finance", None);
    nav.load_folders().await.unwrap();
    assert!(nav.children_of(Some(finance.id)).await.is_empty());

    let invoices = nav.create_folder("Invoices", Some(finance.id)).await.unwrap();

    let children = nav.children_of(Some(finance.id)).await;
    assert_eq!(children, vec![invoices]);
}

#[tokio::test]
async fn failed_load_leaves_no_folders() {
    let (nav, backend) = signed_in_navigator().await;
    backend.add_folder("Finance", None);
    nav.load_folders().await.unwrap();
    assert_eq!(nav.folders().await.len(), 1);

    backend.fail("list_folders", NavErrKind::ServerUnreachable);
    assert_matches!(
        nav.load_folders().await.unwrap_err().kind,
        NavErrKind::ServerUnreachable
    );
    assert!(nav.folders().await.is_empty());
    assert!(!nav.status().await.folders_loading);
}

#[tokio::test]
async fn create_folder_reloads_the_index() {
    let (nav, backend) = signed_in_navigator().await;
    nav.load_folders().await.unwrap();
    backend.reset_calls();

    let created = nav.create_folder("  Contracts ", None).await.unwrap();

    assert_eq!(created.name, "Contracts");
    assert_eq!(backend.calls("list_folders"), 1);
    assert_eq!(nav.get_folder(created.id).await.unwrap(), created);
}

#[tokio::test]
async fn blank_folder_name_never_reaches_the_server() {
    let (nav, backend) = signed_in_navigator().await;
    assert_matches!(nav.create_folder("   ", None).await.unwrap_err().kind, NavErrKind::FolderNameEmpty);
    assert_eq!(backend.calls("create_folder"), 0);
}

#[tokio::test]
async fn create_under_missing_parent_fails() {
    let (nav, _backend) = signed_in_navigator().await;
    let result = nav.create_folder("Orphan", Some(docnav::Uuid::new_v4())).await;
    assert_matches!(result.unwrap_err().kind, NavErrKind::FolderNonexistent);
}

#[tokio::test]
async fn rename_folder_is_reflected_after_reload() {
    let (nav, backend) = signed_in_navigator().await;
    let finance = backend.add_folder("Finance", None);
    nav.load_folders().await.unwrap();

    nav.rename_folder(finance.id, "Money").await.unwrap();

    assert_eq!(nav.get_folder(finance.id).await.unwrap().name, "Money");
}

#[tokio::test]
async fn deleting_an_ancestor_of_the_selection_selects_root() {
    let (nav, backend) = signed_in_navigator().await;
    let finance = backend.add_folder("Finance", None);
    let invoices = backend.add_folder("Invoices", Some(finance.id));
    let legal = backend.add_folder("Legal", None);
    backend.add_document("root.pdf", None);
    nav.load_folders().await.unwrap();
    nav.select_folder(Some(invoices.id)).await.unwrap();

    nav.delete_folder(finance.id).await.unwrap();

    assert_eq!(nav.selected_folder().await, None);
    assert!(!nav.expanded().await.contains(&finance.id));
    assert_eq!(names(&nav.documents().await), vec!["root.pdf"]);
    let folders = nav.folders().await;
    assert_eq!(folders.len(), 1);
    assert!(folders.maybe_find(&legal.id).is_some());
}

#[tokio::test]
async fn deleting_an_unrelated_folder_keeps_the_selection() {
    let (nav, backend) = signed_in_navigator().await;
    let finance = backend.add_folder("Finance", None);
    let legal = backend.add_folder("Legal", None);
    nav.load_folders().await.unwrap();
    nav.select_folder(Some(finance.id)).await.unwrap();

    nav.delete_folder(legal.id).await.unwrap();

    assert_eq!(nav.selected_folder().await, Some(finance.id));
}

#[tokio::test]
async fn folder_mutation_failure_is_returned() {
    let (nav, backend) = signed_in_navigator().await;
    let finance = backend.add_folder("Finance", None);
    nav.load_folders().await.unwrap();
    backend.fail("delete_folder", NavErrKind::ServerUnreachable);

    assert_matches!(
        nav.delete_folder(finance.id).await.unwrap_err().kind,
        NavErrKind::ServerUnreachable
    );
    assert_eq!(nav.folders().await.len(), 1);
}
