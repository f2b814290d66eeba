use docnav::service::navigation::TreeNode;
use docnav::NavErrKind;
use test_utils::*;

#[tokio::test]
async fn toggle_never_moves_the_selection() {
    let (nav, backend) = signed_in_navigator().await;
    let finance = backend.add_folder("Finance", None);
    let legal = backend.add_folder("Legal", None);
    let doc = backend.add_document("q1.pdf", Some(finance.id));
    nav.load_folders().await.unwrap();
    nav.select_folder(Some(finance.id)).await.unwrap();
    nav.select_document(doc.clone()).await;

    nav.toggle(finance.id).await;
    nav.toggle(legal.id).await;
    nav.toggle(legal.id).await;

    assert_eq!(nav.selected_folder().await, Some(finance.id));
    assert_eq!(nav.selected_document().await.map(|d| d.id), Some(doc.id));
}

#[tokio::test]
async fn toggle_flips_membership() {
    let (nav, backend) = signed_in_navigator().await;
    let finance = backend.add_folder("Finance", None);

    nav.toggle(finance.id).await;
    assert!(nav.expanded().await.contains(&finance.id));
    nav.toggle(finance.id).await;
    assert!(!nav.expanded().await.contains(&finance.id));
}

#[tokio::test]
async fn selecting_expands_and_clears_the_document() {
    let (nav, backend) = signed_in_navigator().await;
    let finance = backend.add_folder("Finance", None);
    let doc = backend.add_document("readme.txt", None);
    nav.load_folders().await.unwrap();
    nav.select_folder(None).await.unwrap();
    nav.select_document(doc).await;

    nav.select_folder(Some(finance.id)).await.unwrap();

    assert!(nav.expanded().await.contains(&finance.id));
    assert_eq!(nav.selected_document().await, None);
}

#[tokio::test]
async fn tree_rows_descend_only_into_expanded_folders() {
    let (nav, backend) = signed_in_navigator().await;
    let finance = backend.add_folder("Finance", None);
    let invoices = backend.add_folder("Invoices", Some(finance.id));
    backend.add_folder("2024", Some(invoices.id));
    backend.add_folder("Legal", None);
    nav.load_folders().await.unwrap();

    let collapsed: Vec<_> = nav
        .tree_rows()
        .await
        .into_iter()
        .map(|r| (r.node.name().to_string(), r.depth))
        .collect();
    assert_eq!(
        collapsed,
        vec![("root".to_string(), 0), ("Finance".to_string(), 0), ("Legal".to_string(), 0)]
    );

    nav.toggle(finance.id).await;
    nav.toggle(invoices.id).await;
    let rows = nav.tree_rows().await;
    let expanded: Vec<_> = rows
        .iter()
        .map(|r| (r.node.name().to_string(), r.depth))
        .collect();
    assert_eq!(
        expanded,
        vec![
            ("root".to_string(), 0),
            ("Finance".to_string(), 0),
            ("Invoices".to_string(), 1),
            ("2024".to_string(), 2),
            ("Legal".to_string(), 0),
        ]
    );
    assert!(rows[1].expanded && rows[1].has_children);
    assert!(!rows[3].has_children);

    // collapsing a folder hides its whole subtree, even expanded descendants
    nav.toggle(finance.id).await;
    assert_eq!(nav.tree_rows().await.len(), 3);
}

#[tokio::test]
async fn root_row_is_selectable() {
    let (nav, backend) = signed_in_navigator().await;
    let finance = backend.add_folder("Finance", None);
    nav.load_folders().await.unwrap();
    nav.select_folder(Some(finance.id)).await.unwrap();

    let rows = nav.tree_rows().await;
    assert_eq!(rows[0].node, TreeNode::Root);
    assert!(!rows[0].selected);
    assert!(rows[1].selected);

    nav.select_folder(rows[0].node.id()).await.unwrap();

    let rows = nav.tree_rows().await;
    assert!(rows[0].selected);
    assert!(!rows[1].selected);
}

#[tokio::test]
async fn root_row_is_optional() {
    let backend = std::sync::Arc::new(MockBackend::new());
    let config = docnav::Config { show_root: false, ..test_config() };
    let nav = docnav::Navigator::with_backend(config, backend.clone());
    nav.init_session(test_session().with_company(backend.company.clone()))
        .await
        .unwrap();
    backend.add_folder("Finance", None);
    nav.load_folders().await.unwrap();

    let rows = nav.tree_rows().await;
    assert_eq!(rows.len(), 1);
    assert_matches!(&rows[0].node, TreeNode::Folder(_));
}

#[tokio::test]
async fn highlighting_is_display_only() {
    let (nav, backend) = signed_in_navigator().await;
    let finance = backend.add_folder("Finance", None);
    let legal = backend.add_folder("Legal", None);
    let doc = backend.add_document("nda.pdf", None);
    backend.add_document("other.pdf", None);
    nav.load_folders().await.unwrap();
    nav.select_folder(None).await.unwrap();

    nav.set_highlighted([legal.id, doc.id]).await;

    let rows = nav.tree_rows().await;
    let lit: Vec<_> = rows
        .iter()
        .filter(|r| r.highlighted)
        .map(|r| r.node.id())
        .collect();
    assert_eq!(lit, vec![Some(legal.id)]);
    assert!(!rows.iter().any(|r| r.node.id() == Some(finance.id) && r.highlighted));

    let docs = nav.document_rows().await;
    assert_eq!(docs.iter().filter(|r| r.highlighted).count(), 1);
    assert_eq!(nav.selected_folder().await, None);

    nav.clear_highlighted().await;
    assert!(nav.highlighted().await.is_empty());
}

#[tokio::test]
async fn selecting_requires_a_company() {
    let (nav, backend) = test_navigator();
    assert_matches!(
        nav.select_folder(None).await.unwrap_err().kind,
        NavErrKind::NotAuthenticated
    );

    nav.init_session(test_session()).await.unwrap();
    assert_matches!(
        nav.select_folder(None).await.unwrap_err().kind,
        NavErrKind::NoCompanySelected
    );

    assert_eq!(backend.calls("list_documents_by_company"), 0);
}
