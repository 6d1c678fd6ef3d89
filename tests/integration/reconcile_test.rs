//! Integration tests for mirror reconciliation.

mod helpers;

use linkmd_core::ErrorKind;
use linkmd_core::types::DocumentId;

#[tokio::test]
async fn test_reconcile_project_restores_missing_files() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;
    let docs = app.folder(project.id, "Docs", None).await;
    let sub = app.folder(project.id, "Sub", Some(docs.id)).await;
    app.document(project.id, None, "root.md", "# Root\n").await;
    app.document(project.id, Some(sub.id), "deep.md", "# Deep\n").await;

    std::fs::remove_dir_all(app.mirror_path(&project.id.to_string())).unwrap();

    let report = app
        .services
        .reconcile
        .reconcile_project(project.id)
        .await
        .unwrap();

    assert_eq!(report.directories, 3);
    assert_eq!(report.documents, 2);
    assert_eq!(report.relocated, 0);
    assert_eq!(
        app.read_mirror(&format!("{}/Docs/Sub/deep.md", project.id)).as_deref(),
        Some("# Deep\n")
    );
    assert!(app.mirror_exists(&format!("{}/root.md", project.id)));
}

#[tokio::test]
async fn test_reconcile_document_moves_stale_copy() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;
    let folder = app.folder(project.id, "Docs", None).await;
    let doc = app.document(project.id, Some(folder.id), "a.md", "# A\n").await;

    let stale = format!("{}/old/a.md", project.id);
    std::fs::create_dir_all(app.mirror_path(&format!("{}/old", project.id))).unwrap();
    std::fs::write(app.mirror_path(&stale), "# A\n").unwrap();
    app.documents
        .set_original_path(doc.document.id, &stale)
        .await
        .unwrap();
    std::fs::remove_file(app.mirror_path(&format!("{}/Docs/a.md", project.id))).unwrap();

    let repaired = app
        .services
        .reconcile
        .reconcile_document(doc.document.id)
        .await
        .unwrap();

    let expected = format!("{}/Docs/a.md", project.id);
    assert_eq!(repaired.original_path.as_deref(), Some(expected.as_str()));
    assert!(app.mirror_exists(&expected));
    assert!(!app.mirror_exists(&stale));
}

#[tokio::test]
async fn test_reconcile_folder_counts_subtree() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;
    let a = app.folder(project.id, "A", None).await;
    let b = app.folder(project.id, "B", Some(a.id)).await;
    app.folder(project.id, "Other", None).await;
    app.document(project.id, Some(b.id), "x.md", "# X\n").await;

    let report = app.services.reconcile.reconcile_folder(a.id).await.unwrap();
    assert_eq!(report.directories, 2);
    assert_eq!(report.documents, 1);
}

#[tokio::test]
async fn test_reconcile_unknown_document_not_found() {
    let app = helpers::TestApp::new().await;

    let err = app
        .services
        .reconcile
        .reconcile_document(DocumentId::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}
