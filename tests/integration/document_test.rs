//! Integration tests for document lifecycle and mirror writes.

mod helpers;

use linkmd_core::ErrorKind;
use linkmd_entity::document::FolderScope;

#[tokio::test]
async fn test_create_document_writes_mirror_file() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;

    let doc = app
        .services
        .documents
        .create_document(project.id, "notes", None, None)
        .await
        .unwrap();

    let expected = format!("{}/notes.md", project.id);
    assert_eq!(doc.document.filename, "notes.md");
    assert_eq!(doc.document.original_path.as_deref(), Some(expected.as_str()));
    assert_eq!(app.read_mirror(&expected).as_deref(), Some("# notes\n"));
    assert_eq!(doc.document.title, "notes");

    let project = app.services.projects.get_project(project.id).await.unwrap();
    assert_eq!(project.doc_count, 1);
}

#[tokio::test]
async fn test_duplicate_filename_conflicts() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;
    app.document(project.id, None, "a.md", "# A\n").await;

    let err = app
        .services
        .documents
        .create_document(project.id, "a.md", None, Some("# Other\n".into()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_invalid_filenames_rejected() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;

    for name in ["", "  ", "a/b.md", ".md"] {
        let err = app
            .services
            .documents
            .create_document(project.id, name, None, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation, "name {name:?}");
    }
}

#[tokio::test]
async fn test_copy_twice_gets_counter_suffixes() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;
    let doc = app.document(project.id, None, "a.md", "# A\n").await;
    let documents = &app.services.documents;

    let first = documents.copy_document(doc.document.id, None, None).await.unwrap();
    let second = documents.copy_document(doc.document.id, None, None).await.unwrap();

    assert_eq!(first.document.filename, "a (1).md");
    assert_eq!(second.document.filename, "a (2).md");
    assert!(app.mirror_exists(&format!("{}/a (2).md", project.id)));
    assert_eq!(app.document_count(project.id).await, 3);
}

#[tokio::test]
async fn test_copy_replicates_tags() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;
    let doc = app.document(project.id, None, "a.md", "# A\n").await;

    let tag = app.services.tags.ensure_tag("rust", None).await.unwrap();
    assert!(app.services.tags.add_to_document(doc.document.id, tag.id).await.unwrap());

    let copy = app
        .services
        .documents
        .copy_document(doc.document.id, None, None)
        .await
        .unwrap();

    let names: Vec<_> = copy.tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["rust"]);
    assert_eq!(app.tags.usage_count(tag.id).await.unwrap(), 2);
}

#[tokio::test]
async fn test_move_document_across_projects() {
    let app = helpers::TestApp::new().await;
    let alpha = app.project("Alpha").await;
    let beta = app.project("Beta").await;
    let target = app.folder(beta.id, "Inbox", None).await;
    let doc = app.document(alpha.id, None, "a.md", "# A\n").await;

    let moved = app
        .services
        .documents
        .move_document(doc.document.id, Some(target.id), None)
        .await
        .unwrap();

    let expected = format!("{}/Inbox/a.md", beta.id);
    assert_eq!(moved.document.project_id, beta.id);
    assert_eq!(moved.document.original_path.as_deref(), Some(expected.as_str()));
    assert!(app.mirror_exists(&expected));
    assert!(!app.mirror_exists(&format!("{}/a.md", alpha.id)));

    let projects = &app.services.projects;
    assert_eq!(projects.get_project(alpha.id).await.unwrap().doc_count, 0);
    assert_eq!(projects.get_project(beta.id).await.unwrap().doc_count, 1);
}

#[tokio::test]
async fn test_move_into_taken_name_conflicts() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;
    let folder = app.folder(project.id, "Docs", None).await;
    app.document(project.id, Some(folder.id), "a.md", "# In folder\n").await;
    let doc = app.document(project.id, None, "a.md", "# At root\n").await;

    let err = app
        .services
        .documents
        .move_document(doc.document.id, Some(folder.id), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_rename_moves_file() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;
    let doc = app.document(project.id, None, "draft.md", "# Draft\n").await;

    let renamed = app
        .services
        .documents
        .rename_document(doc.document.id, "final")
        .await
        .unwrap();

    assert_eq!(renamed.document.filename, "final.md");
    assert!(app.mirror_exists(&format!("{}/final.md", project.id)));
    assert!(!app.mirror_exists(&format!("{}/draft.md", project.id)));
}

#[tokio::test]
async fn test_update_content_rewrites_file_and_metadata() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;
    let doc = app.document(project.id, None, "a.md", "# A\n").await;

    let content = "# Better\n\n```rust\nfn main() {}\n```\n\n| a | b |\n|---|---|\n| 1 | 2 |\n";
    let updated = app
        .services
        .documents
        .update_document(doc.document.id, Some("Custom title"), Some(content))
        .await
        .unwrap();

    assert_eq!(updated.document.code_block_count, 1);
    assert_eq!(updated.document.table_count, 1);
    assert_eq!(updated.document.code_languages.0, ["rust"]);
    assert_eq!(
        app.read_mirror(&format!("{}/a.md", project.id)).as_deref(),
        Some(content)
    );
}

#[tokio::test]
async fn test_delete_document_removes_file() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;
    let doc = app.document(project.id, None, "a.md", "# A\n").await;

    app.services
        .documents
        .delete_document(doc.document.id)
        .await
        .unwrap();

    assert!(!app.mirror_exists(&format!("{}/a.md", project.id)));
    let remaining = app
        .services
        .documents
        .list_documents(project.id, FolderScope::Any)
        .await
        .unwrap();
    assert!(remaining.is_empty());

    let err = app
        .services
        .documents
        .get_document(doc.document.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_project_removes_mirror_root() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;
    let folder = app.folder(project.id, "Docs", None).await;
    app.document(project.id, Some(folder.id), "a.md", "# A\n").await;

    app.services.projects.delete_project(project.id).await.unwrap();

    assert!(!app.mirror_exists(&project.id.to_string()));
    assert_eq!(app.document_count(project.id).await, 0);
}
