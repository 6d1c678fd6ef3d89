//! Integration tests for folder lifecycle and mirror relocation.

mod helpers;

use linkmd_core::ErrorKind;
use linkmd_service::MAX_FOLDER_DEPTH;

#[tokio::test]
async fn test_create_folder_creates_directory() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;

    let docs = app.folder(project.id, "Docs", None).await;
    let sub = app.folder(project.id, "Sub", Some(docs.id)).await;

    assert_eq!(sub.parent_id, Some(docs.id));
    assert!(app.mirror_exists(&format!("{}/Docs/Sub", project.id)));
}

#[tokio::test]
async fn test_duplicate_sibling_name_conflicts() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;
    let docs = app.folder(project.id, "Docs", None).await;

    let err = app
        .services
        .folders
        .create_folder(project.id, "Docs", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    // Same name under a different parent is fine.
    app.folder(project.id, "Docs", Some(docs.id)).await;
}

#[tokio::test]
async fn test_blank_folder_name_rejected() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;

    let err = app
        .services
        .folders
        .create_folder(project.id, "   ", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_rename_cascades_document_paths() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;
    let docs = app.folder(project.id, "Docs", None).await;
    let sub = app.folder(project.id, "Sub", Some(docs.id)).await;
    let doc = app.document(project.id, Some(sub.id), "a.md", "# A\n").await;
    assert!(app.mirror_exists(&format!("{}/Docs/Sub/a.md", project.id)));

    app.services
        .folders
        .rename_folder(docs.id, "Guides")
        .await
        .unwrap();

    let doc = app.services.documents.get_document(doc.document.id).await.unwrap();
    let path = doc.document.original_path.unwrap();
    assert!(path.ends_with("/Guides/Sub/a.md"), "got {path}");
    assert_eq!(app.read_mirror(&path).as_deref(), Some("# A\n"));
    assert!(!app.mirror_exists(&format!("{}/Docs", project.id)));
}

#[tokio::test]
async fn test_move_into_descendant_is_circular() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;
    let a = app.folder(project.id, "A", None).await;
    let b = app.folder(project.id, "B", Some(a.id)).await;
    let c = app.folder(project.id, "C", Some(b.id)).await;

    let folders = &app.services.folders;
    let err = folders.move_folder(a.id, Some(c.id)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::CircularReference);

    let err = folders.move_folder(a.id, Some(a.id)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::CircularReference);

    let unchanged = folders.get_folder(a.id).await.unwrap();
    assert_eq!(unchanged.parent_id, None);
}

#[tokio::test]
async fn test_depth_limit_on_create() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;

    let mut parent = None;
    for i in 1..=MAX_FOLDER_DEPTH {
        let folder = app.folder(project.id, &format!("f{i}"), parent).await;
        parent = Some(folder.id);
    }

    let err = app
        .services
        .folders
        .create_folder(project.id, "f11", parent)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::DepthLimitExceeded);
}

#[tokio::test]
async fn test_depth_limit_on_move_counts_subtree() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;

    let mut a_chain = Vec::new();
    let mut parent = None;
    for i in 1..=5 {
        let f = app.folder(project.id, &format!("a{i}"), parent).await;
        parent = Some(f.id);
        a_chain.push(f);
    }
    let mut b_chain = Vec::new();
    let mut parent = None;
    for i in 1..=6 {
        let f = app.folder(project.id, &format!("b{i}"), parent).await;
        parent = Some(f.id);
        b_chain.push(f);
    }

    let folders = &app.services.folders;
    let target = Some(a_chain[4].id);
    let err = folders.move_folder(b_chain[0].id, target).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::DepthLimitExceeded);

    let moved = folders.move_folder(b_chain[1].id, target).await.unwrap();
    assert_eq!(moved.parent_id, target);
}

#[tokio::test]
async fn test_move_folder_relocates_documents() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;
    let src = app.folder(project.id, "Src", None).await;
    let dst = app.folder(project.id, "Dst", None).await;
    let doc = app.document(project.id, Some(src.id), "note.md", "# Note\n").await;

    app.services
        .folders
        .move_folder(src.id, Some(dst.id))
        .await
        .unwrap();

    let expected = format!("{}/Dst/Src/note.md", project.id);
    let doc = app.services.documents.get_document(doc.document.id).await.unwrap();
    assert_eq!(doc.document.original_path.as_deref(), Some(expected.as_str()));
    assert!(app.mirror_exists(&expected));
    assert!(!app.mirror_exists(&format!("{}/Src", project.id)));
}

#[tokio::test]
async fn test_delete_folder_cascades() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;
    let a = app.folder(project.id, "A", None).await;
    let b = app.folder(project.id, "B", Some(a.id)).await;
    app.document(project.id, Some(a.id), "one.md", "# One\n").await;
    app.document(project.id, Some(b.id), "two.md", "# Two\n").await;
    app.document(project.id, None, "keep.md", "# Keep\n").await;

    let deletion = app.services.folders.delete_folder(a.id).await.unwrap();
    assert_eq!(deletion.folder_ids.len(), 2);
    assert_eq!(deletion.document_count, 2);

    assert!(!app.mirror_exists(&format!("{}/A", project.id)));
    assert!(app.mirror_exists(&format!("{}/keep.md", project.id)));
    assert_eq!(app.document_count(project.id).await, 1);

    let project = app.services.projects.get_project(project.id).await.unwrap();
    assert_eq!(project.doc_count, 1);

    let err = app.services.folders.get_folder(b.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_tree_sorts_folders_first_naturally() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;
    let docs = app.folder(project.id, "Docs", None).await;
    app.document(project.id, Some(docs.id), "ch10.md", "# Ten\n").await;
    app.document(project.id, Some(docs.id), "ch2.md", "# Two\n").await;
    app.document(project.id, None, "readme.md", "# Readme\n").await;

    let tree = app.services.trees.get_project_tree(project.id).await.unwrap();
    assert_eq!(tree.len(), 2);
    let linkmd_entity::folder::TreeNode::Folder(folder) = &tree[0] else {
        panic!("expected folder first");
    };
    let names: Vec<_> = folder
        .children
        .iter()
        .map(|n| match n {
            linkmd_entity::folder::TreeNode::File(d) => d.filename.as_str(),
            linkmd_entity::folder::TreeNode::Folder(f) => f.name.as_str(),
        })
        .collect();
    assert_eq!(names, ["ch2.md", "ch10.md"]);
}
