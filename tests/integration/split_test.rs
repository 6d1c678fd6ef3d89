//! Integration tests for heading statistics and document splitting.

mod helpers;

use linkmd_core::ErrorKind;
use linkmd_entity::document::FolderScope;

#[tokio::test]
async fn test_split_without_keeping_original() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;
    let folder = app.folder(project.id, "Docs", None).await;
    let doc = app
        .document(
            project.id,
            Some(folder.id),
            "guide.md",
            "## Install\nsteps\n\n## Usage\nmore\n",
        )
        .await;

    let outcome = app
        .services
        .documents
        .split_document(doc.document.id, 2, false)
        .await
        .unwrap();

    assert!(!outcome.kept);
    let names: Vec<_> = outcome.created.iter().map(|d| d.filename.as_str()).collect();
    assert_eq!(names, ["guide_01_Install.md", "guide_02_Usage.md"]);

    let listed = app
        .services
        .documents
        .list_documents(project.id, FolderScope::Folder(folder.id))
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|d| d.id != doc.document.id));

    let dir = format!("{}/Docs", project.id);
    assert_eq!(
        app.read_mirror(&format!("{dir}/guide_01_Install.md")).as_deref(),
        Some("## Install\n\nsteps\n")
    );
    assert!(!app.mirror_exists(&format!("{dir}/guide.md")));

    let project = app.services.projects.get_project(project.id).await.unwrap();
    assert_eq!(project.doc_count, 2);
}

#[tokio::test]
async fn test_split_keeps_original_and_preamble() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;
    let doc = app
        .document(
            project.id,
            None,
            "guide.md",
            "# Guide\nintro\n\n## A\na\n## B\nb\n",
        )
        .await;
    let tag = app.services.tags.ensure_tag("docs", None).await.unwrap();
    app.services
        .tags
        .add_to_document(doc.document.id, tag.id)
        .await
        .unwrap();

    let outcome = app
        .services
        .documents
        .split_document(doc.document.id, 2, true)
        .await
        .unwrap();

    let names: Vec<_> = outcome.created.iter().map(|d| d.filename.as_str()).collect();
    assert_eq!(
        names,
        ["guide_01_Preamble.md", "guide_02_A.md", "guide_03_B.md"]
    );
    assert_eq!(app.document_count(project.id).await, 4);

    for part in &outcome.created {
        let part = app.services.documents.get_document(part.id).await.unwrap();
        assert_eq!(part.tags.len(), 1);
    }
}

#[tokio::test]
async fn test_split_ignores_headings_in_code_fences() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;
    let doc = app
        .document(
            project.id,
            None,
            "code.md",
            "## A\n```sh\n## not a heading\n```\n## B\ntext\n",
        )
        .await;

    let outcome = app
        .services
        .documents
        .split_document(doc.document.id, 2, true)
        .await
        .unwrap();
    assert_eq!(outcome.created.len(), 2);
}

#[tokio::test]
async fn test_split_requires_two_sections() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;
    let doc = app
        .document(project.id, None, "one.md", "# Title\n## Only\ntext\n")
        .await;
    let documents = &app.services.documents;

    let err = documents
        .split_document(doc.document.id, 2, false)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::SplitInsufficientHeadings);

    let err = documents
        .split_document(doc.document.id, 3, false)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::SplitInsufficientHeadings);

    // Nothing was created or deleted.
    assert_eq!(app.document_count(project.id).await, 1);
}

#[tokio::test]
async fn test_split_rejects_invalid_level() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;
    let doc = app.document(project.id, None, "a.md", "## A\n## B\n").await;

    let err = app
        .services
        .documents
        .split_document(doc.document.id, 7, false)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_heading_stats_counts_per_level() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;
    let doc = app
        .document(
            project.id,
            None,
            "guide.md",
            "# Guide\n## A\n### A.1\n## B\n```\n## fenced\n```\n",
        )
        .await;

    let stats = app
        .services
        .documents
        .heading_stats(doc.document.id)
        .await
        .unwrap();

    assert_eq!(stats.title, "Guide");
    assert_eq!(stats.stats.get(&1), Some(&1));
    assert_eq!(stats.stats.get(&2), Some(&2));
    assert_eq!(stats.stats.get(&3), Some(&1));
    assert_eq!(stats.stats.get(&4), None);
}

#[tokio::test]
async fn test_repeated_split_suffixes_filenames() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;
    let doc = app
        .document(project.id, None, "guide.md", "## Install\nsteps\n## Usage\nmore\n")
        .await;

    let first = app
        .services
        .documents
        .split_document(doc.document.id, 2, true)
        .await
        .unwrap();
    let names: Vec<_> = first.created.iter().map(|d| d.filename.as_str()).collect();
    assert_eq!(names, ["guide_01_Install.md", "guide_02_Usage.md"]);

    let second = app
        .services
        .documents
        .split_document(doc.document.id, 2, true)
        .await
        .unwrap();
    let names: Vec<_> = second.created.iter().map(|d| d.filename.as_str()).collect();
    assert_eq!(names, ["guide_01_Install (1).md", "guide_02_Usage (1).md"]);

    assert!(app.mirror_exists(&format!("{}/guide_01_Install.md", project.id)));
    assert_eq!(
        app.read_mirror(&format!("{}/guide_02_Usage (1).md", project.id))
            .as_deref(),
        Some("## Usage\n\nmore\n")
    );
    assert_eq!(app.document_count(project.id).await, 5);
}

#[tokio::test]
async fn test_split_ignores_front_matter_lines() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;
    let doc = app
        .document(
            project.id,
            None,
            "notes.md",
            "---\n# comment: x\ntitle: T\n---\n## A\na\n## B\nb\n",
        )
        .await;

    let stats = app
        .services
        .documents
        .heading_stats(doc.document.id)
        .await
        .unwrap();
    assert_eq!(stats.stats.get(&1), None);

    let err = app
        .services
        .documents
        .split_document(doc.document.id, 1, true)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::SplitInsufficientHeadings);

    let outcome = app
        .services
        .documents
        .split_document(doc.document.id, 2, true)
        .await
        .unwrap();
    let names: Vec<_> = outcome.created.iter().map(|d| d.filename.as_str()).collect();
    assert_eq!(names, ["notes_01_Preamble.md", "notes_02_A.md", "notes_03_B.md"]);
}
