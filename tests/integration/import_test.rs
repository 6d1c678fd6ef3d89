//! Integration tests for batch archiving and package import.

mod helpers;

use std::io::{Cursor, Write};

use bytes::Bytes;
use zip::write::SimpleFileOptions;

use linkmd_core::ErrorKind;
use linkmd_core::config::ArchiveConfig;
use linkmd_service::UploadFile;

fn package(entries: &[(&str, &str)]) -> Bytes {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    Bytes::from(writer.finish().unwrap().into_inner())
}

#[tokio::test]
async fn test_archive_package_extracts_markdown_entries() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;
    let folder = app.folder(project.id, "Inbox", None).await;

    let zip = package(&[
        ("a.md", "# A\n"),
        ("nested/b.md", "# B\n"),
        ("__MACOSX/._a.md", "junk"),
        (".hidden.md", "# Hidden\n"),
        ("image.png", "png"),
    ]);

    let archived = app
        .services
        .documents
        .archive_documents(
            project.id,
            vec![UploadFile::new("bundle.zip", zip)],
            Some(folder.id),
        )
        .await
        .unwrap();

    let mut names: Vec<_> = archived.iter().map(|d| d.filename.clone()).collect();
    names.sort();
    assert_eq!(names, ["a.md", "b.md"]);
    assert!(app.mirror_exists(&format!("{}/Inbox/b.md", project.id)));

    let project = app.services.projects.get_project(project.id).await.unwrap();
    assert_eq!(project.doc_count, 2);
}

#[tokio::test]
async fn test_archive_suffixes_duplicate_names() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;
    app.document(project.id, None, "a.md", "# Existing\n").await;

    let archived = app
        .services
        .documents
        .archive_documents(
            project.id,
            vec![
                UploadFile::new("a.md", Bytes::from_static(b"# First\n")),
                UploadFile::new("a.md", Bytes::from_static(b"# Second\n")),
            ],
            None,
        )
        .await
        .unwrap();

    let names: Vec<_> = archived.iter().map(|d| d.filename.as_str()).collect();
    assert_eq!(names, ["a (1).md", "a (2).md"]);
    assert_eq!(app.document_count(project.id).await, 3);
}

#[tokio::test]
async fn test_archive_single_document_derives_title() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;

    let summary = app
        .services
        .documents
        .archive_single_document(
            project.id,
            "03_release-notes.md",
            Bytes::from_static(b"\xEF\xBB\xBFplain text without headings\n"),
            None,
        )
        .await
        .unwrap();

    assert_eq!(summary.filename, "03_release-notes.md");
    assert_eq!(summary.title, "release notes");
    let stored = app.services.documents.get_document(summary.id).await.unwrap();
    assert!(!stored.document.content.starts_with('\u{feff}'));
}

#[tokio::test]
async fn test_archive_rejects_invalid_uploads() {
    let app = helpers::TestApp::with_config(ArchiveConfig {
        max_files_per_upload: 2,
        ..ArchiveConfig::default()
    })
    .await;
    let project = app.project("Alpha").await;
    let documents = &app.services.documents;

    let err = documents
        .archive_documents(project.id, Vec::new(), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = documents
        .archive_documents(
            project.id,
            vec![UploadFile::new("notes.txt", Bytes::from_static(b"text"))],
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let many = (0..3)
        .map(|i| UploadFile::new(format!("{i}.md"), Bytes::from_static(b"# x\n")))
        .collect();
    let err = documents
        .archive_documents(project.id, many, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = documents
        .archive_documents(
            project.id,
            vec![UploadFile::new("broken.zip", Bytes::from_static(b"not a zip"))],
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    assert_eq!(app.document_count(project.id).await, 0);
}

#[tokio::test]
async fn test_archive_rejects_empty_documents() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;

    let err = app
        .services
        .documents
        .archive_documents(
            project.id,
            vec![UploadFile::new("blank.md", Bytes::from_static(b"  \n"))],
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_archive_batch_with_blank_entry_stores_nothing() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;

    let err = app
        .services
        .documents
        .archive_documents(
            project.id,
            vec![
                UploadFile::new("a.md", Bytes::from_static(b"# A\n")),
                UploadFile::new("b.md", Bytes::from_static(b"   ")),
            ],
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    assert_eq!(app.document_count(project.id).await, 0);
    assert!(!app.mirror_exists(&format!("{}/a.md", project.id)));
    let project = app.services.projects.get_project(project.id).await.unwrap();
    assert_eq!(project.doc_count, 0);
}

#[tokio::test]
async fn test_archive_package_with_blank_entry_stores_nothing() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;

    let zip = package(&[("a.md", "# A\n"), ("b.md", "\n\n")]);
    let err = app
        .services
        .documents
        .archive_documents(project.id, vec![UploadFile::new("bundle.zip", zip)], None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(app.document_count(project.id).await, 0);
}
