//! Integration tests for project lifecycle.

mod helpers;

use linkmd_core::ErrorKind;
use linkmd_core::types::ProjectId;
use linkmd_entity::project::{CreateProject, UpdateProject};

#[tokio::test]
async fn test_create_project_defaults_and_mirror_root() {
    let app = helpers::TestApp::new().await;

    let project = app
        .services
        .projects
        .create_project(CreateProject {
            name: "  Handbook ".to_string(),
            ..CreateProject::default()
        })
        .await
        .unwrap();

    assert_eq!(project.name, "Handbook");
    assert_eq!(project.color, "#6366F1");
    assert_eq!(project.doc_count, 0);
    assert!(app.mirror_exists(&project.id.to_string()));
}

#[tokio::test]
async fn test_project_names_are_unique() {
    let app = helpers::TestApp::new().await;
    app.project("Alpha").await;
    let beta = app.project("Beta").await;
    let projects = &app.services.projects;

    let err = projects
        .create_project(CreateProject {
            name: "Alpha".to_string(),
            ..CreateProject::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let err = projects
        .update_project(
            beta.id,
            UpdateProject {
                name: Some("Alpha".to_string()),
                ..UpdateProject::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let err = projects
        .create_project(CreateProject::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_update_project_is_partial() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;

    let updated = app
        .services
        .projects
        .update_project(
            project.id,
            UpdateProject {
                description: Some("Team notes".to_string()),
                ..UpdateProject::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Alpha");
    assert_eq!(updated.description, "Team notes");
}

#[tokio::test]
async fn test_refresh_document_count() {
    let app = helpers::TestApp::new().await;
    let project = app.project("Alpha").await;
    app.document(project.id, None, "a.md", "# A\n").await;
    app.document(project.id, None, "b.md", "# B\n").await;

    let count = app
        .services
        .projects
        .refresh_document_count(project.id)
        .await
        .unwrap();
    assert_eq!(count, 2);

    let listed = app.services.projects.list_projects().await.unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_unknown_project_not_found() {
    let app = helpers::TestApp::new().await;

    let err = app
        .services
        .projects
        .get_project(ProjectId::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = app
        .services
        .folders
        .create_folder(ProjectId::new(), "Docs", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}
