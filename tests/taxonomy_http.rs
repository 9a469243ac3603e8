use std::sync::Arc;
use std::time::Duration;

use business_form::errors::FormError;
use business_form::taxonomy::{
    flatten_taxonomy, CategoryOptions, CategorySource, HttpCategorySource, LoadState, TaxonomyTask,
};

const BODY: &str = r#"[
  {"DirectorySubcategories": [{"subcategory": "Plumbing"}, {"subcategory": "Electrical"}]},
  {"DirectorySubcategories": [{"subcategory": "Plumbing"}, {"subcategory": "Catering"}]}
]"#;

#[tokio::test]
async fn http_source_parses_taxonomy() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/categories")
        .match_header("accept", "application/json")
        .with_status(200)
        .with_body(BODY)
        .create_async()
        .await;

    let source = HttpCategorySource::new(format!("{}/categories", server.url()));
    let groups = source.fetch().await.unwrap();
    mock.assert_async().await;

    assert_eq!(groups.len(), 2);
    assert_eq!(
        flatten_taxonomy(&groups),
        vec!["Plumbing", "Electrical", "Catering"]
    );
}

#[tokio::test]
async fn http_source_reports_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/categories")
        .with_status(503)
        .create_async()
        .await;

    let source = HttpCategorySource::new(format!("{}/categories", server.url()));
    match source.fetch().await {
        Err(FormError::Status(503)) => {}
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/categories")
        .with_status(200)
        .with_body("{\"not\": \"a list\"}")
        .create_async()
        .await;

    let source = HttpCategorySource::new(format!("{}/categories", server.url()));
    assert!(matches!(
        source.fetch().await,
        Err(FormError::Serde(_))
    ));
}

#[tokio::test]
async fn task_installs_names_from_the_service() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/categories")
        .with_status(200)
        .with_body(BODY)
        .create_async()
        .await;

    let options = CategoryOptions::new();
    assert_eq!(options.state(), LoadState::Pending);

    let source = HttpCategorySource::new(format!("{}/categories", server.url()))
        .with_timeout(Duration::from_secs(5));
    let mut task = TaxonomyTask::spawn(Arc::new(source), options.clone());
    assert!(task.settle(Duration::from_secs(10)).await);

    assert_eq!(options.state(), LoadState::Ready);
    assert_eq!(options.names(), vec!["Plumbing", "Electrical", "Catering"]);
}
