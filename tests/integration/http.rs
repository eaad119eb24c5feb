use super::common::{strings, zip_bytes, Harness};
use rigup::core::RigupError;
use rigup::provision::{run, RunOutcome};
use rigup::remote::HttpFileSource;
use std::fs;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn serve(server: &MockServer, route: &str, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_run_against_http_file_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getAll"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            "readme.txt",
            "node-v20.zip",
            "missing.txt",
            "extensions/common/base.vsix"
        ])))
        .mount(&server)
        .await;
    serve(&server, "/getFile/readme.txt", b"hello".to_vec()).await;
    serve(
        &server,
        "/getFile/node-v20.zip",
        zip_bytes(&[("node/bin/node", b"node")]),
    )
    .await;
    serve(&server, "/getFile/extensions/common/base.vsix", b"vsix".to_vec()).await;
    Mock::given(method("GET"))
        .and(path("/getFile/missing.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let harness = Harness::new(&[]);
    let source = HttpFileSource::new(&server.uri()).unwrap();

    let outcome = run(&harness.container(Arc::new(source)), &harness.config)
        .await
        .unwrap();
    let RunOutcome::Completed(summary) = outcome else {
        panic!("run was declined");
    };

    let root = harness.primary();
    assert_eq!(fs::read_to_string(root.join("readme.txt")).unwrap(), "hello");
    assert_eq!(
        fs::read_to_string(root.join("extensions").join("common").join("base.vsix")).unwrap(),
        "vsix"
    );
    assert!(!root.join("missing.txt").exists());
    assert_eq!(summary.skipped_files(), vec!["missing.txt"]);
    assert_eq!(summary.extraction.completed, strings(&["node-v20.zip"]));
    assert!(harness
        .env
        .get("Path")
        .unwrap()
        .contains(&root.join("node").join("bin").display().to_string()));
}

#[tokio::test]
async fn test_malformed_listing_aborts_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getAll"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let harness = Harness::new(&[]);
    let source = HttpFileSource::new(&server.uri()).unwrap();

    let err = run(&harness.container(Arc::new(source)), &harness.config)
        .await
        .unwrap_err();

    assert!(matches!(err, RigupError::ManifestFetch(_)));
}
