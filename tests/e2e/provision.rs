use super::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn unreachable_server_exits_with_failure() {
    let ctx = TestContext::new();

    ctx.rigup()
        .write_stdin("\n")
        .assert()
        .failure()
        .code(1)
        .stderr(
            predicate::str::contains("Failed to fetch manifest")
                .and(predicate::str::contains("--url")),
        );

    // nothing beyond the working directory itself was created
    assert!(!ctx.primary().join("extensions").exists());
}

#[test]
fn declining_the_working_directory_exits_cleanly() {
    let ctx = TestContext::new();

    ctx.rigup()
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled."));

    assert!(!ctx.primary().join("extensions").exists());
    ctx.temp
        .child("environment.yaml")
        .assert(predicate::path::missing());
}

#[test]
fn declining_a_non_empty_working_directory_exits_cleanly() {
    let ctx = TestContext::new();
    ctx.temp.child("primary/notes.txt").write_str("keep").unwrap();

    ctx.rigup()
        .write_stdin("y\nnope\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("already contains files"));

    ctx.temp
        .child("primary/notes.txt")
        .assert(predicate::str::contains("keep"));
}

#[tokio::test]
async fn full_run_against_file_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getAll"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(["readme.txt"])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/getFile/readme.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .mount(&server)
        .await;

    // wiremock serves from its own thread
    let ctx = TestContext::new();
    ctx.rigup()
        .arg("--url")
        .arg(server.uri())
        .write_stdin("")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("(from --url)")
                .and(predicate::str::contains("[1/1] readme.txt"))
                .and(predicate::str::contains("All installation steps completed.")),
        );

    ctx.temp
        .child("primary/readme.txt")
        .assert(predicate::str::contains("hello"));
    ctx.temp
        .child("primary/extensions/common")
        .assert(predicate::path::is_dir());
}
