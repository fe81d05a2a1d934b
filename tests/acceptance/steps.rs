use crate::GissueWorld;
use cucumber::{given, then, when};
use gissue::config::Config;
use mockito::Matcher;
use serde_json::json;
use std::time::Duration;

fn issue_body(number: u64, title: &str, body: &str) -> String {
    json!({
        "number": number,
        "title": title,
        "body": body,
        "state": "open",
        "created_at": "2024-03-01T10:20:30Z",
        "updated_at": "2024-03-02T08:00:00Z"
    })
    .to_string()
}

fn server(world: &mut GissueWorld) -> &mut mockito::ServerGuard {
    world
        .server
        .as_mut()
        .expect("Background should start the mock tracker")
}

/// Installs a `sh` script as the editor; `script` runs with the scratch path in `$1`.
fn install_editor(world: &mut GissueWorld, script: &str) {
    let dir = tempfile::tempdir().expect("Failed to create editor directory");
    let path = dir.path().join("editor.sh");
    std::fs::write(&path, script).expect("Failed to write fake editor");
    world.editor_command = Some(format!("sh {}", path.display()));
    world.editor_dir = Some(dir);
}

#[given("a mock issue tracker")]
async fn given_mock_tracker(world: &mut GissueWorld) {
    world.server = Some(mockito::Server::new_async().await);
}

#[given(regex = r#"^the token "(.*)"$"#)]
async fn given_token(world: &mut GissueWorld, token: String) {
    world.token = token;
}

#[given(regex = r#"^the editor writes the title "(.*)" and the body "(.*)"$"#)]
async fn given_editor_writes(world: &mut GissueWorld, title: String, body: String) {
    install_editor(
        world,
        &format!("printf '%s\\n\\n%s\\n' '{title}' '{body}' > \"$1\"\n"),
    );
}

#[given("the editor fails")]
async fn given_editor_fails(world: &mut GissueWorld) {
    install_editor(world, "exit 1\n");
}

#[given(regex = r#"^the tracker accepts a new issue "(.*)" with body "(.*)" as #(\d+)$"#)]
async fn given_tracker_accepts_new_issue(
    world: &mut GissueWorld,
    title: String,
    body: String,
    number: u64,
) {
    let auth = format!("token {}", world.token);
    let mock = server(world)
        .mock("POST", "/repos/owner/repo/issues")
        .match_header("authorization", auth.as_str())
        .match_body(Matcher::Json(json!({"title": title, "body": body})))
        .with_status(201)
        .with_body(issue_body(number, &title, &body))
        .create_async()
        .await;
    world.mocks.push(mock);
}

#[given(regex = r#"^the tracker rejects new issues with status (\d+)$"#)]
async fn given_tracker_rejects_new_issues(world: &mut GissueWorld, status: usize) {
    let mock = server(world)
        .mock("POST", "/repos/owner/repo/issues")
        .with_status(status)
        .with_body(r#"{"message":"Validation Failed"}"#)
        .create_async()
        .await;
    world.mocks.push(mock);
}

#[given(regex = r#"^the tracker has issue #(\d+) "(.*)" with body "(.*)"$"#)]
async fn given_tracker_has_issue(world: &mut GissueWorld, number: u64, title: String, body: String) {
    let auth = format!("token {}", world.token);
    let mock = server(world)
        .mock("GET", format!("/repos/owner/repo/issues/{number}").as_str())
        .match_header("authorization", auth.as_str())
        .with_status(200)
        .with_body(issue_body(number, &title, &body))
        .create_async()
        .await;
    world.mocks.push(mock);
}

#[given(regex = r#"^the tracker has no issue #(\d+)$"#)]
async fn given_tracker_has_no_issue(world: &mut GissueWorld, number: u64) {
    let mock = server(world)
        .mock("GET", format!("/repos/owner/repo/issues/{number}").as_str())
        .with_status(404)
        .with_body(r#"{"message":"Not Found"}"#)
        .create_async()
        .await;
    world.mocks.push(mock);
}

#[given(regex = r#"^the tracker accepts an update of issue #(\d+) to "(.*)" with body "(.*)"$"#)]
async fn given_tracker_accepts_update(
    world: &mut GissueWorld,
    number: u64,
    title: String,
    body: String,
) {
    let mock = server(world)
        .mock("PATCH", format!("/repos/owner/repo/issues/{number}").as_str())
        .match_body(Matcher::Json(json!({"title": title, "body": body})))
        .with_status(200)
        .with_body(issue_body(number, &title, &body))
        .create_async()
        .await;
    world.mocks.push(mock);
}

#[given(regex = r#"^the tracker accepts setting issue #(\d+) to "(open|closed)"$"#)]
async fn given_tracker_accepts_state(world: &mut GissueWorld, number: u64, state: String) {
    let mock = server(world)
        .mock("PATCH", format!("/repos/owner/repo/issues/{number}").as_str())
        .match_body(Matcher::Json(json!({"state": state})))
        .with_status(200)
        .create_async()
        .await;
    world.mocks.push(mock);
}

#[when(regex = r"^I run `gissue(.*)`$")]
async fn when_run_gissue(world: &mut GissueWorld, rest: String) {
    let args: Vec<String> = std::iter::once("gissue")
        .chain(rest.split_whitespace())
        .map(str::to_string)
        .collect();
    let config = Config {
        token: world.token.clone(),
        editor: world
            .editor_command
            .clone()
            .unwrap_or_else(|| "true".to_string()),
        api_base_url: server(world).url(),
        timeout: Duration::from_secs(5),
    };

    let mut buffer: Vec<u8> = Vec::new();
    let writer_option: Option<&mut dyn std::io::Write> = Some(&mut buffer);
    let result = gissue::run::run(args, config, writer_option).await;

    world.captured_output = buffer;
    world.run_result = Some(result);
}

#[then(regex = r#"^the output should be "(.*)"$"#)]
async fn then_output_should_be(world: &mut GissueWorld, expected_output: String) {
    assert!(
        matches!(world.run_result, Some(Ok(()))),
        "Command failed: {:?}",
        world.run_result
    );
    let output = String::from_utf8(world.captured_output.clone()).expect("Invalid UTF-8");
    assert_eq!(
        output.trim_end(),
        expected_output,
        "Expected output '{}', but got:\n---\n{}\n---",
        expected_output,
        output.trim_end()
    );
}

#[then(regex = r#"^the output should contain "(.*)"$"#)]
async fn then_output_should_contain(world: &mut GissueWorld, expected: String) {
    assert!(
        matches!(world.run_result, Some(Ok(()))),
        "Command failed: {:?}",
        world.run_result
    );
    let output = String::from_utf8(world.captured_output.clone()).expect("Invalid UTF-8");
    assert!(
        output.contains(&expected),
        "Expected '{}' in output:\n---\n{}\n---",
        expected,
        output
    );
}

#[then(regex = r#"^the command should fail mentioning "(.*)"$"#)]
async fn then_command_should_fail_mentioning(world: &mut GissueWorld, expected: String) {
    let Some(Err(err)) = &world.run_result else {
        panic!("Command should have failed: {:?}", world.run_result);
    };
    let message = format!("{err:#}");
    assert!(
        message.contains(&expected),
        "Expected '{}' in error:\n---\n{}\n---",
        expected,
        message
    );
}

#[then("the command should fail with a usage error")]
async fn then_command_should_fail_with_usage_error(world: &mut GissueWorld) {
    let Some(Err(err)) = &world.run_result else {
        panic!("Command should have failed: {:?}", world.run_result);
    };
    assert!(
        err.downcast_ref::<gissue::run::UsageError>().is_some(),
        "Expected a usage error, got: {err:#}"
    );
}

#[then("the tracker should have received the expected requests")]
async fn then_tracker_received_requests(world: &mut GissueWorld) {
    for mock in &world.mocks {
        mock.assert_async().await;
    }
}
