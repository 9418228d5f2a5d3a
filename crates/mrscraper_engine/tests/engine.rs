use std::fs;
use std::time::Duration;

use mrscraper_core::{FailureReason, RunConfiguration, RunReport, RunStatus, ValidationError};
use mrscraper_engine::{EngineConfig, EngineError, EngineEvent, EngineHandle};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DIR: &str = "/files/No-Intro/Test/";

fn engine() -> EngineHandle {
    let config = EngineConfig {
        min_free_bytes: 0,
        ..EngineConfig::default()
    };
    EngineHandle::new(config).expect("engine")
}

async fn serve_listing(server: &MockServer, hrefs: &[&str]) {
    let rows: String = hrefs
        .iter()
        .map(|href| format!(r#"<tr><td class="link"><a href="{href}">{href}</a></td></tr>"#))
        .collect();
    let html = format!("<html><body><table><tbody>{rows}</tbody></table></body></html>");
    Mock::given(method("GET"))
        .and(path(DIR))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

async fn serve_item(server: &MockServer, name: &str) {
    Mock::given(method("GET"))
        .and(path(format!("{DIR}{name}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(format!("rom {name}").into_bytes(), "application/zip"),
        )
        .mount(server)
        .await;
}

/// Blocks (off the async executor) until the run's final event arrives.
async fn collect_run(engine: &EngineHandle) -> (Vec<EngineEvent>, RunReport) {
    let engine = engine.clone();
    tokio::task::spawn_blocking(move || {
        let mut events = Vec::new();
        while let Some(event) = engine.recv_timeout(Duration::from_secs(20)) {
            if let EngineEvent::Finished(report) = &event {
                let report = report.clone();
                events.push(event);
                return (events, report);
            }
            events.push(event);
        }
        panic!("run did not finish; events so far: {events:?}");
    })
    .await
    .unwrap()
}

fn config(server: &MockServer, root: &std::path::Path) -> RunConfiguration {
    RunConfiguration {
        region: "Europe".to_string(),
        ..RunConfiguration::new(format!("{}{DIR}", server.uri()), root)
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn start_rejects_missing_url_and_output() {
    let engine = engine();
    let err = engine
        .start(RunConfiguration::new("", "/tmp"))
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Validation(ValidationError::MissingSourceUrl)
    ));

    let err = engine
        .start(RunConfiguration::new("https://myrient.erista.me/files/x/", ""))
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Validation(ValidationError::MissingOutputRoot)
    ));
    assert!(engine.try_recv().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn end_to_end_filtered_run_over_http() {
    let server = MockServer::start().await;
    serve_listing(
        &server,
        &["../", "a(USA).zip", "b(Europe).zip", "c(Europe)(Demo).zip"],
    )
    .await;
    for name in ["a(USA).zip", "b(Europe).zip", "c(Europe)(Demo).zip"] {
        serve_item(&server, name).await;
    }
    let temp = TempDir::new().unwrap();
    let engine = engine();

    let run_id = engine.start(config(&server, temp.path())).unwrap();
    assert_eq!(run_id, 1);
    let (events, report) = collect_run(&engine).await;

    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!((report.completed, report.total), (1, 1));
    assert_eq!(
        fs::read(temp.path().join("output/b(Europe).zip")).unwrap(),
        b"rom b(Europe).zip"
    );
    assert!(!temp.path().join("output/a(USA).zip").exists());
    assert!(events.contains(&EngineEvent::Progress {
        completed: 1,
        total: 1
    }));
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_item_fails_run_and_next_run_can_start() {
    let server = MockServer::start().await;
    serve_listing(&server, &["../", "a(Europe).zip", "b(Europe).zip"]).await;
    serve_item(&server, "a(Europe).zip").await;
    let temp = TempDir::new().unwrap();
    let engine = engine();

    engine.start(config(&server, temp.path())).unwrap();
    let (_events, report) = collect_run(&engine).await;
    assert_eq!(report.status, RunStatus::Failed(FailureReason::Network));
    assert_eq!((report.completed, report.total), (1, 2));
    assert!(temp.path().join("output/a(Europe).zip").exists());

    serve_item(&server, "b(Europe).zip").await;
    let run_id = engine.start(config(&server, temp.path())).unwrap();
    assert_eq!(run_id, 2);
    let (_events, report) = collect_run(&engine).await;
    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!((report.completed, report.total), (2, 2));
}

#[tokio::test(flavor = "multi_thread")]
async fn cancel_requested_right_after_start_is_honoured() {
    let server = MockServer::start().await;
    serve_listing(&server, &["../", "a(Europe).zip", "b(Europe).zip", "c(Europe).zip"]).await;
    for name in ["a(Europe).zip", "b(Europe).zip", "c(Europe).zip"] {
        serve_item(&server, name).await;
    }
    let temp = TempDir::new().unwrap();
    let engine = engine();

    engine.start(config(&server, temp.path())).unwrap();
    engine.request_cancel();
    let (_events, report) = collect_run(&engine).await;

    assert_eq!(report.status, RunStatus::Cancelled);
    assert_eq!(report.completed, 0);
    assert!(!temp.path().join("output").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_listing_reports_network_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DIR))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let temp = TempDir::new().unwrap();
    let engine = engine();

    engine.start(config(&server, temp.path())).unwrap();
    let (_events, report) = collect_run(&engine).await;

    assert_eq!(report.status, RunStatus::Failed(FailureReason::Network));
    assert!(!temp.path().join("output").exists());
}
