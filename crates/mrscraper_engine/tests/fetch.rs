use std::io::{self, Write};
use std::time::Duration;

use mrscraper_engine::{FailureKind, FetchError, FetchSettings, Fetcher, ReqwestFetcher};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(settings: FetchSettings) -> ReqwestFetcher {
    ReqwestFetcher::new(settings).expect("client")
}

async fn download(fetcher: &ReqwestFetcher, url: &str) -> Result<Vec<u8>, FetchError> {
    let mut body = Vec::new();
    let count = fetcher.download(url, &mut body).await?;
    assert_eq!(count, body.len() as u64);
    Ok(body)
}

struct FullDisk;

impl Write for FullDisk {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("no space left on device"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn listing_is_decoded_and_reports_final_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/GB/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<table><tbody></tbody></table>", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let url = format!("{}/files/GB/", server.uri());
    let page = fetcher(FetchSettings::default())
        .fetch_listing(&url)
        .await
        .expect("listing");
    assert_eq!(page.final_url, url);
    assert_eq!(page.encoding_label, "UTF-8");
    assert!(page.html.contains("<tbody>"));
}

#[tokio::test]
async fn listing_must_be_html() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/GB/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&server)
        .await;

    let url = format!("{}/files/GB/", server.uri());
    let err = fetcher(FetchSettings::default())
        .fetch_listing(&url)
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::UnsupportedContentType("application/json".to_string())
    );
}

#[tokio::test]
async fn item_bytes_are_returned_verbatim() {
    let server = MockServer::start().await;
    let body: Vec<u8> = (0u8..=255).collect();
    Mock::given(method("GET"))
        .and(path("/files/GB/game.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.clone(), "application/zip"))
        .mount(&server)
        .await;

    let url = format!("{}/files/GB/game.zip", server.uri());
    let bytes = download(&fetcher(FetchSettings::default()), &url)
        .await
        .expect("bytes");
    assert_eq!(bytes, body);
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.zip"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/missing.zip", server.uri());
    let err = download(&fetcher(FetchSettings::default()), &url)
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow.zip"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("slow"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let url = format!("{}/slow.zip", server.uri());
    let err = download(&fetcher(settings), &url).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn oversized_item_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_string("01234567890"))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_item_bytes: 10,
        ..FetchSettings::default()
    };
    let url = format!("{}/large.zip", server.uri());
    let err = download(&fetcher(settings), &url).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            limit: 10,
            received: 11
        }
    );
}

#[tokio::test]
async fn malformed_url_is_reported() {
    let err = download(&fetcher(FetchSettings::default()), "not a url")
        .await
        .unwrap_err();
    assert!(matches!(err.kind, FailureKind::InvalidUrl(_)));
    assert_eq!(err.url, "not a url");
}

#[tokio::test]
async fn listing_cap_is_separate_from_item_cap() {
    let server = MockServer::start().await;
    let page = format!("<table><tbody>{}</tbody></table>", "<tr></tr>".repeat(20));
    Mock::given(method("GET"))
        .and(path("/files/GB/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(page.clone(), "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/GB/game.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(page, "application/zip"))
        .mount(&server)
        .await;

    let fetcher = fetcher(FetchSettings {
        max_listing_bytes: 64,
        ..FetchSettings::default()
    });
    let err = fetcher
        .fetch_listing(&format!("{}/files/GB/", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err.kind, FailureKind::TooLarge { limit: 64, .. }));
    download(&fetcher, &format!("{}/files/GB/game.zip", server.uri()))
        .await
        .expect("item under item cap");
}

#[tokio::test]
async fn requests_carry_the_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ua.zip"))
        .and(header("user-agent", "mrscraper-test"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let fetcher = fetcher(FetchSettings {
        user_agent: "mrscraper-test".to_string(),
        ..FetchSettings::default()
    });
    let bytes = download(&fetcher, &format!("{}/ua.zip", server.uri()))
        .await
        .expect("matched by user agent");
    assert_eq!(bytes, b"ok");
}

#[tokio::test]
async fn local_write_failure_is_not_a_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/game.zip"))
        .respond_with(ResponseTemplate::new(200).set_body_string("payload"))
        .mount(&server)
        .await;

    let url = format!("{}/game.zip", server.uri());
    let err = fetcher(FetchSettings::default())
        .download(&url, &mut FullDisk)
        .await
        .unwrap_err();
    assert!(matches!(err.kind, FailureKind::LocalWrite(_)));
}
