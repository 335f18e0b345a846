//! Integration tests for the save dispatcher and its strategies.
//!
//! Hosts are recording spies; remote resources are served by wiremock.

#![allow(clippy::unwrap_used)]

mod support;

use std::sync::Arc;
use std::time::Duration;

use qrsave_core::bom::UTF8_BOM;
use qrsave_core::{Blob, HostEnvironment, HttpClient, SaveOptions, Saver, StrategyKind};
use support::recording_host::{HostEvent, RecordingHost, Target};
use support::{
    CHROME_IOS_UA, DESKTOP_CHROME_UA, EMBEDDED_WEBVIEW_UA, anchor_env, fallback_env, vendor_env,
    worker_env,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn saver_for(env: &HostEnvironment, host: &Arc<RecordingHost>) -> Saver {
    Saver::new(env, host.clone(), HttpClient::new())
}

async fn serve(server: &MockServer, route: &str, body: &[u8], content_type: &str) {
    Mock::given(method("HEAD"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_vec(), content_type))
        .mount(server)
        .await;
}

// ==================== Strategy routing ====================

#[tokio::test]
async fn test_vendor_only_environment_routes_through_vendor_save() {
    let server = MockServer::start().await;
    serve(&server, "/report.csv", b"a,b\n", "text/csv").await;
    let host = Arc::new(RecordingHost::new());
    let saver = saver_for(&vendor_env(), &host);
    assert_eq!(saver.strategy_kind(), StrategyKind::VendorBlobSave);

    saver
        .save(Blob::new("hello", "text/plain"), Some("a.txt"), None)
        .await;
    saver
        .save(format!("{}/report.csv", server.uri()), Some("report.csv"), None)
        .await;

    let saves = host.vendor_saves();
    assert_eq!(saves.len(), 2);
    assert_eq!(saves[0].0, "a.txt");
    assert_eq!(saves[0].1.bytes().as_ref(), b"hello");
    assert_eq!(saves[1].0, "report.csv");
    assert_eq!(saves[1].1.bytes().as_ref(), b"a,b\n");
    assert!(
        host.events()
            .iter()
            .all(|e| matches!(e, HostEvent::VendorSave { .. })),
        "unexpected host events: {:?}",
        host.events()
    );
}

#[tokio::test]
async fn test_worker_environment_never_touches_host() {
    let host = Arc::new(RecordingHost::with_popups());
    let saver = saver_for(&worker_env(), &host);
    assert_eq!(saver.strategy_kind(), StrategyKind::NoOp);

    saver.save("https://example.com/x.png", None, None).await;
    saver
        .save(
            Blob::new("x", "text/plain;charset=utf-8"),
            Some("x.txt"),
            Some(SaveOptions::with_auto_bom()),
        )
        .await;

    assert!(host.events().is_empty());
}

#[tokio::test]
async fn test_embedded_webview_skips_anchor_download() {
    let host = Arc::new(RecordingHost::new());
    let env = HostEnvironment {
        has_download_attribute: true,
        ..fallback_env(EMBEDDED_WEBVIEW_UA)
    };
    let saver = saver_for(&env, &host);
    assert_eq!(saver.strategy_kind(), StrategyKind::FileReaderFallback);
}

// ==================== BOM ====================

#[tokio::test]
async fn test_auto_bom_prefixes_utf8_text_blob() {
    let host = Arc::new(RecordingHost::new());
    let saver = saver_for(&anchor_env("https://app.example/"), &host);

    saver
        .save(
            Blob::new("héllo", "text/plain;charset=utf-8"),
            Some("a.txt"),
            Some(SaveOptions::with_auto_bom()),
        )
        .await;

    let clicks = host.clicks();
    assert_eq!(clicks.len(), 1);
    assert_eq!(clicks[0].download, "a.txt");
    assert!(!clicks[0].new_context);
    let saved = host.blob_for(&clicks[0].href).unwrap();
    assert_eq!(&saved.bytes()[..3], &UTF8_BOM);
    assert_eq!(saved.len(), "héllo".len() + 3);
    assert_eq!(saved.content_type(), "text/plain;charset=utf-8");
}

#[tokio::test]
async fn test_auto_bom_leaves_binary_blob_alone() {
    let host = Arc::new(RecordingHost::new());
    let saver = saver_for(&anchor_env("https://app.example/"), &host);

    saver
        .save(
            Blob::new(vec![0x89, b'P', b'N', b'G'], "image/png"),
            None,
            Some(SaveOptions::with_auto_bom()),
        )
        .await;

    let clicks = host.clicks();
    assert_eq!(clicks[0].download, "download");
    let saved = host.blob_for(&clicks[0].href).unwrap();
    assert_eq!(saved.bytes().as_ref(), &[0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn test_auto_bom_skipped_without_blob_constructor() {
    let host = Arc::new(RecordingHost::new());
    let env = HostEnvironment {
        has_blob_constructor: false,
        ..vendor_env()
    };
    let saver = saver_for(&env, &host);

    saver
        .save(
            Blob::new("abc", "text/csv;charset=utf-8"),
            Some("t.csv"),
            Some(SaveOptions::with_auto_bom()),
        )
        .await;

    let saves = host.vendor_saves();
    assert_eq!(saves[0].1.bytes().as_ref(), b"abc");
}

#[tokio::test]
async fn test_auto_bom_applies_to_fetched_url() {
    let server = MockServer::start().await;
    serve(&server, "/data.csv", b"1,2\n", "text/csv; charset=utf-8").await;
    let host = Arc::new(RecordingHost::new());
    let saver = saver_for(&vendor_env(), &host);

    saver
        .save(
            format!("{}/data.csv", server.uri()),
            None,
            Some(SaveOptions::with_auto_bom()),
        )
        .await;

    let saves = host.vendor_saves();
    assert_eq!(saves.len(), 1);
    assert_eq!(saves[0].1.bytes().as_ref(), b"\xEF\xBB\xBF1,2\n");
}

// ==================== Object URL lifetime ====================

#[tokio::test(start_paused = true)]
async fn test_object_url_revoked_after_grace_period() {
    let host = Arc::new(RecordingHost::new());
    let saver = saver_for(&anchor_env("https://app.example/"), &host);

    saver.save(Blob::new("x", "text/plain"), Some("x.txt"), None).await;
    let href = host.clicks()[0].href.clone();

    tokio::time::sleep(Duration::from_millis(39_999)).await;
    assert!(host.revoked().is_empty(), "revoked before 40s");

    tokio::time::sleep(Duration::from_millis(1_001)).await;
    assert_eq!(host.revoked(), vec![href]);
}

// ==================== URL saves ====================

#[tokio::test]
async fn test_same_origin_url_clicks_anchor_without_fetching() {
    let server = MockServer::start().await;
    let host = Arc::new(RecordingHost::new());
    let saver = saver_for(&anchor_env(&server.uri()), &host);

    saver.save("/files/report.pdf", Some("report.pdf"), None).await;

    let clicks = host.clicks();
    assert_eq!(clicks.len(), 1);
    assert_eq!(clicks[0].href, format!("{}/files/report.pdf", server.uri()));
    assert_eq!(clicks[0].download, "report.pdf");
    assert!(!clicks[0].new_context);
    assert_eq!(clicks[0].rel(), "noopener");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cross_origin_url_is_fetched_and_saved_as_blob() {
    let server = MockServer::start().await;
    serve(&server, "/logo.png", b"\x89PNG", "image/png").await;
    let host = Arc::new(RecordingHost::new());
    let saver = saver_for(&anchor_env("https://app.example/"), &host);

    saver
        .save(format!("{}/logo.png", server.uri()), Some("logo.png"), None)
        .await;

    let clicks = host.clicks();
    assert_eq!(clicks.len(), 1);
    assert!(clicks[0].href.starts_with("blob:"));
    assert_eq!(clicks[0].download, "logo.png");
    let saved = host.blob_for(&clicks[0].href).unwrap();
    assert_eq!(saved.bytes().as_ref(), b"\x89PNG");
    assert_eq!(saved.content_type(), "image/png");
}

#[tokio::test]
async fn test_cross_origin_probe_failure_opens_new_context() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/private.zip"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    let host = Arc::new(RecordingHost::new());
    let saver = saver_for(&anchor_env("https://app.example/"), &host);
    let url = format!("{}/private.zip", server.uri());

    saver.save(url.as_str(), None, None).await;

    let clicks = host.clicks();
    assert_eq!(clicks.len(), 1);
    assert_eq!(clicks[0].href, url);
    assert_eq!(clicks[0].download, "download");
    assert!(clicks[0].new_context);
}

#[tokio::test]
async fn test_failed_get_after_probe_completes_silently() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let host = Arc::new(RecordingHost::new());
    let saver = saver_for(&anchor_env("https://app.example/"), &host);

    saver
        .save(format!("{}/flaky", server.uri()), Some("flaky.bin"), None)
        .await;

    assert!(host.events().is_empty());
}

#[tokio::test]
async fn test_unreachable_host_never_panics() {
    let host = Arc::new(RecordingHost::new());
    let saver = saver_for(&vendor_env(), &host);

    saver.save("http://127.0.0.1:1/nothing", None, None).await;

    let clicks = host.clicks();
    assert_eq!(clicks.len(), 1);
    assert!(clicks[0].new_context);
    assert!(host.vendor_saves().is_empty());
}

#[tokio::test]
async fn test_unparseable_url_is_dropped() {
    let host = Arc::new(RecordingHost::new());
    let env = HostEnvironment {
        has_download_attribute: true,
        ..HostEnvironment::bare_window(DESKTOP_CHROME_UA)
    };
    let saver = saver_for(&env, &host);

    saver.save("relative/without/location", None, None).await;

    assert!(host.events().is_empty());
}

// ==================== FileReader fallback ====================

#[tokio::test]
async fn test_fallback_blob_navigates_popup_to_object_url() {
    let host = Arc::new(RecordingHost::with_popups());
    let env = HostEnvironment {
        has_file_reader: false,
        ..fallback_env(DESKTOP_CHROME_UA)
    };
    let saver = saver_for(&env, &host);

    saver.save(Blob::new("x", "text/plain"), Some("ignored.txt"), None).await;

    let events = host.events();
    let HostEvent::OpenPopup(Some(popup)) = events[0] else {
        panic!("expected popup first: {events:?}");
    };
    let HostEvent::CreateObjectUrl(object_url) = &events[1] else {
        panic!("expected object URL: {events:?}");
    };
    assert_eq!(
        host.navigations(),
        vec![(Target::Popup(popup), object_url.clone())]
    );
}

#[tokio::test]
async fn test_fallback_without_popup_navigates_current_context() {
    let host = Arc::new(RecordingHost::new());
    let env = HostEnvironment {
        has_file_reader: false,
        ..fallback_env(DESKTOP_CHROME_UA)
    };
    let saver = saver_for(&env, &host);

    saver.save(Blob::new("x", "text/plain"), None, None).await;

    let navigations = host.navigations();
    assert_eq!(navigations.len(), 1);
    assert_eq!(navigations[0].0, Target::CurrentContext);
}

#[tokio::test]
async fn test_fallback_url_probe_failure_uses_popup_once() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/blocked"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let host = Arc::new(RecordingHost::with_popups());
    let saver = saver_for(&fallback_env(DESKTOP_CHROME_UA), &host);
    let url = format!("{}/blocked", server.uri());

    saver.save(url.as_str(), None, None).await;

    let navigations = host.navigations();
    assert_eq!(navigations.len(), 1);
    assert!(matches!(navigations[0].0, Target::Popup(_)));
    assert_eq!(navigations[0].1, url);
}

#[tokio::test]
async fn test_fallback_url_probe_failure_without_popup_opens_new_context() {
    let server = MockServer::start().await;
    let host = Arc::new(RecordingHost::new());
    let saver = saver_for(&fallback_env(DESKTOP_CHROME_UA), &host);

    saver.save(format!("{}/missing", server.uri()), None, None).await;

    let navigations = host.navigations();
    assert_eq!(navigations.len(), 1);
    assert_eq!(navigations[0].0, Target::NewContext);
}

#[tokio::test]
async fn test_fallback_fetched_url_reuses_popup() {
    let server = MockServer::start().await;
    serve(&server, "/doc.txt", b"doc", "text/plain").await;
    let host = Arc::new(RecordingHost::with_popups());
    let env = HostEnvironment {
        has_file_reader: false,
        ..fallback_env(DESKTOP_CHROME_UA)
    };
    let saver = saver_for(&env, &host);

    saver.save(format!("{}/doc.txt", server.uri()), None, None).await;

    let opened: Vec<_> = host
        .events()
        .into_iter()
        .filter(|e| matches!(e, HostEvent::OpenPopup(_)))
        .collect();
    assert_eq!(opened.len(), 1);
    let navigations = host.navigations();
    assert_eq!(navigations.len(), 1);
    assert!(matches!(navigations[0].0, Target::Popup(_)));
    assert!(navigations[0].1.starts_with("blob:"));
}

#[tokio::test]
async fn test_chrome_ios_navigates_to_plain_data_url() {
    let host = Arc::new(RecordingHost::new());
    let saver = saver_for(&fallback_env(CHROME_IOS_UA), &host);

    saver.save(Blob::new("hi", "text/plain"), None, None).await;

    assert_eq!(
        host.navigations(),
        vec![(Target::CurrentContext, "data:text/plain;base64,aGk=".to_string())]
    );
}

#[tokio::test]
async fn test_safari_octet_stream_navigates_to_attachment_data_url() {
    let host = Arc::new(RecordingHost::with_popups());
    let env = HostEnvironment {
        safari_hint: true,
        ..fallback_env("Mozilla/5.0 (iPad; CPU OS 12_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/12.0 Mobile/15E148 Safari/604.1")
    };
    let saver = saver_for(&env, &host);

    saver
        .save(Blob::new("hi", "application/octet-stream"), None, None)
        .await;

    let navigations = host.navigations();
    assert_eq!(navigations.len(), 1);
    assert!(matches!(navigations[0].0, Target::Popup(_)));
    assert_eq!(navigations[0].1, "data:attachment/file;base64,aGk=");
}

#[tokio::test]
async fn test_safari_typed_blob_uses_object_url() {
    let host = Arc::new(RecordingHost::new());
    let env = HostEnvironment {
        safari_hint: true,
        ..fallback_env("Mozilla/5.0 (iPad; CPU OS 12_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/12.0 Mobile/15E148 Safari/604.1")
    };
    let saver = saver_for(&env, &host);

    saver.save(Blob::new("hi", "text/plain"), None, None).await;

    let navigations = host.navigations();
    assert!(navigations[0].1.starts_with("blob:"));
}

#[tokio::test]
async fn test_embedded_webview_navigates_to_attachment_data_url() {
    let host = Arc::new(RecordingHost::new());
    let env = HostEnvironment {
        has_download_attribute: true,
        ..fallback_env(EMBEDDED_WEBVIEW_UA)
    };
    let saver = saver_for(&env, &host);

    saver.save(Blob::new("hi", "text/plain"), None, None).await;

    assert_eq!(
        host.navigations(),
        vec![(
            Target::CurrentContext,
            "data:attachment/file;base64,aGk=".to_string()
        )]
    );
    assert!(host.clicks().is_empty());
}

#[tokio::test]
async fn test_chrome_ios_without_file_reader_uses_object_url() {
    let host = Arc::new(RecordingHost::new());
    let env = HostEnvironment {
        has_file_reader: false,
        ..fallback_env(CHROME_IOS_UA)
    };
    let saver = saver_for(&env, &host);
    assert_eq!(saver.strategy_kind(), StrategyKind::FileReaderFallback);

    saver.save(Blob::new("hi", "text/plain"), None, None).await;

    let navigations = host.navigations();
    assert_eq!(navigations.len(), 1);
    assert_eq!(navigations[0].0, Target::CurrentContext);
    assert!(
        navigations[0].1.starts_with("blob:"),
        "expected an object URL, got {}",
        navigations[0].1
    );
    let saved = host.blob_for(&navigations[0].1).unwrap();
    assert_eq!(saved.bytes().as_ref(), b"hi");
}
