//! End-to-end station tests against a synthetic site
//!
//! Every test mounts the fixture site on its own wiremock server, so they run
//! in parallel without shared state.

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{
    FakeDetail, FakeProgram, audio_body, mount_site, output_dir, sample_programs, site_config,
    site_config_with_policy, station,
};
use radio_dl::{
    Broadcast, DownloadScheduler, Error, FileCollisionAction, HttpFetcher, KolHayStation,
    PartialFailurePolicy, ProgramRef, Station, StationKind,
};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn names(broadcasts: &[Broadcast]) -> Vec<&str> {
    broadcasts.iter().map(|b| b.name.as_str()).collect()
}

#[tokio::test]
async fn test_load_programs_skips_placeholder() {
    let server = MockServer::start().await;
    mount_site(&server, &sample_programs()).await;

    let programs = station(&server).load_programs().await.unwrap();
    assert_eq!(programs, vec!["Morning Show", "Night Talk"]);
}

#[tokio::test]
async fn test_load_broadcasts_follows_pages_in_order() {
    let server = MockServer::start().await;
    mount_site(&server, &sample_programs()).await;

    let broadcasts = station(&server)
        .load_broadcasts(&ProgramRef::Name("Morning Show".into()), None)
        .await
        .unwrap();

    assert_eq!(
        names(&broadcasts),
        vec![
            "Morning 01/03",
            "Morning 02/03 - 1",
            "Morning 02/03 - 2",
            "Morning 03/03",
            "Morning 05/03 - 1",
            "Morning 05/03 - 2",
            "Morning 05/03 - 3",
        ]
    );
    assert_eq!(broadcasts[0].url, format!("{}/audio/101-1.mp3", server.uri()));
    assert_eq!(broadcasts[6].url, format!("{}/audio/105-3.mp3", server.uri()));
}

#[tokio::test]
async fn test_progress_counts_detail_pages() {
    let server = MockServer::start().await;
    mount_site(&server, &sample_programs()).await;

    let calls: Arc<Mutex<Vec<(u64, u64)>>> = Arc::new(Mutex::new(Vec::new()));
    let record = {
        let calls = calls.clone();
        move |completed: u64, total: u64| calls.lock().unwrap().push((completed, total))
    };

    station(&server)
        .load_broadcasts(&ProgramRef::Index(0), Some(&record))
        .await
        .unwrap();

    let calls = calls.lock().unwrap().clone();
    assert_eq!(calls, (1..=5).map(|c| (c, 5)).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_ordinal_and_name_agree_and_repeat_identically() {
    let server = MockServer::start().await;
    mount_site(&server, &sample_programs()).await;
    let station = station(&server);

    let by_index = station.load_broadcasts(&ProgramRef::Index(1), None).await.unwrap();
    let by_name = station
        .load_broadcasts(&ProgramRef::Name("Night Talk".into()), None)
        .await
        .unwrap();
    let again = station.load_broadcasts(&ProgramRef::Index(1), None).await.unwrap();

    assert_eq!(names(&by_index), vec!["Night: Special?"]);
    assert_eq!(by_index, by_name);
    assert_eq!(by_index, again);
}

#[tokio::test]
async fn test_unknown_program_is_empty_not_error() {
    let server = MockServer::start().await;
    mount_site(&server, &sample_programs()).await;

    let broadcasts = station(&server)
        .load_broadcasts(&ProgramRef::Name("No Such Show".into()), None)
        .await
        .unwrap();
    assert!(broadcasts.is_empty());
}

#[tokio::test]
async fn test_failing_detail_page_abort_vs_skip() {
    let server = MockServer::start().await;
    let programs = vec![FakeProgram::new(
        "Flaky",
        "flaky",
        vec![vec![
            FakeDetail::new(301, "Good", 1),
            FakeDetail::new(302, "Broken", 1),
            FakeDetail::new(303, "Also good", 1),
        ]],
    )];
    // Mounted first so it wins over the fixture's page for 302
    Mock::given(method("GET"))
        .and(path("/radio/broadcast/302/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_site(&server, &programs).await;

    let program = ProgramRef::Name("Flaky".into());

    let abort = KolHayStation::new(&site_config(&server)).unwrap();
    let err = abort.load_broadcasts(&program, None).await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 500, .. }));

    let skip =
        KolHayStation::new(&site_config_with_policy(&server, PartialFailurePolicy::Skip)).unwrap();
    let broadcasts = skip.load_broadcasts(&program, None).await.unwrap();
    assert_eq!(names(&broadcasts), vec!["Good", "Also good"]);
}

#[tokio::test]
async fn test_registry_station_downloads_selected_broadcasts() {
    let server = MockServer::start().await;
    mount_site(&server, &sample_programs()).await;
    let config = site_config(&server);

    let station = StationKind::KolHay.build(&config).unwrap();
    let broadcasts = station
        .load_broadcasts(&ProgramRef::Index(0), None)
        .await
        .unwrap();
    let selected: Vec<Broadcast> = broadcasts[1..4].to_vec();

    let dir = output_dir();
    let fetcher = HttpFetcher::new(config.fetch.clone()).unwrap();
    let report = DownloadScheduler::new(&fetcher, FileCollisionAction::Overwrite)
        .unwrap()
        .download_many(&selected, dir.path(), 2, 2)
        .await
        .unwrap();

    assert!(report.all_succeeded());
    let expected = [
        ("002 - Morning 02_03 - 1.mp3", audio_body(102, 1)),
        ("003 - Morning 02_03 - 2.mp3", audio_body(102, 2)),
        ("004 - Morning 03_03.mp3", audio_body(103, 1)),
    ];
    for (file, body) in expected {
        assert_eq!(std::fs::read(dir.path().join(file)).unwrap(), body, "{}", file);
    }
}

#[tokio::test]
async fn test_sanitized_names_on_disk() {
    let server = MockServer::start().await;
    mount_site(&server, &sample_programs()).await;
    let config = site_config(&server);

    let broadcasts = station(&server)
        .load_broadcasts(&ProgramRef::Index(1), None)
        .await
        .unwrap();

    let dir = output_dir();
    let fetcher = HttpFetcher::new(config.fetch.clone()).unwrap();
    DownloadScheduler::new(&fetcher, FileCollisionAction::Overwrite)
        .unwrap()
        .download_many(&broadcasts, dir.path(), 1, 1)
        .await
        .unwrap();

    assert!(dir.path().join("001 - Night_ Special_.mp3").exists());
}
