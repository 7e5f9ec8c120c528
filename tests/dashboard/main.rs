//! Integration tests for the dashboard
//!
//! These tests load real artifacts through the directory and HTTP fetchers
//! and check what ends up on an in-memory render surface.

mod support;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::broadcast;

use casedoc_dashboard::app::{
    ArtifactKind, ConfidenceFilter, ClientConfig, CycleState, Dashboard, DirectoryFetcher,
    FilterState, HttpFetcher, MemorySurface, ResilientLoader, TableView,
};
use casedoc_dashboard::app::render::Region;
use casedoc_dashboard::config::DashboardConfig;
use casedoc_dashboard::constants::{artifacts, messages, slots, targets, ui, DOCUMENT_COLUMNS};

use support::{serve_artifacts, write_artifacts, CountingFetcher, AUDIT_CSV, REPORT_JSON};

fn directory_dashboard(dir: &TempDir) -> Dashboard<MemorySurface> {
    let loader = ResilientLoader::new(Arc::new(DirectoryFetcher::new(dir.path())));
    Dashboard::new(loader, MemorySurface::dashboard_layout())
}

fn fast_client() -> ClientConfig {
    ClientConfig {
        request_timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(5),
        max_retries: 1,
        retry_base_delay: Duration::from_millis(5),
    }
}

#[tokio::test]
async fn test_full_load_renders_every_section() {
    let dir = TempDir::new().unwrap();
    write_artifacts(dir.path()).await;
    let mut dashboard = directory_dashboard(&dir);

    let summary = dashboard.load().await;
    assert!(summary.is_complete());
    assert_eq!(summary.available, ArtifactKind::ALL.to_vec());

    let controller = dashboard.controller();
    let surface = controller.bridge();

    let documents = surface.table(targets::DOCUMENTS_TABLE).unwrap();
    assert_eq!(documents.row_count(), 3);
    assert_eq!(surface.stat(slots::TOTAL_DOCS), Some(3));
    assert_eq!(surface.stat(slots::CASES), Some(2));
    assert_eq!(surface.stat(slots::DOC_TYPES), Some(2));
    assert_eq!(surface.stat(slots::SOURCE_VIEWS), Some(2));
    assert_eq!(surface.stat(slots::LOW_CONFIDENCE), Some(1));
    assert_eq!(surface.stat(slots::FILTERED_DOCS), Some(3));

    assert_eq!(surface.table(targets::AUDIT_TABLE).unwrap().row_count(), 2);
    assert_eq!(surface.stat(slots::AUDIT_ISSUES), Some(2));
    assert_eq!(surface.stat(slots::ORPHANS), Some(1));
    assert_eq!(surface.stat(slots::CLEAN_CASES), Some(1));

    assert_eq!(surface.stat(slots::PARSED_FILES), Some(2));
    assert_eq!(surface.stat(slots::TABLE_MODE), Some(1));
    assert_eq!(surface.stat(slots::FALLBACK_MODE), Some(1));
    assert_eq!(
        surface.list(targets::PARSER_WARNINGS).unwrap(),
        &["[b.pdf] low OCR quality".to_string()]
    );

    // Summary panel sits between the header and the filters.
    assert_eq!(surface.panel_count(), 1);
    assert!(matches!(surface.regions()[1], Region::Panel(_)));
    assert_eq!(
        surface.regions()[2],
        Region::Anchor(targets::FILTERS_REGION.to_string())
    );

    for kind in ArtifactKind::ALL {
        assert_eq!(controller.cycle(kind).state(), CycleState::Rendered);
    }
}

#[tokio::test]
async fn test_quoted_notes_survive_decoding() {
    let dir = TempDir::new().unwrap();
    write_artifacts(dir.path()).await;
    let mut dashboard = directory_dashboard(&dir);
    dashboard.load().await;

    let rows = dashboard.controller().dataset().unwrap().items().to_vec();
    assert_eq!(rows[1].notes, "amount unclear, check scan");
    assert_eq!(rows[1].source_view, "docket");
    assert_eq!(rows[2].document_id, "3");
}

#[tokio::test]
async fn test_missing_rows_over_http_renders_fallback() {
    let base_url = serve_artifacts(HashMap::from([
        (artifacts::AUDIT_FILE, (200, AUDIT_CSV)),
        (artifacts::PARSER_REPORT_FILE, (200, REPORT_JSON)),
    ]))
    .await;
    let fetcher = HttpFetcher::new(&base_url, fast_client()).unwrap();
    let mut dashboard = Dashboard::new(
        ResilientLoader::new(Arc::new(fetcher)),
        MemorySurface::dashboard_layout(),
    );

    let summary = dashboard.load().await;
    assert_eq!(summary.unavailable, vec![ArtifactKind::Rows]);
    assert_eq!(
        summary.available,
        vec![ArtifactKind::Audit, ArtifactKind::ParserReport]
    );

    let surface = dashboard.controller().bridge();
    let documents = surface.table(targets::DOCUMENTS_TABLE).unwrap();
    assert_eq!(documents.row_count(), 1);
    match documents {
        TableView::Fallback {
            colspan, message, ..
        } => {
            assert_eq!(*colspan, DOCUMENT_COLUMNS.len());
            assert_eq!(message, messages::ROWS_UNAVAILABLE);
        }
        TableView::Rows { .. } => panic!("expected the fallback row"),
    }
    assert_eq!(surface.stat(slots::TOTAL_DOCS), Some(0));

    // Audit and parser sections completed independently.
    assert_eq!(surface.table(targets::AUDIT_TABLE).unwrap().row_count(), 2);
    assert_eq!(surface.stat(slots::CLEAN_CASES), Some(0));
    assert_eq!(surface.stat(slots::PARSED_FILES), Some(2));

    let rows_cycle = dashboard.controller().cycle(ArtifactKind::Rows);
    assert!(!rows_cycle.is_available());
    assert!(rows_cycle.last_error().unwrap().contains("404"));
}

#[tokio::test]
async fn test_broken_report_degrades_only_its_section() {
    let dir = TempDir::new().unwrap();
    write_artifacts(dir.path()).await;
    tokio::fs::write(dir.path().join(artifacts::PARSER_REPORT_FILE), "{ not json")
        .await
        .unwrap();
    let mut dashboard = directory_dashboard(&dir);

    let summary = dashboard.load().await;
    assert_eq!(summary.unavailable, vec![ArtifactKind::ParserReport]);

    let surface = dashboard.controller().bridge();
    assert_eq!(
        surface.list(targets::PARSER_WARNINGS).unwrap(),
        &[messages::REPORT_UNAVAILABLE.to_string()]
    );
    assert_eq!(surface.stat(slots::PARSED_FILES), Some(0));
    assert_eq!(surface.stat(slots::TOTAL_DOCS), Some(3));
}

#[tokio::test]
async fn test_missing_audit_shows_advisory() {
    let dir = TempDir::new().unwrap();
    write_artifacts(dir.path()).await;
    tokio::fs::remove_file(dir.path().join(artifacts::AUDIT_FILE))
        .await
        .unwrap();
    let mut dashboard = directory_dashboard(&dir);
    dashboard.load().await;

    let surface = dashboard.controller().bridge();
    assert_eq!(surface.table(targets::AUDIT_TABLE).unwrap().row_count(), 0);
    assert_eq!(
        surface.list(targets::AUDIT_NOTES).unwrap(),
        &[messages::NO_AUDIT_ISSUES.to_string()]
    );
    assert_eq!(surface.stat(slots::CLEAN_CASES), Some(2));
}

#[tokio::test]
async fn test_filter_changes_do_not_refetch() {
    let dir = TempDir::new().unwrap();
    write_artifacts(dir.path()).await;
    let fetcher = CountingFetcher::new(dir.path());
    let mut dashboard = Dashboard::new(
        ResilientLoader::new(fetcher.clone()),
        MemorySurface::dashboard_layout(),
    );
    dashboard.load().await;
    assert_eq!(fetcher.fetches(), 3);

    let handle = dashboard.handle();
    handle
        .set_filter(FilterState::new().with_confidence(ConfidenceFilter::Low))
        .await
        .unwrap();
    handle
        .set_filter(
            FilterState::new()
                .with_case("22-GA-1")
                .with_search("  UNCLEAR "),
        )
        .await
        .unwrap();

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    shutdown_tx.send(()).unwrap();
    dashboard.run_until_shutdown(shutdown_rx).await;

    assert_eq!(fetcher.fetches(), 3);
    let controller = dashboard.controller();
    let rows = controller.filtered_rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].file_name, "b.pdf");
    assert_eq!(controller.bridge().stat(slots::FILTERED_DOCS), Some(1));
    assert_eq!(controller.bridge().stat(slots::TOTAL_DOCS), Some(3));
    assert_eq!(controller.bridge().panel_count(), 1);
}

#[tokio::test]
async fn test_recompute_burst_renders_once() {
    let dir = TempDir::new().unwrap();
    write_artifacts(dir.path()).await;
    let mut dashboard = directory_dashboard(&dir);
    dashboard.load().await;
    let renders_before = dashboard.controller().cycle(ArtifactKind::Rows).render_count();

    let mut debouncer = dashboard.handle().recompute_debouncer();
    for _ in 0..5 {
        debouncer.trigger(casedoc_dashboard::app::Intent::RecomputeRequested);
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    tokio::time::sleep(ui::DEBOUNCE_QUANTUM * 3).await;

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    shutdown_tx.send(()).unwrap();
    dashboard.run_until_shutdown(shutdown_rx).await;

    let controller = dashboard.controller();
    assert_eq!(
        controller.cycle(ArtifactKind::Rows).render_count(),
        renders_before + 1
    );
    assert_eq!(controller.bridge().panel_count(), 1);
}

#[tokio::test]
async fn test_reload_picks_up_new_artifacts() {
    let dir = TempDir::new().unwrap();
    let mut dashboard = directory_dashboard(&dir);

    let first = dashboard.load().await;
    assert_eq!(first.unavailable.len(), 3);
    assert!(dashboard
        .controller()
        .bridge()
        .table(targets::DOCUMENTS_TABLE)
        .unwrap()
        .is_fallback());

    write_artifacts(dir.path()).await;
    let second = dashboard.load().await;
    assert!(second.is_complete());

    let surface = dashboard.controller().bridge();
    assert!(!surface.table(targets::DOCUMENTS_TABLE).unwrap().is_fallback());
    assert_eq!(surface.stat(slots::TOTAL_DOCS), Some(3));
    assert_eq!(surface.panel_count(), 1);
}

#[tokio::test]
async fn test_dashboard_from_config_file() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("output");
    tokio::fs::create_dir(&data_dir).await.unwrap();
    tokio::fs::write(data_dir.join("docs.csv"), support::ROWS_CSV)
        .await
        .unwrap();

    let config_path = dir.path().join("dashboard.toml");
    let content = format!(
        "[source]\ndata_dir = {:?}\n\n[artifacts]\nrows = \"docs.csv\"\n\n[ui]\ndebounce_ms = 250\n",
        data_dir.display().to_string()
    );
    tokio::fs::write(&config_path, content).await.unwrap();

    let config = DashboardConfig::load(Some(config_path)).await.unwrap();
    let mut dashboard =
        Dashboard::from_config(&config, MemorySurface::dashboard_layout()).unwrap();
    let summary = dashboard.load().await;

    assert_eq!(summary.available, vec![ArtifactKind::Rows]);
    assert_eq!(
        dashboard
            .controller()
            .bridge()
            .stat(slots::TOTAL_DOCS),
        Some(3)
    );
    assert_eq!(
        dashboard.handle().recompute_debouncer().quantum(),
        Duration::from_millis(250)
    );
}
