//! Startup ordering, scheme selection, and failure handling of the orchestrator.

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use qof::lifecycle::{InitError, LifecycleState, Qof, StartError};
use qof::observability::{LogCascade, LogControl, Severity};
use qof::Cli;
use tokio::sync::watch;

mod common;

use common::{Behavior, Event, Recorder, RecordingBuilder, RecordingRegistrar};

const PLAIN: &str = r#"
[configuration.sbi]
scheme = "http"
binding_ipv4 = "127.0.0.1"
port = 8090
"#;

const SECURE: &str = r#"
[configuration.sbi]
scheme = "https"
binding_ipv4 = "127.0.0.1"
port = 8443

[configuration.sbi.tls]
pem = "c.pem"
key = "k.pem"

[logger.core]
level = "bogus"
"#;

fn orchestrator(text: &str, recorder: &Recorder, behavior: Behavior) -> Qof<RecordingRegistrar, RecordingBuilder> {
    Qof::new(common::config(text))
        .without_signal_watcher()
        .with_settle_delay(Duration::ZERO)
        .with_key_log_path("/tmp/qof-test/sslkey.log")
        .with_registrar(RecordingRegistrar::new(recorder))
        .with_server_builder(RecordingBuilder::new(recorder, behavior))
}

fn cascade() -> LogCascade {
    LogCascade::standard(Arc::new(LogControl::detached()))
}

#[tokio::test]
async fn context_then_handlers_then_listener() {
    let recorder = Recorder::default();
    let qof = orchestrator(PLAIN, &recorder, Behavior::Serve);

    qof.start().await.unwrap();

    let timed = recorder.timed();
    assert_eq!(timed.len(), 3, "{timed:?}");

    let (attached_at, Event::HandlersAttached { context_ready_at }) = &timed[0] else {
        panic!("registrar did not run first: {timed:?}");
    };
    let context_ready_at = context_ready_at.expect("context not ready when handlers attached");
    assert!(context_ready_at <= *attached_at);

    let (built_at, Event::ServerBuilt { .. }) = &timed[1] else {
        panic!("server not built second: {timed:?}");
    };
    assert!(attached_at <= built_at);
    assert_eq!(timed[2].1, Event::ServedPlaintext);
}

#[tokio::test]
async fn registrar_is_invoked_exactly_once() {
    let recorder = Recorder::default();
    let registrar = RecordingRegistrar::new(&recorder);
    let calls = Arc::clone(&registrar.calls);

    let qof = Qof::new(common::config(PLAIN))
        .without_signal_watcher()
        .with_settle_delay(Duration::ZERO)
        .with_registrar(registrar)
        .with_server_builder(RecordingBuilder::new(&recorder, Behavior::Serve));
    qof.start().await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn plain_scenario_listens_on_configured_address() {
    let recorder = Recorder::default();
    let config = common::config(PLAIN);

    let cascade = cascade();
    cascade.apply(&config.logger);
    for subsystem in cascade.subsystems() {
        assert_eq!(subsystem.level(), Severity::Info, "{}", subsystem.name());
    }

    orchestrator(PLAIN, &recorder, Behavior::Serve)
        .start()
        .await
        .unwrap();

    let events = recorder.events();
    assert!(events.contains(&Event::ServerBuilt {
        addr: "127.0.0.1:8090".into(),
        key_log: PathBuf::from("/tmp/qof-test/sslkey.log"),
    }));
    assert!(events.contains(&Event::ServedPlaintext));
    assert!(!events.iter().any(|e| matches!(e, Event::ServedTls { .. })));
}

#[tokio::test]
async fn secure_scenario_serves_tls_with_configured_material() {
    let recorder = Recorder::default();
    let config = common::config(SECURE);

    let cascade = cascade();
    cascade.apply(&config.logger);
    assert_eq!(cascade.get("core").unwrap().level(), Severity::Info);

    orchestrator(SECURE, &recorder, Behavior::Serve)
        .start()
        .await
        .unwrap();

    let events = recorder.events();
    assert!(events.contains(&Event::ServedTls {
        cert: PathBuf::from("c.pem"),
        key: PathBuf::from("k.pem"),
    }));
    assert!(!events.contains(&Event::ServedPlaintext));
}

#[tokio::test]
async fn missing_server_is_fatal() {
    let recorder = Recorder::default();
    let result = orchestrator(PLAIN, &recorder, Behavior::NoServer).start().await;

    assert!(matches!(result, Err(StartError::ServerInit(_))));
    assert!(!recorder.events().contains(&Event::ServedPlaintext));
}

#[tokio::test]
async fn construction_warning_still_serves() {
    let recorder = Recorder::default();
    orchestrator(PLAIN, &recorder, Behavior::ServerWithWarning)
        .start()
        .await
        .unwrap();

    assert!(recorder.events().contains(&Event::ServedPlaintext));
}

#[tokio::test]
async fn serve_failure_is_fatal() {
    let recorder = Recorder::default();
    let result = orchestrator(PLAIN, &recorder, Behavior::ServeFails).start().await;

    match result {
        Err(e @ StartError::Serve(_)) => {
            assert!(e.to_string().starts_with("HTTP server setup failed"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn settle_delay_precedes_listener() {
    let recorder = Recorder::default();
    let delay = Duration::from_millis(150);
    orchestrator(PLAIN, &recorder, Behavior::Serve)
        .with_settle_delay(delay)
        .start()
        .await
        .unwrap();

    let timed = recorder.timed();
    let gap = timed[1].0.duration_since(timed[0].0);
    assert!(gap >= delay, "listener opened after {gap:?}");
}

#[tokio::test]
async fn readiness_signal_replaces_fixed_delay() {
    let recorder = Recorder::default();
    let (ready_tx, ready_rx) = watch::channel(false);

    let qof = Qof::new(common::config(PLAIN))
        .without_signal_watcher()
        .with_settle_delay(Duration::from_secs(30))
        .with_readiness_timeout(Duration::from_secs(30))
        .with_registrar(RecordingRegistrar::new(&recorder).with_readiness(ready_rx))
        .with_server_builder(RecordingBuilder::new(&recorder, Behavior::Serve));

    let marked_at = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        let at = Instant::now();
        ready_tx.send(true).unwrap();
        // Keep the sender alive until start() has observed it.
        tokio::time::sleep(Duration::from_millis(200)).await;
        at
    });

    let started = Instant::now();
    qof.start().await.unwrap();
    assert!(started.elapsed() < Duration::from_secs(5));

    let marked_at = marked_at.await.unwrap();
    let built_at = recorder
        .timed()
        .into_iter()
        .find_map(|(at, e)| matches!(e, Event::ServerBuilt { .. }).then_some(at))
        .unwrap();
    assert!(marked_at <= built_at);
}

#[tokio::test]
async fn readiness_timeout_does_not_block_forever() {
    let recorder = Recorder::default();
    let (_ready_tx, ready_rx) = watch::channel(false);

    let qof = Qof::new(common::config(PLAIN))
        .without_signal_watcher()
        .with_settle_delay(Duration::from_secs(30))
        .with_readiness_timeout(Duration::from_millis(100))
        .with_registrar(RecordingRegistrar::new(&recorder).with_readiness(ready_rx))
        .with_server_builder(RecordingBuilder::new(&recorder, Behavior::Serve));

    let started = Instant::now();
    qof.start().await.unwrap();
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(recorder.events().contains(&Event::ServedPlaintext));
}

#[test]
fn explicit_terminate_transitions_once() {
    let qof = Qof::new(common::config(PLAIN));
    assert_eq!(qof.terminator().state(), LifecycleState::Running);

    assert!(qof.terminate());
    assert!(!qof.terminate());
    assert_eq!(qof.terminator().state(), LifecycleState::Terminating);
}

fn write_config(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

fn cli_for(path: &std::path::Path) -> Cli {
    Cli {
        free5gccfg: None,
        qofcfg: Some(path.display().to_string()),
    }
}

#[test]
fn initialize_loads_component_config() {
    let file = write_config(PLAIN);
    let cascade = cascade();

    let qof = Qof::initialize(&cli_for(file.path()), &cascade).unwrap();
    assert_eq!(qof.config().configuration.sbi.port, 8090);
}

#[test]
fn initialize_cascades_levels_before_version_check() {
    let file = write_config(
        r#"
[info]
version = "0.0.1"

[logger.core]
debug_level = "debug"
"#,
    );
    let cascade = cascade();

    let err = Qof::initialize(&cli_for(file.path()), &cascade).err().unwrap();
    assert!(matches!(err, InitError::Version(_)));
    assert_eq!(cascade.get("core").unwrap().level(), Severity::Debug);
}

#[test]
fn initialize_fails_on_missing_config() {
    let cascade = cascade();
    let err = Qof::initialize(&cli_for(std::path::Path::new("/nonexistent/qof.toml")), &cascade)
        .err()
        .unwrap();
    assert!(matches!(err, InitError::Load { .. }));
}
