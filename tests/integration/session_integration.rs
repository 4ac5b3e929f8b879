use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;
use tokio::sync::Notify;

use crate::fixtures::{
    pipeline_with, GatedNative, PanickingNative, RecordingArchive, RecordingNative, TestFixtures,
};
use pdflock::error::Error;
use pdflock::report::{MemorySink, StatusLevel};
use pdflock::{ArtifactKind, DirectorySink, FailureKind, Reporter, Session};

fn memory_session(available: bool) -> (Session, Arc<MemorySink>, Arc<RecordingNative>) {
    let native = Arc::new(RecordingNative::new());
    let sink = Arc::new(MemorySink::new());
    let pipeline = pipeline_with(available, native.clone(), Arc::new(RecordingArchive::new()));
    (Session::new(pipeline, Reporter::new(sink.clone())), sink, native)
}

#[tokio::test]
async fn test_empty_passwords_fail_before_reading() {
    let (session, sink, native) = memory_session(true);

    // The path does not exist; validation must fail before it is opened.
    let report = session
        .submit(
            Path::new("/nonexistent/missing.pdf"),
            &TestFixtures::options("", "", false, false),
        )
        .await
        .unwrap();

    assert_eq!(report.status.level, StatusLevel::Error);
    assert_eq!(report.failure, Some(FailureKind::NoPasswordProvided));
    assert_eq!(report.status.message, "You must provide at least one password.");
    assert!(report.progress.is_empty());
    assert!(native.calls().is_empty());
    assert!(sink.delivered().await.is_empty());
    assert!(session.control().is_armed());
}

#[tokio::test]
async fn test_missing_file_is_reported() {
    let (session, _sink, _native) = memory_session(true);

    let report = session
        .submit(
            Path::new("/nonexistent/missing.pdf"),
            &TestFixtures::options("abc", "", false, false),
        )
        .await
        .unwrap();

    assert!(!report.is_success());
    assert!(report.failure.is_none());
    assert!(report.status.message.starts_with("Protection failed:"));
    assert!(session.control().is_armed());
}

#[tokio::test]
async fn test_directory_sink_end_to_end() {
    let workdir = TempDir::new().unwrap();
    let input = workdir.path().join("report.pdf");
    tokio::fs::write(&input, TestFixtures::minimal_pdf()).await.unwrap();

    let out = workdir.path().join("out");
    let pipeline = pipeline_with(
        false,
        Arc::new(RecordingNative::new()),
        Arc::new(RecordingArchive::new()),
    );
    let session = Session::new(pipeline, Reporter::new(Arc::new(DirectorySink::new(&out))));
    let options = TestFixtures::options("abc", "", false, false);

    let report = session.submit(&input, &options).await.unwrap();

    assert!(report.is_success(), "{}", report.status.message);
    let progress: Vec<_> = report
        .progress
        .iter()
        .map(|s| (s.level, s.message.as_str()))
        .collect();
    assert_eq!(
        progress,
        [
            (StatusLevel::Info, "Reading file..."),
            (StatusLevel::Info, "Using password-protected ZIP fallback..."),
        ]
    );
    let delivered = report.delivered.expect("delivered artifact");
    assert_eq!(delivered.kind, ArtifactKind::PasswordProtectedArchive);
    assert_eq!(delivered.path, out.join("report.protected.zip"));
    assert_eq!(
        report.status.message,
        format!("ZIP creation successful! Saved to {}", delivered.path.display())
    );
    let written = tokio::fs::read(&delivered.path).await.unwrap();
    assert_eq!(written.len(), delivered.size);

    // A second run must not clobber the first artifact.
    let again = session.submit(&input, &options).await.unwrap();
    assert!(!again.is_success());
    assert_eq!(tokio::fs::read(&delivered.path).await.unwrap(), written);
}

#[tokio::test]
async fn test_second_request_while_running_is_busy() {
    let gate = Arc::new(Notify::new());
    let pipeline = pipeline_with(
        true,
        Arc::new(GatedNative { gate: gate.clone() }),
        Arc::new(RecordingArchive::new()),
    );
    let session = Arc::new(Session::new(
        pipeline,
        Reporter::new(Arc::new(MemorySink::new())),
    ));

    let running = {
        let session = session.clone();
        tokio::spawn(async move {
            session
                .submit_document(
                    TestFixtures::document("a.pdf"),
                    &TestFixtures::options("abc", "", false, false),
                )
                .await
        })
    };

    while session.control().is_armed() {
        tokio::task::yield_now().await;
    }
    assert_eq!(session.control().label(), "Processing...");

    let second = session
        .submit_document(
            TestFixtures::document("b.pdf"),
            &TestFixtures::options("abc", "", false, false),
        )
        .await;
    assert!(matches!(second, Err(Error::Busy)));

    gate.notify_one();
    let report = running.await.unwrap().unwrap();
    assert!(report.is_success());
    assert!(session.control().is_armed());
    assert_eq!(session.control().label(), "Protect PDF");
}

#[tokio::test]
async fn test_control_is_rearmed_after_backend_panic() {
    let pipeline = pipeline_with(
        true,
        Arc::new(PanickingNative),
        Arc::new(RecordingArchive::new()),
    );
    let session = Arc::new(Session::new(
        pipeline,
        Reporter::new(Arc::new(MemorySink::new())),
    ));

    let crashed = {
        let session = session.clone();
        tokio::spawn(async move {
            session
                .submit_document(
                    TestFixtures::document("a.pdf"),
                    &TestFixtures::options("abc", "", false, false),
                )
                .await
        })
    };

    let err = crashed.await.unwrap_err();
    assert!(err.is_panic());
    assert!(session.control().is_armed());
}
