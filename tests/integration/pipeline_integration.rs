use std::io::{Cursor, Read};
use std::sync::Arc;

use lopdf::Document;
use zip::ZipArchive;

use crate::fixtures::{pipeline_with, RecordingArchive, RecordingNative, TestFixtures, FAKE_ENCRYPTED};
use pdflock::security::{LopdfEncryptor, Permissions, PrintPermission, STORE_ONLY};
use pdflock::{ArtifactKind, FailureKind, ProtectionOutcome};

fn unzip_single(archive: &[u8], name: &str, password: &str) -> Vec<u8> {
    let mut zip = ZipArchive::new(Cursor::new(archive.to_vec())).unwrap();
    assert_eq!(zip.len(), 1);
    let mut entry = zip.by_name_decrypt(name, password.as_bytes()).unwrap();
    let mut contents = Vec::new();
    entry.read_to_end(&mut contents).unwrap();
    contents
}

#[tokio::test]
async fn test_fallback_archive_contains_original() {
    let native = Arc::new(RecordingNative::new());
    let archive = Arc::new(RecordingArchive::new());
    let pipeline = pipeline_with(false, native.clone(), archive.clone());
    let document = TestFixtures::document("report.pdf");
    let original = document.bytes().to_vec();

    let outcome = pipeline
        .protect(document, &TestFixtures::options("abc", "", false, false))
        .await;

    let artifact = outcome.artifact().expect("archive artifact");
    assert_eq!(artifact.kind, ArtifactKind::PasswordProtectedArchive);
    assert_eq!(artifact.suggested_filename, "report.protected.zip");
    assert_eq!(unzip_single(&artifact.bytes, "report.pdf", "abc"), original);

    assert!(native.calls().is_empty());
    let calls = archive.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].entry_name, "report.pdf");
    assert_eq!(calls[0].password, "abc");
    assert_eq!(calls[0].compression_level, STORE_ONLY);
}

#[tokio::test]
async fn test_owner_only_without_backend_is_rejected() {
    let native = Arc::new(RecordingNative::new());
    let archive = Arc::new(RecordingArchive::new());
    let pipeline = pipeline_with(false, native.clone(), archive.clone());

    let outcome = pipeline
        .protect(
            TestFixtures::document("report.pdf"),
            &TestFixtures::options("", "xyz", false, false),
        )
        .await;

    assert_eq!(
        outcome.failure_kind(),
        Some(FailureKind::OpenPasswordRequiredForFallback)
    );
    assert!(native.calls().is_empty());
    assert!(archive.calls().is_empty());
}

#[tokio::test]
async fn test_no_password_makes_no_backend_call() {
    let native = Arc::new(RecordingNative::new());
    let archive = Arc::new(RecordingArchive::new());
    let pipeline = pipeline_with(true, native.clone(), archive.clone());

    let outcome = pipeline
        .protect(
            TestFixtures::document("report.pdf"),
            &TestFixtures::options("", "", true, true),
        )
        .await;

    assert_eq!(outcome.failure_kind(), Some(FailureKind::NoPasswordProvided));
    assert!(native.calls().is_empty());
    assert!(archive.calls().is_empty());
}

#[tokio::test]
async fn test_native_call_receives_exact_parameters() {
    let native = Arc::new(RecordingNative::new());
    let archive = Arc::new(RecordingArchive::new());
    let pipeline = pipeline_with(true, native.clone(), archive.clone());
    let document = TestFixtures::document("report.pdf");
    let input_len = document.len();

    let outcome = pipeline
        .protect(document, &TestFixtures::options("abc", "", true, true))
        .await;

    let artifact = outcome.artifact().expect("native artifact");
    assert_eq!(artifact.kind, ArtifactKind::NativeEncryptedDocument);
    assert_eq!(artifact.bytes, FAKE_ENCRYPTED);

    let calls = native.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].user_password, "abc");
    // No owner password given: the open password stands in.
    assert_eq!(calls[0].owner_password, "abc");
    assert_eq!(calls[0].input_len, input_len);
    assert_eq!(
        calls[0].permissions,
        Permissions::new(PrintPermission::Full, true)
    );
    assert!(archive.calls().is_empty());
}

#[tokio::test]
async fn test_owner_password_is_passed_through() {
    let native = Arc::new(RecordingNative::new());
    let pipeline = pipeline_with(true, native.clone(), Arc::new(RecordingArchive::new()));

    let outcome = pipeline
        .protect(
            TestFixtures::document("report.pdf"),
            &TestFixtures::options("", "xyz", false, false),
        )
        .await;

    assert!(outcome.is_success());
    let calls = native.calls();
    assert_eq!(calls[0].user_password, "");
    assert_eq!(calls[0].owner_password, "xyz");
    assert_eq!(calls[0].permissions.print, PrintPermission::None);
    assert!(!calls[0].permissions.copy);
}

#[tokio::test]
async fn test_native_failure_falls_back_once() {
    let native = Arc::new(RecordingNative::failing());
    let archive = Arc::new(RecordingArchive::new());
    let pipeline = pipeline_with(true, native.clone(), archive.clone());

    let outcome = pipeline
        .protect(
            TestFixtures::document("report.pdf"),
            &TestFixtures::options("abc", "owner", true, false),
        )
        .await;

    assert_eq!(native.calls().len(), 1);
    assert_eq!(archive.calls().len(), 1);
    assert_eq!(
        outcome.artifact().map(|a| a.kind),
        Some(ArtifactKind::PasswordProtectedArchive)
    );
}

#[tokio::test]
async fn test_archive_failure_is_terminal() {
    for available in [true, false] {
        let native = Arc::new(RecordingNative::failing());
        let archive = Arc::new(RecordingArchive::failing("disk full"));
        let pipeline = pipeline_with(available, native.clone(), archive.clone());

        let outcome = pipeline
            .protect(
                TestFixtures::document("report.pdf"),
                &TestFixtures::options("abc", "", false, false),
            )
            .await;

        assert!(outcome.artifact().is_none());
        match outcome {
            ProtectionOutcome::Failure(failure) => {
                assert_eq!(failure.kind, FailureKind::ArchiveCreationFailed);
                assert_eq!(failure.message, "Failed to create ZIP file: disk full");
            }
            ProtectionOutcome::Success(_) => panic!("archive failure must not succeed"),
        }

        let expected_native_calls = if available { 1 } else { 0 };
        assert_eq!(native.calls().len(), expected_native_calls, "available={}", available);
        assert_eq!(archive.calls().len(), 1, "available={}", available);
    }
}

#[tokio::test]
async fn test_outcome_kind_is_stable_across_runs() {
    for available in [true, false] {
        let pipeline = pipeline_with(
            available,
            Arc::new(RecordingNative::new()),
            Arc::new(RecordingArchive::new()),
        );
        let options = TestFixtures::options("abc", "", false, true);

        let first = pipeline
            .protect(TestFixtures::document("a.pdf"), &options)
            .await;
        let second = pipeline
            .protect(TestFixtures::document("a.pdf"), &options)
            .await;

        assert_eq!(first.kind_tag(), second.kind_tag());
    }
}

#[tokio::test]
async fn test_lopdf_backend_end_to_end() {
    let pipeline = pipeline_with(
        true,
        Arc::new(LopdfEncryptor::new()),
        Arc::new(RecordingArchive::new()),
    );

    let outcome = pipeline
        .protect(
            TestFixtures::document("contract.pdf"),
            &TestFixtures::options("abc", "owner", true, false),
        )
        .await;

    match outcome {
        ProtectionOutcome::Success(artifact) => {
            assert_eq!(artifact.kind, ArtifactKind::NativeEncryptedDocument);
            assert_eq!(artifact.suggested_filename, "contract.protected.pdf");
            assert!(artifact.bytes.starts_with(b"%PDF-"));
            assert!(artifact
                .bytes
                .windows(b"/Encrypt".len())
                .any(|w| w == b"/Encrypt"));

            let mut doc = Document::load_mem(&artifact.bytes).unwrap();
            assert!(doc.is_encrypted());
            doc.decrypt("abc").unwrap();
            assert_eq!(doc.get_pages().len(), 1);
        }
        ProtectionOutcome::Failure(failure) => panic!("unexpected failure: {}", failure),
    }
}
