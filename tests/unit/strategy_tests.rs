use pdflock::error::{SelectionRejection, ValidationError};
use pdflock::security::{normalize, select, PrintPermission, Strategy};
use pdflock::RawPermissions;

fn perms(allow_print: bool, allow_copy: bool) -> RawPermissions {
    RawPermissions {
        allow_print,
        allow_copy,
    }
}

#[test]
fn test_selection_table() {
    let cases = [
        ("abc", "", true, Strategy::NativeEncryption),
        ("", "xyz", true, Strategy::NativeEncryption),
        ("abc", "xyz", false, Strategy::ArchiveFallback),
        ("abc", "", false, Strategy::ArchiveFallback),
        (
            "",
            "xyz",
            false,
            Strategy::Reject(SelectionRejection::OpenPasswordRequiredForFallback),
        ),
    ];

    for (open, owner, available, expected) in cases {
        let request = normalize(open, owner, perms(false, false)).unwrap();
        assert_eq!(
            select(&request, available),
            expected,
            "open={:?} owner={:?} available={}",
            open,
            owner,
            available
        );
    }
}

#[test]
fn test_no_password_never_reaches_selection() {
    assert_eq!(
        normalize("", "", perms(true, true)).unwrap_err(),
        ValidationError::NoPasswordProvided
    );
}

#[test]
fn test_print_permission_mapping() {
    let request = normalize("abc", "", perms(true, false)).unwrap();
    assert_eq!(request.permissions().print, PrintPermission::Full);
    assert!(!request.permissions().copy);

    let request = normalize("abc", "", perms(false, true)).unwrap();
    assert_eq!(request.permissions().print, PrintPermission::None);
    assert!(request.permissions().copy);
}

#[test]
fn test_selection_is_pure() {
    let request = normalize("abc", "xyz", perms(true, true)).unwrap();
    let first = select(&request, true);
    let second = tokio_test::block_on(async { select(&request, true) });
    assert_eq!(first, second);
}
