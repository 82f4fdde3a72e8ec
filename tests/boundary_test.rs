use pkg_publish::boundary::BoundaryWarning;
use pkg_publish::domain::Version;
use pkg_publish::ui;

// ============================================================================
// BoundaryWarning Display Tests
// ============================================================================

#[test]
fn test_boundary_warning_no_new_commits_display() {
    let warning = BoundaryWarning::NoNewCommits {
        latest_tag: "v1.0.0".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("No new commits"),
        "Message should contain 'No new commits', got: {}",
        display_msg
    );
    assert!(display_msg.contains("v1.0.0"));
}

#[test]
fn test_boundary_warning_unparsable_tag_display() {
    let warning = BoundaryWarning::UnparsableTag {
        tag: "v1.2".to_string(),
        reason: "Invalid format".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(display_msg.contains("Cannot parse tag 'v1.2'"));
    assert!(display_msg.contains("Invalid format"));
}

#[test]
fn test_boundary_warning_local_version_not_ahead() {
    let same = BoundaryWarning::LocalVersionNotAhead {
        local: Version::new(1, 0, 0),
        published: Version::new(1, 0, 0),
    };
    assert!(same.to_string().contains("same as the published version"));

    let behind = BoundaryWarning::LocalVersionNotAhead {
        local: Version::new(0, 9, 0),
        published: Version::new(1, 0, 0),
    };
    let msg = behind.to_string();
    assert!(msg.contains("0.9.0") && msg.contains("1.0.0"));
    assert!(msg.contains("lower than"));
}

#[test]
fn test_boundary_warning_tag_already_exists() {
    let warning = BoundaryWarning::TagAlreadyExists {
        tag: "v2.0.0".to_string(),
    };
    assert_eq!(warning.to_string(), "Git tag v2.0.0 already exists");
}

#[test]
fn test_boundary_warning_verification_pending() {
    let warning = BoundaryWarning::VerificationPending {
        package: "tool".to_string(),
        expected: Version::new(1, 1, 0),
        observed: Some(Version::new(1, 0, 0)),
    };
    let msg = warning.to_string();
    assert!(msg.contains("tool@1.1.0"));
    assert!(msg.contains("1.0.0"));
    assert!(msg.contains("may take a few minutes"));

    let nothing = BoundaryWarning::VerificationPending {
        package: "tool".to_string(),
        expected: Version::new(1, 1, 0),
        observed: None,
    };
    assert!(nothing.to_string().contains("registry reports nothing"));
}

#[test]
fn test_boundary_warning_messages_are_non_empty() {
    let warnings = vec![
        BoundaryWarning::FirstRelease,
        BoundaryWarning::HistoryUnreadable {
            reason: "not a git repository".to_string(),
        },
        BoundaryWarning::TagCreationFailed {
            tag: "v1.0.0".to_string(),
            reason: "locked".to_string(),
        },
        BoundaryWarning::PackPreviewUnavailable {
            reason: "npm missing".to_string(),
        },
        BoundaryWarning::AuthFileRestoreFailed {
            path: ".npmrc".to_string(),
            reason: "read-only".to_string(),
        },
    ];

    for warning in warnings {
        assert!(!warning.to_string().is_empty());
        // Displaying must not panic
        ui::display_boundary_warning(&warning);
    }
}
