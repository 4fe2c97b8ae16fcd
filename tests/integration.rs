use std::io::Write;

use keywarden::{
    scan, AuditCriteria, AuditMode, Auditor, Error, KeyIdList, Keyring, ScanEvent, ScanOptions,
};

#[tokio::test]
#[ignore]
async fn test_list_keys_real() {
    let keyring = Keyring::new();
    let keys = keyring.list_keys().await.expect("failed to list keys");

    assert!(!keys.is_empty(), "keyring should contain keys");

    for key in &keys {
        assert_eq!(key.key_id.len(), 16, "key ID should be 16 hex chars");
        assert!(
            key.key_id.chars().all(|c| c.is_ascii_hexdigit()),
            "key ID should be hex"
        );
        assert_eq!(
            key.fingerprint.len(),
            40,
            "fingerprint should be 40 hex chars"
        );
        assert!(key.validity <= 5, "validity should be 0-5");
        assert!(key.owner_trust <= 5, "owner trust should be 0-5");
    }
}

#[tokio::test]
#[ignore]
async fn test_engine_version_real() {
    let keyring = Keyring::new();
    let version = keyring.engine_version().await.expect("gpg --version failed");
    assert!(version.contains("gpg"), "version line should mention gpg");
}

#[tokio::test]
#[ignore]
async fn test_keyring_not_found() {
    let keyring = Keyring::with_homedir("/nonexistent/path");
    let result = keyring.list_keys().await;

    assert!(result.is_err(), "should fail for nonexistent keyring");
}

#[tokio::test]
#[ignore]
async fn test_dry_run_scan_deletes_nothing() {
    let keyring = Keyring::new();
    let before = keyring.list_keys().await.expect("failed to list keys");

    let auditor = Auditor::new(AuditCriteria {
        mode: AuditMode::AnyCriterion,
        revoked: true,
        expired: true,
        ..Default::default()
    });
    let options = ScanOptions {
        dry_run: true,
        stats: true,
    };
    let report = scan(&keyring, &auditor, &options, |_| {})
        .await
        .expect("scan failed");

    assert_eq!(report.deleted, 0, "dry run must not delete");

    let after = keyring.list_keys().await.expect("failed to list keys");
    assert_eq!(before.len(), after.len(), "dry run must not change keyring");

    let stats = report.stats.expect("stats were requested");
    assert_eq!(stats.total() as usize, after.len());
}

#[tokio::test]
async fn test_list_file_roundtrip_through_auditor() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "1122334455667788").unwrap();
    writeln!(file, "AABBCCDD").unwrap();
    writeln!(file, "not a key id").unwrap();

    let list = KeyIdList::load(file.path()).await.unwrap();
    assert_eq!(list.len(), 2);

    let auditor = Auditor::new(AuditCriteria {
        allow_list: Some(list),
        ..Default::default()
    });

    let listed = sample_key("0000000055667788");
    let unlisted = sample_key("0000000099999999");
    assert!(auditor.should_delete(&listed));
    assert!(!auditor.should_delete(&unlisted));
}

#[tokio::test]
async fn test_exclusion_list_protects_listed_keys() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "55667788").unwrap();

    let list = KeyIdList::load(file.path()).await.unwrap();
    let auditor = Auditor::new(AuditCriteria {
        deny_list: Some(list),
        ..Default::default()
    });

    assert!(!auditor.should_delete(&sample_key("1122334455667788")));
    assert!(auditor.should_delete(&sample_key("AABBCCDDEEFF0011")));
}

#[tokio::test]
async fn test_missing_list_file_is_fatal() {
    let result = KeyIdList::load("/nonexistent/list.txt").await;
    assert!(matches!(result, Err(Error::ListFile { .. })));
}

#[cfg(unix)]
#[tokio::test]
async fn test_scan_continues_past_failed_deletion() {
    use std::cell::RefCell;
    use std::os::unix::fs::PermissionsExt;

    const FPR_FAILING: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
    const FPR_DELETABLE: &str = "BBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB";
    const FPR_SECRET: &str = "CCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCC";

    let stub_dir = tempfile::tempdir().unwrap();
    let log = stub_dir.path().join("deleted.log");
    let listing = stub_dir.path().join("listing.txt");

    let colons = format!(
        "pub:r:4096:1:AAAAAAAA11111111:1400000000:::-:::scSC::::::23::0:\n\
fpr:::::::::{FPR_FAILING}:\n\
uid:r::::1400000000::HASH::First <first@example.org>::::::::::0:\n\
pub:r:4096:1:BBBBBBBB22222222:1400000000:::-:::scSC::::::23::0:\n\
fpr:::::::::{FPR_DELETABLE}:\n\
uid:r::::1400000000::HASH::Second <second@example.org>::::::::::0:\n\
pub:r:4096:1:CCCCCCCC33333333:1400000000:::-:::scSC::::::23::0:\n\
fpr:::::::::{FPR_SECRET}:\n\
uid:r::::1400000000::HASH::Third <third@example.org>::::::::::0:\n"
    );
    std::fs::write(&listing, colons).unwrap();

    // stand-in gpg: lists three revoked keys, fails to delete the first,
    // refuses the third with a secret-key conflict
    let script = format!(
        "#!/bin/sh\n\
mode=list\n\
for arg in \"$@\"; do\n\
  if [ \"$arg\" = \"--delete-keys\" ]; then mode=delete; fi\n\
  last=\"$arg\"\n\
done\n\
if [ \"$mode\" = \"delete\" ]; then\n\
  echo \"$last\" >> \"{log}\"\n\
  case \"$last\" in\n\
    {FPR_FAILING}) echo \"gpg: deletion failed: unknown error\" >&2; exit 2 ;;\n\
    {FPR_SECRET}) echo \"gpg: there is a secret key for public key\" >&2; exit 2 ;;\n\
  esac\n\
  exit 0\n\
fi\n\
cat \"{listing}\"\n",
        log = log.display(),
        listing = listing.display(),
    );
    let gpg = stub_dir.path().join("gpg");
    std::fs::write(&gpg, script).unwrap();
    std::fs::set_permissions(&gpg, std::fs::Permissions::from_mode(0o755)).unwrap();

    let old_path = std::env::var("PATH").unwrap_or_default();
    std::env::set_var("PATH", format!("{}:{old_path}", stub_dir.path().display()));

    let keyring = Keyring::with_homedir(stub_dir.path());
    let auditor = Auditor::new(AuditCriteria {
        revoked: true,
        ..Default::default()
    });
    let events = RefCell::new(Vec::new());
    let report = scan(&keyring, &auditor, &ScanOptions::default(), |event| {
        events.borrow_mut().push(event);
    })
    .await
    .expect("a failed deletion must not abort the scan");

    std::env::set_var("PATH", old_path);

    assert_eq!(report.matched, 3);
    assert_eq!(report.deleted, 1);
    assert_eq!(report.failed, 1);

    let events = events.into_inner();
    assert!(events
        .iter()
        .any(|e| matches!(e, ScanEvent::DeleteFailed(k) if k.fingerprint == FPR_FAILING)));
    assert!(events
        .iter()
        .any(|e| matches!(e, ScanEvent::Deleted(k) if k.fingerprint == FPR_DELETABLE)));
    assert!(events
        .iter()
        .any(|e| matches!(e, ScanEvent::SecretKeySkipped(k) if k.fingerprint == FPR_SECRET)));

    // every matched key got a deletion attempt, in enumeration order
    let attempts = std::fs::read_to_string(&log).unwrap();
    let attempts: Vec<&str> = attempts.lines().collect();
    assert_eq!(attempts, [FPR_FAILING, FPR_DELETABLE, FPR_SECRET]);
}

#[tokio::test]
async fn test_delete_key_rejects_bad_fingerprint() {
    // validation runs before any subprocess is spawned
    let keyring = Keyring::with_homedir("/nonexistent");
    let mut key = sample_key("1122334455667788");
    key.fingerprint = "not a fingerprint".to_string();

    let result = keyring.delete_key(&key).await;
    assert!(matches!(result, Err(Error::InvalidKeyId { .. })));
}

#[test]
fn test_scan_event_formatting_input() {
    let key = sample_key("1122334455667788");
    let event = ScanEvent::Matched(key.clone());
    match event {
        ScanEvent::Matched(k) => assert!(k.summary().starts_with("55667788:")),
        _ => panic!("expected Matched"),
    }
}

fn sample_key(key_id: &str) -> keywarden::KeyRecord {
    keywarden::KeyRecord {
        key_id: key_id.to_string(),
        fingerprint: "0".repeat(40),
        uid: "Sample <sample@example.org>".to_string(),
        created: None,
        expires: None,
        revoked: false,
        expired: false,
        validity: 3,
        owner_trust: 3,
    }
}
