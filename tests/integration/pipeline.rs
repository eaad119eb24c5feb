use super::common::{standard_source, strings, Harness};
use rigup::core::RigupError;
use rigup::di::mocks::MemoryFileSource;
use rigup::provision::registrar::{backup_path, Registration};
use rigup::provision::{run, RunOutcome, RunSummary};
use std::fs;
use std::sync::Arc;

fn completed(outcome: RunOutcome) -> RunSummary {
    match outcome {
        RunOutcome::Completed(summary) => *summary,
        RunOutcome::Declined => panic!("run was declined"),
    }
}

#[tokio::test]
async fn test_full_run_with_default_answers() {
    let harness = Harness::new(&[]);
    let source = standard_source();

    let outcome = run(&harness.container(Arc::new(source.clone())), &harness.config)
        .await
        .unwrap();
    let summary = completed(outcome);
    let root = harness.primary();

    assert_eq!(summary.workdir, root);
    assert_eq!(
        summary.selection.target_files,
        strings(&[
            "a.txt",
            "microsoft-jdk-11.zip",
            "extensions/python/ext.vsix",
            "extensions/common/base.vsix",
        ])
    );
    assert_eq!(source.requested(), summary.selection.target_files);
    assert_eq!(summary.downloads.completed.len(), 4);
    assert!(!root.join("microsoft-jdk-17.zip").exists());

    // toolchain archive extracted in place
    assert_eq!(summary.extraction.completed, strings(&["microsoft-jdk-11.zip"]));
    assert_eq!(
        fs::read_to_string(root.join("jdk-11").join("release")).unwrap(),
        "11"
    );

    // one call per extension, category order
    let calls = harness.runner.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].1[0], "--install-extension");
    assert!(calls[0].1[1].ends_with("ext.vsix"));
    assert!(calls[1].1[1].ends_with("base.vsix"));

    // new bin dir registered once, after a backup
    let bin = root.join("jdk-11").join("bin");
    match &summary.registration {
        Registration::Registered { added, backup } => {
            assert_eq!(added, &vec![bin.clone()]);
            assert!(backup.exists());
        }
        other => panic!("unexpected registration: {:?}", other),
    }
    assert_eq!(harness.env.get("Path").unwrap(), format!("{};", bin.display()));

    // workdir, extract, extensions, PATH
    assert_eq!(harness.confirmer.prompts().len(), 4);
    assert!(summary.skipped_files().is_empty());
}

#[tokio::test]
async fn test_declining_non_empty_workdir_stops_before_network() {
    let harness = Harness::new(&["y", "n"]);
    fs::create_dir_all(harness.primary()).unwrap();
    fs::write(harness.primary().join("notes.txt"), "keep").unwrap();

    let outcome = run(
        &harness.container(Arc::new(MemoryFileSource::unreachable())),
        &harness.config,
    )
    .await
    .unwrap();

    assert_eq!(outcome, RunOutcome::Declined);
    assert_eq!(harness.confirmer.prompts().len(), 2);
    assert!(!harness.primary().join("extensions").exists());
}

#[tokio::test]
async fn test_declining_workdir_prompt() {
    let harness = Harness::new(&["no"]);

    let outcome = run(&harness.container(Arc::new(standard_source())), &harness.config)
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::Declined);
    assert!(harness.env.writes().is_empty());
}

#[tokio::test]
async fn test_unreachable_manifest_is_fatal() {
    let harness = Harness::new(&[]);

    let err = run(
        &harness.container(Arc::new(MemoryFileSource::unreachable())),
        &harness.config,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, RigupError::ManifestFetch(_)));
    assert!(err.is_fatal());
    assert!(!harness.primary().join("extensions").exists());
}

#[tokio::test]
async fn test_download_failure_only_skips_that_file() {
    let harness = Harness::new(&[]);
    let source = standard_source();
    source.fail_on("extensions/python/ext.vsix");

    let summary = completed(
        run(&harness.container(Arc::new(source.clone())), &harness.config)
            .await
            .unwrap(),
    );

    assert_eq!(source.requested().len(), 4);
    assert_eq!(summary.skipped_files(), vec!["extensions/python/ext.vsix"]);
    assert_eq!(harness.runner.calls().len(), 1);
    assert!(harness.primary().join("jdk-11").join("bin").is_dir());
}

#[tokio::test]
async fn test_existing_bin_dirs_are_not_registered_again() {
    // workdir, non-empty, extract jdk: no, extensions: yes
    let harness = Harness::new(&["y", "y", "n", "y"]);
    fs::create_dir_all(harness.primary().join("git").join("bin")).unwrap();

    let summary = completed(
        run(&harness.container(Arc::new(standard_source())), &harness.config)
            .await
            .unwrap(),
    );

    assert_eq!(summary.extraction.declined, strings(&["microsoft-jdk-11.zip"]));
    assert_eq!(summary.registration, Registration::NothingNew);
    assert!(harness.env.writes().is_empty());
}

#[tokio::test]
async fn test_secondary_root_preferred_when_both_exist() {
    let harness = Harness::new(&[]);
    fs::create_dir_all(&harness.config.primary_root).unwrap();
    fs::create_dir_all(&harness.config.secondary_root).unwrap();

    let summary = completed(
        run(
            &harness.container(Arc::new(MemoryFileSource::new(strings(&["a.txt"])))),
            &harness.config,
        )
        .await
        .unwrap(),
    );

    assert_eq!(summary.workdir, harness.config.secondary_root);
    assert!(harness.config.secondary_root.join("a.txt").exists());
    assert!(harness
        .config
        .secondary_root
        .join("extensions")
        .join("common")
        .is_dir());
    // empty existing directory: only the workdir prompt
    assert_eq!(harness.confirmer.prompts().len(), 1);
}

#[tokio::test]
async fn test_installers_run_with_silent_profiles() {
    let harness = Harness::new(&[]);
    let source = MemoryFileSource::new(strings(&["Git-2.45.0-64-bit.exe", "tool-setup.exe"]));

    let summary = completed(
        run(&harness.container(Arc::new(source)), &harness.config)
            .await
            .unwrap(),
    );

    let root = harness.primary();
    let calls = harness.runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, root.join("Git-2.45.0-64-bit.exe"));
    assert_eq!(
        calls[0].1.last().unwrap(),
        &format!("/Dir={}", root.join("git").display())
    );
    assert_eq!(summary.installs.manual, strings(&["tool-setup.exe"]));
    assert!(summary.skipped_files().is_empty());
}

#[tokio::test]
async fn test_backup_failure_aborts_run() {
    let harness = Harness::new(&[]);
    harness.env.set_fail_snapshot(true);

    let err = run(&harness.container(Arc::new(standard_source())), &harness.config)
        .await
        .unwrap_err();

    assert!(matches!(err, RigupError::Environment(_)));
    assert!(harness.env.writes().is_empty());
    let today = chrono::Local::now().date_naive();
    assert!(!backup_path(&harness.primary(), today).exists());
}
