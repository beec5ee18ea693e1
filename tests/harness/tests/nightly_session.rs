use std::{
    fs,
    os::unix::fs::PermissionsExt as _,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::Result;
use nightly_harness_config::HarnessSettings;
use nightly_harness_core::{
    chain::ChainRun,
    environment::ToolkitControl,
    scenario::ScenarioSpec,
    session::{SessionBuilder, SessionError},
};
use serial_test::serial;
use tempfile::tempdir;

const NETCTL_LOG: &str = "netctl.log";
const CHAIN_LOG: &str = "chain.log";

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");

    let mut perms = fs::metadata(&path).expect("script metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("make script executable");
    path
}

/// Stub toolkit: records every subcommand and reports "not active".
fn write_fake_toolkit(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "netctl",
        &format!(
            "echo \"$1\" >> \"$(dirname \"$0\")/{NETCTL_LOG}\"\n\
             case \"$1\" in\n  status) exit 1 ;;\nesac\n\
             exit 0"
        ),
    )
}

fn fast_settings(root: &Path) -> HarnessSettings {
    HarnessSettings {
        overrides_root: root.join("overrides"),
        scenarios_root: root.to_path_buf(),
        net_dir: root.join("net-assets"),
        startup_settle: Duration::ZERO,
        teardown_cooldown: Duration::ZERO,
        toolkit_timeout: Duration::from_secs(30),
    }
}

fn session_builder(root: &Path) -> SessionBuilder {
    let settings = fast_settings(root);
    let control = ToolkitControl::from_parts(
        write_fake_toolkit(root),
        settings.net_dir.clone(),
        settings.toolkit_timeout,
    );
    SessionBuilder::new(settings).with_control(Arc::new(control))
}

fn toolkit_calls(root: &Path) -> Vec<String> {
    fs::read_to_string(root.join(NETCTL_LOG))
        .unwrap_or_default()
        .lines()
        .map(str::to_owned)
        .collect()
}

#[tokio::test]
#[serial]
async fn full_session_runs_every_phase() -> Result<()> {
    let scratch = tempdir()?;
    let root = scratch.path();
    write_script(root, "itst01.sh", "touch \"$(dirname \"$0\")/itst01-ran\"");
    write_script(root, "itst02.sh", "touch \"$(dirname \"$0\")/itst02-ran\"");
    write_script(
        root,
        "upgrade_scenario.sh",
        &format!("echo \"$1 $HARNESS_SKIP_SETUP\" >> \"$(dirname \"$0\")/{CHAIN_LOG}\""),
    );
    write_script(root, "soundness.sh", "touch \"$(dirname \"$0\")/soundness-ran\"");

    let chain = ChainRun::stages(3).expect("valid chain");
    let mut session = session_builder(root)
        .with_scenarios([ScenarioSpec::new("itst01.sh"), ScenarioSpec::new("itst02.sh")])
        .with_chain(chain, root.join("upgrade_scenario.sh"))
        .with_soundness(root.join("soundness.sh"))
        .build();

    let report = session.run().await.expect("session should pass");

    assert_eq!(report.results().len(), 2);
    assert!(report.all_passed());
    assert!(root.join("itst01-ran").exists());
    assert!(root.join("itst02-ran").exists());
    assert!(root.join("soundness-ran").exists());

    let chain_log = fs::read_to_string(root.join(CHAIN_LOG))?;
    assert_eq!(
        chain_log.lines().collect::<Vec<_>>(),
        vec!["1 false", "2 true", "3 true"]
    );

    let calls = toolkit_calls(root);
    let per_scenario = [
        "assets-teardown",
        "status",
        "assets-setup",
        "start",
        "assets-teardown",
    ];
    let mut expected: Vec<&str> = Vec::new();
    expected.extend(per_scenario);
    expected.extend(per_scenario);
    // soundness only brackets its driver with defensive teardowns
    expected.extend(["assets-teardown", "assets-teardown"]);
    assert_eq!(calls, expected);

    Ok(())
}

#[tokio::test]
#[serial]
async fn first_failure_stops_the_session() -> Result<()> {
    let scratch = tempdir()?;
    let root = scratch.path();
    write_script(root, "itst01.sh", "exit 5");
    write_script(root, "itst02.sh", "touch \"$(dirname \"$0\")/itst02-ran\"");
    write_script(
        root,
        "upgrade_scenario.sh",
        &format!("echo \"$1\" >> \"$(dirname \"$0\")/{CHAIN_LOG}\""),
    );
    write_script(root, "soundness.sh", "touch \"$(dirname \"$0\")/soundness-ran\"");

    let chain = ChainRun::stages(3).expect("valid chain");
    let mut session = session_builder(root)
        .with_scenarios([ScenarioSpec::new("itst01.sh"), ScenarioSpec::new("itst02.sh")])
        .with_chain(chain, root.join("upgrade_scenario.sh"))
        .with_soundness(root.join("soundness.sh"))
        .build();

    let error = session.run().await.expect_err("session must fail");

    assert!(matches!(error, SessionError::Scenario(_)));
    assert_eq!(error.exit_code(), 5);
    assert!(!root.join("itst02-ran").exists(), "itst02 must never run");
    assert!(!root.join(CHAIN_LOG).exists(), "the chain must never start");
    assert!(!root.join("soundness-ran").exists());

    let calls = toolkit_calls(root);
    assert_eq!(
        calls,
        vec![
            "assets-teardown",
            "status",
            "assets-setup",
            "start",
            "assets-teardown",
        ],
        "the failing scenario's environment must still be torn down"
    );

    Ok(())
}

#[tokio::test]
#[serial]
async fn chain_step_failure_propagates_its_exit_code() -> Result<()> {
    let scratch = tempdir()?;
    let root = scratch.path();
    write_script(root, "itst01.sh", "exit 0");
    write_script(
        root,
        "upgrade_scenario.sh",
        "[ \"$1\" = \"2\" ] && exit 4\nexit 0",
    );
    write_script(root, "soundness.sh", "touch \"$(dirname \"$0\")/soundness-ran\"");

    let chain = ChainRun::stages(3).expect("valid chain");
    let mut session = session_builder(root)
        .with_scenarios([ScenarioSpec::new("itst01.sh")])
        .with_chain(chain, root.join("upgrade_scenario.sh"))
        .with_soundness(root.join("soundness.sh"))
        .build();

    let error = session.run().await.expect_err("session must fail");

    assert!(matches!(error, SessionError::Chain(_)));
    assert_eq!(error.exit_code(), 4);
    assert!(
        !root.join("soundness-ran").exists(),
        "the soundness session must not run after a chain failure"
    );

    Ok(())
}
