#![allow(dead_code)]

use std::{
    fs,
    os::unix::fs::PermissionsExt as _,
    path::{Path, PathBuf},
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use nightly_harness_config::HarnessSettings;
use nightly_harness_core::{DynError, environment::EnvironmentControl};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ControlEvent {
    Setup,
    Start,
    Teardown,
}

/// Records every toolkit operation and tracks how many environments are live
/// at once.
#[derive(Default)]
pub struct RecordingControl {
    events: Mutex<Vec<ControlEvent>>,
    live: AtomicUsize,
    max_live: AtomicUsize,
    fail_setup: bool,
}

impl RecordingControl {
    pub fn failing_setup() -> Self {
        Self {
            fail_setup: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<ControlEvent> {
        self.events.lock().expect("events lock").clone()
    }

    pub fn max_live(&self) -> usize {
        self.max_live.load(Ordering::SeqCst)
    }

    fn push(&self, event: ControlEvent) {
        self.events.lock().expect("events lock").push(event);
    }
}

#[async_trait]
impl EnvironmentControl for RecordingControl {
    async fn setup(&self, _args: &[String]) -> Result<(), DynError> {
        if self.fail_setup {
            return Err("malformed override file".into());
        }
        let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_live.fetch_max(live, Ordering::SeqCst);
        self.push(ControlEvent::Setup);
        Ok(())
    }

    async fn start(&self) -> Result<(), DynError> {
        self.push(ControlEvent::Start);
        Ok(())
    }

    async fn teardown(&self) -> Result<(), DynError> {
        self.live.store(0, Ordering::SeqCst);
        self.push(ControlEvent::Teardown);
        Ok(())
    }
}

/// Settings rooted in a scratch directory, with the blind waits zeroed so
/// tests do not sleep.
pub fn fast_settings(root: &Path) -> HarnessSettings {
    HarnessSettings {
        overrides_root: root.join("overrides"),
        scenarios_root: root.to_path_buf(),
        net_dir: root.join("net-assets"),
        startup_settle: Duration::ZERO,
        teardown_cooldown: Duration::ZERO,
        toolkit_timeout: Duration::from_secs(30),
    }
}

/// Drop an executable shell script into `dir`.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");

    let mut perms = fs::metadata(&path).expect("script metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("make script executable");
    path
}
