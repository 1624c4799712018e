//! # Command-backed worker processes.
//!
//! [`CommandProcess`] is the bundled [`ManagedProcess`] implementation:
//! it spawns an OS process from a [`CommandSpec`] via [`tokio::process`],
//! reaps it with `Child::wait`, and terminates it by signalling the pid.
//!
//! [`CommandSpec`] doubles as the worker settings blob and as a
//! [`ProcessFactory`], so a fleet of identical workers can be built from
//! one spec.
//!
//! ## Rules
//! - The worker name is exported as `PROCVISOR_WORKER`; restarts also set
//!   `PROCVISOR_RELOADED_FILES` (comma-joined) so the new process can
//!   resume its role idempotently.
//! - Liveness is a kill-0 probe against the recorded pid, valid only in
//!   the `Started..Joined` window (a reaped pid may be recycled).
//! - Termination requests SIGTERM; the state advances to `Terminated`
//!   only once there is no unreaped child left to join.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::{Child, Command};

use crate::error::ProcessError;
use crate::process::process::{ManagedProcess, ProcessFactory, ProcessRef};
use crate::process::state::ProcessState;

/// Checks whether a pid currently answers signals.
#[cfg(unix)]
pub(crate) fn pid_alive(pid: u32) -> bool {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    if pid == 0 || pid > i32::MAX as u32 {
        return false;
    }
    kill(Pid::from_raw(pid as i32), None).is_ok()
}

#[cfg(not(unix))]
pub(crate) fn pid_alive(_pid: u32) -> bool {
    // No cheap probe available; callers fall back to state tracking.
    true
}

/// Sends SIGTERM directly to a pid, bypassing any process handle.
#[cfg(unix)]
pub(crate) fn terminate_pid(pid: u32) -> Result<(), ProcessError> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    if pid == 0 || pid > i32::MAX as u32 {
        return Err(ProcessError::Signal {
            pid,
            message: "pid out of range for signal delivery".into(),
        });
    }
    kill(Pid::from_raw(pid as i32), Signal::SIGTERM).map_err(|e| ProcessError::Signal {
        pid,
        message: e.to_string(),
    })
}

#[cfg(not(unix))]
pub(crate) fn terminate_pid(_pid: u32) -> Result<(), ProcessError> {
    Ok(())
}

/// Settings for spawning one worker command.
///
/// Shared verbatim by every worker built from it; also usable directly as
/// a [`ProcessFactory`].
///
/// # Example
/// ```
/// use procvisor::CommandSpec;
///
/// let spec = CommandSpec::new("my-server")
///     .arg("--listen")
///     .arg("0.0.0.0:8000")
///     .env("RUST_LOG", "info");
/// ```
#[derive(Clone, Debug)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    envs: Vec<(String, String)>,
    current_dir: Option<PathBuf>,
}

impl CommandSpec {
    /// Creates a spec for the given program.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
            current_dir: None,
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets an environment variable for the worker.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Sets the working directory for the worker.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// The program this spec launches.
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl ProcessFactory for CommandSpec {
    fn create(&self, name: &str) -> ProcessRef {
        Box::new(CommandProcess::new(name, self.clone()))
    }
}

/// A worker process spawned from a [`CommandSpec`].
pub struct CommandProcess {
    name: String,
    spec: CommandSpec,
    child: Option<Child>,
    pid: Option<u32>,
    state: ProcessState,
}

impl CommandProcess {
    /// Creates an idle process for the named worker. Nothing is spawned
    /// until [`start`](ManagedProcess::start).
    pub fn new(name: impl Into<String>, spec: CommandSpec) -> Self {
        Self {
            name: name.into(),
            spec,
            child: None,
            pid: None,
            state: ProcessState::Idle,
        }
    }

    async fn spawn(&mut self, reloaded_files: &[String]) -> Result<(), ProcessError> {
        self.state = ProcessState::Starting;

        let mut cmd = Command::new(&self.spec.program);
        cmd.args(&self.spec.args);
        cmd.envs(self.spec.envs.iter().cloned());
        if let Some(dir) = &self.spec.current_dir {
            cmd.current_dir(dir);
        }
        cmd.env("PROCVISOR_WORKER", &self.name);
        if !reloaded_files.is_empty() {
            cmd.env("PROCVISOR_RELOADED_FILES", reloaded_files.join(","));
        }
        cmd.stdin(Stdio::null());
        cmd.kill_on_drop(false);

        let child = cmd.spawn().map_err(|e| ProcessError::Spawn {
            program: self.spec.program.clone(),
            source: e,
        })?;

        self.pid = child.id();
        self.child = Some(child);
        self.state = ProcessState::Started;
        Ok(())
    }
}

#[async_trait]
impl ManagedProcess for CommandProcess {
    fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> ProcessState {
        self.state
    }

    fn pid(&self) -> Option<u32> {
        self.pid
    }

    fn is_alive(&self) -> bool {
        if self.state < ProcessState::Started || self.state >= ProcessState::Joined {
            return false;
        }
        match self.pid {
            Some(pid) => pid_alive(pid),
            None => false,
        }
    }

    async fn start(&mut self) -> Result<(), ProcessError> {
        if self.state >= ProcessState::Starting {
            return Ok(());
        }
        self.spawn(&[]).await
    }

    async fn join(&mut self) -> Result<(), ProcessError> {
        if self.state >= ProcessState::Joined {
            return Ok(());
        }
        if let Some(child) = self.child.as_mut() {
            child.wait().await.map_err(|e| ProcessError::Wait {
                name: self.name.clone(),
                source: e,
            })?;
            self.child = None;
        }
        // A never-started process has nothing to reap.
        self.state = ProcessState::Joined;
        Ok(())
    }

    async fn terminate(&mut self) -> Result<(), ProcessError> {
        if self.state >= ProcessState::Terminated {
            return Ok(());
        }
        #[cfg(unix)]
        if let Some(pid) = self.pid {
            if pid_alive(pid) {
                // The process may exit between the probe and the signal.
                let _ = terminate_pid(pid);
            }
        }
        #[cfg(not(unix))]
        if let Some(child) = self.child.as_mut() {
            let _ = child.start_kill();
        }
        if self.child.is_none() {
            self.state = ProcessState::Terminated;
        }
        Ok(())
    }

    async fn restart(&mut self, reloaded_files: &[String]) -> Result<(), ProcessError> {
        #[cfg(unix)]
        if let Some(pid) = self.pid {
            if pid_alive(pid) {
                let _ = terminate_pid(pid);
            }
        }
        if let Some(mut child) = self.child.take() {
            #[cfg(not(unix))]
            let _ = child.start_kill();
            // Reap the old process before its slot is reused.
            let _ = child.wait().await;
        }
        self.pid = None;
        self.state = ProcessState::Idle;
        self.spawn(reloaded_files).await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sleeper() -> CommandProcess {
        CommandProcess::new("Worker-0", CommandSpec::new("sleep").arg("30"))
    }

    #[tokio::test]
    async fn start_records_pid_and_liveness() {
        let mut process = sleeper();
        assert_eq!(process.state(), ProcessState::Idle);
        assert!(!process.is_alive());

        process.start().await.unwrap();
        assert_eq!(process.state(), ProcessState::Started);
        assert!(process.pid().is_some());
        assert!(process.is_alive());

        // Idempotent second start keeps the same pid.
        let pid = process.pid();
        process.start().await.unwrap();
        assert_eq!(process.pid(), pid);

        process.terminate().await.unwrap();
        process.join().await.unwrap();
        assert_eq!(process.state(), ProcessState::Joined);
        assert!(!process.is_alive());
    }

    #[tokio::test]
    async fn join_reaps_a_naturally_exited_process() {
        let mut process = CommandProcess::new("Worker-0", CommandSpec::new("true"));
        process.start().await.unwrap();
        process.join().await.unwrap();
        assert_eq!(process.state(), ProcessState::Joined);
    }

    #[tokio::test]
    async fn join_without_start_has_nothing_to_reap() {
        let mut process = sleeper();
        process.join().await.unwrap();
        assert_eq!(process.state(), ProcessState::Joined);
    }

    #[tokio::test]
    async fn terminate_is_idempotent() {
        let mut process = sleeper();
        process.start().await.unwrap();
        process.terminate().await.unwrap();
        process.join().await.unwrap();
        process.terminate().await.unwrap();
        assert_eq!(process.state(), ProcessState::Terminated);
        process.terminate().await.unwrap();
        assert_eq!(process.state(), ProcessState::Terminated);
    }

    #[tokio::test]
    async fn restart_installs_a_fresh_process() {
        let mut process = sleeper();
        process.start().await.unwrap();
        let first_pid = process.pid().unwrap();

        process.restart(&["src/app.rs".into()]).await.unwrap();
        let second_pid = process.pid().unwrap();
        assert_ne!(first_pid, second_pid);
        assert_eq!(process.state(), ProcessState::Started);
        assert!(process.is_alive());

        process.terminate().await.unwrap();
        process.join().await.unwrap();
    }

    #[tokio::test]
    async fn spawn_failure_propagates() {
        let mut process = CommandProcess::new(
            "Worker-0",
            CommandSpec::new("procvisor-test-no-such-binary"),
        );
        let err = process.start().await.unwrap_err();
        assert_eq!(err.as_label(), "process_spawn");
    }
}
