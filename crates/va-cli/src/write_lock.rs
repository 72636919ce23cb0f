use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use va_config::PROJECT_DIR;

const LOCK_FILE: &str = "write.lock";
const LOCK_WAIT_TIMEOUT: Duration = Duration::from_secs(60);
const LOCK_RETRY_DELAY: Duration = Duration::from_millis(250);

#[derive(Debug)]
pub struct WriteLockGuard {
    path: PathBuf,
}

impl Drop for WriteLockGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Serialize mutating `vana` invocations against one project. Waits while
/// another live process holds the lock and clears locks left by dead ones.
///
/// `holder` names the command and the report it changes; a blocked caller
/// sees it in the timeout error.
pub async fn acquire_for_project(project_root: &Path, holder: &str) -> anyhow::Result<WriteLockGuard> {
    let lock_path = project_root.join(PROJECT_DIR).join(LOCK_FILE);
    let started = std::time::Instant::now();

    loop {
        match try_acquire(&lock_path, holder) {
            Ok(guard) => return Ok(guard),
            Err(LockState::HeldBy(owner)) => {
                if started.elapsed() >= LOCK_WAIT_TIMEOUT {
                    anyhow::bail!("{}; try again after it finishes", owner.describe());
                }
                tracing::debug!(pid = owner.pid, holder = %owner.holder, "waiting for write lock");
                tokio::time::sleep(LOCK_RETRY_DELAY).await;
            }
            Err(LockState::Stale) => {
                tracing::debug!(path = %lock_path.display(), "removing stale write lock");
                let _ = std::fs::remove_file(&lock_path);
            }
            Err(LockState::Unknown) => {
                if started.elapsed() >= LOCK_WAIT_TIMEOUT {
                    anyhow::bail!(
                        "could not acquire write lock at {}; remove it if no vana process is running",
                        lock_path.display()
                    );
                }
                tokio::time::sleep(LOCK_RETRY_DELAY).await;
            }
        }
    }
}

/// Contents of a lock file: the owning pid on the first line, then the
/// command that took it.
#[derive(Debug, PartialEq, Eq)]
struct LockOwner {
    pid: i32,
    holder: String,
}

impl LockOwner {
    fn parse(contents: &str) -> Option<Self> {
        let mut lines = contents.lines();
        let pid = lines.next()?.trim().parse::<i32>().ok()?;
        let holder = lines.next().map(str::trim).unwrap_or_default().to_string();
        Some(Self { pid, holder })
    }

    fn describe(&self) -> String {
        if self.holder.is_empty() {
            format!("another vana command (pid {}) is changing this project", self.pid)
        } else {
            format!("{} (pid {}) is changing this project", self.holder, self.pid)
        }
    }
}

#[derive(Debug)]
enum LockState {
    HeldBy(LockOwner),
    Stale,
    Unknown,
}

fn try_acquire(lock_path: &Path, holder: &str) -> Result<WriteLockGuard, LockState> {
    if let Some(parent) = lock_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    match OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(lock_path)
    {
        Ok(mut file) => {
            let pid = std::process::id();
            let _ = write!(file, "{pid}\n{holder}\n");
            Ok(WriteLockGuard {
                path: lock_path.to_path_buf(),
            })
        }
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
            let mut contents = String::new();
            if OpenOptions::new()
                .read(true)
                .open(lock_path)
                .and_then(|mut file| file.read_to_string(&mut contents))
                .is_err()
            {
                return Err(LockState::Unknown);
            }

            match LockOwner::parse(&contents) {
                Some(owner) if is_process_running(owner.pid) => Err(LockState::HeldBy(owner)),
                Some(_) => Err(LockState::Stale),
                None => Err(LockState::Unknown),
            }
        }
        Err(_) => Err(LockState::Unknown),
    }
}

fn is_process_running(pid: i32) -> bool {
    std::process::Command::new("kill")
        .arg("-0")
        .arg(pid.to_string())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{LockOwner, LockState, acquire_for_project, try_acquire};

    const HOLDER: &str = "`vana memo` on rep-1";

    #[test]
    fn acquires_and_releases_lock_file() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        let lock_path = temp.path().join(".analytica/write.lock");

        let guard = try_acquire(&lock_path, HOLDER).expect("lock should acquire");
        assert!(lock_path.is_file());
        drop(guard);
        assert!(!lock_path.exists());
    }

    #[test]
    fn live_holder_blocks_a_second_acquire_and_names_itself() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        let lock_path = temp.path().join(".analytica/write.lock");

        let _guard = try_acquire(&lock_path, HOLDER).expect("lock should acquire");
        let pid = i32::try_from(std::process::id()).expect("pid fits");
        match try_acquire(&lock_path, "`vana stage` on rep-2") {
            Err(LockState::HeldBy(owner)) => {
                assert_eq!(
                    owner,
                    LockOwner {
                        pid,
                        holder: HOLDER.to_string()
                    }
                );
                assert_eq!(
                    owner.describe(),
                    format!("`vana memo` on rep-1 (pid {pid}) is changing this project")
                );
            }
            other => panic!("expected a live holder, got {other:?}"),
        }
    }

    #[test]
    fn pid_only_lock_files_still_parse() {
        let owner = LockOwner::parse("4242\n").expect("pid should parse");
        assert_eq!(owner.holder, "");
        assert_eq!(
            owner.describe(),
            "another vana command (pid 4242) is changing this project"
        );
    }

    #[test]
    fn unreadable_pid_is_not_treated_as_stale() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        let lock_path = temp.path().join("write.lock");
        std::fs::write(&lock_path, "not a pid").expect("lock file should write");

        assert!(matches!(try_acquire(&lock_path, HOLDER), Err(LockState::Unknown)));
    }

    #[tokio::test]
    async fn project_lock_records_its_holder() {
        let temp = tempfile::tempdir().expect("tempdir should create");
        let guard = acquire_for_project(temp.path(), HOLDER)
            .await
            .expect("lock should acquire");
        let contents = std::fs::read_to_string(temp.path().join(".analytica/write.lock"))
            .expect("lock file should read");
        assert_eq!(contents, format!("{}\n{HOLDER}\n", std::process::id()));
        drop(guard);
    }
}
