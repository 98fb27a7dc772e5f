use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread::JoinHandle;

use thiserror::Error;

use crate::catalog::Project;
use crate::events::types::AppEvent;

pub enum ReadmeCommand {
    Load { project_id: String, path: PathBuf },
}

#[derive(Debug, Error)]
pub enum ReadmeError {
    #[error("no README at {0}")]
    NotFound(PathBuf),

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("README at {0} is empty")]
    Empty(PathBuf),
}

pub fn readme_path(assets_dir: &Path, project: &Project) -> PathBuf {
    project.asset_dir(assets_dir).join("README.md")
}

pub fn read_readme(path: &Path) -> Result<String, ReadmeError> {
    let markdown = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ReadmeError::NotFound(path.to_path_buf()),
        _ => ReadmeError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    if markdown.trim().is_empty() {
        return Err(ReadmeError::Empty(path.to_path_buf()));
    }
    Ok(markdown)
}

pub fn spawn(
    readme_rx: mpsc::Receiver<ReadmeCommand>,
    event_tx: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        while let Ok(cmd) = readme_rx.recv() {
            match cmd {
                ReadmeCommand::Load { project_id, path } => {
                    let event = match read_readme(&path) {
                        Ok(markdown) => {
                            tracing::debug!(%project_id, path = %path.display(), "README loaded");
                            AppEvent::ReadmeLoaded {
                                project_id,
                                markdown,
                            }
                        }
                        Err(err) => {
                            tracing::info!(%project_id, %err, "README unavailable");
                            AppEvent::ReadmeUnavailable {
                                project_id,
                                reason: err.to_string(),
                            }
                        }
                    };
                    if event_tx.send(event).is_err() {
                        break;
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn read_errors_are_classified() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("README.md");
        assert!(matches!(read_readme(&missing), Err(ReadmeError::NotFound(_))));

        fs::write(&missing, "  \n").unwrap();
        assert!(matches!(read_readme(&missing), Err(ReadmeError::Empty(_))));

        fs::write(&missing, "# Hi\n").unwrap();
        assert_eq!(read_readme(&missing).unwrap(), "# Hi\n");
    }

    #[test]
    fn worker_reports_loaded_and_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("README.md");
        fs::write(&present, "# Present\n").unwrap();

        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let handle = spawn(cmd_rx, event_tx);

        cmd_tx
            .send(ReadmeCommand::Load {
                project_id: "a".into(),
                path: present,
            })
            .unwrap();
        cmd_tx
            .send(ReadmeCommand::Load {
                project_id: "b".into(),
                path: dir.path().join("missing.md"),
            })
            .unwrap();

        let first = event_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(first, AppEvent::ReadmeLoaded { project_id, .. } if project_id == "a"));
        let second = event_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(second, AppEvent::ReadmeUnavailable { project_id, .. } if project_id == "b"));

        drop(cmd_tx);
        handle.join().unwrap();
    }
}
