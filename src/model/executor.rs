//! Invocation of the simulation executable.

use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Command, Stdio};

use crate::defaults;
use crate::error::{Error, Result};

/// Runs the simulation executable for a model.
///
/// `dir` is the model directory; implementations run the executable there
/// instead of relying on the process working directory.
pub trait Executor {
    fn execute(&self, exe: &Path, name_file: &str, dir: &Path, silent: bool) -> Result<()>;
}

/// Spawns the executable as a child process and blocks until it exits.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl Executor for ProcessExecutor {
    fn execute(&self, exe: &Path, name_file: &str, dir: &Path, silent: bool) -> Result<()> {
        let exe_display = exe.display().to_string();
        log::info!("Running {} {} in {:?}", exe_display, name_file, dir);

        let mut child = Command::new(exe)
            .arg(name_file)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(if silent { Stdio::null() } else { Stdio::inherit() })
            .spawn()
            .map_err(|e| Error::Execution {
                exe: exe_display.clone(),
                reason: format!("failed to spawn: {}", e),
            })?;

        let mut normal_termination = false;
        if let Some(stdout) = child.stdout.take() {
            for line in BufReader::new(stdout).lines() {
                let line = line?;
                if line.to_ascii_lowercase().contains(defaults::NORMAL_TERMINATION) {
                    normal_termination = true;
                }
                if !silent {
                    println!("{}", line);
                }
            }
        }

        let status = child.wait()?;
        if !status.success() {
            return Err(Error::Execution {
                exe: exe_display,
                reason: format!("exited with {}", status),
            });
        }
        if !normal_termination {
            return Err(Error::Execution {
                exe: exe_display,
                reason: "did not report normal termination".into(),
            });
        }

        log::debug!("{} finished normally", exe_display);
        Ok(())
    }
}
