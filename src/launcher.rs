//! Starting the companion application.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{AppletError, Result};

/// What the companion application should open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    Main,
    Pref,
    About,
    Quick,
    File,
    Edit,
    New,
}

impl fmt::Display for LaunchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LaunchMode::Main => "main",
            LaunchMode::Pref => "pref",
            LaunchMode::About => "about",
            LaunchMode::Quick => "quick",
            LaunchMode::File => "file",
            LaunchMode::Edit => "edit",
            LaunchMode::New => "new",
        };
        f.write_str(name)
    }
}

/// A single request to the companion application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub mode: LaunchMode,
    pub filename: Option<PathBuf>,
    pub server: Option<String>,
    pub protocol: Option<String>,
}

impl LaunchRequest {
    pub fn new(mode: LaunchMode) -> Self {
        Self {
            mode,
            filename: None,
            server: None,
            protocol: None,
        }
    }

    pub fn with_file(mode: LaunchMode, filename: impl Into<PathBuf>) -> Self {
        Self {
            filename: Some(filename.into()),
            ..Self::new(mode)
        }
    }

    pub fn with_server(
        mode: LaunchMode,
        server: impl Into<String>,
        protocol: impl Into<String>,
    ) -> Self {
        Self {
            server: Some(server.into()),
            protocol: Some(protocol.into()),
            ..Self::new(mode)
        }
    }

    /// Command-line arguments understood by the companion application.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        match self.mode {
            LaunchMode::Main => {}
            LaunchMode::Pref => args.extend(["-p".into(), "0".into()]),
            LaunchMode::About => args.push("-a".into()),
            LaunchMode::Quick | LaunchMode::New => {
                args.push(if self.mode == LaunchMode::Quick { "-q" } else { "-n" }.into());
                if let Some(server) = &self.server {
                    args.extend(["-s".into(), server.into()]);
                }
                if let Some(protocol) = &self.protocol {
                    args.extend(["-t".into(), protocol.into()]);
                }
            }
            LaunchMode::File | LaunchMode::Edit => {
                args.push(if self.mode == LaunchMode::File { "-c" } else { "-e" }.into());
                if let Some(filename) = &self.filename {
                    args.push(filename.into());
                }
            }
        }
        args
    }
}

/// Spawns the companion program without waiting for it.
#[derive(Debug, Clone)]
pub struct Launcher {
    program: PathBuf,
}

impl Launcher {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn launch(&self, request: &LaunchRequest) -> Result<()> {
        let args = request.args();
        tracing::info!(program = %self.program.display(), mode = %request.mode, ?args, "launching");

        Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(drop)
            .map_err(|source| AppletError::Launch {
                program: self.program.clone(),
                source,
            })
    }
}
