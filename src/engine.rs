//! Building and running the snakemake command line.
//!
//! Arguments are collected as an argument vector and handed straight to
//! [`Command`], no shell is involved so values never need quoting.

use std::{
    ffi::{OsStr, OsString},
    path::PathBuf,
    process::{Command, ExitStatus},
};

use crate::{config::RunConfig, error::LaunchError, hpc::Location, resources::PackageDir};

/// Where snakemake runs the jobs.
///
/// An explicit command takes precedence over auto-detection, which takes
/// precedence over running locally.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ClusterMode {
    #[default]
    Local,
    Auto,
    Command(String),
}

impl ClusterMode {
    /// An empty command counts as not given.
    pub fn from_flags(auto: bool, cmd: Option<String>) -> Self {
        match (auto, cmd.filter(|c| !c.is_empty())) {
            (_, Some(cmd)) => ClusterMode::Command(cmd),
            (true, None) => ClusterMode::Auto,
            (false, None) => ClusterMode::Local,
        }
    }

    /// The command snakemake should use to submit each job, if any.
    ///
    /// Auto-detection requires the host to have a known scheduler, the
    /// submission itself goes through the wrapper script.
    pub fn resolve<F>(&self, location: F, package_dir: &PackageDir) -> Result<Option<String>, LaunchError>
    where
        F: FnOnce() -> Location,
    {
        match self {
            ClusterMode::Local => Ok(None),
            ClusterMode::Command(cmd) => Ok(Some(cmd.clone())),
            ClusterMode::Auto => {
                let loc = location();
                if loc.submit_job_cmd.is_none() {
                    return Err(LaunchError::UnsupportedHost(loc.name.to_string()));
                }
                let submit_script = package_dir.submit_script()?;
                Ok(Some(format!("python {}", submit_script.display())))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Snakemake {
    binary: PathBuf,
    snakefile: PathBuf,
    directory: PathBuf,
    jobs: usize,
    targets: Vec<String>,
    rerun_incomplete: bool,
    cluster_cmd: Option<String>,
    config: RunConfig,
}

impl Snakemake {
    pub fn new<P, Q, R>(binary: P, snakefile: Q, directory: R, config: RunConfig) -> Self
    where
        P: Into<PathBuf>,
        Q: Into<PathBuf>,
        R: Into<PathBuf>,
    {
        Snakemake {
            binary: binary.into(),
            snakefile: snakefile.into(),
            directory: directory.into(),
            jobs: 1,
            targets: Vec::new(),
            rerun_incomplete: false,
            cluster_cmd: None,
            config,
        }
    }

    pub fn jobs(&mut self, jobs: usize) -> &mut Self {
        self.jobs = jobs;
        self
    }

    pub fn targets(&mut self, targets: Vec<String>) -> &mut Self {
        self.targets = targets;
        self
    }

    pub fn rerun_incomplete(&mut self, rerun_incomplete: bool) -> &mut Self {
        self.rerun_incomplete = rerun_incomplete;
        self
    }

    pub fn cluster_cmd(&mut self, cluster_cmd: Option<String>) -> &mut Self {
        self.cluster_cmd = cluster_cmd;
        self
    }

    /// Arguments for the main run, in order.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.targets.iter().map(OsString::from).collect();
        args.push("--snakefile".into());
        args.push(self.snakefile.clone().into());
        args.push("--printshellcmds".into());
        args.push("--directory".into());
        args.push(self.directory.clone().into());
        args.push("-j".into());
        args.push(self.jobs.to_string().into());
        if self.rerun_incomplete {
            args.push("--rerun-incomplete".into());
        }
        if let Some(ref cluster_cmd) = self.cluster_cmd {
            args.push("--cluster".into());
            args.push(cluster_cmd.into());
        }
        args.push("--config".into());
        args.extend(self.config.tokens());
        args
    }

    /// Arguments for clearing a stale lock, the main run's with `--unlock`.
    pub fn unlock_args(&self) -> Vec<OsString> {
        let mut args = self.args();
        args.push("--unlock".into());
        args
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(self.args());
        cmd
    }

    pub fn unlock_command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(self.unlock_args());
        cmd
    }
}

/// Human readable version of a command, for printing and logging.
pub fn display_cmd(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(OsStr::to_string_lossy)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run with inherited stdio and environment and wait for it to finish.
pub fn execute(mut cmd: Command) -> Result<ExitStatus, LaunchError> {
    let shown = display_cmd(&cmd);
    println!("{shown}");
    log::info!("{shown}");
    let status = cmd.status()?;
    log::info!("Exit status: {status}");
    Ok(status)
}
