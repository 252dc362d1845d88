use std::{fs, path::PathBuf};

use eyre::Context;
use log::LevelFilter;

use crate::{
    config::RunConfig,
    engine::{self, ClusterMode, Snakemake},
    error::LaunchError,
    hpc, logger,
    resources::PackageDir,
    utils,
};

pub const DEFAULT_OUTPUT_DIR: &str = "umccrised";

#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Path to a bcbio run, final or "datestamp" directory
    pub project: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub target_rules: Vec<String>,
    pub sample: Option<String>,
    pub batch: Option<String>,
    pub exclude: Option<String>,
    pub unique_id: Option<String>,
    pub jobs: usize,
    pub cluster: ClusterMode,
    pub unlock: bool,
    pub rerun_incomplete: bool,
    pub snakemake_path: Option<PathBuf>,
    pub package_dir: PackageDir,
    pub log_level: LevelFilter,
}

impl LaunchOptions {
    pub fn new<P: Into<PathBuf>>(project: P, package_dir: PackageDir) -> Self {
        LaunchOptions {
            project: project.into(),
            output_dir: None,
            target_rules: Vec::new(),
            sample: None,
            batch: None,
            exclude: None,
            unique_id: None,
            jobs: 1,
            cluster: ClusterMode::Local,
            unlock: false,
            rerun_incomplete: false,
            snakemake_path: None,
            package_dir,
            log_level: LevelFilter::Info,
        }
    }
}

/// Umccrise a bcbio project: set up the output directory and log, then run
/// snakemake on the workflow.
///
/// Returns snakemake's exit code, launcher failures are errors.
pub fn run(opts: LaunchOptions) -> eyre::Result<i32> {
    if !opts.project.exists() {
        return Err(LaunchError::MissingProject(opts.project).into());
    }

    let output_dir = opts
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    let output_dir = utils::absolute(output_dir)?;
    fs::create_dir_all(&output_dir)
        .wrap_err_with(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let log_path = logger::init(&output_dir, opts.log_level).wrap_err("Failed to set up logging")?;
    log::info!("Logging to {}", log_path.display());
    log::debug!("{opts:?}");

    let project = utils::absolute(&opts.project)?;

    let mut conf = RunConfig::new(&project);
    conf.sample(opts.sample)
        .batch(opts.batch)
        .exclude(opts.exclude)
        .pcgr(&opts.target_rules, opts.unique_id);
    log::info!("Config: {conf}");

    let cluster_cmd = opts.cluster.resolve(hpc::get_loc, &opts.package_dir)?;
    if let Some(ref cmd) = cluster_cmd {
        log::info!("Submitting jobs with: {cmd}");
    }

    let snakemake_bin = utils::find_binary("snakemake", &opts.snakemake_path)?;
    let snakefile = opts.package_dir.snakefile()?;
    let mut snakemake = Snakemake::new(snakemake_bin, snakefile, &output_dir, conf);
    snakemake
        .targets(opts.target_rules)
        .jobs(opts.jobs)
        .rerun_incomplete(opts.rerun_incomplete || opts.unlock)
        .cluster_cmd(cluster_cmd);

    if opts.unlock {
        println!("* Unlocking previous run... *");
        let status = engine::execute(snakemake.unlock_command())?;
        if !status.success() {
            log::warn!("Unlocking returned {status}, continuing anyway");
        }
        println!("* Now rerunning *");
    }

    let status = engine::execute(snakemake.command())?;
    Ok(utils::exit_code(status))
}
