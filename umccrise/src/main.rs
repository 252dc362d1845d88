mod file;

use std::path::PathBuf;

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use eyre::Result;
use file::ProjectPath;
use human_panic::setup_panic;
use libumccrise::{engine::ClusterMode, launch, resources::PackageDir, LaunchOptions};

#[derive(Parser, Debug)]
#[clap(author, version, long_about = None)]
/// Umccrise (post-process) a bcbio project.
struct Args {
    #[clap(flatten)]
    verbose: Verbosity<InfoLevel>,

    /// Path to a bcbio run (final or "datestamp" directory)
    #[clap(value_name = "BCBIO_PROJECT")]
    project: ProjectPath,

    /// Optional list of rules, e.g.: pcgr coverage structural small_variants
    /// rmd igv
    #[clap(value_name = "TARGET_RULE")]
    target_rule: Vec<String>,

    /// Output directory (default is "umccrised")
    #[clap(short, long)]
    output_dir: Option<PathBuf>,

    /// Maximum number of cores to use at single time (works both for local
    /// and cluster runs)
    #[clap(short, long, default_value_t = 1)]
    jobs: usize,

    /// Comma-separated list of samples or batches to process
    #[clap(short, long)]
    sample: Option<String>,

    /// Comma-separated list of samples or batches to process
    #[clap(short, long)]
    batch: Option<String>,

    /// Comma-separated list of samples or batches to ignore
    #[clap(short, long)]
    exclude: Option<String>,

    /// Unique id of the PCGR tarballs, enables the pcgr_download step
    #[clap(long)]
    uid: Option<String>,

    /// Submit jobs to cluster, using the scheduler of the current machine
    #[clap(short = 'c', long)]
    cluster_auto: bool,

    /// Deprecated. Use --cluster-auto instead. Explicit submission command,
    /// takes precedence over --cluster-auto
    #[clap(long = "cluster", alias = "cluster-cmd")]
    cluster_cmd: Option<String>,

    /// Propagated to snakemake
    #[clap(long)]
    unlock: bool,

    /// Propagated to snakemake
    #[clap(long)]
    rerun_incomplete: bool,

    /// Path to snakemake binary, if not specified will look in $PATH
    #[clap(long)]
    snakemake_path: Option<PathBuf>,

    /// Directory with the Snakefile and reference data, by default the
    /// directory of the umccrise executable
    #[clap(long, env = "UMCCRISE_HOME")]
    package_dir: Option<PathBuf>,
}

impl Args {
    fn into_options(self) -> Result<LaunchOptions> {
        let package_dir = match self.package_dir {
            Some(dir) => PackageDir::new(dir),
            None => PackageDir::discover()?,
        };
        let mut opts = LaunchOptions::new(self.project, package_dir);
        opts.output_dir = self.output_dir;
        opts.target_rules = self.target_rule;
        opts.sample = self.sample;
        opts.batch = self.batch;
        opts.exclude = self.exclude;
        opts.unique_id = self.uid;
        opts.jobs = self.jobs;
        opts.cluster = ClusterMode::from_flags(self.cluster_auto, self.cluster_cmd);
        opts.unlock = self.unlock;
        opts.rerun_incomplete = self.rerun_incomplete;
        opts.snakemake_path = self.snakemake_path;
        opts.log_level = self.verbose.log_level_filter();
        Ok(opts)
    }
}

fn main() -> Result<()> {
    setup_panic!();
    jane_eyre::install()?;

    let args = Args::parse();
    let exit_code = launch::run(args.into_options()?)?;
    if exit_code != 0 {
        log::error!("snakemake exited with code {exit_code}");
        eprintln!("--------");
        eprintln!("Error running Umccrise: snakemake returned a non-zero status.");
        std::process::exit(exit_code);
    }
    log::info!("umccrise finished");
    Ok(())
}
