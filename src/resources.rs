//! Files shipped alongside the workflow: the Snakefile, the cluster
//! submission wrapper and the reference data used by the reports.
//!
//! Paths are always built relative to the package directory, never taken
//! from the user, and every accessor checks the file is actually there.

use std::{
    env,
    path::{Path, PathBuf},
};

use crate::error::LaunchError;

/// Environment variable pointing at the package directory.
pub const PACKAGE_DIR_ENV: &str = "UMCCRISE_HOME";

/// Return `path` if it is an existing regular file.
pub fn verify_file<P: AsRef<Path>>(path: P) -> Result<PathBuf, LaunchError> {
    let path = path.as_ref();
    if path.is_file() {
        Ok(path.to_path_buf())
    } else {
        Err(LaunchError::MissingResource(path.to_path_buf()))
    }
}

#[derive(Clone, Debug)]
pub struct PackageDir(PathBuf);

impl PackageDir {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        PackageDir(root.into())
    }

    /// Find the package directory: `$UMCCRISE_HOME` when set, otherwise the
    /// directory holding the running executable.
    pub fn discover() -> eyre::Result<Self> {
        if let Some(root) = env::var_os(PACKAGE_DIR_ENV) {
            return Ok(PackageDir::new(root));
        }
        let exe = env::current_exe()?;
        let root = exe
            .parent()
            .ok_or_else(|| eyre::eyre!("Executable {exe:?} has no parent directory"))?;
        Ok(PackageDir::new(root))
    }

    /// Rule definitions handed to snakemake.
    pub fn snakefile(&self) -> Result<PathBuf, LaunchError> {
        verify_file(self.0.join("Snakefile"))
    }

    /// Wrapper script snakemake calls to submit each job to the cluster.
    pub fn submit_script(&self) -> Result<PathBuf, LaunchError> {
        verify_file(self.0.join("submit.py"))
    }

    /// R-markdown source for the mutational signature analysis. Lives next to
    /// the Snakefile.
    pub fn sig_rmd(&self) -> Result<PathBuf, LaunchError> {
        verify_file(self.0.join("sig.Rmd"))
    }

    pub fn signatures_probabilities(&self) -> Result<PathBuf, LaunchError> {
        verify_file(self.0.join("rmd_files").join("signatures_probabilities.txt"))
    }

    pub fn suppressors(&self) -> Result<PathBuf, LaunchError> {
        verify_file(self.0.join("rmd_files").join("suppressors.txt"))
    }

    pub fn cancer_genes_ensg(&self) -> Result<PathBuf, LaunchError> {
        verify_file(self.0.join("ref_data").join("predisposition_genes_engs.txt"))
    }

    /// Key genes regions for a genome build, ie "GRCh37" or "hg38".
    pub fn key_genes_bed(&self, genome: &str) -> Result<PathBuf, LaunchError> {
        verify_file(
            self.0
                .join("ref_data")
                .join("generated")
                .join(format!("key_genes.{genome}.bed")),
        )
    }
}
