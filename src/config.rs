//! Values passed to the workflow through snakemake's `--config`.

use std::{
    ffi::{OsStr, OsString},
    fmt,
    path::PathBuf,
};

/// Target rule that fetches PCGR results back from the remote service.
pub const PCGR_DOWNLOAD_RULE: &str = "pcgr_download";

/// Empty values count as not given.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn token<V: AsRef<OsStr>>(key: &str, value: V) -> OsString {
    let mut token = OsString::from(key);
    token.push("=");
    token.push(value);
    token
}

#[derive(Debug, Default, Clone)]
pub struct RunConfig {
    run_dir: PathBuf,
    sample: Option<String>,
    batch: Option<String>,
    exclude: Option<String>,
    pcgr_download: bool,
    unique_id: Option<String>,
}

impl RunConfig {
    pub fn new<P: Into<PathBuf>>(run_dir: P) -> Self {
        RunConfig {
            run_dir: run_dir.into(),
            ..Default::default()
        }
    }

    /// Comma-separated samples or batches to process.
    pub fn sample(&mut self, sample: Option<String>) -> &mut Self {
        self.sample = non_empty(sample);
        self
    }

    pub fn batch(&mut self, batch: Option<String>) -> &mut Self {
        self.batch = non_empty(batch);
        self
    }

    /// Comma-separated samples or batches to ignore.
    pub fn exclude(&mut self, exclude: Option<String>) -> &mut Self {
        self.exclude = non_empty(exclude);
        self
    }

    /// Enables the PCGR download step when it is one of the targets or when
    /// a unique id for the uploaded tarballs is given.
    pub fn pcgr<S: AsRef<str>>(&mut self, target_rules: &[S], unique_id: Option<String>) -> &mut Self {
        let unique_id = non_empty(unique_id);
        self.pcgr_download = unique_id.is_some()
            || target_rules
                .iter()
                .any(|rule| rule.as_ref() == PCGR_DOWNLOAD_RULE);
        self.unique_id = unique_id;
        self
    }

    /// Each token is a separate `key=value` argument. Filters that weren't
    /// given contribute nothing.
    pub fn tokens(&self) -> Vec<OsString> {
        let mut tokens = vec![token("run_dir", &self.run_dir)];
        if let Some(ref sample) = self.sample {
            tokens.push(token("sample", sample));
        }
        if let Some(ref batch) = self.batch {
            tokens.push(token("batch", batch));
        }
        if let Some(ref exclude) = self.exclude {
            tokens.push(token("exclude", exclude));
        }
        if self.pcgr_download {
            tokens.push(token("pcgr_download", "yes"));
        }
        if let Some(ref unique_id) = self.unique_id {
            tokens.push(token("unique_id", unique_id));
        }
        tokens
    }
}

impl fmt::Display for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens: Vec<_> = self.tokens().iter().map(|t| t.to_string_lossy().into_owned()).collect();
        write!(f, "{}", tokens.join(" "))
    }
}
