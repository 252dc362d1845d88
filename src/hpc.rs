//! Knowledge about the machines umccrise is usually run on, mainly how jobs
//! get submitted to each machine's scheduler.

use std::{env, process::Command};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub name: &'static str,
    host_patterns: &'static [&'static str],
    /// Scheduler command template, `None` when jobs can only run locally.
    pub submit_job_cmd: Option<&'static str>,
}

impl Location {
    fn matches(&self, hostname: &str) -> bool {
        self.host_patterns.iter().any(|p| hostname.contains(p))
    }
}

const KNOWN_LOCATIONS: &[Location] = &[
    Location {
        name: "spartan",
        host_patterns: &["spartan"],
        submit_job_cmd: Some(
            "sbatch -p vccc -J {job_name} --ntasks-per-node {threads} --mem {mem}G -t 24:00:00 --output {log_file} --error {log_file}",
        ),
    },
    Location {
        name: "raijin",
        host_patterns: &["raijin"],
        submit_job_cmd: Some(
            "qsub -P gx8 -q normalsp -l wd,walltime=24:00:00,ncpus={threads},mem={mem}G -N {job_name} -o {log_file} -e {log_file}",
        ),
    },
    Location {
        name: "travis",
        host_patterns: &["travis"],
        submit_job_cmd: None,
    },
];

const LOCAL: Location = Location {
    name: "local",
    host_patterns: &[],
    submit_job_cmd: None,
};

/// Match a hostname against the known locations, anything unknown is treated
/// as a local machine.
pub fn find_loc(hostname: &str) -> Location {
    let hostname = hostname.trim().to_lowercase();
    KNOWN_LOCATIONS
        .iter()
        .find(|loc| loc.matches(&hostname))
        .cloned()
        .unwrap_or(LOCAL)
}

/// Hostname from $HOSTNAME, falling back to the `hostname` command.
pub fn hostname() -> Option<String> {
    if let Ok(name) = env::var("HOSTNAME") {
        if !name.trim().is_empty() {
            return Some(name);
        }
    }
    let output = Command::new("hostname").output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Location of the current host.
pub fn get_loc() -> Location {
    match hostname() {
        Some(name) => {
            let loc = find_loc(&name);
            log::debug!("Host {name} resolved to location {}", loc.name);
            loc
        }
        None => {
            log::warn!("Could not determine hostname, assuming a local machine");
            LOCAL
        }
    }
}
