use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Project path {0:?} does not exist")]
    MissingProject(PathBuf),
    #[error("Required file {0:?} is missing from the package directory")]
    MissingResource(PathBuf),
    #[error("Automatic cluster submission is not supported for the machine \"{0}\"")]
    UnsupportedHost(String),
    #[error("Could not find {name} in $PATH")]
    BinaryNotFound {
        name: &'static str,
        #[source]
        source: which::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
