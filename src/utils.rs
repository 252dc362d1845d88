use std::{
    env,
    path::{Path, PathBuf},
    process::ExitStatus,
};

use which::which;

use crate::error::LaunchError;

/// Use the given path to a binary if there is one, otherwise look for `name`
/// in $PATH.
pub fn find_binary(name: &'static str, binary_filepath: &Option<PathBuf>) -> Result<PathBuf, LaunchError> {
    if let Some(p) = binary_filepath {
        Ok(p.to_path_buf())
    } else {
        which(name).map_err(|source| LaunchError::BinaryNotFound { name, source })
    }
}

/// Make a path absolute relative to the current directory without touching
/// the filesystem, so it works for directories that don't exist yet.
pub fn absolute<P: AsRef<Path>>(path: P) -> std::io::Result<PathBuf> {
    let path = path.as_ref();
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(env::current_dir()?.join(path))
    }
}

/// Exit code to hand back to the shell for a finished child process.
///
/// Children killed by a signal have no code, follow the shell convention of
/// 128 + signal number.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
