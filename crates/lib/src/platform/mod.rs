//! Host OS detection and path policies.
//!
//! Separator normalization and directory-marker detection are kept here as
//! explicit functions so archive extraction can be tested per platform
//! regardless of the machine running the tests.

pub mod os;

use std::env;
use std::path::{Path, PathBuf};

use os::Os;

/// Replace the non-native separator with the native one for `os`.
///
/// On Windows both separators are already accepted, so the path is returned unchanged.
/// Everywhere else a `\` is turned into `/`.
pub fn normalize_separators(path: &str, os: Os) -> String {
  match os {
    Os::Windows => path.to_string(),
    Os::Linux | Os::MacOs => path.replace('\\', "/"),
  }
}

/// Returns true if an archive entry name denotes a directory rather than a file.
///
/// Directory markers are entries whose name ends in a path separator.
pub fn is_directory_marker(name: &str) -> bool {
  name.ends_with('/') || name.ends_with('\\')
}

/// Search `PATH` for an executable named `name`.
///
/// On Windows the `.exe` suffix is tried as well.
pub fn find_executable(name: &str) -> Option<PathBuf> {
  let candidates: Vec<String> = if cfg!(windows) {
    vec![format!("{name}.exe"), name.to_string()]
  } else {
    vec![name.to_string()]
  };

  let path_var = env::var_os("PATH")?;
  env::split_paths(&path_var)
    .flat_map(|dir| candidates.iter().map(move |c| dir.join(c)))
    .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
  use std::os::unix::fs::PermissionsExt;
  path
    .metadata()
    .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
    .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
  path.is_file()
}
