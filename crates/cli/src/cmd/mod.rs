mod info;
mod list;
mod plan;
mod run;
mod unzip;

use std::env;
use std::path::Path;

use anyhow::{Context, Result};

use brisk_lib::script::BuildScript;

pub use info::cmd_info;
pub use list::cmd_list;
pub use plan::cmd_plan;
pub use run::{RunOptions, cmd_run, parse_property};
pub use unzip::cmd_unzip;

/// Load the build script and make its directory the working directory, so
/// relative paths in the script resolve the same wherever brisk is started.
fn load_script(file: &Path) -> Result<BuildScript> {
  let script = BuildScript::load(file).with_context(|| format!("Failed to load build script: {}", file.display()))?;

  if let Some(dir) = file.parent()
    && !dir.as_os_str().is_empty()
  {
    let dir = dunce::canonicalize(dir).with_context(|| format!("Failed to resolve {}", dir.display()))?;
    env::set_current_dir(&dir).with_context(|| format!("Failed to enter {}", dir.display()))?;
  }

  Ok(script)
}
