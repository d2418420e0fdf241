use brisk_lib::platform::find_executable;
use brisk_lib::platform::os::Os;

use crate::output::print_stat;

pub fn cmd_info() {
  println!("brisk v{}", env!("CARGO_PKG_VERSION"));

  let os = Os::host();
  print_stat("OS", os.as_str());
  let policy = match os {
    Os::Windows => "keep '\\' and '/'",
    Os::Linux | Os::MacOs => "'\\' becomes '/'",
  };
  print_stat("Archive separators", policy);

  let dotnet = find_executable("dotnet").map_or_else(|| "not found".to_string(), |p| p.display().to_string());
  print_stat("dotnet", &dotnet);
}
