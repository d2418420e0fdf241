//! Concrete task types.

pub mod assembly_info;
pub mod package;
pub mod run_program;
pub mod toolchain;
pub mod unzip;
pub mod version;

pub use assembly_info::{AssemblyInfoBuilder, GenerateCommonAssemblyInfoTask};
pub use package::{PackageBuilder, PackageTask};
pub use run_program::{RunProgramBuilder, RunProgramTask};
pub use toolchain::{DotnetCommand, ToolchainCommandBuilder, ToolchainCommandTask};
pub use unzip::UnzipTask;
pub use version::{FetchBuildVersionTask, WriteVersionFileBuilder, WriteVersionFileTask};
