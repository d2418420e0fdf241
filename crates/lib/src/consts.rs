//! Crate-wide constants.

pub const APP_NAME: &str = "brisk";

/// Build script loaded when no file is given on the command line.
pub const DEFAULT_SCRIPT_FILE: &str = "brisk.toml";

/// Reserved archive entry holding the serialized [`crate::archive::ArchiveMetadata`].
pub const METADATA_ENTRY_NAME: &str = "_zipmetadata.json";

/// Overrides the seeded build version.
pub const BUILD_VERSION_ENV: &str = "BRISK_BUILD_VERSION";

/// Names the dotnet executable when it cannot be found on `PATH`.
pub const DOTNET_EXECUTABLE_ENV: &str = "BRISK_DOTNET";

/// Version used when neither the environment nor the script provides one.
pub const DEFAULT_BUILD_VERSION: &str = "1.0.0.0";

/// File generated by the assembly-info task inside the product root.
pub const COMMON_ASSEMBLY_INFO_FILE: &str = "CommonAssemblyInfo.cs";

/// Version file read by the fetch-version task when no path is configured.
pub const PROJECT_VERSION_FILE: &str = "ProjectVersion.txt";
