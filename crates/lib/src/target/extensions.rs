//! Shortcuts that append common tasks to a target.

use std::path::PathBuf;

use crate::task::{Task, TaskConfig};
use crate::tasks::{
  DotnetCommand, GenerateCommonAssemblyInfoTask, PackageBuilder, PackageTask, RunProgramTask, ToolchainCommandTask,
};

use super::{TargetBuilder, TaskChain};

/// Output folder for packages created from project publish folders.
const PACKAGE_OUTPUT_DIR: &str = "output";

/// Appends preconfigured tasks to a target. Obtained from [`TargetBuilder::tasks`].
pub struct TaskExtensions {
  target: TargetBuilder,
}

impl TaskExtensions {
  pub(crate) fn new(target: TargetBuilder) -> Self {
    Self { target }
  }

  fn push(mut self, task: impl Task + 'static) -> Self {
    self.target = self.target.do_task(task);
    self
  }

  /// Run `program` with `args` in `working_folder`.
  pub fn run_program<I, S>(self, program: impl Into<String>, working_folder: impl Into<PathBuf>, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let task = RunProgramTask::new(program)
      .working_folder(working_folder)
      .with_arguments(args);
    self.push(task)
  }

  /// One task per command line. The first whitespace-separated word is the
  /// program, the rest are its arguments.
  pub fn run_multi_program<I, S>(self, command_lines: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut this = self;
    for line in command_lines {
      let mut words = line.as_ref().split_whitespace();
      let Some(program) = words.next() else {
        continue;
      };
      this = this.push(RunProgramTask::new(program).with_arguments(words));
    }
    this
  }

  pub fn generate_common_assembly_info(self) -> Self {
    self.push(GenerateCommonAssemblyInfoTask::new())
  }

  /// Zip the publish folders (`<project>/bin/Release/<framework>/publish`) of
  /// `projects` into `output/<prefix>_<version>.zip`, each under a folder named
  /// after its project.
  ///
  /// Returns the package task so more sources can be added before going back
  /// to the target.
  pub fn create_zip_package_from_projects<I, S>(
    self,
    zip_prefix: impl Into<String>,
    target_framework: &str,
    projects: I,
  ) -> TaskChain<PackageTask>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut task = PackageTask::new(PACKAGE_OUTPUT_DIR).zip_package(zip_prefix);
    for project in projects {
      let project = project.as_ref();
      let publish = PathBuf::from(project)
        .join("bin")
        .join("Release")
        .join(target_framework)
        .join("publish");
      task = task.add_directory_to_package(publish, project);
    }
    self.target.add_task(task)
  }

  pub fn dotnet_restore<I, S>(self, projects: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.dotnet_per_project(DotnetCommand::Restore, None, projects)
  }

  pub fn dotnet_build<I, S>(self, projects: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.dotnet_per_project(DotnetCommand::Build, None, projects)
  }

  /// Like [`Self::dotnet_build`], running from `working_folder`.
  pub fn dotnet_build_in<I, S>(self, working_folder: impl Into<PathBuf>, projects: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.dotnet_per_project(DotnetCommand::Build, Some(working_folder.into()), projects)
  }

  pub fn dotnet_publish<I, S>(self, projects: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.dotnet_per_project(DotnetCommand::Publish, None, projects)
  }

  pub fn dotnet_unit_test<I, S>(self, projects: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.dotnet_per_project(DotnetCommand::Test, None, projects)
  }

  pub fn back_to_target(self) -> TargetBuilder {
    self.target
  }

  /// One dotnet task per project, or a single project-less task when none are given.
  fn dotnet_per_project<I, S>(self, command: DotnetCommand, working_folder: Option<PathBuf>, projects: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let make = |project: Option<String>| {
      let mut task = ToolchainCommandTask::dotnet(command).with_arguments(project);
      if let Some(folder) = &working_folder {
        task = task.working_folder(folder.clone());
      }
      task
    };

    let projects: Vec<String> = projects.into_iter().map(Into::into).collect();
    if projects.is_empty() {
      return self.push(make(None));
    }

    let mut this = self;
    for project in projects {
      this = this.push(make(Some(project)));
    }
    this
  }
}
