//! Run command implementation.
//!
//! The `sonar-env run` command runs one build step with the `SONAR_*`
//! variables injected and every secret masked in its output.

use std::io::{self, Write};

use crate::cli::args::RunArgs;
use crate::error::{Result, SonarEnvError};
use crate::runner::BuildWrapper;
use crate::secrets::Masker;
use crate::shell::{execute_masked, CommandOptions};
use crate::ui::UserInterface;

use super::context::{select_installation, CommandContext, EXIT_NO_CONFIG};
use super::dispatcher::{Command, CommandResult};

/// The run command implementation.
pub struct RunCommand {
    context: CommandContext,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(context: CommandContext, args: RunArgs) -> Self {
        Self { context, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }

    /// Run the build step, writing its masked output to `stdout` and `stderr`.
    pub fn run_with<O, E>(
        &self,
        ui: &mut dyn UserInterface,
        stdout: O,
        stderr: E,
    ) -> Result<CommandResult>
    where
        O: Write + Send,
        E: Write + Send,
    {
        let Some((program, args)) = self.args.command.split_first() else {
            ui.error("No build step command given after --");
            return Ok(CommandResult::failure(1));
        };

        let Some(config) = self.context.load_config(ui)? else {
            return Ok(CommandResult::failure(EXIT_NO_CONFIG));
        };

        if !BuildWrapper::is_applicable(&config) {
            return Err(SonarEnvError::BuildWrapperDisabled);
        }

        let Some(name) = select_installation(&config, self.args.installation.as_deref(), ui)
        else {
            return Ok(CommandResult::failure(1));
        };

        let host_env = self.context.host_env();
        let sonar = match BuildWrapper::new(name).set_up(&config, host_env, ui) {
            Ok(sonar) => sonar,
            // Already reported as fatal; the step must not run
            Err(SonarEnvError::ConfigurationNotFound { .. }) => {
                return Ok(CommandResult::failure(1))
            }
            Err(e) => return Err(e),
        };

        let mut options = CommandOptions {
            cwd: Some(self.context.project_root().to_path_buf()),
            env: host_env.clone(),
        };
        sonar.build_env_vars(&mut options.env);

        let masker = Masker::new(&sonar.secrets(&config, host_env));
        let result = execute_masked(
            program,
            args,
            &options,
            masker.writer(stdout),
            masker.writer(stderr),
        )?;

        sonar.tear_down(ui);

        if result.success {
            Ok(CommandResult::success())
        } else {
            let code = result.exit_code.unwrap_or(1);
            tracing::debug!(code, "build step failed");
            ui.error(&format!("Build step exited with code {}", code));
            Ok(CommandResult::failure(code))
        }
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        self.run_with(ui, io::stdout(), io::stderr())
    }
}
