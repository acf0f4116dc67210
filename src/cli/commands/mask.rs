//! Mask command implementation.
//!
//! The `sonar-env mask` command filters stdin to stdout, replacing the
//! secrets of one installation. Useful for piping logs of steps that were
//! not started through `sonar-env run`.

use std::io::{self, Read, Write};

use crate::cli::args::MaskArgs;
use crate::config::SonarConfig;
use crate::error::{Result, SonarEnvError};
use crate::runner::BuildWrapper;
use crate::ui::UserInterface;

use super::context::{select_installation, CommandContext, EXIT_NO_CONFIG};
use super::dispatcher::{Command, CommandResult};

/// The mask command implementation.
pub struct MaskCommand {
    context: CommandContext,
    args: MaskArgs,
}

impl MaskCommand {
    /// Create a new mask command.
    pub fn new(context: CommandContext, args: MaskArgs) -> Self {
        Self { context, args }
    }

    /// Copy `input` to `output` with the installation's secrets masked.
    pub fn filter<R: Read, W: Write>(
        &self,
        config: &SonarConfig,
        name: &str,
        mut input: R,
        output: W,
    ) -> Result<()> {
        let wrapper = BuildWrapper::new(name);
        let Some(mut writer) = wrapper.decorate_logger(config, self.context.host_env(), Some(output))
        else {
            return Ok(());
        };

        io::copy(&mut input, &mut writer)?;
        writer.close()?;
        Ok(())
    }
}

impl Command for MaskCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(config) = self.context.load_config(ui)? else {
            return Ok(CommandResult::failure(EXIT_NO_CONFIG));
        };

        let Some(name) = select_installation(&config, self.args.installation.as_deref(), ui)
        else {
            return Ok(CommandResult::failure(1));
        };

        // Never pass output through unmasked
        if config.installation(&name).is_none() {
            let err = SonarEnvError::ConfigurationNotFound { name };
            ui.fatal_error(&err.to_string());
            return Ok(CommandResult::failure(1));
        }

        self.filter(&config, &name, io::stdin().lock(), io::stdout().lock())?;
        Ok(CommandResult::success())
    }
}
