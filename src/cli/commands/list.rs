//! List command implementation.
//!
//! The `sonar-env list` command lists configured installations. Passwords
//! are never printed; only whether one is set.

use serde_json::json;

use crate::cli::args::ListArgs;
use crate::config::SonarInstallation;
use crate::environment::maven_goal;
use crate::error::Result;
use crate::ui::theme::SonarTheme;
use crate::ui::UserInterface;

use super::context::{CommandContext, EXIT_NO_CONFIG};
use super::dispatcher::{Command, CommandResult};

/// The list command implementation.
pub struct ListCommand {
    context: CommandContext,
    args: ListArgs,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(context: CommandContext, args: ListArgs) -> Self {
        Self { context, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ListArgs {
        &self.args
    }
}

fn to_json(installation: &SonarInstallation) -> serde_json::Value {
    json!({
        "name": installation.name,
        "server_url": installation.server_url,
        "login": installation.login,
        "has_password": installation.password.is_some(),
        "database_url": installation.database_url,
        "maven_goal": maven_goal(installation.mojo_version()),
    })
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(config) = self.context.load_config(ui)? else {
            return Ok(CommandResult::failure(EXIT_NO_CONFIG));
        };

        let installations = config.installations();

        if self.args.json {
            let list: Vec<_> = installations.iter().map(to_json).collect();
            let text = serde_json::to_string_pretty(&list).map_err(anyhow::Error::from)?;
            ui.message(&text);
            return Ok(CommandResult::success());
        }

        if installations.is_empty() {
            ui.warning("No SonarQube installations are configured.");
            return Ok(CommandResult::success());
        }

        let theme = SonarTheme::new();
        ui.message(&format!("  {}", theme.key.apply_to("Installations:")));
        for installation in &installations {
            let url = if installation.server_url.is_empty() {
                "(no server URL)"
            } else {
                installation.server_url.as_str()
            };
            ui.message(&format!(
                "    {} {}",
                theme.key.apply_to(&installation.name),
                theme.dim.apply_to(url)
            ));

            if let Some(login) = &installation.login {
                ui.message(&format!("      {}", theme.format_key_value("login", login)));
            }
            if let Some(database_url) = &installation.database_url {
                ui.message(&format!(
                    "      {}",
                    theme.format_key_value("database", database_url)
                ));
            }
            ui.message(&format!(
                "      {}",
                theme.format_key_value("goal", &maven_goal(installation.mojo_version()))
            ));
        }

        if !config.settings.build_wrapper_enabled {
            ui.warning("The build wrapper is disabled (settings.build_wrapper_enabled: false)");
        }

        Ok(CommandResult::success())
    }
}
