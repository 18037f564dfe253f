use std::path::PathBuf;

use dialoguer::theme::ColorfulTheme;

use crate::cli::{
    error::CliError,
    io, output,
    prompts::{run_wizard, WizardOutcome},
};
use crate::config::{Config, ConfigManager};
use crate::core::{BookingService, BookingWizard};
use crate::utils::build_info;

const USAGE: &str = "\
Usage: rental_core_cli <command> [args]

Commands:
  list                 List rentals in the local cache
  show <id>            Show one rental
  new [--offline]      Create a rental with the booking wizard
  edit <id>            Edit an existing rental
  config               Show the effective configuration
  config set <key> <value>
                       Update a stored setting
  version              Show build information
  help                 Show this message";

/// Parses `args` (without the program name) and runs the command.
pub async fn run_cli(args: Vec<String>) -> Result<(), CliError> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let manager = ConfigManager::from_env()?;

    match args.as_slice() {
        [] | ["help"] | ["--help"] | ["-h"] => {
            println!("{USAGE}");
            Ok(())
        }
        ["version"] | ["--version"] => {
            println!("{}", build_info::current().summary());
            Ok(())
        }
        ["config"] | ["config", "show"] => show_config(&manager),
        ["config", "set", key, value] => {
            let mut config = manager.load()?;
            apply_setting(&mut config, key, value)?;
            manager.save(&config)?;
            io::print_success(format!("{key} updated"));
            Ok(())
        }
        ["list"] => {
            let config = manager.load_effective()?;
            list_rentals(&BookingService::from_config(&config)?, &config)
        }
        ["show", id] => {
            let config = manager.load_effective()?;
            let service = BookingService::from_config(&config)?;
            let wizard = service.start_edit(id).await?;
            for line in output::rental_detail(wizard.draft(), &config.currency) {
                println!("{line}");
            }
            Ok(())
        }
        ["new"] | ["new", "--offline"] => {
            let config = manager.load_effective()?;
            let service = BookingService::from_config(&config)?;
            let wizard = if args.len() == 2 || !service.has_remote() {
                service.start_offline()
            } else {
                service.start_new()
            };
            drive(&service, wizard, &config).await
        }
        ["edit", id] => {
            let config = manager.load_effective()?;
            let service = BookingService::from_config(&config)?;
            let wizard = service.start_edit(id).await?;
            drive(&service, wizard, &config).await
        }
        [command, ..] => Err(CliError::InvalidArguments(format!(
            "unknown command or arguments for `{command}`; run `rental_core_cli help`"
        ))),
    }
}

fn show_config(manager: &ConfigManager) -> Result<(), CliError> {
    let mut config = manager.load_effective()?;
    if config.remote.api_key.is_some() {
        config.remote.api_key = Some("********".into());
    }
    println!("# {}", manager.config_path().display());
    println!("{}", serde_json::to_string_pretty(&config)?);
    println!("# data directory: {}", config.resolve_data_dir().display());
    Ok(())
}

fn list_rentals(service: &BookingService, config: &Config) -> Result<(), CliError> {
    let rentals = service.list()?;
    if rentals.is_empty() {
        io::print_info("No rentals saved yet.");
        return Ok(());
    }
    output::section(format!("{} rental(s)", rentals.len()));
    for rental in &rentals {
        println!("{}", output::rental_row(rental, &config.currency));
    }
    Ok(())
}

async fn drive(
    service: &BookingService,
    mut wizard: BookingWizard,
    config: &Config,
) -> Result<(), CliError> {
    let theme = ColorfulTheme::default();
    loop {
        if run_wizard(&mut wizard, &theme, &config.currency)? == WizardOutcome::Cancelled {
            io::print_info("Booking cancelled; nothing was saved.");
            return Ok(());
        }
        match service.submit(&wizard).await {
            Ok(report) => {
                for warning in report.warnings() {
                    io::print_warning(warning);
                }
                io::print_success(format!(
                    "Rental {} saved ({})",
                    wizard.draft().agreement_number,
                    report.remote
                ));
                return Ok(());
            }
            Err(err) if err.is_recoverable() => io::print_error(err),
            Err(err) => {
                io::print_error(&err);
                if !io::confirm_action(&theme, "Return to the wizard and retry?", true)? {
                    return Err(err.into());
                }
            }
        }
    }
}

/// Updates one setting addressed by its JSON path, e.g. `remote.timeout_secs`.
pub fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<(), CliError> {
    let optional = |value: &str| {
        let trimmed = value.trim();
        (!trimmed.is_empty() && trimmed != "-").then(|| trimmed.to_string())
    };
    match key {
        "data_dir" => config.data_dir = optional(value).map(PathBuf::from),
        "local_prefix" => config.local_prefix = value.trim().to_string(),
        "currency" => config.currency = value.trim().to_ascii_uppercase(),
        "remote.document_url" => config.remote.document_url = optional(value),
        "remote.image_url" => config.remote.image_url = optional(value),
        "remote.public_image_url" => config.remote.public_image_url = optional(value),
        "remote.api_key" => config.remote.api_key = optional(value),
        "remote.timeout_secs" => {
            config.remote.timeout_secs = value.trim().parse().map_err(|_| {
                CliError::InvalidArguments("timeout must be a whole number of seconds".into())
            })?
        }
        other => {
            return Err(CliError::InvalidArguments(format!(
                "unknown setting `{other}`"
            )))
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_update_by_path() {
        let mut config = Config::default();
        apply_setting(&mut config, "remote.document_url", "https://db.test").expect("url");
        apply_setting(&mut config, "remote.timeout_secs", "5").expect("timeout");
        apply_setting(&mut config, "currency", "usd").expect("currency");
        assert_eq!(config.remote.document_url.as_deref(), Some("https://db.test"));
        assert_eq!(config.remote.timeout_secs, 5);
        assert_eq!(config.currency, "USD");

        apply_setting(&mut config, "remote.document_url", "-").expect("clear");
        assert!(config.remote.document_url.is_none());
    }

    #[test]
    fn bad_settings_are_rejected() {
        let mut config = Config::default();
        assert!(apply_setting(&mut config, "theme", "dark").is_err());
        assert!(apply_setting(&mut config, "remote.timeout_secs", "soon").is_err());
    }
}
