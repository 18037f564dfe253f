use std::{fmt, fs, path::Path};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Select};

use crate::cli::{error::CliError, output};
use crate::domain::ImageRef;

pub fn print_info(message: impl fmt::Display) {
    output::info(message);
}

pub fn print_warning(message: impl fmt::Display) {
    output::warning(message);
}

pub fn print_error(message: impl fmt::Display) {
    output::error(message);
}

pub fn print_success(message: impl fmt::Display) {
    output::success(message);
}

/// Prompt the user for confirmation with a yes/no question.
pub fn confirm_action(theme: &ColorfulTheme, prompt: &str, default: bool) -> Result<bool, CliError> {
    Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(CliError::from)
}

/// Free-form text, pre-filled with `current`. Empty answers are allowed.
pub fn prompt_text(theme: &ColorfulTheme, prompt: &str, current: &str) -> Result<String, CliError> {
    Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()
        .map(|value| value.trim().to_string())
        .map_err(CliError::from)
}

/// Non-negative amount, defaulting to `current`.
pub fn prompt_amount(theme: &ColorfulTheme, prompt: &str, current: f64) -> Result<f64, CliError> {
    Input::<f64>::with_theme(theme)
        .with_prompt(prompt)
        .default(current)
        .validate_with(|value: &f64| -> Result<(), &str> {
            if value.is_finite() && *value >= 0.0 {
                Ok(())
            } else {
                Err("Enter an amount of zero or more")
            }
        })
        .interact_text()
        .map_err(CliError::from)
}

pub fn prompt_count(theme: &ColorfulTheme, prompt: &str, current: u32) -> Result<u32, CliError> {
    Input::<u32>::with_theme(theme)
        .with_prompt(prompt)
        .default(current)
        .interact_text()
        .map_err(CliError::from)
}

pub fn select<T: ToString>(
    theme: &ColorfulTheme,
    prompt: &str,
    items: &[T],
    default: usize,
) -> Result<usize, CliError> {
    Select::with_theme(theme)
        .with_prompt(prompt)
        .items(items)
        .default(default)
        .interact()
        .map_err(CliError::from)
}

pub fn multi_select(
    theme: &ColorfulTheme,
    prompt: &str,
    items: &[(String, bool)],
) -> Result<Vec<usize>, CliError> {
    MultiSelect::with_theme(theme)
        .with_prompt(prompt)
        .items_checked(items)
        .interact()
        .map_err(CliError::from)
}

/// Asks for an image file; blank keeps `current`, `-` clears it.
pub fn prompt_image(
    theme: &ColorfulTheme,
    prompt: &str,
    current: Option<&ImageRef>,
) -> Result<Option<ImageRef>, CliError> {
    let hint = match current {
        Some(image) if image.is_inline() => "attached",
        Some(_) => "uploaded",
        None => "none",
    };
    let answer = prompt_text(theme, &format!("{prompt} [{hint}] (path, blank keeps, - clears)"), "")?;
    match answer.as_str() {
        "" => Ok(current.cloned()),
        "-" => Ok(None),
        path => match read_image(Path::new(path)) {
            Ok(image) => Ok(Some(image)),
            Err(err) => {
                print_warning(format!("Could not read `{path}`: {err}"));
                Ok(current.cloned())
            }
        },
    }
}

/// Reads an image file into an inline `data:` reference.
pub fn read_image(path: &Path) -> Result<ImageRef, CliError> {
    let bytes = fs::read(path)?;
    let mime = match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => {
            return Err(CliError::InvalidArguments(
                "expected a .png, .jpg, .webp or .gif file".into(),
            ))
        }
    };
    Ok(ImageRef::new(format!(
        "data:{};base64,{}",
        mime,
        STANDARD.encode(bytes)
    )))
}
