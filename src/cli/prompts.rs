//! Interactive driver for the booking wizard.
//!
//! Each step collects its fields with the current draft values pre-filled,
//! then offers to continue, go back or cancel. Leaving a step goes through
//! [`BookingWizard::advance`], so the validation rules are the core's.

use chrono::{Duration, Local, NaiveDateTime};
use dialoguer::theme::ColorfulTheme;

use crate::cli::{error::CliError, io, output};
use crate::core::{BookingWizard, WizardStep};
use crate::domain::{parse_instant, RentType, DATE_FORMAT, TIME_FORMAT};

/// How a wizard run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardOutcome {
    Submit,
    Cancelled,
}

enum StepAction {
    Next,
    Back,
    Cancel,
}

/// Runs the wizard until the user submits on the final step or cancels.
pub fn run_wizard(
    wizard: &mut BookingWizard,
    theme: &ColorfulTheme,
    currency: &str,
) -> Result<WizardOutcome, CliError> {
    loop {
        let step = wizard.step();
        output::section(format!(
            "Step {}/{}: {}",
            wizard.ordinal(),
            wizard.total_steps(),
            step
        ));
        collect_step(wizard, theme, currency)?;

        match choose_action(wizard, theme)? {
            StepAction::Cancel => return Ok(WizardOutcome::Cancelled),
            StepAction::Back => {
                wizard.retreat();
            }
            StepAction::Next if wizard.is_last() => {
                match wizard.validate_current().into_result(step) {
                    Ok(()) => return Ok(WizardOutcome::Submit),
                    Err(err) => report_fields(&err.fields),
                }
            }
            StepAction::Next => {
                if let Err(err) = wizard.advance() {
                    report_fields(&err.fields);
                }
            }
        }
    }
}

fn report_fields(fields: &crate::core::FieldErrors) {
    for (field, message) in fields.iter() {
        io::print_error(format!("{field}: {message}"));
    }
}

fn choose_action(wizard: &BookingWizard, theme: &ColorfulTheme) -> Result<StepAction, CliError> {
    let next = if wizard.is_last() { "Submit" } else { "Next" };
    let mut items = vec![next];
    if !wizard.is_first() {
        items.push("Back");
    }
    items.push("Cancel");
    let choice = io::select(theme, "Continue", &items, 0)?;
    Ok(match items[choice] {
        "Back" => StepAction::Back,
        "Cancel" => StepAction::Cancel,
        _ => StepAction::Next,
    })
}

fn collect_step(
    wizard: &mut BookingWizard,
    theme: &ColorfulTheme,
    currency: &str,
) -> Result<(), CliError> {
    match wizard.step() {
        WizardStep::Client => collect_client(wizard, theme),
        WizardStep::Vehicle => collect_vehicle(wizard, theme),
        WizardStep::Condition => collect_condition(wizard, theme),
        WizardStep::Period => collect_period(wizard, theme),
        WizardStep::Witness => collect_witness(wizard, theme),
        WizardStep::Payment => collect_payment(wizard, theme, currency),
        WizardStep::Agreement => collect_agreement(wizard, theme, currency),
    }
}

fn collect_client(wizard: &mut BookingWizard, theme: &ColorfulTheme) -> Result<(), CliError> {
    let mut client = wizard.draft().client.clone();
    client.full_name = io::prompt_text(theme, "Full name", &client.full_name)?;
    client.national_id = io::prompt_text(theme, "CNIC (12345-1234567-1)", &client.national_id)?;
    client.phone = io::prompt_text(theme, "Phone", &client.phone)?;
    client.address = io::prompt_text(theme, "Address", &client.address)?;
    client.photo = io::prompt_image(theme, "Photo", client.photo.as_ref())?;
    client.cnic_front_image = io::prompt_image(theme, "CNIC front", client.cnic_front_image.as_ref())?;
    client.cnic_back_image = io::prompt_image(theme, "CNIC back", client.cnic_back_image.as_ref())?;
    client.driving_license_image = io::prompt_image(
        theme,
        "Driving license",
        client.driving_license_image.as_ref(),
    )?;
    wizard.update_client(|draft| *draft = client);
    Ok(())
}

fn collect_vehicle(wizard: &mut BookingWizard, theme: &ColorfulTheme) -> Result<(), CliError> {
    let mut vehicle = wizard.draft().vehicle.clone();
    vehicle.brand = io::prompt_text(theme, "Brand", &vehicle.brand)?;
    vehicle.model = io::prompt_text(theme, "Model", &vehicle.model)?;
    vehicle.year = io::prompt_text(theme, "Year", &vehicle.year)?;
    vehicle.color = io::prompt_text(theme, "Color", &vehicle.color)?;
    vehicle.car_number = io::prompt_text(theme, "Registration number", &vehicle.car_number)?;
    vehicle.image = io::prompt_image(theme, "Vehicle photo", vehicle.image.as_ref())?;
    wizard.update_vehicle(|draft| *draft = vehicle);
    Ok(())
}

fn collect_condition(wizard: &mut BookingWizard, theme: &ColorfulTheme) -> Result<(), CliError> {
    let mut condition = wizard.draft().vehicle_condition.clone();
    let items: Vec<(String, bool)> = condition
        .items
        .iter()
        .map(|(name, ok)| (name.clone(), *ok))
        .collect();
    let chosen = io::multi_select(theme, "Items in good order", &items)?;
    for (index, (name, _)) in items.iter().enumerate() {
        condition.set(name.clone(), chosen.contains(&index));
    }
    condition.fuel_level = io::prompt_text(theme, "Fuel level", &condition.fuel_level)?;
    condition.odometer = io::prompt_text(theme, "Odometer", &condition.odometer)?;
    condition.notes = io::prompt_text(theme, "Condition notes", &condition.notes)?;
    wizard.update_condition(|draft| *draft = condition);

    let accessories: Vec<(String, bool)> = wizard
        .draft()
        .accessories
        .0
        .iter()
        .map(|(name, present)| (name.clone(), *present))
        .collect();
    let chosen = io::multi_select(theme, "Accessories handed over", &accessories)?;
    wizard.update_accessories(|draft| {
        for (index, (name, _)) in accessories.iter().enumerate() {
            draft.set(name.clone(), chosen.contains(&index));
        }
    });

    let mut damage = wizard.draft().dents_scratches.clone();
    damage.has_damage = io::confirm_action(theme, "Any dents or scratches?", damage.has_damage)?;
    if damage.has_damage {
        damage.description = io::prompt_text(theme, "Describe the damage", &damage.description)?;
        if let Some(image) = io::prompt_image(theme, "Add a damage photo", None)? {
            damage.images.push(image);
        }
    }
    wizard.update_damage(|draft| *draft = damage);
    Ok(())
}

fn prompt_instant(
    theme: &ColorfulTheme,
    label: &str,
    date: &str,
    time: &str,
    fallback: NaiveDateTime,
) -> Result<NaiveDateTime, CliError> {
    loop {
        let default_date = if date.is_empty() {
            fallback.format(DATE_FORMAT).to_string()
        } else {
            date.to_string()
        };
        let default_time = if time.is_empty() {
            fallback.format(TIME_FORMAT).to_string()
        } else {
            time.to_string()
        };
        let date = io::prompt_text(theme, &format!("{label} date (YYYY-MM-DD)"), &default_date)?;
        let time = io::prompt_text(theme, &format!("{label} time (HH:MM)"), &default_time)?;
        match parse_instant(&date, &time) {
            Some(instant) => return Ok(instant),
            None => io::print_error("Use YYYY-MM-DD and 24-hour HH:MM"),
        }
    }
}

fn collect_period(wizard: &mut BookingWizard, theme: &ColorfulTheme) -> Result<(), CliError> {
    let period = wizard.draft().period.clone();
    let now = Local::now().naive_local();
    let delivered = prompt_instant(
        theme,
        "Delivery",
        &period.delivery_date,
        &period.delivery_time,
        now,
    )?;
    wizard.set_delivery(delivered);
    let returned = prompt_instant(
        theme,
        "Return",
        &period.return_date,
        &period.return_time,
        delivered + Duration::days(1),
    )?;
    wizard.set_return(returned);

    let current = RentType::ALL
        .iter()
        .position(|kind| *kind == period.rent_type)
        .unwrap_or(1);
    let choice = io::select(theme, "Rent type", &RentType::ALL, current)?;
    let rent_type = RentType::ALL[choice];
    wizard.set_rent_type(rent_type);
    if rent_type == RentType::Custom {
        let days = io::prompt_count(theme, "Billed days", period.custom_days)?;
        wizard.set_custom_days(days);
    }

    let rate = wizard
        .draft()
        .pricing
        .effective_rate(wizard.draft().vehicle.daily_rate);
    let rate = io::prompt_amount(theme, "Price per day", rate)?;
    wizard.set_per_day_price(rate);
    Ok(())
}

fn collect_witness(wizard: &mut BookingWizard, theme: &ColorfulTheme) -> Result<(), CliError> {
    let mut witness = wizard.draft().witness.clone();
    witness.name = io::prompt_text(theme, "Witness name", &witness.name)?;
    witness.national_id = io::prompt_text(theme, "Witness CNIC", &witness.national_id)?;
    witness.phone = io::prompt_text(theme, "Witness phone", &witness.phone)?;
    witness.address = io::prompt_text(theme, "Witness address", &witness.address)?;
    wizard.update_witness(|draft| *draft = witness);
    Ok(())
}

fn collect_payment(
    wizard: &mut BookingWizard,
    theme: &ColorfulTheme,
    currency: &str,
) -> Result<(), CliError> {
    let pricing = wizard.draft().pricing.clone();
    io::print_info(format!(
        "Calculated total: {}",
        output::money(pricing.total(), currency)
    ));
    let total = io::prompt_amount(theme, "Total amount", pricing.total())?;
    if total != pricing.total() {
        wizard.override_total(total);
    }
    let advance = io::prompt_amount(theme, "Advance payment", pricing.advance())?;
    if advance != pricing.advance() {
        wizard.set_advance(advance);
    }
    let pricing = &wizard.draft().pricing;
    io::print_info(format!(
        "Balance: {} ({})",
        output::money(pricing.balance(), currency),
        pricing.status()
    ));
    Ok(())
}

fn collect_agreement(
    wizard: &mut BookingWizard,
    theme: &ColorfulTheme,
    currency: &str,
) -> Result<(), CliError> {
    for line in output::rental_detail(wizard.draft(), currency) {
        println!("{line}");
    }
    let notes = io::prompt_text(theme, "Notes", &wizard.draft().notes)?;
    wizard.set_notes(notes);
    let signatures = wizard.draft().signatures.clone();
    let client = io::prompt_image(theme, "Client signature", signatures.client.as_ref())?;
    let owner = io::prompt_image(theme, "Owner signature", signatures.owner.as_ref())?;
    wizard.set_signatures(client, owner);
    Ok(())
}
