//! Interactive selection of station, program and broadcasts

use anyhow::{Context, Result, bail};
use inquire::{Confirm, Text};
use radio_dl::{ProgramRef, Selection, StationKind};

/// Use the command-line value if given, otherwise ask
fn input(prompt: &str, arg: Option<&str>) -> Result<Selection> {
    match arg {
        Some(value) => Ok(Selection::parse(value)),
        None => {
            let answer = Text::new(prompt)
                .prompt()
                .with_context(|| format!("Failed to read answer to '{}'", prompt))?;
            Ok(Selection::parse(&answer))
        }
    }
}

/// Print a numbered list, starting at 1
pub fn print_numbered<I, T>(header: &str, items: I)
where
    I: IntoIterator<Item = T>,
    T: std::fmt::Display,
{
    println!("\n{}", header);
    for (i, item) in items.into_iter().enumerate() {
        println!("{}. {}", i + 1, item);
    }
    println!();
}

pub fn select_station(arg: Option<&str>) -> Result<StationKind> {
    print_numbered("The following stations are available:", StationKind::ALL);

    let kind = match input("Enter the number of the station", arg)? {
        Selection::Single(n) if n >= 1 => StationKind::ALL.get(n - 1).copied(),
        Selection::Name(name) => StationKind::from_name(&name),
        _ => bail!("Station must be a number or a station name."),
    };
    let Some(kind) = kind else {
        bail!("No such station.");
    };

    println!("{} chosen!", kind);
    Ok(kind)
}

pub fn select_program(arg: Option<&str>) -> Result<ProgramRef> {
    let selection = input("Enter the number or the name of the program", arg)?;
    Ok(selection.to_program_ref()?)
}

/// Zero-based indices of the chosen broadcasts
pub fn select_broadcasts(arg: Option<&str>, available: usize) -> Result<Vec<usize>> {
    let selection = input(
        "Enter a number, a range of broadcasts or '*' for all",
        arg,
    )?;
    Ok(selection.to_indices(available)?)
}

/// Ask before downloading; `true` means go ahead
pub fn confirm_download(indices: &[usize]) -> Result<bool> {
    let (Some(first), Some(last)) = (indices.first(), indices.last()) else {
        return Ok(false);
    };
    let message = format!(
        "Are you sure you want to download the following broadcasts: {} - {}?",
        first + 1,
        last + 1
    );
    Confirm::new(&message)
        .with_default(false)
        .prompt()
        .context("Failed to read confirmation")
}
