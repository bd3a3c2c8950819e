//! Selecting which of a project's years to report on.
use anyhow::{Context, Result, bail, ensure};
use std::collections::BTreeSet;

/// Parse a year from a string
fn parse_year(s: &str) -> Result<u32> {
    s.trim()
        .parse()
        .ok()
        .with_context(|| format!("Invalid year: {}", s.trim()))
}

/// Select the project years within an inclusive range, where either bound may be omitted
fn select_range(start: &str, end: &str, project_years: &[u32]) -> Result<Vec<u32>> {
    let start = if start.trim().is_empty() {
        u32::MIN
    } else {
        parse_year(start)?
    };
    let end = if end.trim().is_empty() {
        u32::MAX
    } else {
        parse_year(end)?
    };
    ensure!(start <= end, "Year range {start}..{end} is empty");

    let years: Vec<_> = project_years
        .iter()
        .copied()
        .filter(|year| (start..=end).contains(year))
        .collect();
    ensure!(
        !years.is_empty(),
        "No project years in range {start}..{end}"
    );

    Ok(years)
}

/// Parse a selection of project years from a string.
///
/// The selection is either `all` (case-insensitive) or a comma- or semicolon-separated list of
/// items, each of which is a single year (e.g. `2030`) or an inclusive range (e.g. `2030..2050`,
/// `2040..` or `..2040`). Every single year must be one of the project's years.
///
/// # Returns
///
/// The selected years, sorted and without duplicates.
pub fn parse_year_str(s: &str, project_years: &[u32]) -> Result<Vec<u32>> {
    let s = s.trim();
    ensure!(!s.is_empty(), "No years provided");

    if s.eq_ignore_ascii_case("all") {
        return Ok(project_years.to_vec());
    }

    let mut years = BTreeSet::new();
    for item in s.split([',', ';']) {
        match item.split("..").collect::<Vec<_>>()[..] {
            [year] => {
                let year = parse_year(year)?;
                ensure!(
                    project_years.contains(&year),
                    "Year {year} is not one of the project's years"
                );
                years.insert(year);
            }
            [start, end] => years.extend(select_range(start, end, project_years)?),
            _ => bail!("Invalid year range: {}", item.trim()),
        }
    }

    Ok(years.into_iter().collect())
}
