//! Document naming rules for accounts and companies.

use rand::Rng;

use super::error::ChartError;

/// Length of generated company abbreviations.
pub const ABBR_LEN: usize = 3;

/// Builds an account document name: `"<number> - <account_name> - <abbr>"`.
///
/// The number segment is omitted when absent or blank.
#[must_use]
pub fn account_document_name(number: Option<&str>, account_name: &str, abbr: &str) -> String {
    let account_name = account_name.trim();
    match number.map(str::trim).filter(|n| !n.is_empty()) {
        Some(number) => format!("{number} - {account_name} - {abbr}"),
        None => format!("{account_name} - {abbr}"),
    }
}

/// Checks a chart name that will become an export file name; returns it trimmed.
///
/// Blank names, path separators, `..` and control characters are rejected.
///
/// # Errors
///
/// Returns `InvalidChartName` for any of the above.
pub fn validate_chart_name(name: &str) -> Result<&str, ChartError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed.contains(['/', '\\'])
        || trimmed.contains("..")
        || trimmed.chars().any(char::is_control)
    {
        return Err(ChartError::InvalidChartName(name.to_string()));
    }
    Ok(trimmed)
}

/// Returns `base` if unused, otherwise `"<base>-N"` with N one above the
/// highest numeric suffix already taken.
///
/// `existing` holds names equal to `base` or starting with `"<base>-"`.
#[must_use]
pub fn numbered_name<S: AsRef<str>>(base: &str, existing: &[S]) -> String {
    if !existing.iter().any(|n| n.as_ref() == base) {
        return base.to_string();
    }

    let prefix = format!("{base}-");
    let highest = existing
        .iter()
        .filter_map(|n| n.as_ref().strip_prefix(&prefix))
        .filter_map(|suffix| suffix.parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    format!("{base}-{}", highest + 1)
}

/// Generates a random alphanumeric company abbreviation.
#[must_use]
pub fn random_abbr() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(ABBR_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("1100"), "Cash", "AC", "1100 - Cash - AC")]
    #[case(None, "Cash", "AC", "Cash - AC")]
    #[case(Some(""), "Cash", "AC", "Cash - AC")]
    #[case(Some("  "), " Cash ", "AC", "Cash - AC")]
    fn test_account_document_name(
        #[case] number: Option<&str>,
        #[case] name: &str,
        #[case] abbr: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(account_document_name(number, name, abbr), expected);
    }

    #[rstest]
    #[case(&[], "Acme")]
    #[case(&["Acme-1"], "Acme")]
    #[case(&["Acme"], "Acme-1")]
    #[case(&["Acme", "Acme-1", "Acme-4"], "Acme-5")]
    #[case(&["Acme", "Acme-x"], "Acme-1")]
    fn test_numbered_name(#[case] existing: &[&str], #[case] expected: &str) {
        assert_eq!(numbered_name("Acme", existing), expected);
    }

    #[rstest]
    #[case("India Basic", Ok("India Basic"))]
    #[case("  Acme Standard ", Ok("Acme Standard"))]
    #[case("Plan v1.2", Ok("Plan v1.2"))]
    #[case("", Err(()))]
    #[case("   ", Err(()))]
    #[case("../../../escaped", Err(()))]
    #[case("India/Basic", Err(()))]
    #[case("India\\Basic", Err(()))]
    #[case("..", Err(()))]
    #[case("tab\there", Err(()))]
    fn test_validate_chart_name(#[case] name: &str, #[case] expected: Result<&str, ()>) {
        match (validate_chart_name(name), expected) {
            (Ok(got), Ok(want)) => assert_eq!(got, want),
            (Err(ChartError::InvalidChartName(got)), Err(())) => assert_eq!(got, name),
            (got, want) => panic!("{name:?}: got {got:?}, expected {want:?}"),
        }
    }

    #[test]
    fn test_random_abbr_shape() {
        let abbr = random_abbr();
        assert_eq!(abbr.len(), ABBR_LEN);
        assert!(abbr.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
