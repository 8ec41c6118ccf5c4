//! Column name canonicalization.

/// Normalizes a raw column name into the comparison key used throughout
/// mapping resolution.
///
/// Lowercases, strips a UTF-8 BOM and surrounding whitespace, and collapses
/// runs of whitespace, hyphens, and underscores into a single underscore.
/// Total function: every input, including the empty string, normalizes.
pub fn normalize_column(raw: &str) -> String {
    raw.trim_matches('\u{feff}')
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_trims() {
        assert_eq!(normalize_column("  Loaner_ID  "), "loaner_id");
    }

    #[test]
    fn collapses_separator_runs() {
        assert_eq!(normalize_column("loan   amount"), "loan_amount");
        assert_eq!(normalize_column("loan--amount"), "loan_amount");
        assert_eq!(normalize_column("loan _- amount"), "loan_amount");
        assert_eq!(normalize_column("_total__land_"), "total_land");
    }

    #[test]
    fn strips_bom() {
        assert_eq!(normalize_column("\u{feff}Year"), "year");
    }

    #[test]
    fn total_on_degenerate_input() {
        assert_eq!(normalize_column(""), "");
        assert_eq!(normalize_column("  -_- "), "");
    }

    #[test]
    fn distinct_surface_forms_collide() {
        assert_eq!(
            normalize_column("Loan Amount"),
            normalize_column("loan_amount")
        );
    }
}
