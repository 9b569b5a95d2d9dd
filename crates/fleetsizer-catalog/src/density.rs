//! Unit-density table.
//!
//! A public text file of `<instance-type> <max-units>` lines with
//! `#`-prefixed comments. Whitespace-normalized; anything else is a fatal
//! parse error naming the offending line.

use std::collections::HashMap;

use crate::error::{CatalogError, CatalogResult};

pub fn parse_density_table(text: &str) -> CatalogResult<HashMap<String, u32>> {
    let mut table = HashMap::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        match (fields.next(), fields.next(), fields.next()) {
            (Some(instance_type), Some(count), None) => {
                let count: u32 = count
                    .parse()
                    .map_err(|_| CatalogError::DensityLine(line.to_string()))?;
                table.insert(instance_type.to_string(), count);
            }
            _ => return Err(CatalogError::DensityLine(line.to_string())),
        }
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_entries_and_skips_comments() {
        let text = "\
# Mapping is calculated from AWS ENI documentation
m5.large 29
m5.xlarge 58

# trailing section
t3.micro 4
";
        let table = parse_density_table(text).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("m5.large"), Some(&29));
        assert_eq!(table.get("m5.xlarge"), Some(&58));
        assert_eq!(table.get("t3.micro"), Some(&4));
    }

    #[test]
    fn normalizes_interior_whitespace() {
        let table = parse_density_table("m5.large\t 29").unwrap();
        assert_eq!(table.get("m5.large"), Some(&29));
    }

    #[test]
    fn rejects_non_numeric_counts() {
        let err = parse_density_table("m5.large lots").unwrap_err();
        assert!(matches!(err, CatalogError::DensityLine(line) if line == "m5.large lots"));
    }

    #[test]
    fn rejects_extra_fields() {
        let err = parse_density_table("m5.large 29 extra").unwrap_err();
        assert!(matches!(err, CatalogError::DensityLine(_)));
    }

    #[test]
    fn rejects_missing_count() {
        assert!(parse_density_table("m5.large").is_err());
    }

    #[test]
    fn later_entries_win_on_duplicates() {
        let table = parse_density_table("m5.large 29\nm5.large 30").unwrap();
        assert_eq!(table.get("m5.large"), Some(&30));
    }
}
