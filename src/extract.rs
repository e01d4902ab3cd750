use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::ReorderError;

/// One `((SELECT id FROM public.brands ...), '<model>', (SELECT id FROM public.vehicle_types ...), <from>, <to>)` tuple.
static ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\(\(SELECT id FROM public\.brands WHERE name = '([^']+)'\), ",
        r"'([^']+)', ",
        r"\(SELECT id FROM public\.vehicle_types WHERE name = '([^']+)'(?: LIMIT 1)?\), ",
        r"([^,)]+), ([^,)]+)\)",
    ))
    .unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRow {
    pub brand: String,
    pub model: String,
    pub vehicle_type: String,
    /// Numeric literal or `NULL`, kept verbatim.
    pub year_from: String,
    pub year_to: String,
}

impl ModelRow {
    pub fn key(&self) -> (&str, &str) {
        (&self.brand, &self.model)
    }
}

fn parse_row(caps: regex::Captures<'_>) -> ModelRow {
    ModelRow {
        brand: caps[1].to_string(),
        model: caps[2].to_string(),
        vehicle_type: caps[3].to_string(),
        year_from: caps[4].trim().to_string(),
        year_to: caps[5].trim().to_string(),
    }
}

/// Lazily drop any row whose (brand, model) was already yielded.
pub fn first_occurrences<I>(rows: I) -> impl Iterator<Item = ModelRow>
where
    I: Iterator<Item = ModelRow>,
{
    let mut seen: HashSet<(String, String)> = HashSet::new();
    rows.filter(move |row| seen.insert((row.brand.clone(), row.model.clone())))
}

#[derive(Debug)]
pub struct Extracted {
    pub rows: Vec<ModelRow>,
    pub duplicates: usize,
}

pub fn collect_rows(sql: &str) -> Result<Extracted, ReorderError> {
    let mut matched = 0usize;
    let rows: Vec<ModelRow> = first_occurrences(
        ROW_RE
            .captures_iter(sql)
            .map(parse_row)
            .inspect(|_| matched += 1),
    )
    .collect();
    if rows.is_empty() {
        return Err(ReorderError::NoRowsFound);
    }
    let duplicates = matched - rows.len();
    debug!(matched, kept = rows.len(), duplicates, "scanned model rows");
    Ok(Extracted { rows, duplicates })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuple(brand: &str, model: &str, vtype: &str, from: &str, to: &str) -> String {
        format!(
            "((SELECT id FROM public.brands WHERE name = '{}'), '{}', (SELECT id FROM public.vehicle_types WHERE name = '{}' LIMIT 1), {}, {})",
            brand, model, vtype, from, to
        )
    }

    #[test]
    fn extracts_all_fields() {
        let sql = format!("INSERT INTO public.models VALUES\n    {};", tuple("Toyota", "Corolla", "Auto", "1966", "NULL"));
        let rows = collect_rows(&sql).unwrap().rows;
        assert_eq!(
            rows,
            vec![ModelRow {
                brand: "Toyota".into(),
                model: "Corolla".into(),
                vehicle_type: "Auto".into(),
                year_from: "1966".into(),
                year_to: "NULL".into(),
            }]
        );
    }

    #[test]
    fn limit_clause_is_optional() {
        let sql = "((SELECT id FROM public.brands WHERE name = 'Honda'), 'CB500', (SELECT id FROM public.vehicle_types WHERE name = 'Moto'), 2013, 2020)";
        let rows = collect_rows(sql).unwrap().rows;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].vehicle_type, "Moto");
        assert_eq!(rows[0].year_to, "2020");
    }

    #[test]
    fn year_tokens_are_trimmed() {
        let sql = "((SELECT id FROM public.brands WHERE name = 'Kia'), 'Rio', (SELECT id FROM public.vehicle_types WHERE name = 'Auto' LIMIT 1),  2000 ,  NULL )";
        let rows = collect_rows(sql).unwrap().rows;
        assert_eq!(rows[0].year_from, "2000");
        assert_eq!(rows[0].year_to, "NULL");
    }

    #[test]
    fn keeps_first_occurrence_of_duplicates() {
        let sql = [
            tuple("Toyota", "Hilux", "Pickup", "1968", "NULL"),
            tuple("Ford", "Ranger", "Pickup", "1983", "NULL"),
            tuple("Toyota", "Hilux", "Auto", "1999", "2005"),
            tuple("Ford", "Ranger", "Pickup", "1983", "NULL"),
            tuple("Chevrolet", "Spark", "Auto", "1998", "NULL"),
        ]
        .join(",\n");

        let extracted = collect_rows(&sql).unwrap();
        assert_eq!(extracted.duplicates, 2);
        let keys: Vec<_> = extracted.rows.iter().map(|r| r.key()).collect();
        assert_eq!(
            keys,
            vec![("Toyota", "Hilux"), ("Ford", "Ranger"), ("Chevrolet", "Spark")]
        );
        assert_eq!(extracted.rows[0].vehicle_type, "Pickup");
    }

    #[test]
    fn same_model_under_different_brands_is_kept() {
        let sql = [
            tuple("Fiat", "500", "Auto", "2007", "NULL"),
            tuple("Abarth", "500", "Auto", "2008", "NULL"),
        ]
        .join(", ");
        assert_eq!(collect_rows(&sql).unwrap().rows.len(), 2);
    }

    #[test]
    fn dedup_is_lazy() {
        let endless = (0..).map(|i| ModelRow {
            brand: "Fiat".into(),
            model: format!("Uno {}", i % 3),
            vehicle_type: "Auto".into(),
            year_from: "1983".into(),
            year_to: "NULL".into(),
        });
        let models: Vec<_> = first_occurrences(endless).take(3).map(|r| r.model).collect();
        assert_eq!(models, vec!["Uno 0", "Uno 1", "Uno 2"]);
    }

    #[test]
    fn no_rows_is_an_error() {
        let sql = "INSERT INTO public.brands (name, active) VALUES ('Toyota', true);";
        assert_eq!(collect_rows(sql).unwrap_err(), ReorderError::NoRowsFound);
    }
}
