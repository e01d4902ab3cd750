use itertools::Itertools;

use crate::error::ReorderError;
use crate::extract::ModelRow;

/// Line ending of the seed file.
pub const LINE_END: &str = "\r\n";

const HEADER: [&str; 4] = [
    "-- ===========================================",
    "-- MODELOS POR TIPO DE VEHÍCULO",
    "-- ===========================================",
    "",
];

const INSERT_HEAD: &str =
    "    INSERT INTO public.models (brand_id, name, vehicle_type_id, year_from, year_to) VALUES";
const INSERT_TAIL: &str = "    ON CONFLICT (brand_id, name) DO NOTHING;";

/// Vehicle types in display order. Grouping and output both follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOrder(Vec<String>);

impl CategoryOrder {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CategoryOrder(labels.into_iter().map(Into::into).collect())
    }

    pub fn labels(&self) -> &[String] {
        &self.0
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.0.iter().position(|l| l == label)
    }
}

impl Default for CategoryOrder {
    fn default() -> Self {
        CategoryOrder::new([
            "Auto",
            "SUV",
            "Pickup",
            "Van",
            "Moto",
            "Camión",
            "Bus",
            "Maquinaria",
            "Otro",
        ])
    }
}

/// Rows bucketed per category, each bucket sorted by (brand, model).
#[derive(Debug)]
pub struct Buckets<'a> {
    order: &'a CategoryOrder,
    buckets: Vec<Vec<ModelRow>>,
}

impl<'a> Buckets<'a> {
    /// Non-empty buckets in category order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ModelRow])> {
        self.order
            .labels()
            .iter()
            .zip(&self.buckets)
            .filter(|(_, rows)| !rows.is_empty())
            .map(|(label, rows)| (label.as_str(), rows.as_slice()))
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStats {
    pub label: String,
    pub models: usize,
    pub brands: usize,
}

/// Rows whose type is not in `order` are rejected rather than dropped.
pub fn group_rows(
    rows: Vec<ModelRow>,
    order: &CategoryOrder,
) -> Result<Buckets<'_>, ReorderError> {
    let mut buckets: Vec<Vec<ModelRow>> = vec![Vec::new(); order.labels().len()];
    for row in rows {
        let Some(idx) = order.position(&row.vehicle_type) else {
            return Err(ReorderError::UnknownVehicleType {
                brand: row.brand,
                model: row.model,
                vehicle_type: row.vehicle_type,
            });
        };
        buckets[idx].push(row);
    }
    for bucket in buckets.iter_mut() {
        // byte-wise, locale independent
        bucket.sort_by(|a, b| a.key().cmp(&b.key()));
    }
    Ok(Buckets { order, buckets })
}

pub fn category_stats(buckets: &Buckets<'_>) -> Vec<CategoryStats> {
    buckets
        .iter()
        .map(|(label, rows)| CategoryStats {
            label: label.to_string(),
            models: rows.len(),
            brands: rows.iter().map(|r| r.brand.as_str()).unique().count(),
        })
        .collect()
}

/// Double every single quote so the value is safe inside a SQL string literal.
pub fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

pub fn plural_label(label: &str) -> String {
    format!("{}s", label)
}

fn render_row(row: &ModelRow) -> String {
    format!(
        "        ((SELECT id FROM public.brands WHERE name = '{}'), '{}', (SELECT id FROM public.vehicle_types WHERE name = '{}' LIMIT 1), {}, {})",
        escape_literal(&row.brand),
        escape_literal(&row.model),
        row.vehicle_type,
        row.year_from,
        row.year_to,
    )
}

/// Render the replacement block wrapped in an anonymous plpgsql `DO` block.
/// Lines end with CRLF, including the last one.
pub fn render_block(buckets: &Buckets<'_>) -> String {
    let mut lines: Vec<String> = HEADER.iter().map(|l| l.to_string()).collect();
    lines.push("DO $$".to_string());
    lines.push("BEGIN".to_string());

    for (label, rows) in buckets.iter() {
        lines.push(format!("    -- {}", plural_label(label)));
        lines.push(INSERT_HEAD.to_string());
        let last = rows.len() - 1;
        for (i, row) in rows.iter().enumerate() {
            let sep = if i == last { "" } else { "," };
            lines.push(format!("{}{}", render_row(row), sep));
        }
        lines.push(INSERT_TAIL.to_string());
        lines.push(String::new());
    }

    lines.push("END;".to_string());
    lines.push("$$ LANGUAGE plpgsql;".to_string());
    lines.push(String::new());
    lines.join(LINE_END)
}
