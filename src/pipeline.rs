use tracing::{debug, info};

use crate::error::ReorderError;
use crate::extract::collect_rows;
use crate::render::{category_stats, group_rows, render_block, CategoryOrder, CategoryStats};
use crate::splice::{locate_block, splice, Markers};

#[derive(Debug)]
pub struct Reordered {
    pub sql: String,
    pub rows: usize,
    pub duplicates: usize,
    pub stats: Vec<CategoryStats>,
}

/// extract -> group -> render -> splice. Nothing is returned unless every stage succeeds.
pub fn reorder(
    sql: &str,
    order: &CategoryOrder,
    markers: &Markers,
    scoped: bool,
) -> Result<Reordered, ReorderError> {
    let scan = if scoped {
        let (start, end) = locate_block(sql, markers)?;
        debug!(start, end, "scanning only the model block");
        &sql[start..end]
    } else {
        sql
    };

    let extracted = collect_rows(scan)?;
    let rows = extracted.rows.len();
    info!(rows, duplicates = extracted.duplicates, "extracted model rows");

    let buckets = group_rows(extracted.rows, order)?;
    debug!(bucketed = buckets.total(), "grouped rows by vehicle type");
    let stats = category_stats(&buckets);
    for s in &stats {
        info!(category = %s.label, models = s.models, brands = s.brands, "grouped");
    }

    let block = render_block(&buckets);
    let sql = splice(sql, markers, &block)?;
    Ok(Reordered {
        sql,
        rows,
        duplicates: extracted.duplicates,
        stats,
    })
}
