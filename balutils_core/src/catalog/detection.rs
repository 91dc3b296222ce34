use std::collections::HashMap;
use std::path::PathBuf;

use crate::catalog::{BAL_ID, Catalog, GoldSelector, GoldVariant};
use crate::error::{CatalogError, Result};
use crate::source::ColumnarReader;
use crate::table::join::{JoinKey, join_keys};

/// Outcome of the duplicate-identifier repair run at load time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateReport {
    /// Identifiers seen more than once, in order of first appearance
    pub duplicate_ids: Vec<String>,
    /// Rows beyond the first per identifier before the repair
    pub surplus_rows: usize,
    pub removed: usize,
    pub final_rows: usize,
}

impl DuplicateReport {
    pub fn is_clean(&self) -> bool {
        self.duplicate_ids.is_empty()
    }
}

/// Detection-stage catalog: a flat table with gold cuts and `bal_id` repair
#[derive(Debug, Clone)]
pub struct DetectionCatalog {
    catalog: Catalog,
    gold: GoldSelector,
    duplicates: DuplicateReport,
}

impl DetectionCatalog {
    pub fn load<R>(
        reader: &R,
        source: impl Into<PathBuf>,
        columns: Option<Vec<String>>,
        variant: GoldVariant,
    ) -> Result<Self>
    where
        R: ColumnarReader + ?Sized,
    {
        let catalog = Catalog::load_columnar(reader, source, columns)?;
        Self::from_catalog(catalog, variant)
    }

    /// Wraps an already loaded catalog, repairing duplicates first
    pub fn from_catalog(mut catalog: Catalog, variant: GoldVariant) -> Result<Self> {
        let duplicates = repair_duplicates(&mut catalog)?;
        Ok(Self {
            catalog,
            gold: GoldSelector::new(variant),
            duplicates,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }

    pub fn row_count(&self) -> usize {
        self.catalog.row_count()
    }

    pub fn duplicates(&self) -> &DuplicateReport {
        &self.duplicates
    }

    pub fn gold(&self) -> &GoldSelector {
        &self.gold
    }

    pub fn set_gold_variant(&mut self, match_type: &str) -> Result<()> {
        self.gold.set_gold_variant(match_type)
    }

    pub fn apply_gold_cuts(&mut self) -> Result<()> {
        self.catalog.apply_policy(&self.gold)
    }
}

/// Removes the first row of every `bal_id` that occurs more than once.
///
/// Upstream stacks duplicate exactly one row per affected object, so after
/// the repair every identifier must be unique. Any identifier with two or more
/// surplus rows fails the integrity check and the catalog is left untouched.
pub fn repair_duplicates(catalog: &mut Catalog) -> Result<DuplicateReport> {
    catalog.check_columns_present(&[BAL_ID])?;
    let ids = join_keys(BAL_ID, catalog.get_column(BAL_ID)?)?;
    let before = ids.len();

    // (first position, occurrences) per identifier, plus first-seen order
    let mut groups: HashMap<Option<&JoinKey>, (usize, usize)> = HashMap::new();
    let mut order: Vec<Option<&JoinKey>> = Vec::new();
    for (pos, id) in ids.iter().enumerate() {
        let key = id.as_ref();
        groups
            .entry(key)
            .and_modify(|(_, count)| *count += 1)
            .or_insert_with(|| {
                order.push(key);
                (pos, 1)
            });
    }

    let distinct = groups.len();
    if distinct == before {
        return Ok(DuplicateReport {
            final_rows: before,
            ..DuplicateReport::default()
        });
    }

    let surplus_rows = before - distinct;
    let duplicated: Vec<(Option<&JoinKey>, usize, usize)> = order
        .iter()
        .filter_map(|k| {
            let (first, count) = groups[k];
            (count > 1).then_some((*k, first, count))
        })
        .collect();
    let duplicate_ids: Vec<String> = duplicated
        .iter()
        .map(|(k, _, _)| render_id(*k))
        .collect();
    tracing::warn!(
        source = %catalog.source().display(),
        surplus_rows,
        ids = ?duplicate_ids,
        "detection catalog has duplicate bal_id values; removing them"
    );

    let positions: Vec<usize> = duplicated.iter().map(|(_, first, _)| *first).collect();
    let repaired = catalog.table().remove_rows(&positions)?;
    let expected = before - surplus_rows;
    if repaired.num_rows() != expected {
        let over: Vec<String> = duplicated
            .iter()
            .filter(|(_, _, count)| *count > 2)
            .map(|(k, _, _)| render_id(*k))
            .collect();
        return Err(CatalogError::DuplicateRepairIntegrity {
            expected,
            actual: repaired.num_rows(),
            duplicate_ids: over,
        });
    }

    let removed = positions.len();
    catalog.replace_table(repaired);
    tracing::info!(
        removed,
        rows = catalog.row_count(),
        "duplicates removed from detection catalog"
    );

    Ok(DuplicateReport {
        duplicate_ids,
        surplus_rows,
        removed,
        final_rows: catalog.row_count(),
    })
}

fn render_id(id: Option<&JoinKey>) -> String {
    id.map_or_else(|| "null".to_string(), ToString::to_string)
}
