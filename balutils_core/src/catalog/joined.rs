use std::path::{Path, PathBuf};

use crate::catalog::{
    BAL_ID, Catalog, DetectionCatalog, DuplicateReport, GoldSelector, ShapeCatalog,
};
use crate::config::JoinOptions;
use crate::error::Result;
use crate::source::{ColumnarReader, StoreOpener};
use crate::table::{Table, left_join};

/// Shape-measurement catalog left-joined onto its detection catalog by `bal_id`.
///
/// Every shape row survives the join; shape rows without a detection match
/// carry nulls in the detection columns. No cut is applied automatically.
#[derive(Debug, Clone)]
pub struct JoinedCatalog {
    catalog: Catalog,
    gold: GoldSelector,
    detection_source: PathBuf,
    duplicates: DuplicateReport,
    shape: Option<Table>,
    detection: Option<Table>,
}

impl JoinedCatalog {
    pub fn load<R, O>(options: &JoinOptions, reader: &R, opener: &O) -> Result<Self>
    where
        R: ColumnarReader + ?Sized,
        O: StoreOpener + ?Sized,
    {
        // Reject a bad match type before touching any source.
        let gold = GoldSelector::from_match_type(&options.match_type)?;

        tracing::info!(source = %options.shape_source.display(), "loading shape catalog");
        let shape = ShapeCatalog::load(
            opener,
            &options.shape_source,
            options.shape_path.as_str(),
            options.shape_columns.clone(),
        )?;
        let shape_table = shape.close()?.into_table();

        tracing::info!(source = %options.detection_source.display(), "loading detection catalog");
        let detection = DetectionCatalog::load(
            reader,
            &options.detection_source,
            options.detection_columns.clone(),
            gold.variant(),
        )?;
        let duplicates = detection.duplicates().clone();
        let detection_table = detection.into_catalog().into_table();

        tracing::info!("joining catalogs");
        let joined = left_join(&shape_table, &detection_table, BAL_ID)?;
        tracing::info!(
            rows = joined.num_rows(),
            columns = joined.num_columns(),
            "joined shape and detection catalogs"
        );

        let (shape, detection) = if options.save_all {
            (Some(shape_table), Some(detection_table))
        } else {
            (None, None)
        };

        Ok(Self {
            catalog: Catalog::new(&options.shape_source, None, joined),
            gold,
            detection_source: options.detection_source.clone(),
            duplicates,
            shape,
            detection,
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

    pub fn shape_source(&self) -> &Path {
        self.catalog.source()
    }

    pub fn detection_source(&self) -> &Path {
        &self.detection_source
    }

    /// Duplicate repair performed on the detection side
    pub fn duplicates(&self) -> &DuplicateReport {
        &self.duplicates
    }

    /// Pre-join shape table, kept only with `save_all`
    pub fn shape_table(&self) -> Option<&Table> {
        self.shape.as_ref()
    }

    /// Pre-join detection table, kept only with `save_all`
    pub fn detection_table(&self) -> Option<&Table> {
        self.detection.as_ref()
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
