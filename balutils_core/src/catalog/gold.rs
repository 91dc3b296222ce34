use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use arrow::array::BooleanArray;

use crate::catalog::{Catalog, CutPolicy};
use crate::error::{CatalogError, Result};
use crate::source::ColumnarReader;
use crate::table::{CompareOp, Table, all_of, compare};

pub const FLAGS_FOREGROUND: &str = "flags_foreground";
pub const FLAGS_BADREGIONS: &str = "flags_badregions";
pub const FLAGS_FOOTPRINT: &str = "flags_footprint";

/// Which measurement pipeline's gold flag is authoritative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GoldVariant {
    #[default]
    Default,
    MofOnly,
    SofOnly,
}

impl GoldVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            GoldVariant::Default => "default",
            GoldVariant::MofOnly => "mof_only",
            GoldVariant::SofOnly => "sof_only",
        }
    }

    pub fn flag_column(self) -> &'static str {
        match self {
            GoldVariant::Default => "meas_FLAGS_GOLD",
            GoldVariant::MofOnly => "meas_FLAGS_GOLD_MOF_ONLY",
            GoldVariant::SofOnly => "meas_FLAGS_GOLD_SOF_ONLY",
        }
    }
}

impl FromStr for GoldVariant {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "default" => Ok(GoldVariant::Default),
            "mof_only" => Ok(GoldVariant::MofOnly),
            "sof_only" => Ok(GoldVariant::SofOnly),
            other => Err(CatalogError::InvalidVariant(other.to_string())),
        }
    }
}

impl fmt::Display for GoldVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The survey's baseline quality selection:
/// `flags_foreground == 0 && flags_badregions < 2 && flags_footprint == 1 && <gold flag> < 2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GoldSelector {
    variant: GoldVariant,
}

impl GoldSelector {
    pub fn new(variant: GoldVariant) -> Self {
        Self { variant }
    }

    /// Parses a match type; unknown names fail before anything is loaded
    pub fn from_match_type(match_type: &str) -> Result<Self> {
        Ok(Self::new(match_type.parse()?))
    }

    pub fn variant(&self) -> GoldVariant {
        self.variant
    }

    pub fn set_gold_variant(&mut self, match_type: &str) -> Result<()> {
        self.variant = match_type.parse()?;
        Ok(())
    }

    pub fn gold_flag_column(&self) -> &'static str {
        self.variant.flag_column()
    }
}

impl CutPolicy for GoldSelector {
    fn name(&self) -> &str {
        "gold"
    }

    fn required_columns(&self) -> Vec<&str> {
        vec![
            FLAGS_FOREGROUND,
            FLAGS_BADREGIONS,
            FLAGS_FOOTPRINT,
            self.gold_flag_column(),
        ]
    }

    fn mask(&self, table: &Table) -> Result<BooleanArray> {
        all_of(&[
            compare(&table.float_column(FLAGS_FOREGROUND)?, CompareOp::Eq, 0.0),
            compare(&table.float_column(FLAGS_BADREGIONS)?, CompareOp::Lt, 2.0),
            compare(&table.float_column(FLAGS_FOOTPRINT)?, CompareOp::Eq, 1.0),
            compare(&table.float_column(self.gold_flag_column())?, CompareOp::Lt, 2.0),
        ])
    }
}

/// Flat columnar catalog with gold cuts and no duplicate repair
#[derive(Debug, Clone)]
pub struct GoldCatalog {
    catalog: Catalog,
    gold: GoldSelector,
}

impl GoldCatalog {
    pub fn load<R>(
        reader: &R,
        source: impl Into<PathBuf>,
        columns: Option<Vec<String>>,
        variant: GoldVariant,
    ) -> Result<Self>
    where
        R: ColumnarReader + ?Sized,
    {
        Ok(Self {
            catalog: Catalog::load_columnar(reader, source, columns)?,
            gold: GoldSelector::new(variant),
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
