//! Grouped legal reserve report.
//!
//! The report covers the most recent cut-off dates only. Records are streamed once:
//! every record appends its raw value to the `(date, category, subcategory)` bucket
//! and adds it to the running total of the same bucket. Categories and subcategories
//! keep the order in which they first appear.
use std::collections::HashMap;
use std::sync::Arc;

use axioma_repository::ReserveRepository;
use axioma_shared::{
    CategoryGroup, CategoryTotal, DateMap, ReserveEntry, ReserveReport, SubcategoryTotal,
    SubcategoryValues,
};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use tracing::{debug, info, instrument};

use crate::config::ReportConfig;
use crate::errors::EngineError;

/// Name reported for the legal reserve report.
pub const REPORT_NAME: &str = "encaje_legal";

/// Source reported when there are no records.
pub const UNKNOWN_SOURCE: &str = "N/A";

/// Builds the grouped legal reserve report.
pub struct ReserveReportEngine {
    repository: Arc<dyn ReserveRepository>,
    config: ReportConfig,
}

impl ReserveReportEngine {
    pub fn new(repository: Arc<dyn ReserveRepository>, config: ReportConfig) -> Self {
        Self { repository, config }
    }

    /// Returns the records of the most recent cut-off dates grouped by date,
    /// category and subcategory, together with the per-subcategory totals.
    ///
    /// # Returns
    ///
    /// * `Ok(ReserveReport)` - Empty with source `"N/A"` when the store has no records
    /// * `Err(EngineError::Repository)` - If either query fails; no partial report is returned
    #[instrument(skip(self), fields(date_window = self.config.date_window))]
    pub async fn grouped_report(&self) -> Result<ReserveReport, EngineError> {
        let dates = self
            .repository
            .recent_cutoff_dates(self.config.date_window)
            .await?;

        if dates.is_empty() {
            debug!("No reserve records found");
            return Ok(empty_report());
        }

        let entries = self.repository.entries_for_dates(&dates).await?;
        let report = build_report(&dates, entries);

        info!(dates = report.by_date.len(), source = %report.source, "Built reserve report");
        Ok(report)
    }
}

fn empty_report() -> ReserveReport {
    ReserveReport {
        source: UNKNOWN_SOURCE.to_string(),
        report_name: REPORT_NAME.to_string(),
        by_date: DateMap::new(),
        totals_by_date: DateMap::new(),
    }
}

/// Values and running total of one subcategory.
struct SubcategoryBucket {
    name: String,
    values: Vec<BigDecimal>,
    total: BigDecimal,
}

struct CategoryBucket {
    name: String,
    subcategories: Vec<SubcategoryBucket>,
    index: HashMap<String, usize>,
}

#[derive(Default)]
struct DateBucket {
    categories: Vec<CategoryBucket>,
    index: HashMap<String, usize>,
}

impl DateBucket {
    fn add(&mut self, entry: ReserveEntry) {
        let category_pos = match self.index.get(&entry.category) {
            Some(pos) => *pos,
            None => {
                self.categories.push(CategoryBucket {
                    name: entry.category.clone(),
                    subcategories: Vec::new(),
                    index: HashMap::new(),
                });
                let pos = self.categories.len() - 1;
                self.index.insert(entry.category, pos);
                pos
            }
        };
        let category = &mut self.categories[category_pos];

        let subcategory_pos = match category.index.get(&entry.subcategory) {
            Some(pos) => *pos,
            None => {
                category.subcategories.push(SubcategoryBucket {
                    name: entry.subcategory.clone(),
                    values: Vec::new(),
                    total: BigDecimal::from(0),
                });
                let pos = category.subcategories.len() - 1;
                category.index.insert(entry.subcategory, pos);
                pos
            }
        };
        let subcategory = &mut category.subcategories[subcategory_pos];

        subcategory.total += &entry.value;
        subcategory.values.push(entry.value);
    }

    fn into_groups(self) -> (Vec<CategoryGroup>, Vec<CategoryTotal>) {
        let mut groups = Vec::with_capacity(self.categories.len());
        let mut totals = Vec::with_capacity(self.categories.len());

        for category in self.categories {
            let mut values = Vec::with_capacity(category.subcategories.len());
            let mut sums = Vec::with_capacity(category.subcategories.len());
            for sub in category.subcategories {
                sums.push(SubcategoryTotal {
                    subcategory: sub.name.clone(),
                    total: sub.total,
                });
                values.push(SubcategoryValues {
                    subcategory: sub.name,
                    values: sub.values,
                });
            }
            groups.push(CategoryGroup {
                category: category.name.clone(),
                subcategories: values,
            });
            totals.push(CategoryTotal {
                category: category.name,
                subcategories: sums,
            });
        }

        (groups, totals)
    }
}

/// Groups `entries` in a single pass.
///
/// `dates` gives the output order (newest first). Dates without any entry are left
/// out of the report.
fn build_report(dates: &[NaiveDate], entries: Vec<ReserveEntry>) -> ReserveReport {
    let mut source: Option<String> = None;
    let mut buckets: HashMap<NaiveDate, DateBucket> = HashMap::with_capacity(dates.len());

    for entry in entries {
        if source.is_none() {
            source = Some(entry.source.clone());
        }
        buckets.entry(entry.cutoff_date).or_default().add(entry);
    }

    let mut by_date = DateMap::new();
    let mut totals_by_date = DateMap::new();
    for date in dates {
        if let Some(bucket) = buckets.remove(date) {
            let (groups, totals) = bucket.into_groups();
            by_date.push(*date, groups);
            totals_by_date.push(*date, totals);
        }
    }

    ReserveReport {
        source: source.unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
        report_name: REPORT_NAME.to_string(),
        by_date,
        totals_by_date,
    }
}
