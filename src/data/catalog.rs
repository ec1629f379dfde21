//! Series catalog: which FRED series are fetched by default, and what they are.

use std::sync::LazyLock;

use crate::domain::SeriesId;

const TREASURY_SERIES: [(&str, &str); 13] = [
    ("DTB4WK", "4-Week Treasury Bill Secondary Market Rate, Discount Basis"),
    (
        "DGS3MO",
        "Market Yield on U.S. Treasury Securities at 3-Month Constant Maturity, Quoted on an Investment Basis",
    ),
    (
        "DGS6MO",
        "Market Yield on U.S. Treasury Securities at 6-Month Constant Maturity, Quoted on an Investment Basis",
    ),
    (
        "DGS1",
        "Market Yield on U.S. Treasury Securities at 1-Year Constant Maturity, Quoted on an Investment Basis",
    ),
    (
        "DGS2",
        "Market Yield on U.S. Treasury Securities at 2-Year Constant Maturity, Quoted on an Investment Basis",
    ),
    (
        "DGS5",
        "Market Yield on U.S. Treasury Securities at 5-Year Constant Maturity, Quoted on an Investment Basis",
    ),
    (
        "DGS7",
        "Market Yield on U.S. Treasury Securities at 7-Year Constant Maturity, Quoted on an Investment Basis",
    ),
    (
        "DGS10",
        "Market Yield on U.S. Treasury Securities at 10-Year Constant Maturity, Quoted on an Investment Basis",
    ),
    (
        "DGS30",
        "Market Yield on U.S. Treasury Securities at 30-Year Constant Maturity, Quoted on an Investment Basis",
    ),
    (
        "T10Y3M",
        "10-Year Treasury Constant Maturity Minus 3-Month Treasury Constant Maturity",
    ),
    (
        "T10Y2Y",
        "10-Year Treasury Constant Maturity Minus 2-Year Treasury Constant Maturity",
    ),
    ("SP500", "S&P 500"),
    ("VIXCLS", "CBOE Volatility Index: VIX"),
];

static TREASURY: LazyLock<SeriesCatalog> = LazyLock::new(|| {
    SeriesCatalog::new(
        TREASURY_SERIES
            .iter()
            .map(|(id, description)| CatalogEntry::new(*id, *description)),
    )
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: SeriesId,
    pub description: String,
}

impl CatalogEntry {
    pub fn new(id: impl Into<SeriesId>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
        }
    }
}

/// Ordered series catalog.
///
/// Iteration order matters: `HistoricalSeriesClient::fetch_all_series` joins in
/// this order, and the first entry's calendar defines the merged row set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesCatalog {
    entries: Vec<CatalogEntry>,
}

impl SeriesCatalog {
    /// Later entries with an id already present are ignored.
    pub fn new(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut out: Vec<CatalogEntry> = Vec::new();
        for entry in entries {
            if !out.iter().any(|e| e.id == entry.id) {
                out.push(entry);
            }
        }
        Self { entries: out }
    }

    /// The process-wide default: Treasury curve points, spreads, SP500 and VIX.
    pub fn treasury() -> &'static SeriesCatalog {
        &TREASURY
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn ids(&self) -> impl Iterator<Item = &SeriesId> {
        self.entries.iter().map(|e| &e.id)
    }

    pub fn describe(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.id.as_str() == id)
            .map(|e| e.description.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SeriesCatalog {
    fn default() -> Self {
        Self::treasury().clone()
    }
}
