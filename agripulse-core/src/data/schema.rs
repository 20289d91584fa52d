//! Canonical dataset schema and the historical column-name aliases.
//!
//! Published price exports have shipped under several header spellings over
//! the years. Every known spelling is mapped onto one canonical column set
//! before any row is read.

use csv::StringRecord;

use super::dataset::normalize_key;
use super::error::DataError;

/// The five columns the pipeline needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Column {
    Date,
    Price,
    State,
    Market,
    Commodity,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Date,
        Column::Price,
        Column::State,
        Column::Market,
        Column::Commodity,
    ];

    /// Canonical header name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Price => "Modal Price",
            Self::State => "State",
            Self::Market => "Market",
            Self::Commodity => "Commodity",
        }
    }
}

/// Historical header spellings and the canonical column each one maps to.
pub const COLUMN_ALIASES: &[(&str, Column)] = &[
    ("Price Date", Column::Date),
    ("Modal_Price", Column::Price),
    ("STATE", Column::State),
    ("Market Name", Column::Market),
];

/// Map a raw header onto a canonical column, if it is one we know.
pub fn canonical_column(header: &str) -> Option<Column> {
    let trimmed = header.trim();
    if let Some((_, column)) = COLUMN_ALIASES.iter().find(|(alias, _)| *alias == trimmed) {
        return Some(*column);
    }
    let key = normalize_key(trimmed);
    Column::ALL
        .iter()
        .copied()
        .find(|c| normalize_key(c.name()) == key)
        .or_else(|| {
            COLUMN_ALIASES
                .iter()
                .find(|(alias, _)| normalize_key(alias) == key)
                .map(|(_, column)| *column)
        })
}

/// Field index of each canonical column within a CSV record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: usize,
    pub price: usize,
    pub state: usize,
    pub market: usize,
    pub commodity: usize,
}

impl ColumnMap {
    /// Resolve the header row. The first header mapping to a column wins.
    ///
    /// Fails with [`DataError::MissingColumns`] listing every absent canonical
    /// column, sorted by name.
    pub fn resolve(headers: &StringRecord) -> Result<Self, DataError> {
        let mut found: [Option<usize>; 5] = [None; 5];
        for (idx, header) in headers.iter().enumerate() {
            if let Some(column) = canonical_column(header) {
                let slot = &mut found[column as usize];
                if slot.is_none() {
                    *slot = Some(idx);
                }
            }
        }

        match found {
            [Some(date), Some(price), Some(state), Some(market), Some(commodity)] => Ok(Self {
                date,
                price,
                state,
                market,
                commodity,
            }),
            _ => {
                let mut missing: Vec<String> = Column::ALL
                    .iter()
                    .filter(|c| found[**c as usize].is_none())
                    .map(|c| c.name().to_string())
                    .collect();
                missing.sort();
                Err(DataError::MissingColumns(missing))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_map_to_canonical_columns() {
        assert_eq!(canonical_column("Price Date"), Some(Column::Date));
        assert_eq!(canonical_column("Modal_Price"), Some(Column::Price));
        assert_eq!(canonical_column("STATE"), Some(Column::State));
        assert_eq!(canonical_column("Market Name"), Some(Column::Market));
    }

    #[test]
    fn canonical_names_match_loosely() {
        assert_eq!(canonical_column(" modal price "), Some(Column::Price));
        assert_eq!(canonical_column("COMMODITY"), Some(Column::Commodity));
        assert_eq!(canonical_column("date"), Some(Column::Date));
        assert_eq!(canonical_column("Variety"), None);
    }

    #[test]
    fn resolve_with_aliased_headers() {
        let headers = StringRecord::from(vec![
            "STATE",
            "District",
            "Market Name",
            "Commodity",
            "Modal_Price",
            "Price Date",
        ]);
        let map = ColumnMap::resolve(&headers).unwrap();
        assert_eq!(
            map,
            ColumnMap {
                date: 5,
                price: 4,
                state: 0,
                market: 2,
                commodity: 3,
            }
        );
    }

    #[test]
    fn resolve_reports_missing_columns_sorted() {
        let headers = StringRecord::from(vec!["State", "Commodity", "Modal Price"]);
        match ColumnMap::resolve(&headers) {
            Err(DataError::MissingColumns(missing)) => {
                assert_eq!(missing, vec!["Date".to_string(), "Market".to_string()]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }
}
