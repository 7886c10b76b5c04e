use serde::Serialize;

use crate::detail::SpecTable;

/// Placeholder written for any field the source pages did not provide.
pub const SENTINEL: &str = "null";

/// Column order shared by every record and the header row.
pub const FIELD_NAMES: [&str; 8] = [
    "name",
    "price",
    "diameter",
    "weight",
    "alloy",
    "denomination",
    "edge",
    "producer",
];

/// Detail-page label feeding each detail-sourced field, in column order.
pub const DETAIL_LABELS: [(&str, &str); 6] = [
    ("diameter", "Diameter"),
    ("weight", "Weight"),
    ("alloy", "Alloy"),
    ("denomination", "Denomination"),
    ("edge", "Edge"),
    ("producer", "Producer"),
];

/// One product row. Fields are fixed once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    name: String,
    price: String,
    diameter: String,
    weight: String,
    alloy: String,
    denomination: String,
    edge: String,
    producer: String,
}

impl Record {
    /// Merges listing summary values with the detail mapping, defaulting absent labels.
    pub fn build(name: Option<String>, price: Option<String>, specs: &SpecTable) -> Self {
        let detail = |label: &str| {
            specs
                .get(label)
                .map(ToOwned::to_owned)
                .unwrap_or_else(|| SENTINEL.to_owned())
        };

        let [diameter, weight, alloy, denomination, edge, producer] =
            DETAIL_LABELS.map(|(_, label)| detail(label));

        Self {
            name: name.unwrap_or_else(|| SENTINEL.to_owned()),
            price: price.unwrap_or_else(|| SENTINEL.to_owned()),
            diameter,
            weight,
            alloy,
            denomination,
            edge,
            producer,
        }
    }

    /// Field values in [`FIELD_NAMES`] order.
    pub fn values(&self) -> [&str; 8] {
        [
            &self.name,
            &self.price,
            &self.diameter,
            &self.weight,
            &self.alloy,
            &self.denomination,
            &self.edge,
            &self.producer,
        ]
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        FIELD_NAMES
            .iter()
            .position(|name| *name == field)
            .map(|idx| self.values()[idx])
    }
}

/// Append-only collection of records in crawl order.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}
