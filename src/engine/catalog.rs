use crate::engine::Amount;
use csv::Trim;
use serde::Deserialize;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::Read;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog item identifier is empty")]
    EmptyItemId,

    #[error("Catalog item {item} has a non-positive price: {price}")]
    NonPositivePrice { item: String, price: Amount },

    #[error("Catalog item {0} is listed more than once")]
    DuplicateItem(String),

    #[error("Catalog CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// One `item,price` row of a catalog file
#[derive(Deserialize, Debug, Clone)]
struct CatalogRecord {
    item: String,
    price: Amount,
}

/// Dispensable items and their fixed prices.
/// Built once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    prices: HashMap<String, Amount>,
}

impl Catalog {
    pub fn new<I, S>(items: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (S, Amount)>,
        S: Into<String>,
    {
        let mut prices = HashMap::new();

        for (item, price) in items {
            let item = item.into();
            if item.trim().is_empty() {
                Err(CatalogError::EmptyItemId)?
            }
            if !price.is_positive() {
                return Err(CatalogError::NonPositivePrice { item, price });
            }
            match prices.entry(item) {
                Entry::Occupied(e) => Err(CatalogError::DuplicateItem(e.key().clone()))?,
                Entry::Vacant(e) => {
                    e.insert(price);
                }
            }
        }

        Ok(Catalog { prices })
    }

    /// cola 2.00, chips 1.50, candy 1.00
    pub fn standard() -> Self {
        let prices = HashMap::from([
            ("cola".to_owned(), Amount::from_cents(200)),
            ("chips".to_owned(), Amount::from_cents(150)),
            ("candy".to_owned(), Amount::from_cents(100)),
        ]);
        Catalog { prices }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut rdr = csv::ReaderBuilder::new().trim(Trim::All).from_reader(reader);

        let mut items = Vec::new();
        for result in rdr.deserialize::<CatalogRecord>() {
            let record = result?;
            log::debug!("Loaded catalog record: {record:?}");
            items.push((record.item, record.price));
        }

        Catalog::new(items)
    }

    pub fn price(&self, item: &str) -> Option<Amount> {
        self.prices.get(item).copied()
    }

    pub fn contains(&self, item: &str) -> bool {
        self.prices.contains_key(item)
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = (&str, Amount)> {
        self.prices.iter().map(|(item, price)| (item.as_str(), *price))
    }
}
