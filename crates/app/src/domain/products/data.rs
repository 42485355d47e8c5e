//! Products Data

use bazaar::{pricing::PriceQuote, products::Product};

use crate::domain::pagination::PageRequest;

/// Column a product listing is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    #[default]
    CreatedAt,
    Name,
    Price,
    Stock,
    Rating,
}

impl ProductSort {
    pub(crate) const fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Name => "name",
            Self::Price => "price",
            Self::Stock => "stock",
            Self::Rating => "rating",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub(crate) const fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Product listing filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Exact category match
    pub category: Option<String>,

    /// Case-insensitive substring of the name
    pub search: Option<String>,

    pub sort: ProductSort,
    pub order: SortOrder,
    pub page: PageRequest,
}

/// Product with its live price quote.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedProduct {
    pub product: Product,
    pub pricing: PriceQuote,
}
