use serde::{Deserialize, Serialize};

use crate::domain::errors::{CatalogError, CatalogResult};

/// Inclusive price bounds for the filtered view, in minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: i64,
    pub max: i64,
}

impl PriceRange {
    /// Validated constructor; the API answers 400 for the same cases.
    pub fn new(min: i64, max: i64) -> CatalogResult<Self> {
        if min < 0 || max < 0 {
            return Err(CatalogError::validation(
                "price_range",
                "Price values cannot be negative",
            ));
        }
        if min > max {
            return Err(CatalogError::validation(
                "price_range",
                "Maximum price must be greater than minimum price",
            ));
        }
        Ok(Self { min, max })
    }

    /// Open-ended bounds: a missing minimum is 0, a missing maximum is unbounded.
    pub fn from_bounds(min: Option<i64>, max: Option<i64>) -> CatalogResult<Self> {
        if min.is_none() && max.is_none() {
            return Err(CatalogError::validation(
                "price_range",
                "Please enter at least one price value",
            ));
        }
        Self::new(min.unwrap_or(0), max.unwrap_or(i64::from(i32::MAX)))
    }

    pub const fn contains(&self, price: i64) -> bool {
        price >= self.min && price <= self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        let range = PriceRange::new(1000, 2500).unwrap();
        assert!(range.contains(1000));
        assert!(range.contains(2500));
        assert!(!range.contains(999));
        assert!(!range.contains(2501));
    }

    #[test]
    fn test_rejects_negative_and_inverted() {
        assert_eq!(
            PriceRange::new(-1, 10).unwrap_err().to_string(),
            "Price values cannot be negative"
        );
        assert_eq!(
            PriceRange::new(10, 5).unwrap_err().to_string(),
            "Maximum price must be greater than minimum price"
        );
        assert!(PriceRange::new(7, 7).is_ok());
    }

    #[test]
    fn test_open_bounds() {
        let range = PriceRange::from_bounds(None, Some(500)).unwrap();
        assert_eq!(range.min, 0);
        let range = PriceRange::from_bounds(Some(500), None).unwrap();
        assert_eq!(range.max, i64::from(i32::MAX));
        assert!(PriceRange::from_bounds(None, None).is_err());
    }
}
