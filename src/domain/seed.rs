//! Initial catalog inserted into an empty product database.

use crate::domain::wire_product::WireProduct;

/// (barcode, item, category, price, discount, available)
const SEED_ROWS: [(&str, &str, &str, i64, i64, i64); 9] = [
    ("74001755", "Ball Gown", "Full Body Outfits", 3548, 7, 1),
    ("74001756", "Summer Dress", "Full Body Outfits", 2500, 5, 1),
    ("74001757", "Winter Coat", "Outerwear", 4000, 10, 1),
    ("74002423", "Silk Scarf", "Accessories", 890, 15, 1),
    ("74003512", "Leather Jacket", "Outerwear", 2250, 5, 1),
    ("74004298", "Cotton T-Shirt", "Casual Wear", 450, 0, 1),
    ("74005123", "Denim Jeans", "Casual Wear", 1200, 10, 0),
    ("74006789", "Wool Sweater", "Winter Collection", 1750, 12, 0),
    ("74007890", "Designer Sunglasses", "Accessories", 1580, 8, 0),
];

/// Seed records in wire form, in insertion order
pub fn seed_catalog() -> Vec<WireProduct> {
    SEED_ROWS
        .iter()
        .map(|&(barcode, item, category, price, discount, available)| {
            WireProduct::new(barcode, item, category, price, discount, available)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_barcodes_are_unique() {
        let seed = seed_catalog();
        let barcodes: HashSet<_> = seed.iter().filter_map(|p| p.barcode.clone()).collect();
        assert_eq!(barcodes.len(), seed.len());
    }

    #[test]
    fn test_seed_records_are_complete() {
        for record in seed_catalog() {
            assert!(record.item.as_deref().is_some_and(|s| !s.is_empty()));
            assert!(matches!(record.available, Some(0 | 1)));
            assert!(record.discount.is_some_and(|d| (0..=100).contains(&d)));
        }
    }
}
