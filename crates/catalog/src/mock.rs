//! Mock catalog data for demos and tests.

use rand::Rng;

use restock_core::ItemId;

use crate::item::InventoryItem;

const ADJECTIVES: &[&str] = &[
    "Electric",
    "Manual",
    "Industrial",
    "Compact",
    "Heavy-Duty",
    "Smart",
    "Wireless",
    "Ergonomic",
];

const NOUNS: &[&str] = &[
    "Widget", "Filter", "Valve", "Sensor", "Monitor", "Drill", "Charger", "Cutter",
];

/// Generate `count` plausible catalog items.
///
/// Inventory 10..=509, sales/week 5..=84, lead time 3..=22 days. Inject a
/// seeded rng for reproducible fixtures.
pub fn mock_items<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<InventoryItem> {
    (1..=count)
        .map(|i| {
            let name = format!(
                "{} {} #{}",
                ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())],
                NOUNS[rng.gen_range(0..NOUNS.len())],
                i
            );
            let current_inventory = rng.gen_range(10u32..510);
            let avg_sales_per_week = rng.gen_range(5u32..85) as f64;
            let days_to_replenish = rng.gen_range(3u32..23) as f64;

            InventoryItem::new(
                ItemId::new(),
                name,
                current_inventory,
                avg_sales_per_week,
                days_to_replenish,
            )
            .expect("mock item values are within valid ranges")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generates_requested_count_within_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let items = mock_items(50, &mut rng);
        assert_eq!(items.len(), 50);

        for item in &items {
            assert!((10..510).contains(&item.current_inventory()));
            assert!((5.0..85.0).contains(&item.avg_sales_per_week()));
            assert!((3.0..23.0).contains(&item.days_to_replenish()));
            assert!(!item.name().is_empty());
        }
    }

    #[test]
    fn same_seed_same_fixture_names() {
        let a = mock_items(10, &mut StdRng::seed_from_u64(42));
        let b = mock_items(10, &mut StdRng::seed_from_u64(42));
        let names_a: Vec<_> = a.iter().map(|i| i.name().to_string()).collect();
        let names_b: Vec<_> = b.iter().map(|i| i.name().to_string()).collect();
        assert_eq!(names_a, names_b);
    }
}
