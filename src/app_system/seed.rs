use rust_decimal::Decimal;

use crate::domain::{Category, PriceList, ProductCreate};

/// `(code, name, category, unit, pack size, [A, B, C] prices, stock, min stock)`
type CatalogRow = (&'static str, &'static str, Category, &'static str, u32, [i64; 3], u32, u32);

const CATALOG: [CatalogRow; 9] = [
    ("SPEED-250", "Speed 250ml", Category::EnergyDrinks, "lata", 24, [1200, 1080, 1020], 245, 50),
    ("SPEED-473", "Speed XL 473ml", Category::EnergyDrinks, "lata", 24, [1800, 1620, 1530], 180, 40),
    ("SPEED-COLA", "Speed Cola", Category::SoftDrinks, "lata", 24, [1200, 1080, 1020], 150, 40),
    ("AGUA-500", "Agua BLOCK 500ml", Category::Water, "botella", 12, [800, 720, 680], 89, 30),
    ("CHAMP", "Champagne", Category::Spirits, "botella", 6, [3900, 3510, 3315], 45, 10),
    ("HOLM-LIC", "Holmöser Licor 750ml", Category::Liqueurs, "botella", 6, [4200, 3780, 3570], 32, 10),
    ("HOLM-PET", "Holmöser Petaca 200ml", Category::Liqueurs, "petaca", 12, [1500, 1350, 1275], 68, 20),
    ("SMIRN", "Smirnoff 750ml", Category::Spirits, "botella", 6, [5500, 4950, 4675], 28, 10),
    ("FERNET", "Fernet 750ml", Category::Spirits, "botella", 12, [4800, 4320, 4080], 2, 15),
];

/// The starting product catalog with its three price lists.
pub fn default_catalog() -> Vec<ProductCreate> {
    CATALOG
        .iter()
        .map(|&(code, name, category, unit, pack_size, [a, b, c], stock, min_stock)| {
            ProductCreate::new(code, name, category, unit, pack_size, stock, min_stock)
                .with_price(PriceList::A, Decimal::from(a))
                .with_price(PriceList::B, Decimal::from(b))
                .with_price(PriceList::C, Decimal::from(c))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StockStatus;
    use rust_decimal_macros::dec;

    #[test]
    fn test_catalog_has_every_price_list() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 9);
        assert!(catalog.iter().all(|p| p.prices.len() == 3));

        let speed = &catalog[0];
        assert_eq!(speed.code, "SPEED-250");
        assert_eq!(speed.prices[&PriceList::B], dec!(1080));
    }

    #[test]
    fn test_fernet_starts_critical() {
        let fernet = default_catalog().into_iter().find(|p| p.code == "FERNET").unwrap();
        assert_eq!(StockStatus::classify(fernet.stock, fernet.min_stock), StockStatus::Critical);
    }
}
