//! Catalog products and stock items.

use rand::Rng;
use rust_decimal::Decimal;
use storeprobe_core::{
    ConfigurableOption, ConfigurableValue, CustomAttribute, DEFAULT_ATTRIBUTE_SET_ID, Product,
    ProductExtension, ProductStatus, ProductType, Sku, StockItem, Visibility,
};

use crate::FixtureError;
use crate::words::{
    self, DESCRIPTION_CLOSERS, DESCRIPTION_OPENERS, PRODUCT_ADJECTIVES, PRODUCT_MATERIALS,
    PRODUCT_NOUNS,
};

/// Builder for a [`StockItem`].
#[derive(Debug, Clone, Default)]
pub struct StockItemFixture {
    pub qty: Option<Decimal>,
    pub is_in_stock: Option<bool>,
    pub manage_stock: Option<bool>,
}

impl StockItemFixture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn qty(mut self, qty: impl Into<Decimal>) -> Self {
        self.qty = Some(qty.into());
        self
    }

    /// Quantity 10..=1000, in stock, managed.
    pub fn build<R: Rng>(self, rng: &mut R) -> StockItem {
        StockItem {
            qty: self
                .qty
                .unwrap_or_else(|| Decimal::from(rng.random_range(10..=1000_i64))),
            is_in_stock: self.is_in_stock.unwrap_or(true),
            manage_stock: Some(self.manage_stock.unwrap_or(true)),
        }
    }
}

/// Builder for a [`Product`].
///
/// The product type picks the shape: `simple` carries a weight, `virtual`
/// never does, `configurable` adds color and size options.
#[derive(Debug, Clone)]
pub struct ProductFixture {
    pub type_id: ProductType,
    pub sku: Option<Sku>,
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub status: Option<ProductStatus>,
    pub visibility: Option<Visibility>,
    pub attribute_set_id: Option<i64>,
    pub weight: Option<Decimal>,
    pub stock: StockItemFixture,
}

impl ProductFixture {
    fn of_type(type_id: ProductType) -> Self {
        Self {
            type_id,
            sku: None,
            name: None,
            price: None,
            status: None,
            visibility: None,
            attribute_set_id: None,
            weight: None,
            stock: StockItemFixture::default(),
        }
    }

    #[must_use]
    pub fn simple() -> Self {
        Self::of_type(ProductType::Simple)
    }

    /// No weight, whatever the builder says.
    #[must_use]
    pub fn virtual_product() -> Self {
        Self::of_type(ProductType::Virtual)
    }

    #[must_use]
    pub fn configurable() -> Self {
        Self::of_type(ProductType::Configurable)
    }

    #[must_use]
    pub fn sku(mut self, sku: Sku) -> Self {
        self.sku = Some(sku);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub const fn price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub fn stock_qty(mut self, qty: impl Into<Decimal>) -> Self {
        self.stock = self.stock.qty(qty);
        self
    }

    #[must_use]
    pub const fn status(mut self, status: ProductStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// # Errors
    ///
    /// Returns error if the generated SKU fails validation.
    pub fn build<R: Rng>(self, rng: &mut R) -> Result<Product, FixtureError> {
        let sku = match self.sku {
            Some(sku) => sku,
            None => generate_sku(rng)?,
        };
        let name = self.name.unwrap_or_else(|| product_name(rng));
        let price = self
            .price
            .unwrap_or_else(|| Decimal::new(rng.random_range(1_000..=100_000), 2));
        let weight = match self.type_id {
            ProductType::Virtual => None,
            _ => Some(
                self.weight
                    .unwrap_or_else(|| Decimal::new(rng.random_range(10..=1_000), 2)),
            ),
        };
        let configurable_product_options = if self.type_id == ProductType::Configurable {
            configurable_options()
        } else {
            Vec::new()
        };
        let stock_item = self.stock.build(rng);
        let custom_attributes = custom_attributes(rng, &name);

        Ok(Product {
            id: None,
            sku,
            name,
            attribute_set_id: self.attribute_set_id.unwrap_or(DEFAULT_ATTRIBUTE_SET_ID),
            price,
            status: self.status.unwrap_or(ProductStatus::Enabled),
            visibility: self.visibility.unwrap_or(Visibility::CatalogAndSearch),
            type_id: self.type_id,
            weight,
            extension_attributes: ProductExtension {
                stock_item: Some(stock_item),
                configurable_product_options,
            },
            custom_attributes,
        })
    }

    /// Build from the thread RNG.
    ///
    /// # Errors
    ///
    /// See [`ProductFixture::build`].
    pub fn build_random(self) -> Result<Product, FixtureError> {
        self.build(&mut rand::rng())
    }
}

/// `SKU-` followed by eight uppercase letters or digits.
fn generate_sku<R: Rng>(rng: &mut R) -> Result<Sku, FixtureError> {
    let code = words::alphanumeric(rng, 8).to_uppercase();
    Ok(Sku::parse(&format!("SKU-{code}"))?)
}

fn product_name<R: Rng>(rng: &mut R) -> String {
    format!(
        "{} {} {}",
        words::pick(rng, PRODUCT_ADJECTIVES),
        words::pick(rng, PRODUCT_MATERIALS),
        words::pick(rng, PRODUCT_NOUNS)
    )
}

fn description<R: Rng>(rng: &mut R, name: &str) -> String {
    format!(
        "{} {}, {}",
        words::pick(rng, DESCRIPTION_OPENERS),
        name,
        words::pick(rng, DESCRIPTION_CLOSERS)
    )
}

fn custom_attributes<R: Rng>(rng: &mut R, name: &str) -> Vec<CustomAttribute> {
    let short = format!(
        "{} {}",
        words::pick(rng, PRODUCT_ADJECTIVES),
        words::pick(rng, PRODUCT_NOUNS)
    );
    let url_key = format!(
        "{}-{}",
        words::slug(name),
        words::alphanumeric(rng, 6).to_lowercase()
    );
    vec![
        CustomAttribute::text("description", description(rng, name)),
        CustomAttribute::text("short_description", short),
        CustomAttribute::text("meta_title", name),
        CustomAttribute::text("meta_description", description(rng, name)),
        CustomAttribute::text("url_key", url_key),
    ]
}

/// Color (attribute 93) and size (attribute 144) axes of the sample catalog.
fn configurable_options() -> Vec<ConfigurableOption> {
    vec![
        configurable_option("93", "Color", 0, &[49, 50]),
        configurable_option("144", "Size", 1, &[166, 167, 168]),
    ]
}

fn configurable_option(
    attribute_id: &str,
    label: &str,
    position: u32,
    values: &[i64],
) -> ConfigurableOption {
    ConfigurableOption {
        attribute_id: attribute_id.to_string(),
        label: label.to_string(),
        position,
        is_use_default: true,
        values: values
            .iter()
            .map(|&value_index| ConfigurableValue { value_index })
            .collect(),
    }
}
