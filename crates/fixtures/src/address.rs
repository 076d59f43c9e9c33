//! US postal addresses.

use rand::Rng;
use storeprobe_core::{Address, Region};

use crate::words::{self, CITIES, FIRST_NAMES, LAST_NAMES, STATES, STREET_NAMES, STREET_SUFFIXES};

/// Builder for an [`Address`].
#[derive(Debug, Clone, Default)]
pub struct AddressFixture {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub street: Option<Vec<String>>,
    pub city: Option<String>,
    pub postcode: Option<String>,
    pub country_id: Option<String>,
    pub region: Option<Region>,
    pub telephone: Option<String>,
    pub default_shipping: Option<bool>,
    pub default_billing: Option<bool>,
}

impl AddressFixture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, firstname: impl Into<String>, lastname: impl Into<String>) -> Self {
        self.firstname = Some(firstname.into());
        self.lastname = Some(lastname.into());
        self
    }

    #[must_use]
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    #[must_use]
    pub fn region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Mark as neither default shipping nor default billing.
    #[must_use]
    pub const fn secondary(mut self) -> Self {
        self.default_shipping = Some(false);
        self.default_billing = Some(false);
        self
    }

    pub fn build<R: Rng>(self, rng: &mut R) -> Address {
        let region = self.region.unwrap_or_else(|| random_region(rng));
        Address {
            id: None,
            customer_id: None,
            firstname: self
                .firstname
                .unwrap_or_else(|| words::pick(rng, FIRST_NAMES).to_string()),
            lastname: self
                .lastname
                .unwrap_or_else(|| words::pick(rng, LAST_NAMES).to_string()),
            street: self.street.unwrap_or_else(|| vec![street_line(rng)]),
            city: self
                .city
                .unwrap_or_else(|| words::pick(rng, CITIES).to_string()),
            postcode: self.postcode.unwrap_or_else(|| words::digits(rng, 5)),
            country_id: self.country_id.unwrap_or_else(|| "US".to_string()),
            region_id: Some(region.region_id),
            region: Some(region),
            telephone: self.telephone.unwrap_or_else(|| phone_number(rng)),
            default_shipping: Some(self.default_shipping.unwrap_or(true)),
            default_billing: Some(self.default_billing.unwrap_or(true)),
            email: None,
        }
    }

    /// Build from the thread RNG.
    #[must_use]
    pub fn build_random(self) -> Address {
        self.build(&mut rand::rng())
    }
}

fn random_region<R: Rng>(rng: &mut R) -> Region {
    let index = rng.random_range(0..STATES.len());
    let (code, name) = STATES.get(index).copied().unwrap_or(("TX", "Texas"));
    Region {
        region_code: code.to_string(),
        region: name.to_string(),
        region_id: rng.random_range(1..=50),
    }
}

fn street_line<R: Rng>(rng: &mut R) -> String {
    format!(
        "{} {} {}",
        rng.random_range(1..=9999),
        words::pick(rng, STREET_NAMES),
        words::pick(rng, STREET_SUFFIXES)
    )
}

fn phone_number<R: Rng>(rng: &mut R) -> String {
    format!("555-{}-{}", words::digits(rng, 3), words::digits(rng, 4))
}
