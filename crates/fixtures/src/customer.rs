//! Customer registrations.

use rand::Rng;
use storeprobe_core::{Address, CustomerRegistration, Email, NewCustomer};

use crate::FixtureError;
use crate::address::AddressFixture;
use crate::words::{self, EMAIL_DOMAINS, FIRST_NAMES, LAST_NAMES};

/// Prefix that makes generated passwords satisfy the platform's
/// character-class rules (upper, lower, digit, special).
pub const CUSTOMER_PASSWORD_PREFIX: &str = "Test@123";

/// Builder for a [`CustomerRegistration`].
#[derive(Debug, Clone, Default)]
pub struct CustomerFixture {
    pub email: Option<Email>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub password: Option<String>,
    pub addresses: Option<Vec<Address>>,
    /// Generate one address carrying the customer's name.
    pub with_address: bool,
}

impl CustomerFixture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn email(mut self, email: Email) -> Self {
        self.email = Some(email);
        self
    }

    #[must_use]
    pub fn name(mut self, firstname: impl Into<String>, lastname: impl Into<String>) -> Self {
        self.firstname = Some(firstname.into());
        self.lastname = Some(lastname.into());
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn addresses(mut self, addresses: Vec<Address>) -> Self {
        self.addresses = Some(addresses);
        self
    }

    #[must_use]
    pub const fn with_address(mut self) -> Self {
        self.with_address = true;
        self
    }

    /// # Errors
    ///
    /// Returns error if the generated email fails validation.
    pub fn build<R: Rng>(self, rng: &mut R) -> Result<CustomerRegistration, FixtureError> {
        let firstname = self
            .firstname
            .unwrap_or_else(|| words::pick(rng, FIRST_NAMES).to_string());
        let lastname = self
            .lastname
            .unwrap_or_else(|| words::pick(rng, LAST_NAMES).to_string());
        let email = match self.email {
            Some(email) => email,
            None => generate_email(rng, &firstname, &lastname)?,
        };
        let password = self.password.unwrap_or_else(|| generate_password(rng));
        let addresses = match self.addresses {
            Some(addresses) => addresses,
            None if self.with_address => vec![
                AddressFixture::new()
                    .name(firstname.clone(), lastname.clone())
                    .build(rng),
            ],
            None => Vec::new(),
        };

        Ok(CustomerRegistration {
            customer: NewCustomer {
                email,
                firstname,
                lastname,
                addresses,
            },
            password,
        })
    }

    /// Build from the thread RNG.
    ///
    /// # Errors
    ///
    /// See [`CustomerFixture::build`].
    pub fn build_random(self) -> Result<CustomerRegistration, FixtureError> {
        self.build(&mut rand::rng())
    }
}

/// Lowercase `first.last.xxxxxx@domain`, unique per call with overwhelming
/// probability.
fn generate_email<R: Rng>(
    rng: &mut R,
    firstname: &str,
    lastname: &str,
) -> Result<Email, FixtureError> {
    let suffix = words::alphanumeric(rng, 8);
    let domain = words::pick(rng, EMAIL_DOMAINS);
    let local = format!("{}.{}.{suffix}", words::slug(firstname), words::slug(lastname));
    Ok(Email::parse(&format!("{local}@{domain}").to_lowercase())?)
}

fn generate_password<R: Rng>(rng: &mut R) -> String {
    format!("{CUSTOMER_PASSWORD_PREFIX}{}", words::letters(rng, 12))
}
