//! Word lists and small sampling helpers.

use rand::Rng;
use rand::distr::Alphanumeric;
use rand::seq::IndexedRandom;

pub const FIRST_NAMES: &[&str] = &[
    "Ada", "Alan", "Beatriz", "Carlos", "Chloe", "Dmitri", "Elena", "Farah", "Grace", "Hiro",
    "Ines", "Jamal", "Katya", "Liam", "Maya", "Noah", "Olga", "Priya", "Quinn", "Rosa", "Sven",
    "Tariq", "Uma", "Victor", "Wen", "Ximena", "Yusuf", "Zoe",
];

pub const LAST_NAMES: &[&str] = &[
    "Anderson", "Baker", "Castillo", "Dubois", "Evans", "Fischer", "Garcia", "Hughes", "Ibrahim",
    "Jensen", "Kowalski", "Lopez", "Moreau", "Nakamura", "Okafor", "Petrov", "Quintero", "Rossi",
    "Schmidt", "Tanaka", "Usman", "Varga", "Walker", "Xu", "Young", "Zimmerman",
];

pub const EMAIL_DOMAINS: &[&str] = &["example.com", "example.net", "example.org"];

pub const STREET_NAMES: &[&str] = &[
    "Maple", "Oak", "Cedar", "Pine", "Elm", "Willow", "Birch", "Lake", "Hill", "Park", "Sunset",
    "River", "Highland", "Meadow",
];

pub const STREET_SUFFIXES: &[&str] = &["St", "Ave", "Blvd", "Rd", "Ln", "Dr", "Ct", "Way"];

pub const CITIES: &[&str] = &[
    "Springfield", "Riverside", "Franklin", "Greenville", "Bristol", "Clinton", "Fairview",
    "Salem", "Madison", "Georgetown", "Arlington", "Ashland", "Dover", "Oxford",
];

/// `(code, name)` pairs of US states.
pub const STATES: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AZ", "Arizona"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("IL", "Illinois"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("NY", "New York"),
    ("OH", "Ohio"),
    ("OR", "Oregon"),
    ("TX", "Texas"),
    ("WA", "Washington"),
];

pub const PRODUCT_ADJECTIVES: &[&str] = &[
    "Handcrafted", "Ergonomic", "Rustic", "Sleek", "Refined", "Practical", "Gorgeous",
    "Intelligent", "Tasty", "Generic", "Incredible", "Fantastic", "Licensed", "Elegant",
];

pub const PRODUCT_MATERIALS: &[&str] = &[
    "Steel", "Wooden", "Concrete", "Plastic", "Cotton", "Granite", "Rubber", "Metal", "Soft",
    "Fresh", "Frozen", "Bronze", "Marble",
];

pub const PRODUCT_NOUNS: &[&str] = &[
    "Chair", "Car", "Computer", "Keyboard", "Mouse", "Bike", "Ball", "Gloves", "Pants", "Shirt",
    "Table", "Shoes", "Hat", "Towels", "Soap", "Lamp", "Bacon", "Cheese",
];

pub const DESCRIPTION_OPENERS: &[&str] = &[
    "The slim & simple",
    "Our bestselling",
    "The beautiful range of",
    "Ergonomic executive",
    "New range of",
    "Carbonite web goalkeeper",
];

pub const DESCRIPTION_CLOSERS: &[&str] = &[
    "comfortable for everyday use.",
    "designed with you in mind.",
    "built to last and easy to clean.",
    "perfect for home and office.",
    "with a versatile, modern finish.",
];

/// A random element of `items`, or `""` when empty.
pub fn pick<R: Rng>(rng: &mut R, items: &[&'static str]) -> &'static str {
    items.choose(rng).copied().unwrap_or_default()
}

/// `len` random ASCII letters and digits.
pub fn alphanumeric<R: Rng>(rng: &mut R, len: usize) -> String {
    (0..len).map(|_| char::from(rng.sample(Alphanumeric))).collect()
}

/// `len` random ASCII letters.
pub fn letters<R: Rng>(rng: &mut R, len: usize) -> String {
    const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
    (0..len)
        .map(|_| char::from(LETTERS.choose(rng).copied().unwrap_or(b'x')))
        .collect()
}

/// `len` random decimal digits.
pub fn digits<R: Rng>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// Lowercase, hyphen-separated form of `text`.
#[must_use]
pub fn slug(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
