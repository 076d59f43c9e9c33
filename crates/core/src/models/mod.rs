//! Request and response records mirrored from the platform's REST API.
//!
//! Field names follow the wire format (`snake_case`, with the few camelCase
//! envelope keys renamed explicitly). Unknown response fields are ignored.

pub mod address;
pub mod cart;
pub mod customer;
pub mod order;
pub mod product;

pub use address::{Address, CheckoutAddress, Region};
pub use cart::*;
pub use customer::{Customer, CustomerRegistration, CustomerUpdate, NewCustomer};
pub use order::{Order, OrderItem};
pub use product::*;
