//! Extended value types with dedicated semantic tags.

mod decimal;
mod frozen_map;
mod mime;
mod network;
mod tag;

pub use decimal::Decimal;
pub use frozen_map::FrozenMap;
pub use mime::MimeMessage;
pub use network::IpNetwork;
pub use tag::{SimpleValue, Tag};
