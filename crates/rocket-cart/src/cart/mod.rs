//! Shopping cart module.
//!
//! Contains the cart value type and snapshot codecs.

mod cart;
mod codec;

pub use cart::{Cart, CartItem};
pub use codec::{CartCodec, JsonCodec};
