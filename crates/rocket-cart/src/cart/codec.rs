//! Snapshot codecs.

use tracing::warn;

use crate::cart::{Cart, CartItem};
use crate::error::CodecError;

/// Converts a cart to and from its stored form.
pub trait CartCodec: Send + Sync {
    /// Encode the whole cart.
    fn encode(&self, cart: &Cart) -> Result<Vec<u8>, CodecError>;

    /// Decode a stored snapshot.
    fn decode(&self, bytes: &[u8]) -> Result<Cart, CodecError>;
}

/// Stores the cart as a JSON array of items.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl CartCodec for JsonCodec {
    fn encode(&self, cart: &Cart) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(cart).map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Cart, CodecError> {
        let items: Vec<CartItem> =
            serde_json::from_slice(bytes).map_err(|e| CodecError::Decode(e.to_string()))?;
        let stored = items.len();
        let cart = Cart::from_items(items);
        if cart.len() < stored {
            warn!(stored, kept = cart.len(), "dropped duplicate or non-positive snapshot entries");
        }
        Ok(cart)
    }
}
