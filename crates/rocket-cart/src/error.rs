//! Cart error types.

use rocket_storage::StorageError;
use thiserror::Error;

use crate::ids::ProductId;

/// Errors returned by a stock/product lookup.
#[derive(Error, Debug)]
pub enum LookupError {
    /// The service has no record for this product.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// The service could not be reached or answered with an error.
    #[error("Stock service unavailable: {0}")]
    Unavailable(String),

    /// The service answered with data that could not be understood.
    #[error("Invalid response from stock service: {0}")]
    InvalidResponse(String),
}

/// Errors from encoding or decoding a cart snapshot.
#[derive(Error, Debug)]
pub enum CodecError {
    /// Failed to encode the cart.
    #[error("Failed to encode cart: {0}")]
    Encode(String),

    /// Failed to decode a stored snapshot.
    #[error("Failed to decode cart: {0}")]
    Decode(String),
}

/// Errors that can occur inside a cart operation.
///
/// None of these reach the caller of a `CartStore` operation; they are
/// reported through the notifier and the returned outcome.
#[derive(Error, Debug)]
pub enum CartError {
    /// Stock or product lookup failed.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// Snapshot encoding failed.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Durable store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
