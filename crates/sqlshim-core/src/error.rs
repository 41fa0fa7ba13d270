//! Error types for sqlshim

use thiserror::Error;

/// Core error type shared by drivers, transactions and the shim layers.
///
/// Wrapping layers return these values exactly as the wrapped driver produced
/// them. Drivers that need to preserve their own error types should use
/// [`ShimError::Native`], which callers can downcast.
#[derive(Error, Debug)]
pub enum ShimError {
    #[error("Connection error: {0}")]
    Connection(String),

    /// An error value owned by the concrete driver implementation.
    #[error(transparent)]
    Native(Box<dyn std::error::Error + Send + Sync + 'static>),

    /// The wrapped driver satisfies neither the extended operation nor the
    /// base operation it should fall back to.
    #[error("Missing driver capability: {0}")]
    MissingCapability(String),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Cancelled")]
    Cancelled,
}

impl ShimError {
    /// Wrap a driver-specific error so that it survives the shim layers intact.
    pub fn native<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ShimError::Native(Box::new(err))
    }

    /// Borrow the driver-specific error if this is a [`ShimError::Native`] of type `E`.
    pub fn downcast_native<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            ShimError::Native(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}

/// Result type alias for sqlshim operations
pub type Result<T> = std::result::Result<T, ShimError>;
