//! Error types shared across the lab
//!
//! Error taxonomy using thiserror

use thiserror::Error;

/// Order construction errors.
///
/// These are the only errors expected during a normal run; they surface
/// synchronously from `Order::new`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderError {
    #[error("Invalid side '{0}'")]
    InvalidSide(String),

    #[error("Order price must be positive, got {0}")]
    InvalidPrice(f64),

    #[error("Order volume must be positive, got {0}")]
    InvalidVolume(f64),
}

/// Market configuration errors reported by `MarketConfig::validate`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("price tick must be positive and finite, got {0}")]
    InvalidTick(f64),

    #[error("initial price must be positive and finite, got {0}")]
    InvalidInitialPrice(f64),

    #[error("price volatility must be non-negative and finite, got {0}")]
    InvalidVolatility(f64),

    #[error("max daily volume must be at least {min}, got {value}")]
    InvalidMaxVolume { value: f64, min: f64 },

    #[error("unknown wealth mode '{0}'")]
    UnknownWealthMode(String),

    #[error("unknown sentiment mode '{0}'")]
    UnknownSentimentMode(String),

    #[error("malformed config: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_error_display() {
        let err = OrderError::InvalidSide("hold".to_string());
        assert_eq!(err.to_string(), "Invalid side 'hold'");
        assert!(OrderError::InvalidPrice(-1.0).to_string().contains("-1"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidMaxVolume { value: 0.05, min: 0.1 };
        assert!(err.to_string().contains("0.05"));
        assert!(err.to_string().contains("0.1"));
    }
}
