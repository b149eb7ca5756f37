//! Token filter implementations for token transformation.
//!
//! # Examples
//!
//! ```
//! use flightcode::analysis::token_filter::Filter;
//! use flightcode::analysis::token_filter::lowercase::LowercaseFilter;
//! use flightcode::analysis::token::Token;
//!
//! let filter = LowercaseFilter::new();
//! let tokens = vec![Token::new("B737", 0), Token::new("MAX", 1)];
//! let filtered: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! assert_eq!(filtered[0].text, "b737");
//! assert_eq!(filtered[1].text, "max");
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod lowercase;

pub use lowercase::LowercaseFilter;
