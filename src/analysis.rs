//! Text analysis for flight codes.
//!
//! This module provides the tokenization layer the feature pipelines are built
//! on: tokenizers that split a code into tokens, filters that transform token
//! streams, and analyzers that chain the two.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
