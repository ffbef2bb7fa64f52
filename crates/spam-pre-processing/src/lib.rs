//! Text pre-processing for the spam scorer.
//!
//! Two stages live here: [`pre_processor::preprocess`], which turns raw text
//! into a cleaned token string, and [`pre_processor::TfidfVectorizer`], which
//! maps cleaned text onto the feature space of a fitted model.

mod error;
pub mod pre_processor;

pub use error::PreProcessingError;
