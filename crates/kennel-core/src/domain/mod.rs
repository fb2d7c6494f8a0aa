//! # Domain Models
//!
//! Validated catalog entities served from the cache.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Breed`] | One catalog record: breed name plus optional image URL |
//! | [`BreedName`] | Trimmed, non-empty breed name |
//!
//! Construction enforces every invariant, so a [`Breed`] held by the cache
//! is always complete:
//!
//! ```rust
//! use kennel_core::{Breed, ValidationError};
//!
//! let ok = Breed::new("akita", Some("https://images.example/akita.jpg"));
//! assert!(ok.is_ok());
//!
//! let bad = Breed::new("akita", Some("not a url"));
//! assert!(matches!(bad, Err(ValidationError::InvalidImageUrl { .. })));
//! ```

mod breed;

pub use breed::{parse_image_url, Breed, BreedName};
