use serde_json::Value;
use tracing::debug;

use crate::domain::Breed;

/// Validate one page of raw upstream records.
///
/// Malformed items are dropped one by one; the rest of the page is kept in
/// its original order.
pub fn clean(raw: &[Value]) -> Vec<Breed> {
    raw.iter()
        .enumerate()
        .filter_map(|(index, item)| match Breed::from_value(item) {
            Ok(breed) => Some(breed),
            Err(error) => {
                debug!(index, %error, "dropping invalid upstream record");
                None
            }
        })
        .collect()
}
