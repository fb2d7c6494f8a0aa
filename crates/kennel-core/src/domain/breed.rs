use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::json_kind;
use crate::ValidationError;

const MAX_IMAGE_URL_LEN: usize = 2083;

/// Validated, trimmed breed name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BreedName(String);

impl BreedName {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyBreed);
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for BreedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for BreedName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for BreedName {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<BreedName> for String {
    fn from(value: BreedName) -> Self {
        value.0
    }
}

/// One catalog entry: a breed and an optional picture of it.
///
/// Instances only exist in validated form; upstream JSON goes through
/// [`Breed::from_value`] and anything malformed is rejected as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breed {
    breed: BreedName,
    image: Option<Url>,
}

impl Breed {
    pub fn new(breed: &str, image: Option<&str>) -> Result<Self, ValidationError> {
        Ok(Self {
            breed: BreedName::parse(breed)?,
            image: image.map(parse_image_url).transpose()?,
        })
    }

    /// Build a breed from one raw upstream record.
    ///
    /// Unknown fields are ignored. `image` may be absent or `null`.
    pub fn from_value(raw: &Value) -> Result<Self, ValidationError> {
        let object = raw.as_object().ok_or(ValidationError::RecordNotObject {
            found: json_kind(raw),
        })?;

        let breed = match object.get("breed") {
            None => return Err(ValidationError::MissingBreed),
            Some(Value::String(name)) => BreedName::parse(name)?,
            Some(other) => {
                return Err(ValidationError::BreedNotString {
                    found: json_kind(other),
                })
            }
        };

        let image = match object.get("image") {
            None | Some(Value::Null) => None,
            Some(Value::String(raw_url)) => Some(parse_image_url(raw_url)?),
            Some(other) => {
                return Err(ValidationError::ImageNotString {
                    found: json_kind(other),
                })
            }
        };

        Ok(Self { breed, image })
    }

    pub fn breed(&self) -> &BreedName {
        &self.breed
    }

    pub fn image(&self) -> Option<&Url> {
        self.image.as_ref()
    }
}

/// Parse an absolute http(s) URL with a host.
pub fn parse_image_url(input: &str) -> Result<Url, ValidationError> {
    let input = input.trim();
    let len = input.chars().count();
    if len > MAX_IMAGE_URL_LEN {
        return Err(ValidationError::ImageTooLong {
            len,
            max: MAX_IMAGE_URL_LEN,
        });
    }

    let url = Url::parse(input).map_err(|e| ValidationError::InvalidImageUrl {
        value: input.to_owned(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ValidationError::UnsupportedImageScheme {
            scheme: url.scheme().to_owned(),
        });
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ValidationError::ImageMissingHost {
            value: input.to_owned(),
        });
    }

    Ok(url)
}
