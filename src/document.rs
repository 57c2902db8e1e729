/*!
# Documents

Decodes input bytes into the value tree that path expressions run against.

The decoded value is the single implicit root entry of the document: the
first segment of a path always starts from it, whether the top-level value is
an object, an array, or a scalar. Decoding happens once, up front; a malformed
input is reported as a [`DecodeError`] before any evaluation starts.

```
use jpath::{Document, InputFormat};

let input = br#"[{"text": "foo"}, {"text": "bar"}]"#;
let doc = Document::from_slice(input, InputFormat::Json).expect("valid JSON");
let path = "[*].text".into();
let texts: Vec<_> = doc
    .fetch(&path)
    .map(|item| item.map(|m| m.value.to_string()))
    .collect();
assert_eq!(texts, vec![Ok(r#""foo""#.to_string()), Ok(r#""bar""#.to_string())]);
```
*/
use serde_json::Value;
use std::{
    error::Error,
    fmt,
    io::{BufReader, Read},
    path::Path,
    str::FromStr,
};

use crate::path::{Evaluator, Matches, PathExpression};

/// Serialization formats a [`Document`] can be decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum InputFormat {
    /// JSON
    #[default]
    Json,
    /// YAML
    #[cfg(feature = "yaml")]
    Yaml,
    /// TOML
    #[cfg(feature = "toml")]
    Toml,
    /// CBOR
    #[cfg(feature = "cbor")]
    Cbor,
    /// `MessagePack`
    #[cfg(feature = "msgpack")]
    Msgpack,
}

impl InputFormat {
    /// Guesses the format from a file extension. Returns `None` for unknown
    /// or missing extensions.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            #[cfg(feature = "yaml")]
            "yaml" | "yml" => Some(Self::Yaml),
            #[cfg(feature = "toml")]
            "toml" => Some(Self::Toml),
            #[cfg(feature = "cbor")]
            "cbor" => Some(Self::Cbor),
            #[cfg(feature = "msgpack")]
            "msgpack" | "mpk" => Some(Self::Msgpack),
            _ => None,
        }
    }
}

/// The input could not be decoded into a value tree.
#[derive(Debug)]
pub enum DecodeError {
    /// Malformed JSON, or an I/O failure while reading it.
    Json(serde_json::Error),
    /// Malformed YAML.
    #[cfg(feature = "yaml")]
    Yaml(serde_yaml::Error),
    /// TOML input that is not valid UTF-8.
    #[cfg(feature = "toml")]
    Utf8(std::str::Utf8Error),
    /// Malformed TOML.
    #[cfg(feature = "toml")]
    Toml(toml::de::Error),
    /// Malformed CBOR.
    #[cfg(feature = "cbor")]
    Cbor(ciborium::de::Error<std::io::Error>),
    /// Malformed `MessagePack`.
    #[cfg(feature = "msgpack")]
    Msgpack(rmp_serde::decode::Error),
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            #[cfg(feature = "yaml")]
            Self::Yaml(err) => Some(err),
            #[cfg(feature = "toml")]
            Self::Utf8(err) => Some(err),
            #[cfg(feature = "toml")]
            Self::Toml(err) => Some(err),
            #[cfg(feature = "cbor")]
            Self::Cbor(err) => Some(err),
            #[cfg(feature = "msgpack")]
            Self::Msgpack(err) => Some(err),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid JSON: {err}"),
            #[cfg(feature = "yaml")]
            Self::Yaml(err) => write!(f, "invalid YAML: {err}"),
            #[cfg(feature = "toml")]
            Self::Utf8(err) => write!(f, "TOML input is not UTF-8: {err}"),
            #[cfg(feature = "toml")]
            Self::Toml(err) => write!(f, "invalid TOML: {err}"),
            #[cfg(feature = "cbor")]
            Self::Cbor(err) => write!(f, "invalid CBOR: {err}"),
            #[cfg(feature = "msgpack")]
            Self::Msgpack(err) => write!(f, "invalid MessagePack: {err}"),
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// A decoded document, owning its value tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Value,
}

impl Document {
    /// Wraps an already decoded value.
    #[must_use]
    pub const fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Decodes a JSON document from a reader. The reader is wrapped in a
    /// [`BufReader`], so a raw [`std::fs::File`] can be passed as is.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Json`] if the input is not a single JSON value
    /// or cannot be read.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DecodeError> {
        let reader = BufReader::new(reader);
        Ok(Self::from_value(serde_json::from_reader(reader)?))
    }

    /// Decodes `bytes` in the given format.
    ///
    /// # Errors
    ///
    /// Returns the [`DecodeError`] variant of `format` if the bytes are
    /// malformed.
    pub fn from_slice(
        bytes: &[u8],
        format: InputFormat,
    ) -> Result<Self, DecodeError> {
        let root: Value = match format {
            InputFormat::Json => serde_json::from_slice(bytes)?,
            #[cfg(feature = "yaml")]
            InputFormat::Yaml => {
                serde_yaml::from_slice(bytes).map_err(DecodeError::Yaml)?
            }
            #[cfg(feature = "toml")]
            InputFormat::Toml => {
                let text =
                    std::str::from_utf8(bytes).map_err(DecodeError::Utf8)?;
                toml::from_str(text).map_err(DecodeError::Toml)?
            }
            #[cfg(feature = "cbor")]
            InputFormat::Cbor => {
                ciborium::from_reader(bytes).map_err(DecodeError::Cbor)?
            }
            #[cfg(feature = "msgpack")]
            InputFormat::Msgpack => {
                rmp_serde::from_slice(bytes).map_err(DecodeError::Msgpack)?
            }
        };
        log::debug!("decoded {} byte(s) of {format:?}", bytes.len());
        Ok(Self::from_value(root))
    }

    /// The value every path starts from.
    #[must_use]
    pub const fn root(&self) -> &Value {
        &self.root
    }

    /// Consumes the document, returning its value tree.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.root
    }

    /// Lazily evaluates `path` with the default [`Evaluator`].
    #[must_use]
    pub fn fetch<'a>(&'a self, path: &'a PathExpression) -> Matches<'a> {
        self.fetch_with(Evaluator::new(), path)
    }

    /// Lazily evaluates `path` with a configured [`Evaluator`].
    #[must_use]
    pub fn fetch_with<'a>(
        &'a self,
        evaluator: Evaluator,
        path: &'a PathExpression,
    ) -> Matches<'a> {
        evaluator.fetch(&self.root, path)
    }
}

impl FromStr for Document {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slice(s.as_bytes(), InputFormat::Json)
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}
