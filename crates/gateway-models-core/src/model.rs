use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::provider::derive_provider;

/// One entry of the gateway's `/models` listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub id: String,
    #[serde(default)]
    pub canonical_slug: Option<String>,
    #[serde(default)]
    pub name: String,
    /// Unix seconds.
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub context_length: u64,
    #[serde(default)]
    pub architecture: Architecture,
    #[serde(default)]
    pub pricing: Pricing,
    #[serde(default)]
    pub top_provider: TopProvider,
    #[serde(default)]
    pub supported_parameters: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Architecture {
    #[serde(default)]
    pub modality: Option<String>,
    #[serde(default)]
    pub input_modalities: Vec<String>,
    #[serde(default)]
    pub output_modalities: Vec<String>,
    #[serde(default)]
    pub tokenizer: Option<String>,
    #[serde(default)]
    pub instruct_type: Option<String>,
}

/// Per-token prices as decimal strings. The gateway sends some of these as
/// JSON numbers, so both forms are accepted and normalized to strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pricing {
    #[serde(default = "zero", deserialize_with = "decimal")]
    pub prompt: String,
    #[serde(default = "zero", deserialize_with = "decimal")]
    pub completion: String,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub request: Option<String>,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub web_search: Option<String>,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub internal_reasoning: Option<String>,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub input_cache_read: Option<String>,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            prompt: zero(),
            completion: zero(),
            request: None,
            image: None,
            web_search: None,
            internal_reasoning: None,
            input_cache_read: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopProvider {
    #[serde(default)]
    pub context_length: Option<u64>,
    #[serde(default)]
    pub max_completion_tokens: Option<u64>,
    #[serde(default)]
    pub is_moderated: bool,
}

/// The `{ "data": [...] }` envelope returned by the gateway.
#[derive(Debug, Deserialize)]
pub struct ModelsResponse {
    #[serde(default)]
    pub data: Option<Vec<ModelDescriptor>>,
}

/// Decode a gateway response body. A missing or null `data` field is an
/// empty catalog.
pub fn parse_catalog(body: &[u8]) -> Result<Vec<ModelDescriptor>> {
    let parsed: ModelsResponse = serde_json::from_slice(body)?;
    Ok(parsed.data.unwrap_or_default())
}

fn zero() -> String {
    "0".to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDecimal {
    Str(String),
    Num(serde_json::Number),
}

impl From<RawDecimal> for String {
    fn from(raw: RawDecimal) -> Self {
        match raw {
            RawDecimal::Str(s) => s,
            RawDecimal::Num(n) => n.to_string(),
        }
    }
}

fn decimal<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<String, D::Error> {
    Ok(Option::<RawDecimal>::deserialize(de)?
        .map(String::from)
        .unwrap_or_else(zero))
}

fn opt_decimal<'de, D: Deserializer<'de>>(
    de: D,
) -> std::result::Result<Option<String>, D::Error> {
    Ok(Option::<RawDecimal>::deserialize(de)?.map(String::from))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Text,
    Image,
    Audio,
    Video,
}

impl Modality {
    pub fn parse(raw: &str) -> Option<Self> {
        let base = raw.to_lowercase();
        let base = base.split('+').next().unwrap_or("").trim().to_string();
        match base.as_str() {
            "text" => Some(Self::Text),
            "image" => Some(Self::Image),
            "audio" => Some(Self::Audio),
            "video" => Some(Self::Video),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Image => "Image",
            Self::Audio => "Audio",
            Self::Video => "Video",
        }
    }
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Parse a decimal price string. Unparseable input yields `None`.
pub fn parse_price(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

impl ModelDescriptor {
    pub fn provider(&self) -> &str {
        derive_provider(&self.id)
    }

    /// Free iff both prompt and completion prices parse to exactly zero.
    pub fn is_free(&self) -> bool {
        parse_price(&self.pricing.prompt) == Some(0.0)
            && parse_price(&self.pricing.completion) == Some(0.0)
    }

    /// Input modalities reduced to their base kind, deduplicated in
    /// first-seen order. Compound entries like `"text+image"` count as
    /// their first segment only.
    pub fn input_modalities(&self) -> Vec<Modality> {
        let mut out = Vec::new();
        for m in self
            .architecture
            .input_modalities
            .iter()
            .filter_map(|m| Modality::parse(m))
        {
            if !out.contains(&m) {
                out.push(m);
            }
        }
        out
    }

    /// Case-insensitive substring match against name, id and description.
    /// `needle` must already be lowercased.
    pub fn matches_search(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.id.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .map(|d| d.to_lowercase().contains(needle))
                .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(prompt: serde_json::Value, completion: serde_json::Value) -> ModelDescriptor {
        serde_json::from_value(json!({
            "id": "meta/llama-3",
            "name": "Llama 3",
            "pricing": {"prompt": prompt, "completion": completion}
        }))
        .unwrap()
    }

    #[test]
    fn free_when_both_prices_zero() {
        assert!(descriptor(json!("0"), json!("0")).is_free());
        assert!(descriptor(json!(0), json!("0.0")).is_free());
    }

    #[test]
    fn not_free_when_any_price_nonzero() {
        assert!(!descriptor(json!("0.00001"), json!("0")).is_free());
        assert!(!descriptor(json!("0"), json!("0.000002")).is_free());
    }

    #[test]
    fn unparseable_price_is_not_free() {
        assert!(!descriptor(json!("-"), json!("0")).is_free());
        assert!(!descriptor(json!(""), json!("0")).is_free());
    }

    #[test]
    fn numeric_prices_normalize_to_strings() {
        let m = descriptor(json!(0.25), json!(1));
        assert_eq!(m.pricing.prompt, "0.25");
        assert_eq!(m.pricing.completion, "1");
    }

    #[test]
    fn modalities_use_base_segment_and_dedup() {
        let m: ModelDescriptor = serde_json::from_value(json!({
            "id": "openai/gpt-4o",
            "name": "GPT-4o",
            "architecture": {
                "input_modalities": ["text", "Image", "text+image", "file", " audio "]
            }
        }))
        .unwrap();
        assert_eq!(
            m.input_modalities(),
            vec![Modality::Text, Modality::Image, Modality::Audio]
        );
    }

    #[test]
    fn search_matches_any_field() {
        let m: ModelDescriptor = serde_json::from_value(json!({
            "id": "openai/gpt-4",
            "name": "GPT-4",
            "description": "Flagship Reasoning model"
        }))
        .unwrap();
        assert!(m.matches_search("gpt"));
        assert!(m.matches_search("openai/"));
        assert!(m.matches_search("reasoning"));
        assert!(!m.matches_search("claude"));
    }
}
