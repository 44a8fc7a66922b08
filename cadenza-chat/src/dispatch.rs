//! Typed intent dispatch.
//!
//! The registry is a closed enum: every intent names a handler with a
//! fixed argument schema, and JSON arguments are validated against that
//! schema — missing and unknown fields are both rejected — before the
//! handler runs. Intent *identification* (deciding which intent a user
//! utterance maps to) is the retrieval layer's job and happens upstream;
//! by the time a value reaches [`call_intent`] the intent is already a
//! typed variant, not a string to look up.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Style prefix prepended to every generated image prompt.
const POSITIVE_PREFIX: &str = "masterpiece,best quality";
/// Prefix for the keywords the image model should avoid.
const NEGATIVE_PREFIX: &str = "(low quality, worst quality:1.4)";

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invalid arguments for {intent}: {reason}")]
    InvalidArgs { intent: Intent, reason: String },
}

/// Every intent the chat loop can dispatch. Closed set — adding an intent
/// means adding a variant, its argument struct, and its handler arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// "Draw me a …" / "show me what you look like" requests: turn keyword
    /// lists into an image-generation prompt.
    GenerateImagePrompt,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::GenerateImagePrompt => "generate_image_prompt",
        })
    }
}

/// Example phrasings the retrieval layer indexes per intent.
pub fn phrasings(intent: Intent) -> &'static [&'static str] {
    match intent {
        Intent::GenerateImagePrompt => &[
            "can you draw me a [object]",
            "show me what you look like",
            "send me a picture of [object]",
            "draw a [image] for me",
        ],
    }
}

/// Arguments for [`Intent::GenerateImagePrompt`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ImagePromptArgs {
    /// Comma-separated keywords describing the drawing.
    positive: String,
    /// Comma-separated keywords to avoid in the drawing.
    negative: String,
}

/// What a handler produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum IntentOutput {
    ImagePrompt { positive: String, negative: String },
}

/// Validate `args` against the intent's schema and run its handler.
pub fn call_intent(intent: Intent, args: &serde_json::Value) -> Result<IntentOutput, DispatchError> {
    debug!(%intent, "dispatching intent");
    match intent {
        Intent::GenerateImagePrompt => {
            let args: ImagePromptArgs = parse_args(intent, args)?;
            Ok(IntentOutput::ImagePrompt {
                positive: join_keywords(POSITIVE_PREFIX, &args.positive),
                negative: join_keywords(NEGATIVE_PREFIX, &args.negative),
            })
        }
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(
    intent: Intent,
    args: &serde_json::Value,
) -> Result<T, DispatchError> {
    serde_json::from_value(args.clone()).map_err(|e| DispatchError::InvalidArgs {
        intent,
        reason: e.to_string(),
    })
}

fn join_keywords(prefix: &str, keywords: &str) -> String {
    let keywords = keywords.trim();
    if keywords.is_empty() {
        prefix.to_string()
    } else {
        format!("{prefix},{keywords}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn valid_args_produce_a_prefixed_prompt() {
        let out = call_intent(
            Intent::GenerateImagePrompt,
            &json!({"positive": "red fox, forest", "negative": "blurry"}),
        )
        .unwrap();
        assert_eq!(
            out,
            IntentOutput::ImagePrompt {
                positive: "masterpiece,best quality,red fox, forest".into(),
                negative: "(low quality, worst quality:1.4),blurry".into(),
            }
        );
    }

    #[test]
    fn empty_keywords_leave_just_the_prefixes() {
        let out = call_intent(
            Intent::GenerateImagePrompt,
            &json!({"positive": "", "negative": "  "}),
        )
        .unwrap();
        assert_eq!(
            out,
            IntentOutput::ImagePrompt {
                positive: POSITIVE_PREFIX.into(),
                negative: NEGATIVE_PREFIX.into(),
            }
        );
    }

    #[test]
    fn missing_field_is_rejected_before_invocation() {
        let err = call_intent(Intent::GenerateImagePrompt, &json!({"positive": "a cat"}))
            .unwrap_err();
        let DispatchError::InvalidArgs { intent, reason } = err;
        assert_eq!(intent, Intent::GenerateImagePrompt);
        assert!(reason.contains("negative"), "reason: {reason}");
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = call_intent(
            Intent::GenerateImagePrompt,
            &json!({"positive": "a", "negative": "b", "steps": 20}),
        )
        .unwrap_err();
        let DispatchError::InvalidArgs { reason, .. } = err;
        assert!(reason.contains("steps"), "reason: {reason}");
    }

    #[test]
    fn wrong_type_is_rejected() {
        assert!(call_intent(
            Intent::GenerateImagePrompt,
            &json!({"positive": 1, "negative": "b"}),
        )
        .is_err());
    }

    #[test]
    fn intent_serializes_snake_case() {
        let json = serde_json::to_value(Intent::GenerateImagePrompt).unwrap();
        assert_eq!(json, "generate_image_prompt");
        let back: Intent = serde_json::from_value(json).unwrap();
        assert_eq!(back, Intent::GenerateImagePrompt);
    }

    #[test]
    fn every_intent_has_phrasings() {
        assert!(!phrasings(Intent::GenerateImagePrompt).is_empty());
    }
}
