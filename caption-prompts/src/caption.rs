use std::collections::HashMap;

use caption_primitives::ToneOption;
use tracing::trace;

use crate::template::PromptTemplate;

/// Marker that introduces the caption line in a completion.
pub const CAPTION_MARKER: &str = "CAPTION:";

/// Marker that introduces the hashtag line in a completion.
pub const HASHTAGS_MARKER: &str = "HASHTAGS:";

/// Sentence used in place of an empty or blank context.
pub const EMPTY_CONTEXT_PLACEHOLDER: &str = "No additional context provided";

const CAPTION_PROMPT: &str = "
You are a TikTok content expert. Generate a viral caption and strategic hashtags for a TikTok video.

Video Context: {{context}}
Desired Tone: {{tone}}

Requirements:
1. {{caption_marker}} Create a {{tone}} caption that's engaging, under 150 characters, and follows TikTok trends
2. {{hashtags_marker}} Provide 8-12 hashtags including:
   - 2-3 trending/popular hashtags
   - 2-3 niche/community hashtags
   - 2-3 content-specific hashtags
   - 1-2 brand/creator hashtags (if applicable)

Format your response exactly as:
{{caption_marker}} [your caption here]
{{hashtags_marker}} [hashtag1] [hashtag2] [hashtag3] [hashtag4] [hashtag5] [hashtag6] [hashtag7] [hashtag8] [hashtag9] [hashtag10]

Make it engaging, authentic, and optimized for TikTok's algorithm.
";

/// Builds the instruction sent to the completion service.
#[derive(Clone, Debug)]
pub struct CaptionPromptBuilder {
    template: PromptTemplate,
}

impl Default for CaptionPromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptionPromptBuilder {
    /// Creates a builder around the standard caption prompt.
    #[must_use]
    pub fn new() -> Self {
        let template = PromptTemplate::builder(CAPTION_PROMPT)
            .with_variable("caption_marker", CAPTION_MARKER)
            .with_variable("hashtags_marker", HASHTAGS_MARKER)
            .with_required_variable("context")
            .with_required_variable("tone")
            .build();
        Self { template }
    }

    /// Renders the prompt for `tone` and `context`.
    ///
    /// The context is embedded verbatim unless it is blank, in which case
    /// [`EMPTY_CONTEXT_PLACEHOLDER`] is used.
    #[must_use]
    pub fn build(&self, tone: ToneOption, context: &str) -> String {
        let context = if context.trim().is_empty() {
            EMPTY_CONTEXT_PLACEHOLDER.to_owned()
        } else {
            context.to_owned()
        };
        let values = HashMap::from([("context", context), ("tone", tone.as_str().to_owned())]);

        let prompt = self
            .template
            .render_with(&values)
            .expect("caption prompt is well formed and every required variable is supplied");
        trace!(tone = %tone, bytes = prompt.len(), "built caption prompt");
        prompt
    }
}
