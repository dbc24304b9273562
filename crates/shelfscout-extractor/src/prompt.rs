//! Prompt construction for intent extraction

/// Builds the prompt that asks the model for keywords and filters
pub struct PromptBuilder {
    query: String,
    language: String,
}

impl PromptBuilder {
    /// Create a new prompt builder for one query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: "auto-detect".to_string(),
        }
    }

    /// Set the language hint
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::with_capacity(
            EXTRACTION_INSTRUCTIONS.len() + EXAMPLES.len() + OUTPUT_FORMAT.len() + 256,
        );

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");
        prompt.push_str(EXAMPLES);
        prompt.push_str("\n\n");
        prompt.push_str(OUTPUT_FORMAT);
        prompt.push_str("\n\n");

        prompt.push_str(&format!("Language: {}\n", self.language));
        prompt.push_str("Query:\n---\n");
        prompt.push_str(self.query.trim());
        prompt.push_str("\n---\n");

        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"You turn shopper queries into product search keywords and filters.

Rules:
- Drop conversational openers ("i am", "i want", "can you", "show me")
- Drop search verbs ("find", "search", "look for", "get")
- Drop filler ("some", "any", "please", "thanks")
- Keep product nouns ("shirt", "dress", "shoes")
- Keep attributes such as colors, sizes and materials
- Keep brand names exactly as written
- Keep sale terms ("sale", "discount", "clearance")
- A negated request ("not interested in red dresses") yields no keywords and no filters
- Normalise hyphenated variants ("mini-skirt" becomes "mini skirt")
- Prices are plain numbers without currency symbols"#;

const EXAMPLES: &str = r#"Examples:

"i am looking for blue shirts"
{"keywords": ["blue", "shirts"], "filters": {"colors": ["blue"], "productType": "shirts"}, "cleanQuery": "blue shirts"}

"can you find me some sale items"
{"keywords": ["sale", "items"], "filters": {"sales": ["sale"]}, "cleanQuery": "sale items"}

"show me Arthur Ashe polo shirts"
{"keywords": ["Arthur Ashe", "polo", "shirts"], "filters": {"brands": ["Arthur Ashe"], "productType": "polo shirts"}, "cleanQuery": "Arthur Ashe polo shirts"}

"cotton mini-skirts under 300"
{"keywords": ["cotton", "mini skirts"], "filters": {"materials": ["cotton"], "productType": "mini skirts", "price": {"max": 300}}, "cleanQuery": "cotton mini skirts"}

"products between $50 and $200 in size m"
{"keywords": ["products"], "filters": {"sizes": ["M"], "price": {"min": 50, "max": 200}}, "cleanQuery": "products"}

"i am not interested in red dresses"
{"keywords": [], "filters": {}, "cleanQuery": "", "reasoning": "negative intent"}"#;

const OUTPUT_FORMAT: &str = r#"Output format (one JSON object only, no markdown, no commentary):
{
  "keywords": ["..."],
  "filters": {
    "productType": "...",
    "colors": ["..."],
    "sizes": ["..."],
    "materials": ["..."],
    "brands": ["..."],
    "sales": ["..."],
    "price": {"min": 0, "max": 0},
    "available": true
  },
  "cleanQuery": "...",
  "confidence": 0.0,
  "reasoning": "..."
}
Omit any filter the query does not mention."#;
