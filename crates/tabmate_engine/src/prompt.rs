use tabmate_core::Category;

use crate::PageSummary;

/// Prompt asking for one classification object for `url`.
pub fn classification_prompt(url: &str, page: &PageSummary) -> String {
    let categories = Category::ALL
        .iter()
        .map(|category| format!("- {}", category.label()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyze this URL and content snippet. Categorize it into exactly one of these types:\n\
         {categories}\n\
         \n\
         URL: {url}\n\
         Title: {title}\n\
         Content: {snippet}\n\
         \n\
         Return a JSON object with the following keys: id, title, url, category.\n\
         The category must be one of the types above, spelled exactly as listed.\n\
         Respond ONLY with the JSON object, nothing else.",
        title = page.title,
        snippet = page.snippet,
    )
}

pub const FILTER_SYSTEM_PROMPT: &str = r#"You translate browser tab management commands into a JSON filter.
Each tab has the fields: id, title, url, category.
Respond with a single JSON object with optional "include" and "exclude" keys.
Each key maps field names to the exact value a tab must have ("include") or must not have ("exclude").
Do not write any prose, explanation or code fences.

Example 1
Command: remove music tabs
Filter: {"exclude": {"category": "Music"}}

Example 2
Command: only keep my shopping tabs
Filter: {"include": {"category": "Shopping"}}"#;
