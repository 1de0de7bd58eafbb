use std::fmt;

/// Title used when a page has no usable `<title>`.
pub const NO_TITLE_SENTINEL: &str = "No Title Found";

/// Closed set of labels the classifier may assign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    TechnicalDocumentation,
    Shopping,
    Multimedia,
    SocialMedia,
    News,
    Educational,
    Productivity,
    Entertainment,
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::TechnicalDocumentation,
        Category::Shopping,
        Category::Multimedia,
        Category::SocialMedia,
        Category::News,
        Category::Educational,
        Category::Productivity,
        Category::Entertainment,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::TechnicalDocumentation => "Technical Documentation",
            Category::Shopping => "E-commerce/Shopping",
            Category::Multimedia => "Video/Multimedia",
            Category::SocialMedia => "Social Media",
            Category::News => "News/Articles",
            Category::Educational => "Educational Resources",
            Category::Productivity => "Productivity Tools",
            Category::Entertainment => "Entertainment",
            Category::Other => "Other",
        }
    }

    /// Maps free model output onto the closed set. Matching ignores case and
    /// surrounding whitespace; anything unrecognised becomes `Other`.
    pub fn from_model_output(raw: &str) -> Self {
        let needle = raw.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(needle))
            .unwrap_or(Category::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
