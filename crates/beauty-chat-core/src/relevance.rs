//! Keyword gate restricting questions to the beauty domain.

/// Topic keywords. A question is on-topic if it contains any of them.
pub const KEYWORDS: &[&str] = &[
    "l'oreal",
    "loreal",
    "beauty",
    "skincare",
    "skin care",
    "haircare",
    "hair care",
    "makeup",
    "cosmetic",
    "product",
    "routine",
    "shampoo",
    "conditioner",
    "serum",
    "moisturizer",
    "foundation",
    "mascara",
    "lipstick",
    "fragrance",
    "brand",
];

/// Case-insensitive substring match against [`KEYWORDS`]. Accents are kept,
/// so "L'Oréal" alone does not match "l'oreal".
pub fn is_relevant(question: &str) -> bool {
    let q = question.to_lowercase();
    KEYWORDS.iter().any(|keyword| q.contains(keyword))
}
