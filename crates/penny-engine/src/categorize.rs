//! Keyword-driven category inference for free-text descriptions.

pub const CATEGORY_INCOME: &str = "income";
pub const CATEGORY_TRANSFER: &str = "transfer";
pub const CATEGORY_OTHER: &str = "other";

/// Keyword bags per category, in tie-break order.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "food",
        &[
            "starbucks", "coffee", "restaurant", "cafe", "pizza", "burger", "grocery",
            "groceries", "supermarket", "lunch", "dinner", "breakfast", "bakery", "takeout",
            "mcdonald", "food",
        ],
    ),
    (
        "transport",
        &[
            "uber", "lyft", "taxi", "bus", "train", "metro", "fuel", "gas station", "parking",
            "toll", "car wash",
        ],
    ),
    (
        "shopping",
        &[
            "amazon", "mall", "clothes", "clothing", "shoes", "target", "walmart", "ikea",
            "shopping",
        ],
    ),
    (
        "entertainment",
        &[
            "netflix", "spotify", "cinema", "movie", "concert", "steam", "playstation",
            "theater", "game",
        ],
    ),
    (
        "utilities",
        &[
            "electric", "electricity", "water bill", "internet", "wifi", "phone", "mobile",
            "heating", "utility",
        ],
    ),
    (
        "health",
        &[
            "pharmacy", "doctor", "dentist", "hospital", "clinic", "gym", "fitness", "medicine",
        ],
    ),
    (
        "education",
        &["tuition", "course", "udemy", "textbook", "school", "university"],
    ),
    (
        "travel",
        &["hotel", "flight", "airbnb", "airline", "booking", "travel"],
    ),
    (
        "bills",
        &["rent", "mortgage", "insurance", "subscription", "lease", "bill"],
    ),
];

/// Keywords that mark a movement between the user's own accounts.
const TRANSFER_KEYWORDS: &[&str] = &["transfer", "wire", "zelle", "venmo", "moved to savings"];

/// Infers a category id for a transaction description.
///
/// Income short-circuits, then transfers; otherwise each category is
/// scored by the total character length of its matched keywords and the
/// highest score wins, with ties broken by table order.
pub fn categorize(description: &str, _amount_cents: i64, is_income: bool) -> &'static str {
    if is_income {
        return CATEGORY_INCOME;
    }
    let normalized = description.trim().to_lowercase();
    if normalized.is_empty() {
        return CATEGORY_OTHER;
    }
    if TRANSFER_KEYWORDS.iter().any(|kw| normalized.contains(kw)) {
        return CATEGORY_TRANSFER;
    }

    let mut best = (CATEGORY_OTHER, 0usize);
    for (category, keywords) in CATEGORY_KEYWORDS {
        let score: usize = keywords
            .iter()
            .filter(|kw| normalized.contains(*kw))
            .map(|kw| kw.len())
            .sum();
        if score > best.1 {
            best = (category, score);
        }
    }
    best.0
}
