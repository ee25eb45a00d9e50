use std::{collections::BTreeSet, sync::OnceLock};

use scraper::{Html, Selector};

/// Substring that marks a meal detail link on a menu page.
pub const MEAL_LINK: &str = "meals";
/// Substring that marks a recipe card link on a meal page.
pub const DOCUMENT_LINK: &str = "pdf";

/// Every anchor href containing `needle`, deduplicated and sorted.
pub fn extract_links(html: &str, needle: &str) -> BTreeSet<String> {
    static ANCHOR: OnceLock<Selector> = OnceLock::new();
    let anchor = ANCHOR.get_or_init(|| Selector::parse("a[href]").expect("selector should be valid"));
    let document = Html::parse_document(html);
    document
        .select(anchor)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter(|href| href.contains(needle))
        .map(str::to_owned)
        .collect()
}
