//! Navigation helpers over parsed markup.
//!
//! `scraper` selectors only look downward from a node. Catalog pages anchor
//! data on landmarks and then on whatever *follows* them, so these helpers
//! add document-order and sibling lookups on top of [`ElementRef`].

use scraper::{ElementRef, Selector};

/// Every element after `el` in document order, starting with its own
/// descendants.
pub fn following<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    let node = *el;
    let inner = node.descendants().skip(1);
    let outer = std::iter::once(node)
        .chain(node.ancestors())
        .flat_map(|n| n.next_siblings())
        .flat_map(|s| s.descendants());
    inner.chain(outer).filter_map(ElementRef::wrap)
}

/// First element after `el` in document order that matches `selector`.
pub fn find_next<'a>(el: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    following(el).find(|candidate| selector.matches(candidate))
}

/// First following sibling element of `el` that matches `selector`.
pub fn next_sibling_element<'a>(
    el: ElementRef<'a>,
    selector: &Selector,
) -> Option<ElementRef<'a>> {
    el.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| selector.matches(sibling))
}

/// First following sibling text node with non-whitespace content, trimmed.
pub fn next_text_sibling(el: ElementRef<'_>) -> Option<String> {
    el.next_siblings().find_map(|n| {
        n.value()
            .as_text()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    })
}

/// All text beneath `el`, concatenated and trimmed.
pub fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// First descendant of `el` matching `selector`.
pub fn select_first<'a>(el: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    el.select(selector).next()
}
