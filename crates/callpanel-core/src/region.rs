use crate::error::{CallsError, Result};
use crate::markup::{self, Element};
use std::fmt;

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

/// `.class` or `#id`, the two forms the panel's controls are addressed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    Class(String),
    Id(String),
}

impl Selector {
    pub fn class(name: impl Into<String>) -> Self {
        Selector::Class(name.into())
    }

    pub fn id(name: impl Into<String>) -> Self {
        Selector::Id(name.into())
    }

    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Selector::Class(c) => element.has_class(c),
            Selector::Id(id) => element.id() == Some(id.as_str()),
        }
    }
}

impl serde::Serialize for Selector {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Class(c) => write!(f, ".{c}"),
            Selector::Id(id) => write!(f, "#{id}"),
        }
    }
}

impl std::str::FromStr for Selector {
    type Err = CallsError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CallsError::InvalidSelector(s.to_string());
        let mut chars = s.chars();
        let kind = chars.next().ok_or_else(invalid)?;
        let name = chars.as_str();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(invalid());
        }
        match kind {
            '.' => Ok(Selector::Class(name.to_string())),
            '#' => Ok(Selector::Id(name.to_string())),
            _ => Err(invalid()),
        }
    }
}

// ---------------------------------------------------------------------------
// PageRegion
// ---------------------------------------------------------------------------

/// The live content region: the one subtree the server re-renders and the
/// panel replaces wholesale on every refresh.
///
/// Elements are identified by their document-order index within a
/// generation. Every swap bumps the generation, so an index captured before
/// a swap can be told apart from one captured after it.
#[derive(Debug, Clone)]
pub struct PageRegion {
    marker: String,
    markup: String,
    elements: Vec<Element>,
    generation: u64,
}

impl PageRegion {
    /// An empty region that has not been loaded yet (generation 0).
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            markup: String::new(),
            elements: Vec::new(),
            generation: 0,
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loaded(&self) -> bool {
        self.generation > 0
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    pub fn element_mut(&mut self, index: usize) -> Option<&mut Element> {
        self.elements.get_mut(index)
    }

    /// Elements matching `selector`, with their indices.
    pub fn select<'a>(
        &'a self,
        selector: &'a Selector,
    ) -> impl Iterator<Item = (usize, &'a Element)> + 'a {
        self.elements
            .iter()
            .enumerate()
            .filter(move |(_, el)| selector.matches(el))
    }

    pub fn first_index(&self, selector: &Selector) -> Option<usize> {
        self.select(selector).map(|(i, _)| i).next()
    }

    /// Replace the region's contents with already-extracted inner markup.
    /// Returns the new generation.
    pub fn replace_contents(&mut self, inner: String) -> u64 {
        self.elements = markup::scan_elements(&inner);
        self.markup = inner;
        self.generation += 1;
        self.generation
    }

    /// Cut the region out of a full page and swap it in.
    ///
    /// Extraction happens before anything is touched, so a page without the
    /// region leaves the current contents intact.
    pub fn swap_from_page(&mut self, page: &str) -> Result<u64> {
        let inner = markup::extract_region(page, &self.marker)?;
        Ok(self.replace_contents(inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> String {
        format!(r#"<html><body><div class="container">{body}</div></body></html>"#)
    }

    #[test]
    fn selector_parses_class_and_id() {
        assert_eq!(".npr-call".parse::<Selector>().unwrap(), Selector::class("npr-call"));
        assert_eq!(
            "#uncall-chamber".parse::<Selector>().unwrap(),
            Selector::id("uncall-chamber")
        );
        assert!("npr-call".parse::<Selector>().is_err());
        assert!(".".parse::<Selector>().is_err());
        assert!("".parse::<Selector>().is_err());
    }

    #[test]
    fn swap_bumps_generation_and_rescans() {
        let mut region = PageRegion::new("container");
        assert!(!region.is_loaded());

        let g1 = region
            .swap_from_page(&page(r#"<button class="npr-call">a</button>"#))
            .unwrap();
        assert_eq!(g1, 1);
        assert_eq!(region.select(&Selector::class("npr-call")).count(), 1);

        let g2 = region
            .swap_from_page(&page(
                r#"<button class="npr-call">a</button><button class="npr-call">b</button>"#,
            ))
            .unwrap();
        assert_eq!(g2, 2);
        assert_eq!(region.select(&Selector::class("npr-call")).count(), 2);
    }

    #[test]
    fn failed_swap_leaves_region_intact() {
        let mut region = PageRegion::new("container");
        region
            .swap_from_page(&page(r#"<button id="uncall-chamber">x</button>"#))
            .unwrap();
        let before = region.markup().to_string();

        assert!(region.swap_from_page("Server error").is_err());
        assert_eq!(region.markup(), before);
        assert_eq!(region.generation(), 1);
        assert!(region.first_index(&Selector::id("uncall-chamber")).is_some());
    }
}
