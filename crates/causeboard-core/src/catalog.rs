#![forbid(unsafe_code)]

//! Catalog store: the page's static causes and events.
//!
//! A [`Catalog`] is built once at startup and never mutated afterwards. It is
//! owned by the site model and lent by reference to every component that
//! needs it.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of a [`Cause`]. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct CauseId(u32);

impl CauseId {
    /// Wrap a raw id. Returns `None` for zero.
    #[must_use]
    pub const fn new(raw: u32) -> Option<Self> {
        if raw == 0 { None } else { Some(Self(raw)) }
    }

    /// The raw integer value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Parse the value of a card's `data-id` attribute.
    ///
    /// Surrounding whitespace is tolerated; anything else that is not a
    /// positive integer yields `None`.
    #[must_use]
    pub fn parse_attr(raw: &str) -> Option<Self> {
        raw.trim().parse::<u32>().ok().and_then(Self::new)
    }
}

impl TryFrom<u32> for CauseId {
    type Error = CatalogError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        Self::new(raw).ok_or(CatalogError::ZeroId)
    }
}

impl From<CauseId> for u32 {
    fn from(id: CauseId) -> Self {
        id.0
    }
}

impl fmt::Display for CauseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A sponsorable initiative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cause {
    pub id: CauseId,
    /// Open-ended tag such as `education` or `health`.
    pub category: String,
    pub title: String,
    pub short_description: String,
    pub image_url: String,
    /// Pre-formatted rich text. Inserted into the page as-is.
    pub details_markup: String,
}

/// A scheduled activity. Rendered as a flat list, never selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    /// Display string, not a parsed date.
    pub date: String,
    pub details: String,
}

/// Catalog construction failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A cause was declared with id `0`.
    ZeroId,
    /// Two causes share the same id.
    DuplicateId(CauseId),
    /// The JSON fixture could not be decoded.
    Parse(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroId => write!(f, "cause id must be positive"),
            Self::DuplicateId(id) => write!(f, "duplicate cause id {id}"),
            Self::Parse(msg) => write!(f, "invalid catalog json: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Wire shape of a JSON fixture; ids are validated after decoding.
#[derive(Deserialize)]
struct RawCatalog {
    #[serde(default)]
    causes: Vec<RawCause>,
    #[serde(default)]
    events: Vec<Event>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCause {
    id: u32,
    category: String,
    title: String,
    short_description: String,
    image_url: String,
    details_markup: String,
}

/// Immutable collection of causes and events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    causes: Vec<Cause>,
    events: Vec<Event>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate cause ids.
    pub fn new(causes: Vec<Cause>, events: Vec<Event>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(causes.len());
        for cause in &causes {
            if !seen.insert(cause.id) {
                return Err(CatalogError::DuplicateId(cause.id));
            }
        }
        Ok(Self { causes, events })
    }

    /// Decode a `{"causes": [...], "events": [...]}` fixture.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog =
            serde_json::from_str(json).map_err(|err| CatalogError::Parse(err.to_string()))?;
        let causes = raw
            .causes
            .into_iter()
            .map(|c| {
                Ok(Cause {
                    id: CauseId::try_from(c.id)?,
                    category: c.category,
                    title: c.title,
                    short_description: c.short_description,
                    image_url: c.image_url,
                    details_markup: c.details_markup,
                })
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;
        Self::new(causes, raw.events)
    }

    /// The page's compiled-in fixture.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            causes: builtin_causes(),
            events: builtin_events(),
        }
    }

    /// Causes in insertion order.
    #[must_use]
    pub fn causes(&self) -> &[Cause] {
        &self.causes
    }

    /// Events in insertion order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Look up a cause by exact id.
    #[must_use]
    pub fn find(&self, id: CauseId) -> Option<&Cause> {
        self.causes.iter().find(|c| c.id == id)
    }
}

fn cause(
    id: u32,
    category: &str,
    title: &str,
    short_description: &str,
    image_url: &str,
    details: [&str; 3],
) -> Cause {
    let [objective, activities, impact] = details;
    Cause {
        id: CauseId(id),
        category: category.to_owned(),
        title: title.to_owned(),
        short_description: short_description.to_owned(),
        image_url: image_url.to_owned(),
        details_markup: format!(
            "<p><strong>Objective:</strong> {objective}</p>\n\
             <p><strong>Activities:</strong> {activities}</p>\n\
             <p><strong>Impact Story:</strong> {impact}</p>"
        ),
    }
}

fn builtin_causes() -> Vec<Cause> {
    vec![
        cause(
            1,
            "education",
            "📚 Education for All",
            "Providing quality education to underprivileged children.",
            "https://picsum.photos/seed/edu/600/400",
            [
                "Build learning hubs and provide scholarships.",
                "After-school tutoring, teacher training, school kits distribution.",
                "Students in village X improved pass rates from 45% to 82% in 2 years.",
            ],
        ),
        cause(
            2,
            "health",
            "❤️ Healthcare Access",
            "Mobile health camps & maternal care in rural areas.",
            "https://picsum.photos/seed/health/600/400",
            [
                "Improve healthcare access and awareness.",
                "Free checkups, vaccination drives, health education.",
                "Camp in region Y vaccinated 1,200 children in one week.",
            ],
        ),
        cause(
            3,
            "environment",
            "🌱 Environment Protection",
            "Tree plantation and clean-up campaigns.",
            "https://picsum.photos/seed/env/600/400",
            [
                "Restore green cover and reduce waste.",
                "Tree drives, waste segregation workshops, awareness walks.",
                "Planted 5,000 trees with local school partnerships last year.",
            ],
        ),
        cause(
            4,
            "women",
            "👩‍🦰 Women Empowerment",
            "Skill training and microenterprise support for women.",
            "https://picsum.photos/seed/women/600/400",
            [
                "Economic independence for women.",
                "Vocational training, business mentoring, seed funding.",
                "60 women launched small businesses and increased household incomes.",
            ],
        ),
        cause(
            5,
            "disaster",
            "🆘 Disaster Relief",
            "Rapid response, relief kits, and rehabilitation support.",
            "https://picsum.photos/seed/disaster/600/400",
            [
                "Quick, effective emergency response.",
                "Relief distribution, medical support, rebuilding homes.",
                "Provided emergency kits to 3,000 affected families after flood Z.",
            ],
        ),
    ]
}

fn builtin_events() -> Vec<Event> {
    [
        (
            "🌳 Tree Plantation Drive",
            "December 15, 2025",
            "Join us to plant trees and restore green cover.",
        ),
        (
            "🏥 Free Health Camp",
            "January 2, 2026",
            "Free consultations and medicines for the community.",
        ),
        (
            "🎓 Scholarship Distribution",
            "November 20, 2025",
            "Scholarships for meritorious students.",
        ),
    ]
    .into_iter()
    .map(|(title, date, details)| Event {
        title: title.to_owned(),
        date: date.to_owned(),
        details: details.to_owned(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_ids_are_unique_and_ordered() {
        let catalog = Catalog::builtin();
        let ids: Vec<u32> = catalog.causes().iter().map(|c| c.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert!(Catalog::new(catalog.causes().to_vec(), Vec::new()).is_ok());
        assert_eq!(catalog.events().len(), 3);
    }

    #[test]
    fn find_uses_exact_id() {
        let catalog = Catalog::builtin();
        let id = CauseId::new(2).unwrap();
        assert_eq!(catalog.find(id).unwrap().title, "❤️ Healthcare Access");
        assert!(catalog.find(CauseId::new(99).unwrap()).is_none());
    }

    #[test]
    fn parse_attr_accepts_only_positive_integers() {
        assert_eq!(CauseId::parse_attr("3"), CauseId::new(3));
        assert_eq!(CauseId::parse_attr(" 4 "), CauseId::new(4));
        assert_eq!(CauseId::parse_attr("0"), None);
        assert_eq!(CauseId::parse_attr("-1"), None);
        assert_eq!(CauseId::parse_attr("2.0"), None);
        assert_eq!(CauseId::parse_attr("abc"), None);
        assert_eq!(CauseId::parse_attr(""), None);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut causes = Catalog::builtin().causes().to_vec();
        causes[1].id = causes[0].id;
        let err = Catalog::new(causes, Vec::new()).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateId(CauseId::new(1).unwrap()));
    }

    #[test]
    fn from_json_decodes_camel_case_fixture() {
        let json = r#"{
            "causes": [{
                "id": 7,
                "category": "water",
                "title": "Clean Water",
                "shortDescription": "Wells for villages.",
                "imageUrl": "https://example.org/w.png",
                "detailsMarkup": "<p>Wells</p>"
            }],
            "events": [{"title": "Walk", "date": "May 1", "details": "Bring shoes."}]
        }"#;
        let catalog = Catalog::from_json(json).unwrap();
        let cause = catalog.find(CauseId::new(7).unwrap()).unwrap();
        assert_eq!(cause.short_description, "Wells for villages.");
        assert_eq!(cause.details_markup, "<p>Wells</p>");
        assert_eq!(catalog.events()[0].date, "May 1");
    }

    #[test]
    fn from_json_rejects_zero_and_garbage() {
        let zero = r#"{"causes":[{"id":0,"category":"a","title":"t","shortDescription":"d","imageUrl":"u","detailsMarkup":""}]}"#;
        assert_eq!(Catalog::from_json(zero).unwrap_err(), CatalogError::ZeroId);
        assert!(matches!(
            Catalog::from_json("{not json"),
            Err(CatalogError::Parse(_))
        ));
    }
}
