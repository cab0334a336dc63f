//! Category table and tax group selection.
//!
//! Every pet the bot knows about is listed once in [`CATEGORIES`]. Upload
//! validation, group resolution and directory provisioning all read from it.

use std::fmt;

/// Kind of pet a category belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    /// Dogs, uploaded with `/updog`
    Dog,
    /// Cats, uploaded with `/upcat`
    Cat,
}

impl Species {
    /// Selector keyword that picks every category of this species
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Dog => "dog",
            Self::Cat => "cat",
        }
    }

    /// Categories of this species, in table order
    pub fn categories(self) -> impl Iterator<Item = Category> {
        CATEGORIES.iter().copied().filter(move |c| c.species == self)
    }
}

/// A named photo bucket backed by one directory under the storage root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Category {
    name: &'static str,
    species: Species,
}

impl Category {
    const fn new(name: &'static str, species: Species) -> Self {
        Self { name, species }
    }

    /// Directory and display name
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.name
    }

    /// Species this category belongs to
    #[must_use]
    pub const fn species(self) -> Species {
        self.species
    }

    /// Look up a category by name, ignoring surrounding whitespace and ASCII case.
    ///
    /// # Examples
    ///
    /// ```
    /// use spotbot_core::taxonomy::{Category, Species};
    ///
    /// let lulu = Category::parse(" Lulu ").expect("lulu is in the table");
    /// assert_eq!(lulu.name(), "lulu");
    /// assert_eq!(lulu.species(), Species::Dog);
    /// assert!(Category::parse("rex").is_none());
    /// ```
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        CATEGORIES
            .iter()
            .copied()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Look up a category that must belong to `species`
    #[must_use]
    pub fn parse_for(species: Species, name: &str) -> Option<Self> {
        Self::parse(name).filter(|c| c.species == species)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Every known category. The generic `dog` and `cat` entries hold photos of
/// pets outside the pack.
pub const CATEGORIES: &[Category] = &[
    Category::new("lulu", Species::Dog),
    Category::new("odie", Species::Dog),
    Category::new("tucker", Species::Dog),
    Category::new("goose", Species::Dog),
    Category::new("holden", Species::Dog),
    Category::new("judith", Species::Dog),
    Category::new("neptune", Species::Dog),
    Category::new("dog", Species::Dog),
    Category::new("olive", Species::Cat),
    Category::new("bonnie", Species::Cat),
    Category::new("laila", Species::Cat),
    Category::new("cat", Species::Cat),
];

/// Selector keyword for every category at once
pub const ALL_KEYWORD: &str = "tax";

/// Selection alias resolving to one or more categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxGroup {
    /// Every category
    All,
    /// Every category of one species
    Species(Species),
    /// Exactly one category
    Single(Category),
}

impl TaxGroup {
    /// Parse a selector.
    ///
    /// `tax`, `dog` and `cat` are group keywords and win over the categories of
    /// the same name. Anything else must be a category name. An empty selector
    /// means [`TaxGroup::All`].
    #[must_use]
    pub fn parse(selector: &str) -> Option<Self> {
        let selector = selector.trim();
        if selector.is_empty() || selector.eq_ignore_ascii_case(ALL_KEYWORD) {
            return Some(Self::All);
        }
        for species in [Species::Dog, Species::Cat] {
            if selector.eq_ignore_ascii_case(species.keyword()) {
                return Some(Self::Species(species));
            }
        }
        Category::parse(selector).map(Self::Single)
    }

    /// Categories covered by this group, in table order
    #[must_use]
    pub fn categories(self) -> Vec<Category> {
        match self {
            Self::All => CATEGORIES.to_vec(),
            Self::Species(species) => species.categories().collect(),
            Self::Single(category) => vec![category],
        }
    }
}

impl fmt::Display for TaxGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_KEYWORD),
            Self::Species(species) => f.write_str(species.keyword()),
            Self::Single(category) => write!(f, "{category}"),
        }
    }
}

/// Comma-separated category names of one species, for usage messages
#[must_use]
pub fn names_for(species: Species) -> String {
    species
        .categories()
        .map(Category::name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Every accepted `/givetax` selector, group keywords first
#[must_use]
pub fn selectors() -> Vec<&'static str> {
    let keywords = [ALL_KEYWORD, Species::Dog.keyword(), Species::Cat.keyword()];
    let names = CATEGORIES
        .iter()
        .map(|c| c.name())
        .filter(|name| !keywords.contains(name));
    keywords.into_iter().chain(names).collect()
}
