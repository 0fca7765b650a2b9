//! Cuisine categories for browsing
//!
//! The places provider has no cuisine filter, so each category carries search
//! terms that are sent as text queries instead.

use mesa_api::CuisineType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CuisineCategory {
    pub id: CuisineType,
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub search_terms: &'static [&'static str],
}

impl CuisineCategory {
    /// Query used when browsing the category without free text.
    pub fn primary_search_term(&self) -> &'static str {
        self.search_terms.first().copied().unwrap_or(self.name)
    }
}

pub const CUISINE_CATEGORIES: [CuisineCategory; 12] = [
    CuisineCategory {
        id: CuisineType::Mexican,
        name: "Mexican",
        icon: "🌮",
        color: "#D97706",
        search_terms: &[
            "mexican restaurant",
            "tacos",
            "tortas",
            "quesadillas",
            "antojitos mexicanos",
        ],
    },
    CuisineCategory {
        id: CuisineType::Italian,
        name: "Italian",
        icon: "🍕",
        color: "#DC2626",
        search_terms: &["italian restaurant", "pizza", "pasta", "pizzeria", "trattoria"],
    },
    CuisineCategory {
        id: CuisineType::Burgers,
        name: "Burgers",
        icon: "🍔",
        color: "#CA8A04",
        search_terms: &["burger restaurant", "hamburguesas", "hamburgers"],
    },
    CuisineCategory {
        id: CuisineType::Asian,
        name: "Asian",
        icon: "🍣",
        color: "#DB2777",
        search_terms: &[
            "asian restaurant",
            "sushi",
            "chinese food",
            "japanese restaurant",
            "thai food",
            "ramen",
        ],
    },
    CuisineCategory {
        id: CuisineType::International,
        name: "International",
        icon: "🥙",
        color: "#7C3AED",
        search_terms: &[
            "international restaurant",
            "mediterranean food",
            "middle eastern",
            "kebab",
            "greek restaurant",
        ],
    },
    CuisineCategory {
        id: CuisineType::Cafe,
        name: "Cafes & Desserts",
        icon: "☕",
        color: "#92400E",
        search_terms: &[
            "cafe",
            "coffee shop",
            "bakery",
            "pastry",
            "dessert",
            "ice cream",
            "cafeteria",
        ],
    },
    CuisineCategory {
        id: CuisineType::Steakhouse,
        name: "Steak & Grill",
        icon: "🍖",
        color: "#B91C1C",
        search_terms: &[
            "steakhouse",
            "bbq restaurant",
            "grill",
            "parrilla",
            "carne asada",
            "barbecue",
        ],
    },
    CuisineCategory {
        id: CuisineType::Seafood,
        name: "Seafood",
        icon: "🌊",
        color: "#0891B2",
        search_terms: &["seafood restaurant", "mariscos", "pescado", "ceviche"],
    },
    CuisineCategory {
        id: CuisineType::Healthy,
        name: "Healthy",
        icon: "🥗",
        color: "#16A34A",
        search_terms: &[
            "healthy restaurant",
            "salad bar",
            "juice bar",
            "smoothie",
            "vegetarian restaurant",
            "vegan restaurant",
        ],
    },
    CuisineCategory {
        id: CuisineType::Bar,
        name: "Bars & Cantinas",
        icon: "🍺",
        color: "#EA580C",
        search_terms: &["bar", "pub", "cantina", "brewery", "sports bar"],
    },
    CuisineCategory {
        id: CuisineType::FastFood,
        name: "Regional Fast Food",
        icon: "🌯",
        color: "#F59E0B",
        search_terms: &["tortas", "lonches", "cemitas", "pambazos", "sandwich shop"],
    },
    CuisineCategory {
        id: CuisineType::Regional,
        name: "Regional Cuisine",
        icon: "🍜",
        color: "#BE123C",
        search_terms: &[
            "regional mexican restaurant",
            "cocina yucateca",
            "cocina oaxaqueña",
            "cocina poblana",
        ],
    },
];

pub fn category(id: CuisineType) -> &'static CuisineCategory {
    CUISINE_CATEGORIES
        .iter()
        .find(|category| category.id == id)
        .unwrap_or(&CUISINE_CATEGORIES[0])
}

/// First category with a search term containing `term` (case-insensitive).
pub fn category_by_search_term(term: &str) -> Option<&'static CuisineCategory> {
    let term = term.to_lowercase();
    CUISINE_CATEGORIES.iter().find(|category| {
        category
            .search_terms
            .iter()
            .any(|search_term| search_term.contains(term.as_str()))
    })
}
