/// Category excluded from budgeting; savings are tracked per month instead.
pub const SAVINGS_CATEGORY: &str = "Savings";

const DEFAULTS: &[(&str, &str)] = &[
    ("Food", "text-orange-500"),
    ("Transport", "text-blue-500"),
    ("Shopping", "text-pink-500"),
    ("Bills", "text-yellow-500"),
    ("Entertainment", "text-purple-500"),
    ("Health", "text-red-500"),
    ("Education", "text-green-500"),
    ("Savings", "text-emerald-600"),
    ("Travel", "text-sky-500"),
    ("Gym", "text-indigo-500"),
    ("Activities", "text-green-500"),
    ("Car", "text-blue-500"),
    ("Supermarket", "text-amber-500"),
    ("Other", "text-gray-500"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: Option<i64>,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub is_custom: bool,
}

impl Category {
    /// A user-created category.
    pub fn new(name: String) -> Self {
        Self {
            id: None,
            name,
            icon: String::new(),
            color: String::new(),
            is_custom: true,
        }
    }

    /// The seeded category set, with ids assigned in order from 1.
    pub fn defaults() -> Vec<Category> {
        DEFAULTS
            .iter()
            .zip(1..)
            .map(|(&(name, color), id)| Category {
                id: Some(id),
                name: name.to_string(),
                icon: String::new(),
                color: color.to_string(),
                is_custom: false,
            })
            .collect()
    }

    pub fn is_savings(&self) -> bool {
        self.name == SAVINGS_CATEGORY
    }

    /// Find a category by name (case-insensitive) in a slice.
    pub fn find_by_name<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
        let lower = name.trim().to_lowercase();
        categories.iter().find(|c| c.name.to_lowercase() == lower)
    }

    /// Find a category by ID in a slice.
    pub fn find_by_id(categories: &[Category], id: i64) -> Option<&Category> {
        categories.iter().find(|c| c.id == Some(id))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
