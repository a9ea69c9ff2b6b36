//! Category codes and their display titles.

use std::fmt;

/// The six measurement categories shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    IbsR,
    IbsN,
    IbsT,
    ObsR,
    ObsN,
    ObsT,
}

/// Code and title per category, indexed by discriminant.
const CATEGORY_TABLE: [(&str, &str); 6] = [
    ("IBS_R", "IBS along R direction"),
    ("IBS_N", "IBS along N direction"),
    ("IBS_T", "IBS along T direction"),
    ("OBS_R", "OBS along R direction"),
    ("OBS_N", "OBS along N direction"),
    ("OBS_T", "OBS along T direction"),
];

impl Category {
    /// Dashboard order.
    pub const ALL: [Category; 6] = [
        Category::IbsR,
        Category::IbsN,
        Category::IbsT,
        Category::ObsR,
        Category::ObsN,
        Category::ObsT,
    ];

    pub fn code(self) -> &'static str {
        CATEGORY_TABLE[self as usize].0
    }

    /// Short title, e.g. "OBS along N direction". Total over the enum.
    pub fn title(self) -> &'static str {
        CATEGORY_TABLE[self as usize].1
    }

    /// Heading used on the chart itself.
    pub fn chart_title(self) -> String {
        format!(
            "Normalized Average Treatment Effect of Heater Profiles for : {} on Perihelion Dates",
            self.title()
        )
    }

    /// Partial over strings: codes outside the fixed set map to `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Display title for a raw category code, if it is one of the six.
pub fn custom_title(code: &str) -> Option<&'static str> {
    Category::from_code(code).map(Category::title)
}
