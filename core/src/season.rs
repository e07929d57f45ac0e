use std::fmt;

use serde::{Deserialize, Serialize};

use crate::CalendarDate;

pub const DEFAULT_BANNER_PATH: &str = "assets/img/banners/";

/// Seasons change in January, April, July and October.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    pub fn from_month_index(month_index: u8) -> Self {
        match month_index {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Banner image for a month; `base_path` falls back to [`DEFAULT_BANNER_PATH`].
pub fn season_image(month_index: u8, base_path: Option<&str>) -> String {
    let base = base_path.unwrap_or(DEFAULT_BANNER_PATH);
    format!("{}banner-{}.png", base, Season::from_month_index(month_index))
}

pub fn season_image_for_date(date: &CalendarDate, base_path: Option<&str>) -> String {
    season_image(date.month_index(), base_path)
}
