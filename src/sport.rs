//! Sport classification

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::schema::SessionMessage;

/// Sport of a multisport transition session
pub const TRANSITION_SPORT: &str = "transition";

/// Activity family a sport belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Distance,
    Set,
    Climbing,
    Multisport,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Distance,
        Category::Set,
        Category::Climbing,
        Category::Multisport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Distance => "distance",
            Category::Set => "set",
            Category::Climbing => "climbing",
            Category::Multisport => "multisport",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    /// Supported sports of this category with their known sub-sports
    pub fn sports(&self) -> impl Iterator<Item = &'static SportEntry> {
        let category = *self;
        SPORTS.iter().filter(move |entry| entry.category == category)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct SportEntry {
    pub category: Category,
    pub sport: &'static str,
    /// Informational only; sub-sports are never used for gating
    pub sub_sports: &'static [&'static str],
}

pub static SPORTS: &[SportEntry] = &[
    SportEntry {
        category: Category::Distance,
        sport: "running",
        sub_sports: &["generic", "trail"],
    },
    SportEntry {
        category: Category::Distance,
        sport: "walking",
        sub_sports: &["generic"],
    },
    SportEntry {
        category: Category::Distance,
        sport: "hiking",
        sub_sports: &["generic"],
    },
    SportEntry {
        category: Category::Distance,
        sport: "cycling",
        sub_sports: &["generic", "road", "mountain"],
    },
    SportEntry {
        category: Category::Set,
        sport: "training",
        sub_sports: &["generic", "strength_training"],
    },
    SportEntry {
        category: Category::Climbing,
        sport: "rock_climbing",
        sub_sports: &["generic", "bouldering"],
    },
    SportEntry {
        category: Category::Multisport,
        sport: TRANSITION_SPORT,
        sub_sports: &["generic"],
    },
];

/// Category of a declared sport, `None` when unsupported
pub fn classify(sport: &str) -> Option<Category> {
    SPORTS
        .iter()
        .find(|entry| entry.sport == sport)
        .map(|entry| entry.category)
}

/// Gate a session pool: it must be non-empty and every sport supported.
/// The first unsupported session is reported.
pub fn check_sessions(sessions: &[SessionMessage]) -> Result<(), ParseError> {
    if sessions.is_empty() {
        return Err(ParseError::NoSession);
    }

    match sessions.iter().find(|s| classify(&s.sport).is_none()) {
        Some(session) => Err(unsupported(session)),
        None => Ok(()),
    }
}

pub(crate) fn unsupported(session: &SessionMessage) -> ParseError {
    ParseError::UnsupportedSport {
        sport: session.sport.clone(),
        sub_sport: session.sub_sport.clone(),
    }
}
