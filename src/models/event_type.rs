use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    sqlx::Type,
)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    #[default]
    Regular,
    Special,
    Service,
    Worship,
    Other,
}

impl EventType {
    pub const ALL: [EventType; 5] = [
        Self::Regular,
        Self::Special,
        Self::Service,
        Self::Worship,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Special => "special",
            Self::Service => "service",
            Self::Worship => "worship",
            Self::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Regular => "Regular Meeting",
            Self::Special => "Special Event",
            Self::Service => "Service Project",
            Self::Worship => "Worship Event",
            Self::Other => "Other",
        }
    }

    /// Heading used for the category tab.
    pub fn plural_label(&self) -> &'static str {
        match self {
            Self::Regular => "Regular Meetings",
            Self::Special => "Special Events",
            Self::Service => "Service Projects",
            Self::Worship => "Worship Events",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for EventType {
    type Err = String;

    /// Accepts either the stored key (`service`) or the label (`Service Project`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == needle || t.label().to_lowercase() == needle)
            .ok_or_else(|| format!("invalid event type: {}", s))
    }
}

/// Category tab on the events page.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum EventFilter {
    #[default]
    All,
    Only(EventType),
}

impl EventFilter {
    /// Unknown values fall back to `All`.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") | Some("all") => Self::All,
            Some(v) => v.parse().map(Self::Only).unwrap_or(Self::All),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(t) => t.as_str(),
        }
    }

    pub fn matches(&self, event_type: EventType) -> bool {
        match self {
            Self::All => true,
            Self::Only(t) => *t == event_type,
        }
    }
}
