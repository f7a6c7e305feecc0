use clap::ValueEnum;
use std::fmt;

/// Base URL used to build repository links
pub const GITHUB_BASE_URL: &str = "https://github.com";

/// Trending window reported by the leaderboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum Period {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Period {
    /// Value of the `since` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Human-readable label used in the card header
    pub fn label(&self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
        }
    }

    /// Trailing words of the star delta, e.g. "120 stars this week"
    pub fn delta_phrase(&self) -> &'static str {
        match self {
            Self::Daily => "today",
            Self::Weekly => "this week",
            Self::Monthly => "this month",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of a single leaderboard fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Language filter; `None` means all languages
    pub language: Option<String>,

    /// Trending window
    pub period: Period,

    /// Maximum number of entries shown on the card
    pub limit: usize,
}

impl FetchRequest {
    /// Creates a request, treating a blank language as "all languages"
    pub fn new(language: Option<String>, period: Period, limit: usize) -> Self {
        let language = language
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        Self {
            language,
            period,
            limit,
        }
    }

    /// Lowercase language key used in source tags ("all" when unfiltered)
    pub fn language_key(&self) -> String {
        self.language
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_else(|| "all".to_string())
    }

    /// Language as displayed to humans
    pub fn language_label(&self) -> &str {
        self.language.as_deref().unwrap_or("All Languages")
    }
}

/// A "Built by" avatar attached to a leaderboard row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contributor {
    pub login: String,
    pub avatar_url: String,
}

/// One ranked repository scraped from the trending page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    /// 1-based position in page order
    pub rank: u32,
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub total_stars: u64,
    /// Stars gained during the requested period, never above `total_stars`
    pub period_stars: u64,
    pub forks: u64,
    pub contributors: Vec<Contributor>,
}

impl LeaderboardEntry {
    /// Repository identifier in `owner/name` form
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    pub fn url(&self) -> String {
        format!("{}/{}/{}", GITHUB_BASE_URL, self.owner, self.name)
    }
}

/// Ordered entries extracted from one leaderboard page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new(entries: Vec<LeaderboardEntry>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LeaderboardEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Returns the first `limit` entries, or all of them if fewer are present
    pub fn top(&self, limit: usize) -> &[LeaderboardEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Leaderboard {
    type Item = &'a LeaderboardEntry;
    type IntoIter = std::slice::Iter<'a, LeaderboardEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
