//! Robots.txt parser implementation
//!
//! This module provides functionality for parsing robots.txt content using the robotstxt crate.

use robotstxt::DefaultMatcher;

/// Which rules apply to a domain
#[derive(Debug, Clone, PartialEq, Eq)]
enum Rules {
    /// No robots.txt, or it could not be read
    AllowAll,
    /// The server refused access to robots.txt itself
    DisallowAll,
    /// A robots.txt body to match against
    Content(String),
}

/// Parsed robots.txt data
///
/// This is a wrapper around the robotstxt crate's matcher, plus the
/// `Sitemap:` declarations which the matcher does not expose.
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    rules: Rules,
    sitemaps: Vec<String>,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    ///
    /// # Arguments
    ///
    /// * `content` - The raw robots.txt file content
    ///
    /// # Returns
    ///
    /// A ParsedRobots instance that can be used to check URL permissions
    pub fn from_content(content: &str) -> Self {
        Self {
            rules: Rules::Content(content.to_string()),
            sitemaps: parse_sitemap_lines(content),
        }
    }

    /// Creates a permissive ParsedRobots that allows everything
    ///
    /// This is used as the default when robots.txt cannot be fetched or parsed.
    pub fn allow_all() -> Self {
        Self {
            rules: Rules::AllowAll,
            sitemaps: Vec::new(),
        }
    }

    /// Creates a ParsedRobots that refuses every URL
    ///
    /// Used when robots.txt itself answers 401 or 403.
    pub fn disallow_all() -> Self {
        Self {
            rules: Rules::DisallowAll,
            sitemaps: Vec::new(),
        }
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL to check
    /// * `user_agent` - The user agent token, `*` for the wildcard group
    ///
    /// # Returns
    ///
    /// * `true` - If the URL is allowed
    /// * `false` - If the URL is disallowed
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        match &self.rules {
            Rules::AllowAll => true,
            Rules::DisallowAll => false,
            Rules::Content(content) if content.trim().is_empty() => true,
            Rules::Content(content) => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(content, user_agent, url)
            }
        }
    }

    /// Sitemap URLs declared with `Sitemap:` lines, in file order
    pub fn sitemaps(&self) -> &[String] {
        &self.sitemaps
    }
}

/// Collects `Sitemap:` directives
///
/// The directive is group-independent and its key is case-insensitive.
fn parse_sitemap_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter_map(|line| line.split_once(':'))
        .filter(|(key, _)| key.trim().eq_ignore_ascii_case("sitemap"))
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://example.com/page";

    #[test]
    fn test_allow_all() {
        let robots = ParsedRobots::allow_all();
        assert!(robots.is_allowed("https://example.com/any/path", "*"));
        assert!(robots.is_allowed("https://example.com/admin", "*"));
        assert!(robots.sitemaps().is_empty());
    }

    #[test]
    fn test_disallow_all() {
        let robots = ParsedRobots::disallow_all();
        assert!(!robots.is_allowed("https://example.com/", "*"));
        assert!(!robots.is_allowed(PAGE, "*"));
    }

    #[test]
    fn test_parse_disallow_everything() {
        let robots = ParsedRobots::from_content("User-agent: *\nDisallow: /");
        assert!(!robots.is_allowed("https://example.com/", "*"));
        assert!(!robots.is_allowed(PAGE, "*"));
    }

    #[test]
    fn test_parse_disallow_specific() {
        let robots = ParsedRobots::from_content("User-agent: *\nDisallow: /admin");
        assert!(robots.is_allowed("https://example.com/", "*"));
        assert!(robots.is_allowed(PAGE, "*"));
        assert!(!robots.is_allowed("https://example.com/admin", "*"));
        assert!(!robots.is_allowed("https://example.com/admin/users", "*"));
    }

    #[test]
    fn test_parse_allow_and_disallow() {
        let content = "User-agent: *\nDisallow: /private\nAllow: /private/public";
        let robots = ParsedRobots::from_content(content);
        assert!(!robots.is_allowed("https://example.com/private", "*"));
        assert!(robots.is_allowed("https://example.com/private/public", "*"));
    }

    #[test]
    fn test_wildcard_agent_ignores_named_groups() {
        let content = "User-agent: BadBot\nDisallow: /\n\nUser-agent: *\nDisallow: /tmp";
        let robots = ParsedRobots::from_content(content);
        assert!(robots.is_allowed(PAGE, "*"));
        assert!(!robots.is_allowed("https://example.com/tmp/x", "*"));
        assert!(!robots.is_allowed(PAGE, "BadBot"));
    }

    #[test]
    fn test_invalid_robots_txt() {
        let robots = ParsedRobots::from_content("This is not valid robots.txt {{{");
        assert!(robots.is_allowed(PAGE, "*"));
    }

    #[test]
    fn test_empty_robots_txt() {
        let robots = ParsedRobots::from_content("");
        assert!(robots.is_allowed(PAGE, "*"));
    }

    #[test]
    fn test_sitemap_lines() {
        let content = "\
User-agent: *
Disallow: /admin
Sitemap: https://example.com/sitemap.xml
sitemap:https://example.com/news.xml   # news
SITEMAP:
";
        let robots = ParsedRobots::from_content(content);
        assert_eq!(
            robots.sitemaps(),
            &[
                "https://example.com/sitemap.xml".to_string(),
                "https://example.com/news.xml".to_string(),
            ]
        );
    }
}
