//! Robots.txt parser implementation
//!
//! Tokenizing is done by the robotstxt crate; this module only collects the
//! directives it reports. Consecutive `User-agent` lines open one group and
//! the `Allow`/`Disallow` lines that follow belong to every agent in it.
//! `Sitemap` directives are global regardless of where they appear.

use crate::robots::matcher::matches_pattern;
use robotstxt::{parse_robotstxt, RobotsParseHandler};

/// A parsed robots.txt document, independent of any particular user agent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RobotsFile {
    groups: Vec<AgentGroup>,
    sitemaps: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct AgentGroup {
    agents: Vec<String>, // lowercased
    allow: Vec<String>,
    disallow: Vec<String>,
}

impl AgentGroup {
    fn applies_to(&self, user_agent: &str) -> bool {
        let full = user_agent.to_lowercase();
        let token = full.split('/').next().unwrap_or("").trim();
        self.agents
            .iter()
            .any(|agent| agent == "*" || *agent == full || (!token.is_empty() && agent == token))
    }
}

/// Receives directives from `parse_robotstxt` and groups them
#[derive(Default)]
struct GroupCollector {
    file: RobotsFile,
    current: Option<AgentGroup>,
    last_was_agent: bool,
}

impl GroupCollector {
    fn close_group(&mut self) {
        if let Some(group) = self.current.take() {
            self.file.groups.push(group);
        }
    }

    fn into_file(mut self) -> RobotsFile {
        self.close_group();
        self.file
    }
}

impl RobotsParseHandler for GroupCollector {
    fn handle_robots_start(&mut self) {
        *self = Self::default();
    }

    fn handle_robots_end(&mut self) {}

    fn handle_user_agent(&mut self, _line_num: u32, user_agent: &str) {
        if !self.last_was_agent {
            self.close_group();
        }
        let agent = user_agent.trim();
        if !agent.is_empty() {
            self.current
                .get_or_insert_with(AgentGroup::default)
                .agents
                .push(agent.to_lowercase());
        }
        self.last_was_agent = true;
    }

    fn handle_allow(&mut self, _line_num: u32, value: &str) {
        self.last_was_agent = false;
        if let (Some(group), false) = (self.current.as_mut(), value.is_empty()) {
            group.allow.push(value.to_string());
        }
    }

    fn handle_disallow(&mut self, _line_num: u32, value: &str) {
        self.last_was_agent = false;
        if let (Some(group), false) = (self.current.as_mut(), value.is_empty()) {
            group.disallow.push(value.to_string());
        }
    }

    fn handle_sitemap(&mut self, _line_num: u32, value: &str) {
        self.last_was_agent = false;
        if !value.is_empty() {
            self.file.sitemaps.push(value.to_string());
        }
    }

    fn handle_unknown_action(&mut self, _line_num: u32, _action: &str, _value: &str) {
        self.last_was_agent = false;
    }
}

impl RobotsFile {
    /// Parses robots.txt content
    ///
    /// Unknown directives are ignored. Rules that appear before any
    /// `User-agent` line belong to no group and are dropped.
    pub fn parse(content: &str) -> Self {
        let mut collector = GroupCollector::default();
        parse_robotstxt(content, &mut collector);
        collector.into_file()
    }

    /// Global `Sitemap:` URLs in document order
    pub fn sitemaps(&self) -> &[String] {
        &self.sitemaps
    }

    /// Collects the rules of every group that applies to `user_agent`
    pub fn rules_for(&self, user_agent: &str) -> DomainRules {
        let mut rules = DomainRules {
            sitemap_urls: self.sitemaps.clone(),
            ..DomainRules::default()
        };

        for group in self.groups.iter().filter(|g| g.applies_to(user_agent)) {
            rules.allow.extend(group.allow.iter().cloned());
            rules.disallow.extend(group.disallow.iter().cloned());
        }

        rules
    }
}

/// Ordered rule lists in effect for one agent on one domain
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainRules {
    pub disallow: Vec<String>,
    pub allow: Vec<String>,
    pub sitemap_urls: Vec<String>,
}

impl DomainRules {
    /// Any matching Allow wins; otherwise the first matching Disallow blocks
    ///
    /// Returns the blocking pattern, or `None` if `target` may be fetched.
    pub fn blocking_pattern(&self, target: &str) -> Option<&str> {
        if self.allow.iter().any(|p| matches_pattern(p, target)) {
            return None;
        }

        self.disallow
            .iter()
            .find(|p| matches_pattern(p, target))
            .map(String::as_str)
    }
}
