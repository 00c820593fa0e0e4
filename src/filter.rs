//! Noise filters: drop turns that only narrate the share action itself.
//!
//! Best-effort string matching on plain-string content. Multi-part content
//! is never filtered.

/// One string predicate over a turn's text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseFilter {
    Prefix(&'static str),
    Contains(&'static str),
    /// Needle must be lower-case.
    ContainsIgnoreCase(&'static str),
}

impl NoiseFilter {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            NoiseFilter::Prefix(prefix) => text.starts_with(prefix),
            NoiseFilter::Contains(needle) => text.contains(needle),
            NoiseFilter::ContainsIgnoreCase(needle) => text.to_lowercase().contains(needle),
        }
    }
}

/// Reserved slash command that triggers a share
pub const SHARE_COMMAND: &str = "/share";

pub const USER_NOISE: &[NoiseFilter] = &[
    NoiseFilter::Prefix(SHARE_COMMAND),
    NoiseFilter::Contains("share:share is running"),
    NoiseFilter::Contains("Share Session Command"),
    NoiseFilter::Contains("Execute this command to share the session"),
    NoiseFilter::Contains("share_session.py"),
    NoiseFilter::Contains("sessionshare share"),
];

pub const ASSISTANT_NOISE: &[NoiseFilter] = &[
    NoiseFilter::ContainsIgnoreCase("share the current claude code session"),
    NoiseFilter::ContainsIgnoreCase("share script"),
    NoiseFilter::ContainsIgnoreCase("execute the share command"),
];

/// First filter in `filters` that matches `text`, if any
pub fn first_match<'a>(filters: &'a [NoiseFilter], text: &str) -> Option<&'a NoiseFilter> {
    filters.iter().find(|filter| filter.matches(text))
}

pub fn is_user_noise(text: &str) -> bool {
    first_match(USER_NOISE, text).is_some()
}

pub fn is_assistant_noise(text: &str) -> bool {
    first_match(ASSISTANT_NOISE, text).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_only_matches_at_start() {
        let filter = NoiseFilter::Prefix("/share");
        assert!(filter.matches("/share fix the bug"));
        assert!(!filter.matches("please /share"));
    }

    #[test]
    fn contains_is_case_sensitive() {
        let filter = NoiseFilter::Contains("Share Session Command");
        assert!(filter.matches("# Share Session Command\nrun it"));
        assert!(!filter.matches("share session command"));
    }

    #[test]
    fn contains_ignore_case() {
        let filter = NoiseFilter::ContainsIgnoreCase("share script");
        assert!(filter.matches("Running the Share Script now"));
        assert!(!filter.matches("sharing scripts"));
    }

    #[test]
    fn user_noise_markers() {
        assert!(is_user_noise("/share my session"));
        assert!(is_user_noise("<command-message>share:share is running…</command-message>"));
        assert!(is_user_noise("Execute this command to share the session: python3 x"));
        assert!(is_user_noise("python3 ~/.claude/scripts/share_session.py"));
        assert!(is_user_noise("run `sessionshare share \"desc\"`"));
        assert!(!is_user_noise("How do I share a struct between threads?"));
    }

    #[test]
    fn assistant_noise_markers() {
        assert!(is_assistant_noise(
            "I'll share the current Claude Code session to GitHub."
        ));
        assert!(is_assistant_noise("Let me EXECUTE THE SHARE COMMAND."));
        assert!(!is_assistant_noise("Shared ownership uses Arc."));
    }

    #[test]
    fn first_match_follows_list_order() {
        let text = "/share via share_session.py";
        assert_eq!(
            first_match(USER_NOISE, text),
            Some(&NoiseFilter::Prefix(SHARE_COMMAND))
        );
        assert_eq!(first_match(ASSISTANT_NOISE, "nothing here"), None);
    }
}
