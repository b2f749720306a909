use regex::{Regex, RegexBuilder};

/// Structural/interest signals for one page body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageProfile {
    pub interest_score: u32,
    pub has_login_indicator: bool,
}

/// Fixed heuristic scorer over page text. Pure: no I/O, no failure mode —
/// an empty body scores 0 with no login indicator.
///
/// The matchers are compiled once and applied in a fixed order; the score
/// is the sum of non-overlapping match counts across all of them. Login
/// phrase matches both count toward the score and set the indicator.
pub struct Classifier {
    login: Regex,
    form: Regex,
    input: Regex,
    hyperlink: Regex,
    client_redirect: Regex,
}

impl Classifier {
    pub fn new() -> Self {
        Self {
            login: case_insensitive(r"\blog[\s-]?in\b|\bsign[\s-]?[io]n\b|\bpassword\b"),
            form: case_insensitive(r"<form\b"),
            input: case_insensitive(r"<input\b"),
            hyperlink: case_insensitive(r"<a\s[^>]*href"),
            client_redirect: case_insensitive(r"window\.location"),
        }
    }

    pub fn classify(&self, body: &str) -> PageProfile {
        let login_hits = self.login.find_iter(body).count() as u32;
        let interest_score = login_hits
            + self.form.find_iter(body).count() as u32
            + self.input.find_iter(body).count() as u32
            + self.hyperlink.find_iter(body).count() as u32
            + self.client_redirect.find_iter(body).count() as u32;

        PageProfile {
            interest_score,
            has_login_indicator: login_hits > 0,
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

fn case_insensitive(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("valid classifier pattern")
}
