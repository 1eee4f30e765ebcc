use std::fmt;

/// Branch prefix that marks a gitflow release/hotfix branch.
pub const RELEASE_BRANCH_PREFIX: &str = "release/";

/// Which branch-name grammar to accept when extracting a version.
///
/// Both CLI modes currently accept the optional leading `v`
/// (`release/1.4.0` and `release/v1.4.0`), but the choice stays an
/// explicit parameter so callers never get the `v` handling implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchGrammar {
    /// `release/<version>` only.
    Bare,
    /// `release/<version>` or `release/v<version>`.
    OptionalV,
}

/// Semantic version extracted from a branch name.
///
/// `full` is the canonical rendering (everything after the prefix and the
/// optional `v`) and is reused verbatim in tag names and messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<String>,
    pub build_metadata: Option<String>,
    pub full: String,
}

impl SemanticVersion {
    /// Extract a version from a branch name, or `None` when the branch is
    /// not a release branch carrying a strict semver 2.0 version.
    ///
    /// A non-match is a normal outcome, not an error: most branches on a
    /// repository are simply not release branches.
    pub fn from_branch(branch: &str, grammar: BranchGrammar) -> Option<Self> {
        let rest = branch.strip_prefix(RELEASE_BRANCH_PREFIX)?;
        let rest = match grammar {
            BranchGrammar::OptionalV => rest.strip_prefix('v').unwrap_or(rest),
            BranchGrammar::Bare => rest,
        };
        Self::parse(rest)
    }

    /// Parse a bare semver 2.0 string, anchored to the whole input.
    fn parse(text: &str) -> Option<Self> {
        // Build metadata is split off first: prerelease identifiers may
        // contain hyphens, but nothing after the first `+` is a version core.
        let (core, build_metadata) = match text.split_once('+') {
            Some((core, build)) => (core, Some(build)),
            None => (text, None),
        };
        let (numbers, prerelease) = match core.split_once('-') {
            Some((numbers, pre)) => (numbers, Some(pre)),
            None => (core, None),
        };

        let mut fields = numbers.split('.');
        let major = numeric_field(fields.next()?)?;
        let minor = numeric_field(fields.next()?)?;
        let patch = numeric_field(fields.next()?)?;
        if fields.next().is_some() {
            return None;
        }

        if let Some(pre) = prerelease {
            if !pre.split('.').all(is_prerelease_segment) {
                return None;
            }
        }
        if let Some(build) = build_metadata {
            if !build.split('.').all(is_build_segment) {
                return None;
            }
        }

        Some(SemanticVersion {
            major,
            minor,
            patch,
            prerelease: prerelease.map(str::to_owned),
            build_metadata: build_metadata.map(str::to_owned),
            full: text.to_owned(),
        })
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

/// `0` or a digit run without a superfluous leading zero.
fn numeric_field(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if text.len() > 1 && text.starts_with('0') {
        return None;
    }
    text.parse().ok()
}

/// Prerelease identifiers are alphanumeric/hyphen; purely numeric ones must
/// not carry a leading zero.
fn is_prerelease_segment(segment: &str) -> bool {
    if segment.is_empty() || !segment.bytes().all(is_identifier_byte) {
        return false;
    }
    if segment.bytes().all(|b| b.is_ascii_digit()) {
        segment.len() == 1 || !segment.starts_with('0')
    } else {
        true
    }
}

/// Build metadata identifiers are non-empty alphanumeric/hyphen; leading
/// zeros are allowed here.
fn is_build_segment(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(is_identifier_byte)
}

fn is_identifier_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-'
}
