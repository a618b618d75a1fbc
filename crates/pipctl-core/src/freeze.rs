//! Parsing `pip freeze` output
//!
//! Two line shapes are understood:
//!
//! - `name==version`
//! - `-e <url>#egg=<name>`, recorded with the URL (before `#`) as its origin
//!
//! Blank lines and `#` annotations are ignored. Anything else is skipped
//! with a warning.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

static EGG_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:#|#.*?&)egg=([^&]+)").unwrap());

/// One installed package as reported by freeze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageRecord {
    Pinned { name: String, version: String },
    Editable { name: String, origin: String },
}

impl PackageRecord {
    pub fn name(&self) -> &str {
        match self {
            Self::Pinned { name, .. } | Self::Editable { name, .. } => name,
        }
    }

    /// Version string, or the origin URL for editable installs.
    pub fn version(&self) -> &str {
        match self {
            Self::Pinned { version, .. } => version,
            Self::Editable { origin, .. } => origin,
        }
    }

    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Editable { .. })
    }

    /// Parse a single freeze line. Returns `None` for lines of neither shape.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();

        if let Some(rest) = line.strip_prefix("-e ") {
            let url = rest.trim();
            let name = EGG_NAME.captures(url)?.get(1)?.as_str().to_string();
            let origin = url.split('#').next().unwrap_or_default().to_string();
            return Some(Self::Editable { name, origin });
        }

        let (name, version) = line.split_once("==")?;
        let (name, version) = (name.trim(), version.trim());
        if name.is_empty() || version.is_empty() {
            return None;
        }
        Some(Self::Pinned {
            name: name.to_string(),
            version: version.to_string(),
        })
    }
}

/// Parse every recognisable line of freeze output.
pub fn parse_records(stdout: &str) -> Vec<PackageRecord> {
    stdout
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .filter_map(|line| {
            let record = PackageRecord::parse(line);
            if record.is_none() {
                warn!(line, "skipping unrecognised freeze line");
            }
            record
        })
        .collect()
}

/// Map of package name to version, optionally limited to names starting
/// with `prefix` (case-insensitive).
pub fn parse_freeze(stdout: &str, prefix: Option<&str>) -> BTreeMap<String, String> {
    let prefix = prefix.filter(|p| !p.is_empty()).map(str::to_lowercase);
    parse_records(stdout)
        .into_iter()
        .filter(|record| match &prefix {
            Some(prefix) => record.name().to_lowercase().starts_with(prefix),
            None => true,
        })
        .map(|record| (record.name().to_string(), record.version().to_string()))
        .collect()
}
