//! Fixtures

use std::{fs, path::PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::{api::TeamStats, items::LineItem, team::TeamMember};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// On-disk shape of a cart fixture file.
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Cart lines, in insertion order.
    pub items: Vec<LineItem>,
}

/// On-disk shape of a team fixture file.
#[derive(Debug, Deserialize)]
pub struct TeamFixture {
    /// Aggregate statistics, when the fixture provides them.
    #[serde(default)]
    pub stats: TeamStats,

    /// Top-level team members and their downlines.
    #[serde(default)]
    pub tree: Vec<TeamMember>,
}

/// Loader for YAML test fixtures.
///
/// Cart fixtures live under `<base>/carts/<name>.yml` and team fixtures
/// under `<base>/teams/<name>.yml`. Field names are camelCase, matching
/// the backend payloads the same records deserialize from.
#[derive(Debug)]
pub struct Fixture {
    base_path: PathBuf,
}

impl Fixture {
    /// Create a loader with the default base path.
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a loader with a custom base path.
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Load a cart fixture by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_cart(&self, name: &str) -> Result<CartFixture, FixtureError> {
        let file_path = self.base_path.join("carts").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        Ok(serde_norway::from_str(&contents)?)
    }

    /// Load a team fixture by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_team(&self, name: &str) -> Result<TeamFixture, FixtureError> {
        let file_path = self.base_path.join("teams").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        Ok(serde_norway::from_str(&contents)?)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn cart_fixture_loads_line_items() -> TestResult {
        let fixture = Fixture::new().load_cart("standard")?;

        assert_eq!(fixture.items.len(), 2);

        let first = fixture.items.first().ok_or("expected a first line")?;

        assert_eq!(first.name, "Herbal Tea");
        assert_eq!(first.unit_price(), Decimal::from(150));

        Ok(())
    }

    #[test]
    fn team_fixture_loads_stats_and_tree() -> TestResult {
        let fixture = Fixture::new().load_team("binary")?;

        assert_eq!(fixture.stats.direct_referrals, 2);
        assert_eq!(fixture.tree.len(), 2);

        Ok(())
    }

    #[test]
    fn missing_fixture_file_is_an_io_error() {
        let result = Fixture::new().load_cart("nonexistent");

        assert!(matches!(result, Err(FixtureError::Io(_))));
    }

    #[test]
    fn malformed_fixture_is_a_yaml_error() -> TestResult {
        let dir = tempfile::tempdir()?;
        let carts = dir.path().join("carts");

        fs::create_dir_all(&carts)?;
        fs::write(carts.join("broken.yml"), "items: \"not a list\"")?;

        let result = Fixture::with_base_path(dir.path()).load_cart("broken");

        assert!(matches!(result, Err(FixtureError::Yaml(_))));

        Ok(())
    }

    #[test]
    fn fixture_default_matches_new() {
        let fixture = Fixture::default();

        assert_eq!(fixture.base_path, PathBuf::from("./fixtures"));
    }
}
