//! JSON codec scenarios
//!
//! Each scenario loads one fixture document in `setup` and then encodes or
//! decodes it [`NUM_DOCS`] times per iteration.

use perf_harness::{FixtureDir, LifecycleHooks, ScenarioDescriptor};
use serde_json::Value;
use std::hint::black_box;

use super::NUM_DOCS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Flat,
    Deep,
    Full,
}

impl Shape {
    pub const ALL: [Shape; 3] = [Shape::Flat, Shape::Deep, Shape::Full];

    fn label(self) -> &'static str {
        match self {
            Shape::Flat => "Flat",
            Shape::Deep => "Deep",
            Shape::Full => "Full",
        }
    }

    pub fn fixture(self) -> &'static str {
        match self {
            Shape::Flat => "extended_bson/flat_bson.json",
            Shape::Deep => "extended_bson/deep_bson.json",
            Shape::Full => "extended_bson/full_bson.json",
        }
    }

    /// Bytes processed per iteration.
    pub fn data_size(self) -> u64 {
        match self {
            Shape::Flat => 75_310_000,
            Shape::Deep => 19_640_000,
            Shape::Full => 57_340_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encoding,
    Decoding,
}

impl Direction {
    fn label(self) -> &'static str {
        match self {
            Direction::Encoding => "Encoding",
            Direction::Decoding => "Decoding",
        }
    }
}

pub fn name(shape: Shape, direction: Direction) -> String {
    format!("Test{}{}", shape.label(), direction.label())
}

pub struct CodecScenario {
    fixtures: FixtureDir,
    shape: Shape,
    direction: Direction,
    document: Value,
    encoded: Vec<u8>,
}

impl CodecScenario {
    pub fn new(fixtures: FixtureDir, shape: Shape, direction: Direction) -> Self {
        Self {
            fixtures,
            shape,
            direction,
            document: Value::Null,
            encoded: Vec::new(),
        }
    }
}

impl LifecycleHooks for CodecScenario {
    fn setup(&mut self) -> anyhow::Result<()> {
        let fixture = self.fixtures.load_json(self.shape.fixture())?;
        self.encoded = serde_json::to_vec(&fixture.value)?;
        self.document = fixture.value;
        Ok(())
    }

    fn task(&mut self) -> anyhow::Result<()> {
        match self.direction {
            Direction::Encoding => {
                for _ in 0..NUM_DOCS {
                    black_box(serde_json::to_vec(&self.document)?);
                }
            }
            Direction::Decoding => {
                for _ in 0..NUM_DOCS {
                    black_box(serde_json::from_slice::<Value>(&self.encoded)?);
                }
            }
        }
        Ok(())
    }

    fn teardown(&mut self) -> anyhow::Result<()> {
        self.document = Value::Null;
        self.encoded = Vec::new();
        Ok(())
    }
}

/// All encoding scenarios, then all decoding scenarios.
pub fn scenarios(fixtures: &FixtureDir) -> impl Iterator<Item = ScenarioDescriptor> + '_ {
    [Direction::Encoding, Direction::Decoding]
        .into_iter()
        .flat_map(|direction| Shape::ALL.into_iter().map(move |shape| (shape, direction)))
        .map(move |(shape, direction)| {
            ScenarioDescriptor::new(
                name(shape, direction),
                shape.data_size(),
                CodecScenario::new(fixtures.clone(), shape, direction),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use perf_harness::HarnessError;
    use std::fs;

    fn fixtures_with_flat(contents: &str) -> (tempfile::TempDir, FixtureDir) {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("extended_bson");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("flat_bson.json"), contents).unwrap();
        let fixtures = FixtureDir::new(dir.path());
        (dir, fixtures)
    }

    #[test]
    fn test_names_and_sizes() {
        assert_eq!(name(Shape::Deep, Direction::Decoding), "TestDeepDecoding");
        let sizes: Vec<(String, u64)> = scenarios(&FixtureDir::new("data"))
            .map(|s| (s.name().to_string(), s.expected_data_size()))
            .collect();
        assert_eq!(sizes[0], ("TestFlatEncoding".to_string(), 75_310_000));
        assert_eq!(sizes[4], ("TestDeepDecoding".to_string(), 19_640_000));
        assert_eq!(sizes.len(), 6);
    }

    #[test]
    fn test_setup_and_task() {
        let (_dir, fixtures) = fixtures_with_flat(r#"{"_id": 1, "name": "flat"}"#);

        for direction in [Direction::Encoding, Direction::Decoding] {
            let mut scenario = CodecScenario::new(fixtures.clone(), Shape::Flat, direction);
            scenario.setup().unwrap();
            assert!(!scenario.encoded.is_empty());
            scenario.task().unwrap();
            scenario.teardown().unwrap();
            assert_eq!(scenario.document, Value::Null);
        }
    }

    #[test]
    fn test_missing_fixture_fails_setup() {
        let (_dir, fixtures) = fixtures_with_flat("{}");
        let mut scenario = CodecScenario::new(fixtures, Shape::Full, Direction::Encoding);

        let err = scenario.setup().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HarnessError>(),
            Some(HarnessError::FixtureRead { .. })
        ));
    }
}
