//! Provenance of a mock realization.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one realization of a mock and how to reproduce it
///
/// The UUID doubles as the RNG seed source: the same id, model and halo
/// catalog always produce the same galaxy table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealizationMetadata {
    /// Unique identifier of this realization (also used as RNG seed source)
    pub id: Uuid,

    /// Version of the profile lookup table satellites were drawn from
    pub lookup_table_version: u64,

    /// Total number of galaxies in the realization
    pub num_galaxies: usize,
}

impl RealizationMetadata {
    /// Seed of the realization's ChaCha generator: the first 8 bytes of the id
    ///
    /// # Example
    /// ```
    /// use mock_factory::RealizationMetadata;
    ///
    /// let metadata = RealizationMetadata {
    ///     id: RealizationMetadata::id_from_seed(42),
    ///     lookup_table_version: 1,
    ///     num_galaxies: 0,
    /// };
    /// assert_eq!(metadata.seed(), 42);
    /// ```
    pub fn seed(&self) -> u64 {
        self.id.as_u64_pair().0
    }

    /// UUID whose seed is exactly `seed`
    ///
    /// # Example
    /// ```
    /// use mock_factory::RealizationMetadata;
    ///
    /// let id = RealizationMetadata::id_from_seed(42);
    /// assert_eq!(id.as_u64_pair(), (42, 0));
    /// ```
    pub fn id_from_seed(seed: u64) -> Uuid {
        Uuid::from_u64_pair(seed, 0)
    }

    /// Deterministic UUID derived from a human-readable name.
    ///
    /// The same name always yields the same id and thus the same seed.
    pub fn id_from_name(name: &str) -> Uuid {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
    }

    /// Short catalog-style label, e.g. `"MOCK-3f2a9c01"`
    pub fn label(&self) -> String {
        let bytes = self.id.as_bytes();
        format!(
            "MOCK-{:02x}{:02x}{:02x}{:02x}",
            bytes[0], bytes[1], bytes[2], bytes[3]
        )
    }
}
