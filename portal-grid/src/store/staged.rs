//! Staged rows and their synthetic identities.

use rand::Rng;

use crate::model::{Row, RowId};

const SUFFIX_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const SUFFIX_LEN: usize = 6;

/// A row created in the grid that the host has not persisted yet.
///
/// Staged rows are always editable and never have a pending edit; their
/// values are mutated directly.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedRow {
    /// Synthetic identity, distinct from every host identity.
    pub id: RowId,
    /// Current cell values, without the id field.
    pub values: Row,
}

/// Generate `<prefix><millis>-<suffix>`, retrying until `taken` rejects it.
pub(crate) fn generate_id(prefix: &str, taken: impl Fn(&RowId) -> bool) -> RowId {
    let mut rng = rand::rng();
    loop {
        let millis = chrono::Utc::now().timestamp_millis();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| SUFFIX_ALPHABET[rng.random_range(0..SUFFIX_ALPHABET.len())] as char)
            .collect();
        let id = RowId::new(format!("{prefix}{millis}-{suffix}"));
        if !taken(&id) {
            return id;
        }
    }
}
