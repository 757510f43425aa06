use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Alphabet used for generated identifiers (lowercase base 36).
const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Identifier of a task.
///
/// Identifiers are opaque strings. Freshly generated ones are short random
/// base-36 tokens. Ids read back from storage are kept verbatim; only ids
/// typed by a user go through [`FromStr`], which trims them.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct TaskId(String);

impl TaskId {
    /// Length of generated tokens.
    pub const TOKEN_LEN: usize = 7;

    /// Draw a random token of [`TOKEN_LEN`](Self::TOKEN_LEN) characters.
    #[must_use]
    pub fn random() -> Self {
        Self::random_with(&mut rand::thread_rng())
    }

    /// Draw a random token from the supplied RNG.
    #[must_use]
    pub fn random_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let token = (0..Self::TOKEN_LEN)
            .map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
            .collect();
        Self(token)
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned when a task identifier cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseTaskIdError {
    /// The identifier was empty or whitespace only.
    #[error("task id must not be empty")]
    Empty,
}

impl FromStr for TaskId {
    type Err = ParseTaskIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseTaskIdError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl Serialize for TaskId {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Self(String::deserialize(d)?))
    }
}

/// Source of candidate identifiers for new tasks.
///
/// Candidates only need to be practically unique; collisions with ids
/// already present are rejected by [`TaskList::fresh_id`](crate::TaskList::fresh_id).
pub trait IdGenerator: Send + Sync {
    /// Produce the next candidate identifier.
    fn next_id(&self) -> TaskId;
}

/// Default generator drawing random base-36 tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> TaskId {
        TaskId::random()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn random_tokens_are_short_base36() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..64 {
            let id = TaskId::random_with(&mut rng);
            assert_eq!(id.as_str().len(), TaskId::TOKEN_LEN);
            assert!(
                id.as_str()
                    .bytes()
                    .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
            );
        }
    }

    #[test]
    fn parse_rejects_blank_ids() {
        assert_eq!("".parse::<TaskId>(), Err(ParseTaskIdError::Empty));
        assert_eq!("   ".parse::<TaskId>(), Err(ParseTaskIdError::Empty));
    }

    #[test]
    fn serde_uses_plain_strings() -> anyhow::Result<()> {
        let id: TaskId = "ab12cd3".parse()?;
        let json = serde_json::to_string(&id)?;
        assert_eq!(json, "\"ab12cd3\"");
        let back: TaskId = serde_json::from_str(&json)?;
        assert_eq!(back, id);
        Ok(())
    }

    #[test]
    fn stored_ids_are_not_normalised() -> anyhow::Result<()> {
        let padded: TaskId = serde_json::from_str("\" a1 \"")?;
        assert_eq!(padded.as_str(), " a1 ");
        assert_eq!(serde_json::to_string(&padded)?, "\" a1 \"");
        let empty: TaskId = serde_json::from_str("\"\"")?;
        assert_eq!(empty.as_str(), "");
        Ok(())
    }
}
