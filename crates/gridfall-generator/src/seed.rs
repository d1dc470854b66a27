use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seed for deterministic piece generation.
///
/// A 128-bit value used to initialize the session-scoped RNG of either
/// generator. Two generators built from the same seed produce the same piece
/// sequence, which is what makes server-side session resume and replay
/// verification possible.
///
/// Serialized as a 32-character lowercase hex string so it can ride along in
/// the session row the surrounding application persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorSeed([u8; 16]);

impl GeneratorSeed {
    /// Wraps raw seed bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    pub(crate) const fn into_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl Serialize for GeneratorSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let num = u128::from_be_bytes(self.0);
        serializer.serialize_str(&format!("{num:032x}"))
    }
}

impl<'de> Deserialize<'de> for GeneratorSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex = String::deserialize(deserializer)?;
        if hex.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid seed: expected 32 hex characters, got {}",
                hex.len()
            )));
        }
        let num = u128::from_str_radix(&hex, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid seed: {hex} ({e})")))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Distribution<GeneratorSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GeneratorSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        GeneratorSeed(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_hex_roundtrip() {
        let seed: GeneratorSeed = rand::rng().random();
        let json = serde_json::to_string(&seed).unwrap();
        let back: GeneratorSeed = serde_json::from_str(&json).unwrap();
        assert_eq!(back, seed);
    }

    #[test]
    fn test_seed_hex_format() {
        let seed = GeneratorSeed::from_bytes([
            0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
            0x32, 0x10,
        ]);
        let json = serde_json::to_string(&seed).unwrap();
        assert_eq!(json, "\"0123456789abcdeffedcba9876543210\"");
    }

    #[test]
    fn test_seed_rejects_wrong_length_and_non_hex() {
        assert!(serde_json::from_str::<GeneratorSeed>("\"\"").is_err());
        assert!(serde_json::from_str::<GeneratorSeed>("\"0123\"").is_err());
        assert!(
            serde_json::from_str::<GeneratorSeed>("\"ghijklmnopqrstuvwxyzghijklmnopqr\"").is_err()
        );
    }
}
