//! Supported pairing-friendly curves.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a curve backend.
///
/// The order of [`CurveId::implemented`] is stable and is the order used when
/// listing curves to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveId {
    Bn254,
    Bls12_377,
    Bls12_381,
    Bw6_761,
    Bw6_767,
    Mnt4_298,
    Mnt6_298,
}

impl CurveId {
    /// Every curve this build can benchmark.
    pub fn implemented() -> &'static [CurveId] {
        &[
            CurveId::Bn254,
            CurveId::Bls12_377,
            CurveId::Bls12_381,
            CurveId::Bw6_761,
            CurveId::Bw6_767,
            CurveId::Mnt4_298,
            CurveId::Mnt6_298,
        ]
    }

    /// Canonical display name, always lower-case.
    pub fn name(&self) -> &'static str {
        match self {
            CurveId::Bn254 => "bn254",
            CurveId::Bls12_377 => "bls12_377",
            CurveId::Bls12_381 => "bls12_381",
            CurveId::Bw6_761 => "bw6_761",
            CurveId::Bw6_767 => "bw6_767",
            CurveId::Mnt4_298 => "mnt4_298",
            CurveId::Mnt6_298 => "mnt6_298",
        }
    }

    /// Case-insensitive lookup against [`CurveId::implemented`].
    pub fn from_name(name: &str) -> Option<CurveId> {
        let wanted = name.to_lowercase();
        Self::implemented()
            .iter()
            .copied()
            .find(|id| id.name().to_lowercase() == wanted)
    }

    /// Comma separated list of curve names, for error and help messages.
    pub fn supported_names() -> String {
        Self::implemented()
            .iter()
            .map(|id| id.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for CurveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(CurveId::from_name("BN254"), Some(CurveId::Bn254));
        assert_eq!(CurveId::from_name("bn254"), Some(CurveId::Bn254));
        assert_eq!(CurveId::from_name("Bls12_381"), Some(CurveId::Bls12_381));
        assert_eq!(CurveId::from_name("secp256k1"), None);
    }

    #[test]
    fn test_names_are_lower_case_and_unique() {
        let names: Vec<&str> = CurveId::implemented().iter().map(|c| c.name()).collect();
        for n in &names {
            assert_eq!(*n, n.to_lowercase());
        }
        let mut dedup = names.clone();
        dedup.dedup();
        assert_eq!(dedup.len(), names.len());
    }

    #[test]
    fn test_serde_uses_display_name() {
        let json = serde_json::to_string(&CurveId::Bls12_377).unwrap();
        assert_eq!(json, "\"bls12_377\"");
        for id in CurveId::implemented() {
            let json = serde_json::to_string(id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.name()));
        }
    }
}
