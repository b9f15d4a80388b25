//! The scan configuration record.
//!
//! One flat struct with serde defaults; loadable from a TOML file (unknown
//! fields tolerated so configs survive version skew) and then validated and
//! clamped in [`ScanConfig::validated`]. The raw parsed values are kept as
//! written; clamping happens on the derived accessors so a later re-clamp
//! against different runtime context stays possible.

use core_detect::DetectorParams;
use core_model::ScanError;
use core_post::{ClusterParams, HybridParams};
use core_taxonomy::{Class, canonical_class};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Explicit chunk-size overrides for the micro tier (testing and tuning).
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct ChunkTierOverrides {
    pub micro_chunk: u64,
    pub micro_overlap: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Whitelist of detector classes to run; `None` means all nine.
    pub enabled_classes: Option<Vec<String>>,
    /// Explicit chunk sizes, replacing the micro-tier defaults.
    pub chunk_tier_overrides: Option<ChunkTierOverrides>,
    /// Worker-thread cap; 0 or absent means the CPU count.
    pub max_workers: usize,
    /// G4Hunter window width.
    pub g4_window_size: usize,
    pub cruciform_min_arm: usize,
    pub cruciform_max_arm: usize,
    pub cruciform_max_loop: usize,
    pub cluster_window_size: u64,
    pub cluster_min_motifs: usize,
    pub cluster_min_classes: usize,
    pub hybrid_min_overlap: f64,
    pub hybrid_max_overlap: f64,
    /// Wall-clock cap per sequence, milliseconds.
    pub per_sequence_timeout_ms: Option<u64>,
    /// Admit (GC)n dinucleotide runs as eGZ.
    pub egz_include_gc_dinucleotide: bool,
    /// Where ≥ 5 Mbp sequences are staged; system temp dir when absent.
    pub staging_dir: Option<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            enabled_classes: None,
            chunk_tier_overrides: None,
            max_workers: 0,
            g4_window_size: 25,
            cruciform_min_arm: 8,
            cruciform_max_arm: 50,
            cruciform_max_loop: 12,
            cluster_window_size: 300,
            cluster_min_motifs: 4,
            cluster_min_classes: 3,
            hybrid_min_overlap: 0.50,
            hybrid_max_overlap: 0.99,
            per_sequence_timeout_ms: None,
            egz_include_gc_dinucleotide: false,
            staging_dir: None,
        }
    }
}

impl ScanConfig {
    /// Parse a TOML file. Unknown fields are ignored; a malformed file is a
    /// hard error (silently proceeding with defaults hides typos in the
    /// values the user did set).
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let cfg: ScanConfig = toml::from_str(&raw)?;
        info!(target: "engine.config", path = %path.display(), "config_loaded");
        cfg.validated().map_err(anyhow::Error::from)
    }

    /// Validate cross-field constraints and resolve taxonomy names.
    pub fn validated(self) -> Result<Self, ScanError> {
        if let Some(names) = &self.enabled_classes {
            for name in names {
                canonical_class(name)?;
            }
        }
        if let Some(o) = &self.chunk_tier_overrides
            && (o.micro_chunk == 0 || o.micro_overlap >= o.micro_chunk)
        {
            return Err(ScanError::Config(format!(
                "chunk overrides must satisfy 0 < overlap < chunk (got {o:?})"
            )));
        }
        if !(0.0..=1.0).contains(&self.hybrid_min_overlap)
            || !(0.0..=1.0).contains(&self.hybrid_max_overlap)
            || self.hybrid_min_overlap > self.hybrid_max_overlap
        {
            return Err(ScanError::Config(
                "hybrid overlap bounds must satisfy 0 <= min <= max <= 1".to_string(),
            ));
        }
        Ok(self)
    }

    /// Effective worker count.
    pub fn workers(&self) -> usize {
        if self.max_workers == 0 {
            num_cpus::get().max(1)
        } else {
            self.max_workers
        }
    }

    /// Detector classes to run, resolved and deduplicated, taxonomy order.
    pub fn classes(&self) -> Vec<Class> {
        match &self.enabled_classes {
            None => Class::STRUCTURAL.to_vec(),
            Some(names) => {
                let mut picked: Vec<Class> = Class::STRUCTURAL
                    .into_iter()
                    .filter(|c| {
                        names
                            .iter()
                            .any(|n| canonical_class(n).is_ok_and(|r| r == *c))
                    })
                    .collect();
                picked.dedup();
                picked
            }
        }
    }

    pub fn detector_params(&self) -> DetectorParams {
        DetectorParams {
            g4_window: self.g4_window_size.max(1),
            cruciform_min_arm: self.cruciform_min_arm.max(4),
            cruciform_max_arm: self.cruciform_max_arm.max(self.cruciform_min_arm),
            cruciform_max_loop: self.cruciform_max_loop,
            egz_include_gc_dinucleotide: self.egz_include_gc_dinucleotide,
        }
    }

    pub fn hybrid_params(&self) -> HybridParams {
        HybridParams {
            min_overlap: self.hybrid_min_overlap,
            max_overlap: self.hybrid_max_overlap,
        }
    }

    pub fn cluster_params(&self) -> ClusterParams {
        ClusterParams {
            window: self.cluster_window_size.max(1),
            min_motifs: self.cluster_min_motifs.max(1),
            min_classes: self.cluster_min_classes.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_canonical() {
        let cfg = ScanConfig::default();
        assert_eq!(cfg.g4_window_size, 25);
        assert_eq!(cfg.cluster_window_size, 300);
        assert_eq!(cfg.hybrid_min_overlap, 0.50);
        assert_eq!(cfg.classes().len(), 9);
        assert!(cfg.workers() >= 1);
    }

    #[test]
    fn toml_round_trip_with_unknown_fields() {
        let cfg: ScanConfig = toml::from_str(
            r#"
            max_workers = 3
            g4_window_size = 30
            some_future_knob = "ignored"
            [chunk_tier_overrides]
            micro_chunk = 10000
            micro_overlap = 500
            "#,
        )
        .unwrap();
        assert_eq!(cfg.max_workers, 3);
        assert_eq!(cfg.g4_window_size, 30);
        assert_eq!(
            cfg.chunk_tier_overrides,
            Some(ChunkTierOverrides {
                micro_chunk: 10000,
                micro_overlap: 500
            })
        );
    }

    #[test]
    fn enabled_classes_resolve_aliases() {
        let cfg = ScanConfig {
            enabled_classes: Some(vec!["G4".to_string(), "z-dna".to_string()]),
            ..ScanConfig::default()
        };
        let classes = cfg.validated().unwrap().classes();
        assert_eq!(classes, vec![Class::GQuadruplex, Class::ZDna]);
    }

    #[test]
    fn unknown_class_fails_validation() {
        let cfg = ScanConfig {
            enabled_classes: Some(vec!["B-DNA".to_string()]),
            ..ScanConfig::default()
        };
        assert!(cfg.validated().is_err());
    }

    #[test]
    fn bad_chunk_overrides_fail_validation() {
        let cfg = ScanConfig {
            chunk_tier_overrides: Some(ChunkTierOverrides {
                micro_chunk: 100,
                micro_overlap: 100,
            }),
            ..ScanConfig::default()
        };
        assert!(cfg.validated().is_err());
    }
}
