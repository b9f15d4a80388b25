//! Canonical motif taxonomy: class and subclass names, plus alias resolution.
//!
//! This crate is the single source of truth for every class/subclass label in
//! the system. Detectors emit canonical names only; anything arriving from
//! outside (legacy exports, differently-cased labels) must be routed through
//! [`alias_for`], and an unmapped name is a hard validation failure.
//!
//! Two classes are *derived*: [`Class::Hybrid`] and [`Class::Clusters`] carry
//! dynamic subclass strings (`"<A>_<B>_Overlap"`, `"Mixed_Cluster_<n>_classes"`).
//! Those strings are display forms derived from structured fields; they are
//! validated by shape here but never parsed back into components.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lookup failure for a class or subclass label.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown taxonomy label {name:?}")]
pub struct UnknownTaxonomy {
    pub name: String,
}

/// Motif classes: nine structural, two derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Class {
    #[serde(rename = "Curved_DNA")]
    CurvedDna,
    #[serde(rename = "Slipped_DNA")]
    SlippedDna,
    #[serde(rename = "Cruciform")]
    Cruciform,
    #[serde(rename = "R-Loop")]
    RLoop,
    #[serde(rename = "Triplex")]
    Triplex,
    #[serde(rename = "G-Quadruplex")]
    GQuadruplex,
    #[serde(rename = "i-Motif")]
    IMotif,
    #[serde(rename = "Z-DNA")]
    ZDna,
    #[serde(rename = "A-philic_DNA")]
    APhilicDna,
    #[serde(rename = "Hybrid")]
    Hybrid,
    #[serde(rename = "Clusters")]
    Clusters,
}

impl Class {
    /// The nine structural (primary) classes in taxonomy order.
    pub const STRUCTURAL: [Class; 9] = [
        Class::CurvedDna,
        Class::SlippedDna,
        Class::Cruciform,
        Class::RLoop,
        Class::Triplex,
        Class::GQuadruplex,
        Class::IMotif,
        Class::ZDna,
        Class::APhilicDna,
    ];

    /// Canonical display name.
    pub fn name(self) -> &'static str {
        match self {
            Class::CurvedDna => "Curved_DNA",
            Class::SlippedDna => "Slipped_DNA",
            Class::Cruciform => "Cruciform",
            Class::RLoop => "R-Loop",
            Class::Triplex => "Triplex",
            Class::GQuadruplex => "G-Quadruplex",
            Class::IMotif => "i-Motif",
            Class::ZDna => "Z-DNA",
            Class::APhilicDna => "A-philic_DNA",
            Class::Hybrid => "Hybrid",
            Class::Clusters => "Clusters",
        }
    }

    /// True for the two post-processor-produced classes.
    pub fn is_derived(self) -> bool {
        matches!(self, Class::Hybrid | Class::Clusters)
    }

    /// Canonical subclass names for a structural class. Derived classes have
    /// dynamic subclasses and return an empty slice.
    pub fn subclasses(self) -> &'static [&'static str] {
        match self {
            Class::CurvedDna => &["Global Curvature", "Local Curvature"],
            Class::SlippedDna => &["Direct Repeat", "STR"],
            Class::Cruciform => &["Cruciform forming IRs"],
            Class::RLoop => &["R-loop formation sites (M1)", "R-loop formation sites (M2)"],
            Class::Triplex => &["Triplex", "Sticky DNA"],
            Class::GQuadruplex => &[
                "Telomeric",
                "Higher-order/G-wire",
                "Stacked",
                "Canonical",
                "Bulged",
                "Extended-loop",
                "G-triplex",
                "Weak PQS",
            ],
            Class::IMotif => &["Canonical", "AC-motif (HUR)"],
            Class::ZDna => &["Z-DNA", "eGZ"],
            Class::APhilicDna => &["A-philic DNA"],
            Class::Hybrid | Class::Clusters => &[],
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fold a label for alias comparison: lowercase, separators stripped.
fn fold(label: &str) -> String {
    label
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_' | '.' | '(' | ')' | '/'))
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Resolve a class label (canonical, legacy, or case variant).
pub fn canonical_class(label: &str) -> Result<Class, UnknownTaxonomy> {
    let folded = fold(label);
    let class = match folded.as_str() {
        "curveddna" | "curved" | "bentdna" => Class::CurvedDna,
        "slippeddna" | "slipped" => Class::SlippedDna,
        "cruciform" | "cruciformdna" | "invertedrepeat" => Class::Cruciform,
        "rloop" | "rloops" | "rlfs" => Class::RLoop,
        "triplex" | "hdna" | "triplexdna" => Class::Triplex,
        "gquadruplex" | "g4" | "gq" | "quadruplex" => Class::GQuadruplex,
        "imotif" | "im" => Class::IMotif,
        "zdna" | "z" => Class::ZDna,
        "aphilicdna" | "aphilic" => Class::APhilicDna,
        "hybrid" => Class::Hybrid,
        "clusters" | "cluster" | "mixedcluster" => Class::Clusters,
        _ => {
            return Err(UnknownTaxonomy {
                name: label.to_string(),
            });
        }
    };
    Ok(class)
}

/// Resolve a subclass label within a class. For the two derived classes the
/// label is validated by shape instead of table lookup.
pub fn canonical_subclass(class: Class, label: &str) -> Result<String, UnknownTaxonomy> {
    if class.is_derived() {
        if is_valid_derived_subclass(class, label) {
            return Ok(label.to_string());
        }
        return Err(UnknownTaxonomy {
            name: label.to_string(),
        });
    }
    let folded = fold(label);
    for &canon in class.subclasses() {
        if fold(canon) == folded {
            return Ok(canon.to_string());
        }
    }
    // Legacy subclass spellings that do not fold onto the canonical name.
    let legacy = match (class, folded.as_str()) {
        (Class::CurvedDna, "aphasedrepeat" | "aphasedrepeats" | "apr") => Some("Global Curvature"),
        (Class::CurvedDna, "polyatract" | "attract") => Some("Local Curvature"),
        (Class::SlippedDna, "shorttandemrepeat" | "microsatellite") => Some("STR"),
        (Class::GQuadruplex, "gwire" | "higherorder") => Some("Higher-order/G-wire"),
        (Class::GQuadruplex, "pqs" | "weakpqs") => Some("Weak PQS"),
        (Class::GQuadruplex, "canonicalg4") => Some("Canonical"),
        (Class::IMotif, "acmotif" | "hur") => Some("AC-motif (HUR)"),
        (Class::ZDna, "egzmotif" | "extendedgz") => Some("eGZ"),
        (Class::Triplex, "stickydna" | "sticky") => Some("Sticky DNA"),
        (Class::Triplex, "mirrortriplex" | "mirrorrepeat") => Some("Triplex"),
        (Class::Cruciform, "ir" | "palindrome") => Some("Cruciform forming IRs"),
        _ => None,
    };
    legacy.map(str::to_string).ok_or_else(|| UnknownTaxonomy {
        name: label.to_string(),
    })
}

/// Shape check for dynamic subclass strings of the derived classes.
fn is_valid_derived_subclass(class: Class, label: &str) -> bool {
    match class {
        Class::Hybrid => {
            let Some(body) = label.strip_suffix("_Overlap") else {
                return false;
            };
            // "<A>_<B>" where both halves are canonical structural class
            // names. Class names themselves contain '_', so try every split.
            body.match_indices('_').any(|(i, _)| {
                let (a, b) = (&body[..i], &body[i + 1..]);
                canonical_class(a).is_ok() && canonical_class(b).is_ok()
            })
        }
        Class::Clusters => label
            .strip_prefix("Mixed_Cluster_")
            .and_then(|rest| rest.strip_suffix("_classes"))
            .map(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
            .unwrap_or(false),
        _ => false,
    }
}

/// Resolve a `"Class"` or `"Class/Subclass"` label into canonical ids.
///
/// A bare class label resolves only when the class has exactly one subclass;
/// otherwise the subclass must be given explicitly after a `:`.
pub fn alias_for(label: &str) -> Result<(Class, String), UnknownTaxonomy> {
    if let Some((class_part, sub_part)) = label.split_once(':') {
        let class = canonical_class(class_part.trim())?;
        let sub = canonical_subclass(class, sub_part.trim())?;
        return Ok((class, sub));
    }
    let class = canonical_class(label.trim())?;
    match class.subclasses() {
        [only] => Ok((class, (*only).to_string())),
        _ => Err(UnknownTaxonomy {
            name: label.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_aliases_resolve() {
        assert_eq!(canonical_class("G4").unwrap(), Class::GQuadruplex);
        assert_eq!(canonical_class("z-dna").unwrap(), Class::ZDna);
        assert_eq!(canonical_class("Z_DNA").unwrap(), Class::ZDna);
        assert_eq!(canonical_class("r loop").unwrap(), Class::RLoop);
        assert!(canonical_class("B-DNA").is_err());
    }

    #[test]
    fn subclass_aliases_resolve() {
        assert_eq!(
            canonical_subclass(Class::GQuadruplex, "g-wire").unwrap(),
            "Higher-order/G-wire"
        );
        assert_eq!(
            canonical_subclass(Class::IMotif, "AC motif").unwrap(),
            "AC-motif (HUR)"
        );
        assert_eq!(
            canonical_subclass(Class::ZDna, "Extended GZ").unwrap(),
            "eGZ"
        );
        assert!(canonical_subclass(Class::ZDna, "B-Z junction").is_err());
    }

    #[test]
    fn canonical_names_round_trip() {
        for class in Class::STRUCTURAL {
            assert_eq!(canonical_class(class.name()).unwrap(), class);
            for &sub in class.subclasses() {
                assert_eq!(canonical_subclass(class, sub).unwrap(), sub);
            }
        }
    }

    #[test]
    fn derived_subclasses_validate_by_shape() {
        assert!(
            canonical_subclass(Class::Hybrid, "G-Quadruplex_Z-DNA_Overlap").is_ok()
        );
        assert!(
            canonical_subclass(Class::Hybrid, "Curved_DNA_Z-DNA_Overlap").is_ok()
        );
        assert!(canonical_subclass(Class::Hybrid, "G-Quadruplex_Overlap").is_err());
        assert!(
            canonical_subclass(Class::Clusters, "Mixed_Cluster_4_classes").is_ok()
        );
        assert!(
            canonical_subclass(Class::Clusters, "Mixed_Cluster_x_classes").is_err()
        );
    }

    #[test]
    fn alias_for_requires_subclass_when_ambiguous() {
        assert_eq!(
            alias_for("cruciform").unwrap(),
            (Class::Cruciform, "Cruciform forming IRs".to_string())
        );
        assert!(alias_for("G4").is_err());
        assert_eq!(
            alias_for("G4: telomeric").unwrap(),
            (Class::GQuadruplex, "Telomeric".to_string())
        );
    }

    #[test]
    fn serde_uses_canonical_names() {
        let json = serde_json::to_string(&Class::GQuadruplex).unwrap();
        assert_eq!(json, "\"G-Quadruplex\"");
        let back: Class = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Class::GQuadruplex);
    }
}
