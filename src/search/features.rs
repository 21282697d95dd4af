//! Feature encoding tables and item specifications
//!
//! Every part of a visual item is the concatenation color ‖ shape ‖ role.
//! Colors are opponent-process codes (black/white, red/green, blue/yellow,
//! each band three units wide plus its "not" band). Shapes are line-segment
//! and junction codes; some shape families carry extra emergent-feature
//! units after the 27 shared dimensions. Roles code relational position.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SearchError};
use crate::core::types::FeatureVector;

pub const COLOR_DIMENSIONS: usize = 18;
pub const ROLE_DIMENSIONS: usize = 4;

/// Emergent units appended to the configural (Pomerantz-style) shapes
pub const CONFIGURAL_UNITS: usize = 128;

const COLORS: &[(&str, [i8; COLOR_DIMENSIONS])] = &[
    ("white", [1, 1, 1, -1, -1, -1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
    ("black", [-1, -1, -1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
    ("red", [0, 0, 0, 0, 0, 0, 1, 1, 1, -1, -1, -1, 0, 0, 0, 0, 0, 0]),
    ("green", [0, 0, 0, 0, 0, 0, -1, -1, -1, 1, 1, 1, 0, 0, 0, 0, 0, 0]),
    ("ltblue", [1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 1, 1, 1, -1, -1, -1]),
    ("blue", [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, -1, -1, -1]),
    ("yellow", [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, -1, -1, -1, 1, 1, 1]),
    ("yel2ow", [0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 0, 0, 0, 1, 1, 1]),
    ("orange", [0, 0, 0, 0, 0, 0, 1, 1, 0, -1, -1, 0, -1, 0, 0, 1, 0, 0]),
    ("pink", [1, 1, 0, -1, -1, 0, 1, 0, 0, -1, 0, 0, 0, 0, 0, 0, 0, 0]),
    ("dkgrn", [1, 1, 1, -1, -1, 0, -1, -1, -1, 1, 1, 1, 0, 0, 0, 0, 0, 0]),
    ("brown", [1, 1, 1, -1, -1, 0, 1, 1, -1, -1, -1, 1, 0, 0, 0, 0, 0, 0]),
];

const BASE_SHAPES: &[(&str, [i8; 27])] = &[
    ("horizontal", [1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
    ("vertical", [0, 0, 0, 0, 0, 0, 0, 1, 0, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
    ("T1", [1, 1, 1, 1, 0, 0, 0, 1, 0, 1, 1, 1, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0]),
    ("T2", [1, 1, 1, 1, 0, 0, 0, 1, 0, 1, 1, 1, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0]),
    ("T3", [1, 1, 1, 1, 0, 0, 0, 1, 0, 1, 1, 1, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0]),
    ("T4", [1, 1, 1, 1, 0, 0, 0, 1, 0, 1, 1, 1, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0]),
    ("L1", [1, 1, 1, 1, 0, 0, 0, 1, 0, 1, 1, 1, 1, 0, 0, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0]),
    ("L2", [1, 1, 1, 1, 0, 0, 0, 1, 0, 1, 1, 1, 1, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0]),
    ("L3", [1, 1, 1, 1, 0, 0, 0, 1, 0, 1, 1, 1, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0]),
    ("L4", [1, 1, 1, 1, 0, 0, 0, 1, 0, 1, 1, 1, 1, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0]),
    ("X", [0, 0, 0, 1, 0, 1, 1, 1, 0, 0, 0, 0, 1, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
    ("O", [1, 0, 0, 1, 0, 0, 0, 1, 0, 1, 0, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
    ("Q", [1, 0, 0, 1, 0, 0, 0, 1, 0, 1, 1, 1, 1, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
    ("DORN1", [1, 0, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
];

/// Configural shapes: base code, then two banks of `CONFIGURAL_UNITS`
/// emergent units, each bank either all on or all off.
const CONFIGURAL_SHAPES: &[(&str, [i8; 27], bool, bool)] = &[
    ("DORN2", [0, 0, 0, 1, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0], false, false),
    ("DORN6", [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0], false, false),
    ("P1", [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 1, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0], false, true),
    ("P2", [1, 1, 1, 1, 0, 0, 0, 1, 0, 1, 1, 1, 1, 1, 1, 1, 1, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0], false, true),
    ("arrow", [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0], true, false),
    ("triangle", [1, 1, 1, 1, 0, 0, 0, 1, 0, 1, 1, 1, 1, 1, 1, 1, 1, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0], false, true),
];

const X_CODE: [i8; 27] = [0, 0, 0, 1, 0, 1, 1, 1, 0, 0, 0, 0, 1, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
const O_CODE: [i8; 27] = [1, 0, 0, 1, 0, 0, 0, 1, 0, 1, 0, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];

/// Relational shapes: X or O with a two-unit emergent "above/below" code
const RELATIONAL_SHAPES: &[(&str, [i8; 27], [i8; 2])] = &[
    ("cheatXabove", X_CODE, [1, 0]),
    ("cheatObelow", O_CODE, [1, 0]),
    ("cheatOabove", O_CODE, [0, 1]),
    ("cheatXbelow", X_CODE, [0, 1]),
    ("nocheatX", X_CODE, [0, 0]),
    ("nocheatO", O_CODE, [0, 0]),
];

const ROLES: &[(&str, [i8; ROLE_DIMENSIONS])] = &[
    ("above", [1, 1, 0, 0]),
    ("below", [0, 0, 1, 1]),
    ("none", [0, 0, 0, 0]),
];

/// One part of an item: symbolic color, shape, and relational role
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartSpec {
    pub color: String,
    pub shape: String,
    pub role: String,
}

impl PartSpec {
    pub fn new(color: &str, shape: &str, role: &str) -> Self {
        Self {
            color: color.to_string(),
            shape: shape.to_string(),
            role: role.to_string(),
        }
    }

    /// Single part with no relational role
    pub fn plain(color: &str, shape: &str) -> Self {
        Self::new(color, shape, "none")
    }
}

impl std::fmt::Display for PartSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({})", self.color, self.shape, self.role)
    }
}

/// An item kind plus how many copies go in the display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSpec {
    pub parts: Vec<PartSpec>,
    pub count: u32,
}

impl ItemSpec {
    pub fn new(parts: Vec<PartSpec>, count: u32) -> Self {
        Self { parts, count }
    }

    /// `count` single-part items of one color and shape
    pub fn plain(color: &str, shape: &str, count: u32) -> Self {
        Self::new(vec![PartSpec::plain(color, shape)], count)
    }

    pub fn describe(&self) -> String {
        let parts: Vec<String> = self.parts.iter().map(|p| p.to_string()).collect();
        format!("[{}]_{}", parts.join(", "), self.count)
    }
}

/// Band widths of an encoded part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureLayout {
    pub color: usize,
    pub shape: usize,
    pub role: usize,
}

impl FeatureLayout {
    /// Layout of a part of `len` dimensions under the standard tables
    pub fn for_part_len(len: usize) -> Option<Self> {
        let shape = len.checked_sub(COLOR_DIMENSIONS + ROLE_DIMENSIONS)?;
        Some(Self { color: COLOR_DIMENSIONS, shape, role: ROLE_DIMENSIONS })
    }

    pub fn total(&self) -> usize {
        self.color + self.shape + self.role
    }

    /// Number of leading dimensions that take part in parallel matching
    pub fn non_relation(&self) -> usize {
        self.color + self.shape
    }
}

/// Symbolic-name to feature-vector lookup
#[derive(Debug, Clone)]
pub struct FeatureTables {
    colors: AHashMap<String, FeatureVector>,
    shapes: AHashMap<String, FeatureVector>,
    roles: AHashMap<String, FeatureVector>,
}

impl Default for FeatureTables {
    fn default() -> Self {
        Self::standard()
    }
}

impl FeatureTables {
    /// The standard color, shape and role encodings
    pub fn standard() -> Self {
        let colors = COLORS
            .iter()
            .map(|(name, code)| (name.to_string(), code.to_vec()))
            .collect();

        let mut shapes: AHashMap<String, FeatureVector> = BASE_SHAPES
            .iter()
            .map(|(name, code)| (name.to_string(), code.to_vec()))
            .collect();

        for (name, code, first_bank, second_bank) in CONFIGURAL_SHAPES {
            let mut vector = code.to_vec();
            vector.extend(std::iter::repeat(*first_bank as i8).take(CONFIGURAL_UNITS));
            vector.extend(std::iter::repeat(*second_bank as i8).take(CONFIGURAL_UNITS));
            shapes.insert(name.to_string(), vector);
        }

        for (name, code, relation) in RELATIONAL_SHAPES {
            let mut vector = code.to_vec();
            vector.extend_from_slice(relation);
            shapes.insert(name.to_string(), vector);
        }

        let roles = ROLES
            .iter()
            .map(|(name, code)| (name.to_string(), code.to_vec()))
            .collect();

        Self { colors, shapes, roles }
    }

    pub fn color(&self, name: &str) -> Option<&[i8]> {
        self.colors.get(name).map(|v| v.as_slice())
    }

    pub fn shape(&self, name: &str) -> Option<&[i8]> {
        self.shapes.get(name).map(|v| v.as_slice())
    }

    pub fn role(&self, name: &str) -> Option<&[i8]> {
        self.roles.get(name).map(|v| v.as_slice())
    }

    /// Sorted color names, for listings
    pub fn color_names(&self) -> Vec<&str> {
        sorted_keys(&self.colors)
    }

    pub fn shape_names(&self) -> Vec<&str> {
        sorted_keys(&self.shapes)
    }

    pub fn role_names(&self) -> Vec<&str> {
        sorted_keys(&self.roles)
    }

    /// Concatenate color ‖ shape ‖ role for one part
    pub fn encode_part(&self, part: &PartSpec) -> Result<FeatureVector> {
        let color = self
            .color(&part.color)
            .ok_or_else(|| SearchError::UnknownColor(part.color.clone()))?;
        let shape = self
            .shape(&part.shape)
            .ok_or_else(|| SearchError::UnknownShape(part.shape.clone()))?;
        let role = self
            .role(&part.role)
            .ok_or_else(|| SearchError::UnknownRole(part.role.clone()))?;

        let mut vector = Vec::with_capacity(color.len() + shape.len() + role.len());
        vector.extend_from_slice(color);
        vector.extend_from_slice(shape);
        vector.extend_from_slice(role);
        Ok(vector)
    }

    /// Encode every part of an item, in order
    pub fn encode_parts(&self, parts: &[PartSpec]) -> Result<Vec<FeatureVector>> {
        if parts.is_empty() {
            return Err(SearchError::EmptyItem);
        }
        parts.iter().map(|p| self.encode_part(p)).collect()
    }
}

fn sorted_keys(map: &AHashMap<String, FeatureVector>) -> Vec<&str> {
    let mut names: Vec<&str> = map.keys().map(|k| k.as_str()).collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_part_layout() {
        let tables = FeatureTables::standard();
        let vector = tables.encode_part(&PartSpec::plain("red", "vertical")).unwrap();
        assert_eq!(vector.len(), 18 + 27 + 4);
        assert_eq!(&vector[..18], tables.color("red").unwrap());
        assert_eq!(&vector[18..45], tables.shape("vertical").unwrap());
        assert_eq!(&vector[45..], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_role_codes() {
        let tables = FeatureTables::standard();
        assert_eq!(tables.role("above").unwrap(), &[1, 1, 0, 0]);
        assert_eq!(tables.role("below").unwrap(), &[0, 0, 1, 1]);
        assert_eq!(tables.role("none").unwrap(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_extended_shape_lengths() {
        let tables = FeatureTables::standard();
        assert_eq!(tables.shape("cheatXabove").unwrap().len(), 29);
        assert_eq!(tables.shape("nocheatO").unwrap().len(), 29);
        assert_eq!(tables.shape("P1").unwrap().len(), 27 + 2 * CONFIGURAL_UNITS);

        let arrow = tables.shape("arrow").unwrap();
        assert!(arrow[27..27 + CONFIGURAL_UNITS].iter().all(|&v| v == 1));
        assert!(arrow[27 + CONFIGURAL_UNITS..].iter().all(|&v| v == 0));
    }

    #[test]
    fn test_unknown_names_fail_fast() {
        let tables = FeatureTables::standard();
        assert!(matches!(
            tables.encode_part(&PartSpec::plain("mauve", "X")),
            Err(SearchError::UnknownColor(c)) if c == "mauve"
        ));
        assert!(matches!(
            tables.encode_part(&PartSpec::plain("red", "star")),
            Err(SearchError::UnknownShape(_))
        ));
        assert!(matches!(
            tables.encode_part(&PartSpec::new("red", "X", "beside")),
            Err(SearchError::UnknownRole(_))
        ));
    }

    #[test]
    fn test_empty_item_rejected() {
        let tables = FeatureTables::standard();
        assert!(matches!(tables.encode_parts(&[]), Err(SearchError::EmptyItem)));
    }

    #[test]
    fn test_multi_part_encoding_preserves_order() {
        let tables = FeatureTables::standard();
        let parts = vec![
            PartSpec::new("red", "X", "above"),
            PartSpec::new("green", "O", "below"),
        ];
        let vectors = tables.encode_parts(&parts).unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(&vectors[0][45..], &[1, 1, 0, 0]);
        assert_eq!(&vectors[1][45..], &[0, 0, 1, 1]);
    }

    #[test]
    fn test_layout_for_part_len() {
        let layout = FeatureLayout::for_part_len(49).unwrap();
        assert_eq!(layout, FeatureLayout { color: 18, shape: 27, role: 4 });
        assert_eq!(layout.non_relation(), 45);
        assert!(FeatureLayout::for_part_len(10).is_none());
    }

    #[test]
    fn test_item_spec_describe() {
        let spec = ItemSpec::plain("red", "vertical", 1);
        assert_eq!(spec.describe(), "[red vertical (none)]_1");
    }
}
