// Equipment domain model
use serde::Serialize;

/// Static configuration for one equipment class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EquipmentProfile {
    pub id: &'static str,
    pub code: &'static str,
    pub name: &'static str,
    pub color: &'static str,
    /// Baseline PA%.
    pub base: f64,
    /// Amplitude of the daily swing around `base`, in PA%.
    pub variance: f64,
}

/// The fleet, in declaration order. A profile's seed is its 1-based position here.
pub const PROFILES: [EquipmentProfile; 5] = [
    EquipmentProfile {
        id: "dt",
        code: "DT",
        name: "Dump Truck",
        color: "#2563eb",
        base: 88.0,
        variance: 8.0,
    },
    EquipmentProfile {
        id: "wt",
        code: "WT",
        name: "Water Truck",
        color: "#059669",
        base: 97.0,
        variance: 2.0,
    },
    EquipmentProfile {
        id: "dz",
        code: "DZ",
        name: "Dozer",
        color: "#d97706",
        base: 85.0,
        variance: 12.0,
    },
    EquipmentProfile {
        id: "ex",
        code: "EX",
        name: "Excavator",
        color: "#dc2626",
        base: 98.0,
        variance: 1.0,
    },
    EquipmentProfile {
        id: "gr",
        code: "GR",
        name: "Grader",
        color: "#7c3aed",
        base: 96.0,
        variance: 3.0,
    },
];

/// Parse a `#rrggbb` display color.
pub fn parse_hex_color(color: &str) -> Option<[u8; 3]> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_table() {
        let codes: Vec<&str> = PROFILES.iter().map(|p| p.code).collect();
        assert_eq!(codes, ["DT", "WT", "DZ", "EX", "GR"]);
        assert_eq!(PROFILES[2].name, "Dozer");
        assert_eq!(PROFILES[2].base, 85.0);
        assert_eq!(PROFILES[2].variance, 12.0);
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#2563eb"), Some([0x25, 0x63, 0xeb]));
        assert_eq!(parse_hex_color("2563eb"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
        assert_eq!(parse_hex_color(PROFILES[4].color), Some([0x7c, 0x3a, 0xed]));
    }
}
