//! Static catalog mapping OBIS measurement codes to metric families.

use lazy_static::lazy_static;
use std::collections::HashMap;

/// The fixed set of metrics this exporter knows about.
///
/// Modeling the families as a closed enum instead of a name-keyed map means
/// every family is always declared on every scrape, and the tariff-2 family
/// cannot be shadowed by a duplicate key the way it was in earlier versions
/// of this exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// A+ meter reading (energy drawn from the grid)
    ZaehlerstandAplus,
    /// A- meter reading (energy fed into the grid)
    ZaehlerstandAminus,
    /// Tariff 1 consumption reading
    Tarif1Bezug,
    /// Tariff 2 consumption reading
    Tarif2Bezug,
    /// Current active power
    WirkleistungAktuell,
}

impl MetricKind {
    /// Every metric kind, in exposition order.
    pub const ALL: [MetricKind; 5] = [
        MetricKind::ZaehlerstandAplus,
        MetricKind::ZaehlerstandAminus,
        MetricKind::Tarif1Bezug,
        MetricKind::Tarif2Bezug,
        MetricKind::WirkleistungAktuell,
    ];

    /// Canonical exposed metric name.
    pub fn name(self) -> &'static str {
        match self {
            MetricKind::ZaehlerstandAplus => "wirkarbeit_zaehlerstand_aplus_wh",
            MetricKind::ZaehlerstandAminus => "wirkarbeit_zaehlerstand_aminus_wh",
            MetricKind::Tarif1Bezug => "wirkenergie_tarif1_bezug_wh",
            MetricKind::Tarif2Bezug => "wirkenergie_tarif2_bezug_wh",
            MetricKind::WirkleistungAktuell => "wirkleistung_aktuell_w",
        }
    }

    /// Help text for the exposed metric family.
    pub fn help(self) -> &'static str {
        match self {
            MetricKind::ZaehlerstandAplus => "Aktueller Zaehlerstand A+ in Wh",
            MetricKind::ZaehlerstandAminus => "Aktueller Zaehlerstand A- in Wh",
            MetricKind::Tarif1Bezug => "Aktueller Zaehlerstand A+ Tarif 1 in Wh",
            MetricKind::Tarif2Bezug => "Aktueller Zaehlerstand A+ Tarif 2 in Wh",
            MetricKind::WirkleistungAktuell => "Aktuelle Wirkleistung in W",
        }
    }
}

lazy_static! {
    /// OBIS code to metric kind table, fixed at process start.
    static ref OBIS_CODES: HashMap<&'static str, MetricKind> = HashMap::from([
        ("0100010800ff", MetricKind::ZaehlerstandAplus),
        ("0100020800ff", MetricKind::ZaehlerstandAminus),
        ("0100010801ff", MetricKind::Tarif1Bezug),
        ("0100010802ff", MetricKind::Tarif2Bezug),
        ("0100100700ff", MetricKind::WirkleistungAktuell),
    ]);
}

/// Look up a device measurement code in the catalog.
pub fn lookup(code: &str) -> Option<MetricKind> {
    OBIS_CODES.get(code).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_map_to_canonical_names() {
        let expected = [
            ("0100010800ff", "wirkarbeit_zaehlerstand_aplus_wh"),
            ("0100020800ff", "wirkarbeit_zaehlerstand_aminus_wh"),
            ("0100010801ff", "wirkenergie_tarif1_bezug_wh"),
            ("0100010802ff", "wirkenergie_tarif2_bezug_wh"),
            ("0100100700ff", "wirkleistung_aktuell_w"),
        ];
        for (code, name) in expected {
            assert_eq!(lookup(code).unwrap().name(), name);
        }
    }

    #[test]
    fn test_unknown_code_is_absent() {
        assert!(lookup("9999990000ff").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn test_all_kinds_are_reachable_from_the_catalog() {
        for kind in MetricKind::ALL {
            assert!(OBIS_CODES.values().any(|&mapped| mapped == kind));
        }
    }
}
