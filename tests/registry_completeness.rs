use std::collections::HashSet;
use ucum::{find_prefix, find_unit, get_all_units};

#[test]
fn base_atoms_are_present() {
    for code in ["m", "s", "g", "rad", "K", "C", "cd"] {
        assert!(find_unit(code).is_some(), "missing base atom '{code}'");
    }
}

#[test]
fn derived_and_clinical_units_are_present() {
    let expected = [
        "L", "Hz", "N", "Pa", "J", "W", "V", "mol", "min", "h", "d", "wk", "a", "[car_m]", "Cel",
        "[degF]", "[degR]", "B", "dB", "Np", "pH", "%", "eq", "U", "bar", "atm", "mm[Hg]",
        "[in_i]", "[ft_i]", "[lb_av]", "deg", "[iU]", "[arb'U]",
    ];
    for code in expected {
        assert!(find_unit(code).is_some(), "missing unit '{code}'");
    }
}

#[test]
fn every_catalog_entry_round_trips_through_lookup() {
    for unit in get_all_units() {
        let by_cs = find_unit(unit.cs_code);
        assert_eq!(by_cs.map(|u| u.cs_code), Some(unit.cs_code));
    }
}

#[test]
fn catalog_codes_are_unique() {
    let all = get_all_units();
    let codes: HashSet<&str> = all.iter().map(|u| u.cs_code).collect();
    assert_eq!(codes.len(), all.len(), "duplicate cs_code in unit catalog");
}

#[test]
fn metric_prefixes_span_yotta_to_yocto() {
    for code in ["Y", "Z", "E", "P", "T", "G", "M", "k", "h", "da"] {
        assert!(find_prefix(code).is_some(), "missing prefix '{code}'");
    }
    for code in ["d", "c", "m", "u", "n", "p", "f", "a", "z", "y"] {
        assert!(find_prefix(code).is_some(), "missing prefix '{code}'");
    }
    assert_eq!(find_prefix("Y").unwrap().exponent, 24);
    assert_eq!(find_prefix("y").unwrap().exponent, -24);
}

#[test]
fn unknown_atom_and_prefix_are_absent() {
    assert!(find_unit("[NTU]").is_none());
    assert!(find_prefix("X").is_none());
}
