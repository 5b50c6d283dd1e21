use ucum::{find_unit, validate};

#[test]
fn catalog_has_core_clinical_units() {
    for code in ["g", "m", "s", "mol", "Cel", "[degF]", "bar", "Pa", "eq", "U"] {
        assert!(find_unit(code).is_some(), "expected atom '{code}' in catalog");
    }
}

#[test]
fn fhir_relevant_expressions_parse() {
    let fhir_units = [
        "%",      // percent
        "mg/dL",  // milligrams per deciliter
        "mmol/L", // millimoles per liter
        "meq/L",  // milliequivalents per liter (exact case-sensitive code)
        "U/L",    // units per liter
        "mm[Hg]", // millimeters of mercury
        "Cel",    // Celsius
        "[degF]", // Fahrenheit
        "kg/m2",  // BMI unit
        "g/dL",   // grams per deciliter
    ];

    for expr in fhir_units {
        assert!(validate(expr).is_ok(), "failed to parse '{expr}'");
    }
}

#[test]
fn quantity_expressions_parse() {
    let quantity_units = [
        "mg",     // milligram
        "mL",     // milliliter
        "cm",     // centimeter
        "mm",     // millimeter
        "kg",     // kilogram
        "[lb_av]", // pound
        "[in_i]", // inch
        "[ft_i]", // foot
        "/min",   // per minute
        "deg",    // degree
        "rad",    // radian
    ];

    for expr in quantity_units {
        assert!(validate(expr).is_ok(), "failed to parse '{expr}'");
    }
}
