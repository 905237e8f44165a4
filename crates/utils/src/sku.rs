//! Product code labels for estimate and receipt line items.

/// Human label for a known product code. Unknown codes are returned as-is
/// so unrecognized SKUs still render something meaningful.
pub fn sku_label(code: &str) -> &str {
    match code {
        "INT-FLT" => "Interior Flat",
        "INT-EGG" => "Interior Eggshell",
        "INT-SAT" => "Interior Satin",
        "INT-SG" => "Interior Semi-Gloss",
        "EXT-FLT" => "Exterior Flat",
        "EXT-SAT" => "Exterior Satin",
        "EXT-SG" => "Exterior Semi-Gloss",
        "PRM-PVA" => "PVA Drywall Primer",
        "PRM-STN" => "Stain-Blocking Primer",
        "DW-JC" => "Joint Compound",
        "DW-TAPE" => "Drywall Tape",
        "DW-CB" => "Corner Bead",
        "SND-120" => "120-Grit Sanding Sheets",
        "SND-220" => "220-Grit Sanding Sheets",
        "CLK-PNT" => "Paintable Caulk",
        "MSK-TP" => "Masking Tape",
        "MSK-PL" => "Masking Plastic",
        "DRP-CL" => "Canvas Drop Cloth",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::sku_label;

    #[test]
    fn known_code_returns_label() {
        assert_eq!(sku_label("INT-EGG"), "Interior Eggshell");
        assert_eq!(sku_label("DW-JC"), "Joint Compound");
    }

    #[test]
    fn unknown_code_falls_back_to_code() {
        assert_eq!(sku_label("ZZZ-1"), "ZZZ-1");
        assert_eq!(sku_label(""), "");
    }
}
