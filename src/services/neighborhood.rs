//! Berlin postal code to neighborhood classification.

/// Label for well-formed postal codes outside every known range.
pub const UNKNOWN_NEIGHBORHOOD: &str = "Other/Unknown";

/// Inclusive postal code range bound to a neighborhood label.
#[derive(Debug, Clone, Copy)]
pub struct NeighborhoodRange {
    pub low: u32,
    pub high: u32,
    pub label: &'static str,
}

const fn range(low: u32, high: u32, label: &'static str) -> NeighborhoodRange {
    NeighborhoodRange { low, high, label }
}

/// Ordered range table; the first matching range wins.
pub const NEIGHBORHOOD_RANGES: &[NeighborhoodRange] = &[
    range(10115, 10119, "Mitte"),
    range(10178, 10179, "Mitte"),
    range(10243, 10249, "Friedrichshain"),
    range(10315, 10319, "Lichtenberg"),
    range(10365, 10369, "Lichtenberg"),
    range(10405, 10439, "Prenzlauer Berg"),
    range(10551, 10559, "Moabit"),
    range(10585, 10629, "Charlottenburg"),
    range(10707, 10719, "Wilmersdorf"),
    range(10777, 10789, "Schöneberg"),
    range(10823, 10829, "Schöneberg"),
    range(10961, 10999, "Kreuzberg"),
    range(12043, 12059, "Neukölln"),
    range(12099, 12109, "Tempelhof"),
    range(12157, 12169, "Steglitz"),
    range(12435, 12437, "Treptow"),
    range(12619, 12629, "Hellersdorf"),
    range(12679, 12689, "Marzahn"),
    range(13086, 13089, "Weißensee"),
    range(13187, 13189, "Pankow"),
    range(13347, 13359, "Wedding"),
    range(13581, 13599, "Spandau"),
    range(14050, 14059, "Westend"),
    range(14193, 14199, "Grunewald"),
];

/// Map a postal code to its neighborhood label.
///
/// Returns `None` when the input is not an integer and
/// [`UNKNOWN_NEIGHBORHOOD`] when no range matches.
pub fn neighborhood_for(postal_code: &str) -> Option<&'static str> {
    let code: u32 = postal_code.trim().parse().ok()?;
    let label = NEIGHBORHOOD_RANGES
        .iter()
        .find(|r| (r.low..=r.high).contains(&code))
        .map_or(UNKNOWN_NEIGHBORHOOD, |r| r.label);
    Some(label)
}
