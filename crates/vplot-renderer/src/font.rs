//! A small stroke font for world-space text.
//!
//! Glyphs live on a 5 x 7 grid (`x` in `0..=4`, `y` in `0..=6`, baseline at
//! `y = 0`). Each stroke is a polyline written as digit pairs, so `"0046"`
//! runs from `(0, 0)` to `(4, 6)`. Lowercase letters use the uppercase
//! glyphs; characters without a glyph only advance the cursor.

use glam::DVec2;

/// Highest grid column
pub const GRID_COLUMNS: f64 = 4.0;
/// Cap height in grid rows
pub const GRID_ROWS: f64 = 6.0;

const GLYPHS: &[(char, &[&str])] = &[
    ('A', &["0003264340", "0343"]),
    ('B', &["00063645443303", "3342413000"]),
    ('C', &["4536160501103041"]),
    ('D', &["00062645412000"]),
    ('E', &["46060040", "0333"]),
    ('F', &["460600", "0333"]),
    ('G', &["45361605011030414323"]),
    ('H', &["0006", "4046", "0343"]),
    ('I', &["1636", "2620", "1030"]),
    ('J', &["4641301001"]),
    ('K', &["0006", "4602", "1340"]),
    ('L', &["060040"]),
    ('M', &["0006234640"]),
    ('N', &["00064046"]),
    ('O', &["163645413010010516"]),
    ('P', &["00063645443303"]),
    ('Q', &["163645413010010516", "2240"]),
    ('R', &["00063645443303", "3340"]),
    ('S', &["453616050413334241301001"]),
    ('T', &["0646", "2620"]),
    ('U', &["060110304146"]),
    ('V', &["062046"]),
    ('W', &["0610233046"]),
    ('X', &["0046", "0640"]),
    ('Y', &["0623", "4623", "2320"]),
    ('Z', &["06460040"]),
    ('0', &["163645413010010516", "0145"]),
    ('1', &["152620", "1030"]),
    ('2', &["05163645440040"]),
    ('3', &["05163645443313", "334241301001"]),
    ('4', &["30360242"]),
    ('5', &["460603334241301001"]),
    ('6', &["4536160501103041423303"]),
    ('7', &["064620"]),
    ('8', &["16364544331302011030414233", "13040516"]),
    ('9', &["43130405163645413010"]),
    ('.', &["2021"]),
    (',', &["2110"]),
    (':', &["2122", "2425"]),
    ('!', &["2226", "2021"]),
    ('?', &["05163645443323", "2021"]),
    ('-', &["1333"]),
    ('+', &["1333", "2224"]),
    ('=', &["1232", "1434"]),
    ('_', &["0040"]),
    ('/', &["0046"]),
    ('(', &["36141230"]),
    (')', &["16343210"]),
    ('<', &["450341"]),
    ('>', &["054301"]),
    ('\'', &["2625"]),
    ('"', &["1615", "3635"]),
    ('%', &["0046", "0506", "4041"]),
];

fn glyph(ch: char) -> Option<&'static [&'static str]> {
    let ch = ch.to_ascii_uppercase();
    GLYPHS.iter().find(|(c, _)| *c == ch).map(|(_, strokes)| *strokes)
}

fn parse_stroke(stroke: &str) -> Vec<DVec2> {
    let digits: Vec<f64> = stroke
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(f64::from)
        .collect();
    digits
        .chunks_exact(2)
        .map(|xy| DVec2::new(xy[0], xy[1]))
        .collect()
}

/// Polylines of `ch` in grid units; empty for spaces and unknown characters.
pub fn strokes(ch: char) -> Vec<Vec<DVec2>> {
    glyph(ch)
        .map(|strokes| strokes.iter().map(|s| parse_stroke(s)).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_table_is_well_formed() {
        for (ch, strokes) in GLYPHS {
            for stroke in *strokes {
                assert!(stroke.len() >= 4 && stroke.len() % 2 == 0, "{ch}: {stroke}");
                assert!(stroke.chars().all(|c| c.is_ascii_digit()), "{ch}: {stroke}");
                for p in parse_stroke(stroke) {
                    assert!(p.x <= GRID_COLUMNS && p.y <= GRID_ROWS, "{ch}: {p}");
                }
            }
        }
    }

    #[test]
    fn test_lowercase_uses_uppercase() {
        assert_eq!(strokes('a'), strokes('A'));
        assert_eq!(strokes('T').len(), 2);
        assert_eq!(strokes('T')[0], vec![DVec2::new(0.0, 6.0), DVec2::new(4.0, 6.0)]);
    }

    #[test]
    fn test_space_and_unknown_are_blank() {
        assert!(strokes(' ').is_empty());
        assert!(strokes('#').is_empty());
    }
}
