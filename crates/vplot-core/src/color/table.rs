//! Named color table.
//!
//! Seeded from four palettes. Later palettes override earlier ones, and the
//! order is xkcd, tableau, CSS4, base so the familiar names keep their usual
//! meaning (`"red"` is pure red, not xkcd red).

use std::collections::HashMap;
use std::sync::LazyLock;

/// The basic single-letter colors.
const BASE: &[(&str, [f64; 3])] = &[
    ("b", [0.0, 0.0, 1.0]),
    ("g", [0.0, 0.5, 0.0]),
    ("r", [1.0, 0.0, 0.0]),
    ("c", [0.0, 0.75, 0.75]),
    ("m", [0.75, 0.0, 0.75]),
    ("y", [0.75, 0.75, 0.0]),
    ("k", [0.0, 0.0, 0.0]),
    ("w", [1.0, 1.0, 1.0]),
];

const CSS4: &[(&str, &str)] = &[
    ("aliceblue", "#F0F8FF"),
    ("antiquewhite", "#FAEBD7"),
    ("aqua", "#00FFFF"),
    ("aquamarine", "#7FFFD4"),
    ("azure", "#F0FFFF"),
    ("beige", "#F5F5DC"),
    ("bisque", "#FFE4C4"),
    ("black", "#000000"),
    ("blanchedalmond", "#FFEBCD"),
    ("blue", "#0000FF"),
    ("blueviolet", "#8A2BE2"),
    ("brown", "#A52A2A"),
    ("burlywood", "#DEB887"),
    ("cadetblue", "#5F9EA0"),
    ("chartreuse", "#7FFF00"),
    ("chocolate", "#D2691E"),
    ("coral", "#FF7F50"),
    ("cornflowerblue", "#6495ED"),
    ("cornsilk", "#FFF8DC"),
    ("crimson", "#DC143C"),
    ("cyan", "#00FFFF"),
    ("darkblue", "#00008B"),
    ("darkcyan", "#008B8B"),
    ("darkgoldenrod", "#B8860B"),
    ("darkgray", "#A9A9A9"),
    ("darkgreen", "#006400"),
    ("darkgrey", "#A9A9A9"),
    ("darkkhaki", "#BDB76B"),
    ("darkmagenta", "#8B008B"),
    ("darkolivegreen", "#556B2F"),
    ("darkorange", "#FF8C00"),
    ("darkorchid", "#9932CC"),
    ("darkred", "#8B0000"),
    ("darksalmon", "#E9967A"),
    ("darkseagreen", "#8FBC8F"),
    ("darkslateblue", "#483D8B"),
    ("darkslategray", "#2F4F4F"),
    ("darkslategrey", "#2F4F4F"),
    ("darkturquoise", "#00CED1"),
    ("darkviolet", "#9400D3"),
    ("deeppink", "#FF1493"),
    ("deepskyblue", "#00BFFF"),
    ("dimgray", "#696969"),
    ("dimgrey", "#696969"),
    ("dodgerblue", "#1E90FF"),
    ("firebrick", "#B22222"),
    ("floralwhite", "#FFFAF0"),
    ("forestgreen", "#228B22"),
    ("fuchsia", "#FF00FF"),
    ("gainsboro", "#DCDCDC"),
    ("ghostwhite", "#F8F8FF"),
    ("gold", "#FFD700"),
    ("goldenrod", "#DAA520"),
    ("gray", "#808080"),
    ("green", "#008000"),
    ("greenyellow", "#ADFF2F"),
    ("grey", "#808080"),
    ("honeydew", "#F0FFF0"),
    ("hotpink", "#FF69B4"),
    ("indianred", "#CD5C5C"),
    ("indigo", "#4B0082"),
    ("ivory", "#FFFFF0"),
    ("khaki", "#F0E68C"),
    ("lavender", "#E6E6FA"),
    ("lavenderblush", "#FFF0F5"),
    ("lawngreen", "#7CFC00"),
    ("lemonchiffon", "#FFFACD"),
    ("lightblue", "#ADD8E6"),
    ("lightcoral", "#F08080"),
    ("lightcyan", "#E0FFFF"),
    ("lightgoldenrodyellow", "#FAFAD2"),
    ("lightgray", "#D3D3D3"),
    ("lightgreen", "#90EE90"),
    ("lightgrey", "#D3D3D3"),
    ("lightpink", "#FFB6C1"),
    ("lightsalmon", "#FFA07A"),
    ("lightseagreen", "#20B2AA"),
    ("lightskyblue", "#87CEFA"),
    ("lightslategray", "#778899"),
    ("lightslategrey", "#778899"),
    ("lightsteelblue", "#B0C4DE"),
    ("lightyellow", "#FFFFE0"),
    ("lime", "#00FF00"),
    ("limegreen", "#32CD32"),
    ("linen", "#FAF0E6"),
    ("magenta", "#FF00FF"),
    ("maroon", "#800000"),
    ("mediumaquamarine", "#66CDAA"),
    ("mediumblue", "#0000CD"),
    ("mediumorchid", "#BA55D3"),
    ("mediumpurple", "#9370DB"),
    ("mediumseagreen", "#3CB371"),
    ("mediumslateblue", "#7B68EE"),
    ("mediumspringgreen", "#00FA9A"),
    ("mediumturquoise", "#48D1CC"),
    ("mediumvioletred", "#C71585"),
    ("midnightblue", "#191970"),
    ("mintcream", "#F5FFFA"),
    ("mistyrose", "#FFE4E1"),
    ("moccasin", "#FFE4B5"),
    ("navajowhite", "#FFDEAD"),
    ("navy", "#000080"),
    ("oldlace", "#FDF5E6"),
    ("olive", "#808000"),
    ("olivedrab", "#6B8E23"),
    ("orange", "#FFA500"),
    ("orangered", "#FF4500"),
    ("orchid", "#DA70D6"),
    ("palegoldenrod", "#EEE8AA"),
    ("palegreen", "#98FB98"),
    ("paleturquoise", "#AFEEEE"),
    ("palevioletred", "#DB7093"),
    ("papayawhip", "#FFEFD5"),
    ("peachpuff", "#FFDAB9"),
    ("peru", "#CD853F"),
    ("pink", "#FFC0CB"),
    ("plum", "#DDA0DD"),
    ("powderblue", "#B0E0E6"),
    ("purple", "#800080"),
    ("rebeccapurple", "#663399"),
    ("red", "#FF0000"),
    ("rosybrown", "#BC8F8F"),
    ("royalblue", "#4169E1"),
    ("saddlebrown", "#8B4513"),
    ("salmon", "#FA8072"),
    ("sandybrown", "#F4A460"),
    ("seagreen", "#2E8B57"),
    ("seashell", "#FFF5EE"),
    ("sienna", "#A0522D"),
    ("silver", "#C0C0C0"),
    ("skyblue", "#87CEEB"),
    ("slateblue", "#6A5ACD"),
    ("slategray", "#708090"),
    ("slategrey", "#708090"),
    ("snow", "#FFFAFA"),
    ("springgreen", "#00FF7F"),
    ("steelblue", "#4682B4"),
    ("tan", "#D2B48C"),
    ("teal", "#008080"),
    ("thistle", "#D8BFD8"),
    ("tomato", "#FF6347"),
    ("turquoise", "#40E0D0"),
    ("violet", "#EE82EE"),
    ("wheat", "#F5DEB3"),
    ("white", "#FFFFFF"),
    ("whitesmoke", "#F5F5F5"),
    ("yellow", "#FFFF00"),
    ("yellowgreen", "#9ACD32"),
];

const TABLEAU: &[(&str, &str)] = &[
    ("tab:blue", "#1f77b4"),
    ("tab:orange", "#ff7f0e"),
    ("tab:green", "#2ca02c"),
    ("tab:red", "#d62728"),
    ("tab:purple", "#9467bd"),
    ("tab:brown", "#8c564b"),
    ("tab:pink", "#e377c2"),
    ("tab:gray", "#7f7f7f"),
    ("tab:olive", "#bcbd22"),
    ("tab:cyan", "#17becf"),
];

/// A curated selection of the xkcd survey colors, not the full survey list.
/// Names also defined by CSS4 or the base colors resolve to those instead.
const XKCD: &[(&str, &str)] = &[
    ("xkcd:cloudy blue", "#acc2d9"),
    ("xkcd:dark pastel green", "#56ae57"),
    ("xkcd:dust", "#b2996e"),
    ("xkcd:electric lime", "#a8ff04"),
    ("xkcd:fresh green", "#69d84f"),
    ("xkcd:light eggplant", "#894585"),
    ("xkcd:burnt orange", "#c04e01"),
    ("xkcd:neon green", "#0cff0c"),
    ("xkcd:rose", "#cf6275"),
    ("xkcd:gold", "#dbb40c"),
    ("xkcd:bright blue", "#0165fc"),
    ("xkcd:dark red", "#840000"),
    ("xkcd:crimson", "#8c000f"),
    ("xkcd:mint", "#9ffeb0"),
    ("xkcd:coral", "#fc5a50"),
    ("xkcd:khaki", "#aaa662"),
    ("xkcd:navy", "#01153e"),
    ("xkcd:white", "#ffffff"),
    ("xkcd:light pink", "#ffd1df"),
    ("xkcd:mustard", "#ceb301"),
    ("xkcd:indigo", "#380282"),
    ("xkcd:lime", "#aaff32"),
    ("xkcd:sea green", "#53fca1"),
    ("xkcd:periwinkle", "#8e82fe"),
    ("xkcd:dark pink", "#cb416b"),
    ("xkcd:olive green", "#677a04"),
    ("xkcd:peach", "#ffb07c"),
    ("xkcd:pale green", "#c7fdb5"),
    ("xkcd:light brown", "#ad8150"),
    ("xkcd:hot pink", "#ff028d"),
    ("xkcd:black", "#000000"),
    ("xkcd:lilac", "#cea2fd"),
    ("xkcd:navy blue", "#001146"),
    ("xkcd:royal blue", "#0504aa"),
    ("xkcd:beige", "#e6daa6"),
    ("xkcd:salmon", "#ff796c"),
    ("xkcd:olive", "#6e750e"),
    ("xkcd:maroon", "#650021"),
    ("xkcd:bright green", "#01ff07"),
    ("xkcd:dark purple", "#35063e"),
    ("xkcd:mauve", "#ae7181"),
    ("xkcd:forest green", "#06470c"),
    ("xkcd:aqua", "#13eac9"),
    ("xkcd:cyan", "#00ffff"),
    ("xkcd:tan", "#d1b26f"),
    ("xkcd:dark blue", "#00035b"),
    ("xkcd:lavender", "#c79fef"),
    ("xkcd:turquoise", "#06c2ac"),
    ("xkcd:dark green", "#033500"),
    ("xkcd:violet", "#9a0eea"),
    ("xkcd:light purple", "#bf77f6"),
    ("xkcd:lime green", "#89fe05"),
    ("xkcd:grey", "#929591"),
    ("xkcd:sky blue", "#75bbfd"),
    ("xkcd:yellow", "#ffff14"),
    ("xkcd:magenta", "#c20078"),
    ("xkcd:light green", "#96f97b"),
    ("xkcd:orange", "#f97306"),
    ("xkcd:teal", "#029386"),
    ("xkcd:light blue", "#95d0fc"),
    ("xkcd:red", "#e50000"),
    ("xkcd:brown", "#653700"),
    ("xkcd:pink", "#ff81c0"),
    ("xkcd:blue", "#0343df"),
    ("xkcd:green", "#15b01a"),
    ("xkcd:purple", "#7e1e9c"),
];

static TABLE: LazyLock<HashMap<String, [f64; 3]>> = LazyLock::new(build_table);

fn build_table() -> HashMap<String, [f64; 3]> {
    let mut table = HashMap::new();

    for (name, hex) in XKCD {
        let name = name.strip_prefix("xkcd:").unwrap_or(name);
        if let Some(rgb) = parse_hex(hex) {
            table.insert(normalize_name(name), rgb);
        }
    }
    for (name, hex) in TABLEAU.iter().chain(CSS4) {
        if let Some(rgb) = parse_hex(hex) {
            table.insert(normalize_name(name), rgb);
        }
    }
    for (name, rgb) in BASE {
        table.insert(normalize_name(name), *rgb);
    }

    table
}

/// Strip all whitespace. Case is preserved.
pub fn normalize_name(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Parse `#rrggbb` into components in 0..1.
pub fn parse_hex(hex: &str) -> Option<[f64; 3]> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| {
        u8::from_str_radix(digits.get(i..i + 2)?, 16)
            .ok()
            .map(|v| v as f64 / 255.0)
    };
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Look up a color name in the table.
pub fn lookup(name: &str) -> Option<[f64; 3]> {
    TABLE.get(&normalize_name(name)).copied()
}

/// All known color names (whitespace stripped), sorted.
pub fn names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = TABLE.keys().map(|s| s.as_str()).collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_names_win() {
        assert_eq!(lookup("red"), Some([1.0, 0.0, 0.0]));
        assert_eq!(lookup("r"), Some([1.0, 0.0, 0.0]));
        assert_eq!(lookup("green"), Some([0.0, 128.0 / 255.0, 0.0]));
    }

    #[test]
    fn test_whitespace_insensitive_case_sensitive() {
        assert_eq!(lookup("light grey"), lookup("lightgrey"));
        assert_eq!(lookup(" dark\tblue "), lookup("darkblue"));
        assert!(lookup("Red").is_none());
    }

    #[test]
    fn test_xkcd_prefix_stripped() {
        let rgb = lookup("cloudy blue").unwrap();
        assert!((rgb[0] - 0xac as f64 / 255.0).abs() < 1e-12);
        assert!(lookup("xkcd:cloudy blue").is_none());
        assert!(lookup("tab:blue").is_some());
    }

    #[test]
    fn test_xkcd_entries_parse_and_yield_to_css() {
        for (name, hex) in XKCD {
            assert!(name.starts_with("xkcd:"), "{name}");
            assert!(parse_hex(hex).is_some(), "{name}: {hex}");
        }
        assert_eq!(lookup("blue"), Some([0.0, 0.0, 1.0]));
        assert_eq!(lookup("purple"), parse_hex("#800080"));
        assert_eq!(lookup("electric lime"), parse_hex("#a8ff04"));
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#ffffff"), Some([1.0, 1.0, 1.0]));
        assert_eq!(parse_hex("ffffff"), None);
        assert_eq!(parse_hex("#fff"), None);
        assert_eq!(parse_hex("#gg0000"), None);
    }
}
