// Copyright 2022, 2024 Viktor Reusch
//
// This file is part of kml_restyle.
//
// kml_restyle is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by the
// Free Software Foundation, either version 3 of the License, or (at your
// option) any later version.
//
// kml_restyle is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License
// for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with kml_restyle. If not, see <https://www.gnu.org/licenses/>.

//! This is a WASM wrapper for `kml_restyle`.

use kml_restyle::{
    find_roof_groups, groups_to_kml, parse_roofs, render_styled_kml, scan_coordinates, Category,
    ColorCounts, DEFAULT_RADIUS,
};
use wasm_bindgen::{prelude::wasm_bindgen, JsError};

/// Restyle the KML document `source` as the category `category`.
///
/// The category is given by its style id (e.g. `blueStyle`) or its name.
#[wasm_bindgen]
pub fn restyle(source: &str, category: &str) -> Result<String, JsError> {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let category = Category::find(category)
        .ok_or_else(|| JsError::new(&format!("unknown category: {category}")))?;
    let coords = scan_coordinates(source);
    Ok(render_styled_kml(
        &coords,
        category.name,
        category.style_id,
        category.icon_url,
    ))
}

/// Search the three restyled surveys for roof groups and render them as KML.
///
/// See `kml_restyle::find_roof_groups` for the meaning of the counts and the
/// `radius` in meters. Without a `radius`, `kml_restyle::DEFAULT_RADIUS` is
/// used.
#[wasm_bindgen]
pub fn roof_groups(
    blue_kml: &str,
    turquoise_kml: &str,
    solar_kml: &str,
    blue: usize,
    turquoise: usize,
    solar: usize,
    radius: Option<f64>,
) -> Result<String, JsError> {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let mut roofs = parse_roofs(blue_kml)?;
    roofs.extend(parse_roofs(turquoise_kml)?);
    roofs.extend(parse_roofs(solar_kml)?);

    let counts = ColorCounts {
        blue,
        turquoise,
        solar,
    };
    let groups = find_roof_groups(&roofs, counts, radius.unwrap_or(DEFAULT_RADIUS));
    Ok(groups_to_kml(&groups))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(result: Result<String, JsError>) -> String {
        result.unwrap_or_else(|_| panic!("conversion failed"))
    }

    #[test]
    fn restyle_by_style_id() {
        let source = "<coordinates>30.1,46.6,0</coordinates>";
        let kml = ok(restyle(source, "solarStyle"));
        assert!(kml.contains("<name>Solar Roof 1</name>"));
        assert!(kml.contains("ylw-pushpin.png"));
    }

    #[test]
    fn groups_across_surveys() {
        let blue = ok(restyle(
            "<coordinates>32.6100,46.6400,0</coordinates>",
            "blueStyle",
        ));
        let solar = ok(restyle(
            "<coordinates>32.6101,46.6400,0</coordinates>",
            "solarStyle",
        ));
        let turquoise = ok(restyle("", "turquoiseStyle"));

        let kml = ok(roof_groups(&blue, &turquoise, &solar, 1, 0, 1, Some(50.0)));
        assert!(kml.contains("<name>blue roof 1 (Group 1)</name>"));
        assert!(kml.contains("<name>solar roof 2 (Group 1)</name>"));
        assert!(kml.contains("<name>Group 1 Boundary</name>"));
    }

    #[test]
    fn radius_defaults_to_fifty_meters() {
        // The two roofs are about 38 m apart.
        let blue = ok(restyle(
            "<coordinates>32.6100,46.6400,0</coordinates>",
            "blueStyle",
        ));
        let solar = ok(restyle(
            "<coordinates>32.6105,46.6400,0</coordinates>",
            "solarStyle",
        ));
        let turquoise = ok(restyle("", "turquoiseStyle"));

        let kml = ok(roof_groups(&blue, &turquoise, &solar, 1, 0, 1, None));
        assert!(kml.contains("<name>Group 1 Boundary</name>"));

        let kml = ok(roof_groups(&blue, &turquoise, &solar, 1, 0, 1, Some(30.0)));
        assert!(!kml.contains("Boundary"));
    }
}
