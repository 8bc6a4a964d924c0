// Copyright 2024 Viktor Reusch
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

//! Templating of styled point documents.

use std::fmt::Write;
use std::fs;
use std::path::Path;

use log::debug;

use crate::Error;

/// This line needs to be prepended to the KML output.
pub(crate) const XML_HEAD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
/// Namespace of the `<kml>` root element.
pub(crate) const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";
/// Scale factor applied to every pushpin icon.
pub(crate) const ICON_SCALE: &str = "1.2";

/// Render a KML document with one styled placemark per coordinate.
///
/// The document is called `name` and declares a single _Style_ `style_id`
/// showing the icon at `icon_url`. Every placemark references this style and
/// is named after the first word of `name` followed by `Roof` and its 1-based
/// position.
///
/// Neither the coordinates nor any other argument are escaped. They are copied
/// into the markup as given.
///
/// # Example
/// ```
/// # use kml_restyle::render_styled_kml;
/// #
/// let coords = ["30.1,46.6,0", "30.2,46.7,0"];
/// let kml = render_styled_kml(&coords, "Blue Kherson", "blueStyle", "blue.png");
///
/// assert!(kml.contains("<name>Blue Roof 2</name>"));
/// assert_eq!(kml.matches("<styleUrl>#blueStyle</styleUrl>").count(), 2);
/// ```
pub fn render_styled_kml(
    coords: &[impl AsRef<str>],
    name: &str,
    style_id: &str,
    icon_url: &str,
) -> String {
    let mut kml = String::new();
    writeln!(kml, "{XML_HEAD}").unwrap();
    writeln!(kml, r#"<kml xmlns="{KML_NAMESPACE}">"#).unwrap();
    kml.push_str("<Document>\n");
    writeln!(kml, "    <name>{name}</name>").unwrap();
    push_icon_style(&mut kml, style_id, icon_url);

    let short_name = name.split_whitespace().next().unwrap_or_default();
    for (i, coord) in coords.iter().enumerate() {
        push_point_placemark(
            &mut kml,
            &format!("{short_name} Roof {}", i + 1),
            style_id,
            coord.as_ref(),
        );
    }

    kml.push_str("</Document>\n</kml>");
    kml
}

/// Render the styled document and write it to `output`.
///
/// An existing file is overwritten. Returns the number of placemarks written,
/// which is always `coords.len()`.
pub fn create_styled_kml(
    coords: &[impl AsRef<str>],
    name: &str,
    style_id: &str,
    icon_url: &str,
    output: impl AsRef<Path>,
) -> Result<usize, Error> {
    let output = output.as_ref();
    let kml = render_styled_kml(coords, name, style_id, icon_url);
    fs::write(output, kml).map_err(|source| Error::Write {
        path: output.to_owned(),
        source,
    })?;

    debug!("wrote {} placemarks to {}", coords.len(), output.display());
    Ok(coords.len())
}

/// Append a _Style_ with id `style_id` rendering the icon at `icon_url`.
pub(crate) fn push_icon_style(kml: &mut String, style_id: &str, icon_url: &str) {
    write!(
        kml,
        r#"    <Style id="{style_id}">
        <IconStyle>
            <scale>{ICON_SCALE}</scale>
            <Icon>
                <href>{icon_url}</href>
            </Icon>
        </IconStyle>
    </Style>
"#
    )
    .unwrap();
}

/// Append a _Placemark_ showing a single _Point_ at `coord`.
pub(crate) fn push_point_placemark(kml: &mut String, name: &str, style_id: &str, coord: &str) {
    write!(
        kml,
        r#"    <Placemark>
        <name>{name}</name>
        <styleUrl>#{style_id}</styleUrl>
        <Point>
            <coordinates>{coord}</coordinates>
        </Point>
    </Placemark>
"#
    )
    .unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan_coordinates;

    const ICON: &str = "http://maps.google.com/mapfiles/kml/pushpin/blue-pushpin.png";

    #[test]
    fn document_structure() {
        let kml = render_styled_kml(&["30.1,46.6,0"], "Blue Kherson", "blueStyle", ICON);

        assert!(kml.starts_with(XML_HEAD));
        assert!(kml.contains(r#"<kml xmlns="http://www.opengis.net/kml/2.2">"#));
        assert!(kml.contains("<name>Blue Kherson</name>"));
        assert!(kml.contains(r#"<Style id="blueStyle">"#));
        assert!(kml.contains("<scale>1.2</scale>"));
        assert!(kml.contains(&format!("<href>{ICON}</href>")));
        assert!(kml.ends_with("</Document>\n</kml>"));
    }

    #[test]
    fn placemarks_are_numbered_in_order() {
        let coords = ["30.1,46.6,0", "30.2,46.7,0", "30.3,46.8,0"];
        let kml = render_styled_kml(&coords, "Solar Panels", "solarStyle", ICON);

        assert_eq!(kml.matches("<Placemark>").count(), 3);
        let first = kml.find("<name>Solar Roof 1</name>").unwrap();
        let second = kml.find("<name>Solar Roof 2</name>").unwrap();
        let third = kml.find("<name>Solar Roof 3</name>").unwrap();
        assert!(first < second && second < third);
        assert_eq!(kml.matches("<styleUrl>#solarStyle</styleUrl>").count(), 3);
    }

    #[test]
    fn empty_input_has_style_but_no_placemarks() {
        let coords: [&str; 0] = [];
        let kml = render_styled_kml(&coords, "Blue Kherson", "blueStyle", ICON);
        assert!(kml.contains("<Style id=\"blueStyle\">"));
        assert!(!kml.contains("<Placemark>"));
    }

    #[test]
    fn coordinates_survive_a_rescan() {
        let coords = vec!["30.1,46.6,0", "30.1,46.6,0", "30.2,46.7,12.5"];
        let kml = render_styled_kml(&coords, "Turquoise Kherson", "turquoiseStyle", ICON);
        assert_eq!(scan_coordinates(&kml), coords);
    }

    #[test]
    fn text_is_not_escaped() {
        let kml = render_styled_kml(&["1&2"], "A&B roofs", "s", ICON);
        assert!(kml.contains("<coordinates>1&2</coordinates>"));
        assert!(kml.contains("<name>A&B Roof 1</name>"));
    }
}
