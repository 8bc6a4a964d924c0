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

//! Searching for groups of differently colored roofs close to each other.
//!
//! Roofs are read back from KML documents, such as the ones written by
//! [`create_styled_kml`](crate::create_styled_kml). Their color is guessed
//! from the placemark texts.

use std::fmt::Write;

use kml::types::{Coord, Geometry, Placemark};
use kml::Kml;
use log::{debug, info};

use crate::style::{push_icon_style, push_point_placemark, KML_NAMESPACE, XML_HEAD};
use crate::{Error, BLUE_PUSHPIN, GREEN_PUSHPIN, YELLOW_PUSHPIN};

/// Default maximum distance in meters between two roofs of a group.
pub const DEFAULT_RADIUS: f64 = 50.0;
/// Mean earth radius in meters.
const EARTH_RADIUS: f64 = 6_371_000.0;
/// Id of the style used for group boundaries.
const POLYGON_STYLE: &str = "polygonStyle";
/// Semi-transparent green fill of group boundaries.
const POLYGON_FILL: &str = "7f00ff00";
/// Opaque green outline of group boundaries.
const POLYGON_LINE: &str = "ff00ff00";
const POLYGON_LINE_WIDTH: u32 = 2;

/// Color of a roof as guessed by [`RoofColor::classify`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoofColor {
    Blue,
    /// Turquoise or green.
    Turquoise,
    /// Solar panels rather than a painted roof.
    Solar,
    Red,
    Unknown,
}

impl RoofColor {
    /// Colors which can be requested in [`ColorCounts`].
    pub const GROUPABLE: [RoofColor; 3] = [RoofColor::Blue, RoofColor::Turquoise, RoofColor::Solar];

    /// Guess the color from a placemark's `name` and `description`.
    ///
    /// Keywords are matched case-insensitively in this order: _blue_, then
    /// _turquoise_ or _green_, then _solar_ or _panel_, then _red_.
    pub fn classify(name: &str, description: &str) -> Self {
        let name = name.to_lowercase();
        let description = description.to_lowercase();
        let mentions = |keywords: &[&str]| {
            keywords
                .iter()
                .any(|k| name.contains(k) || description.contains(k))
        };

        if mentions(&["blue"]) {
            RoofColor::Blue
        } else if mentions(&["turquoise", "green"]) {
            RoofColor::Turquoise
        } else if mentions(&["solar", "panel"]) {
            RoofColor::Solar
        } else if mentions(&["red"]) {
            RoofColor::Red
        } else {
            RoofColor::Unknown
        }
    }

    /// Lowercase name, as used in placemark names and style ids.
    pub fn name(self) -> &'static str {
        match self {
            RoofColor::Blue => "blue",
            RoofColor::Turquoise => "turquoise",
            RoofColor::Solar => "solar",
            RoofColor::Red => "red",
            RoofColor::Unknown => "unknown",
        }
    }

    /// Id of the _Style_ for this color in [`groups_to_kml`].
    pub fn style_id(self) -> String {
        format!("{}Style", self.name())
    }

    fn icon_url(self) -> Option<&'static str> {
        match self {
            RoofColor::Blue => Some(BLUE_PUSHPIN),
            RoofColor::Turquoise => Some(GREEN_PUSHPIN),
            RoofColor::Solar => Some(YELLOW_PUSHPIN),
            RoofColor::Red | RoofColor::Unknown => None,
        }
    }
}

/// A single roof at a geographic position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Roof {
    pub color: RoofColor,
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl Roof {
    /// Great-circle distance to `other` in meters.
    pub fn distance(&self, other: &Roof) -> f64 {
        haversine(self.lat, self.lon, other.lat, other.lon)
    }
}

/// Great-circle distance in meters between two positions given in degrees.
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS * c
}

/// Number of roofs of each color a group must contain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColorCounts {
    pub blue: usize,
    pub turquoise: usize,
    pub solar: usize,
}

impl ColorCounts {
    /// Requested number of roofs with `color`.
    ///
    /// This is always zero for colors outside of [`RoofColor::GROUPABLE`].
    pub fn get(&self, color: RoofColor) -> usize {
        match color {
            RoofColor::Blue => self.blue,
            RoofColor::Turquoise => self.turquoise,
            RoofColor::Solar => self.solar,
            RoofColor::Red | RoofColor::Unknown => 0,
        }
    }

    /// Number of roofs in a complete group.
    pub fn total(&self) -> usize {
        self.blue + self.turquoise + self.solar
    }

    /// Counts after one roof with `color` was picked.
    fn take(mut self, color: RoofColor) -> Self {
        match color {
            RoofColor::Blue => self.blue -= 1,
            RoofColor::Turquoise => self.turquoise -= 1,
            RoofColor::Solar => self.solar -= 1,
            RoofColor::Red | RoofColor::Unknown => {}
        }
        self
    }
}

/// Read all roofs from the KML document `source`.
///
/// Every _Placemark_ in the document and its folders becomes a roof. Its
/// position is the first coordinate of its geometry. Placemarks without
/// geometry are skipped.
pub fn parse_roofs(source: &str) -> Result<Vec<Roof>, Error> {
    let kml: Kml = source.parse()?;
    let mut roofs = vec![];
    collect_roofs(kml, &mut roofs);
    debug!("parsed {} roofs", roofs.len());
    Ok(roofs)
}

fn collect_roofs(kml: Kml, roofs: &mut Vec<Roof>) {
    match kml {
        Kml::KmlDocument(document) => {
            for element in document.elements {
                collect_roofs(element, roofs);
            }
        }
        Kml::Document { elements, .. } | Kml::Folder { elements, .. } => {
            for element in elements {
                collect_roofs(element, roofs);
            }
        }
        Kml::Placemark(placemark) => roofs.extend(convert_placemark(placemark)),
        _ => {}
    }
}

fn convert_placemark(placemark: Placemark) -> Option<Roof> {
    let coord = first_coord(placemark.geometry.as_ref()?)?;
    let color = RoofColor::classify(
        placemark.name.as_deref().unwrap_or_default(),
        placemark.description.as_deref().unwrap_or_default(),
    );
    Some(Roof {
        color,
        lon: coord.x,
        lat: coord.y,
    })
}

/// Return the first coordinate of `geometry` in document order.
fn first_coord(geometry: &Geometry) -> Option<&Coord> {
    match geometry {
        Geometry::Point(point) => Some(&point.coord),
        Geometry::LineString(line) => line.coords.first(),
        Geometry::Polygon(polygon) => polygon.outer.coords.first(),
        Geometry::MultiGeometry(multi) => multi.geometries.iter().find_map(first_coord),
        _ => None,
    }
}

/// Find all groups of roofs matching `counts` within `radius` meters.
///
/// A group contains exactly the requested number of roofs of each color and
/// no two of its roofs are further than `radius` apart. Roofs keep their
/// order from `roofs` both within a group and across groups. If all counts
/// are zero, the single empty group is returned.
///
/// The search enumerates combinations, so its cost grows quickly with the
/// requested counts.
///
/// # Example
/// ```
/// # use kml_restyle::{find_roof_groups, ColorCounts, Roof, RoofColor};
/// #
/// let roofs = [
///     Roof { color: RoofColor::Blue, lon: 32.6100, lat: 46.6400 },
///     Roof { color: RoofColor::Solar, lon: 32.6102, lat: 46.6401 },
///     Roof { color: RoofColor::Solar, lon: 32.7000, lat: 46.7000 },
/// ];
/// let counts = ColorCounts { blue: 1, solar: 1, ..Default::default() };
///
/// let groups = find_roof_groups(&roofs, counts, 50.0);
/// assert_eq!(groups, vec![vec![roofs[0], roofs[1]]]);
/// ```
pub fn find_roof_groups(roofs: &[Roof], counts: ColorCounts, radius: f64) -> Vec<Vec<Roof>> {
    let candidates: Vec<Roof> = roofs
        .iter()
        .copied()
        .filter(|roof| counts.get(roof.color) > 0)
        .collect();

    let mut groups = vec![];
    let mut group = Vec::with_capacity(counts.total());
    search_groups(&candidates, counts, radius, &mut group, &mut groups);
    info!(
        "found {} groups among {} candidate roofs",
        groups.len(),
        candidates.len()
    );
    groups
}

/// Extend `group` with roofs from `rest` until `remaining` is exhausted.
///
/// Partial groups with a pair further than `radius` apart are abandoned
/// early.
fn search_groups(
    rest: &[Roof],
    remaining: ColorCounts,
    radius: f64,
    group: &mut Vec<Roof>,
    groups: &mut Vec<Vec<Roof>>,
) {
    if remaining.total() == 0 {
        groups.push(group.clone());
        return;
    }

    for (i, roof) in rest.iter().enumerate() {
        if remaining.get(roof.color) == 0 || group.iter().any(|r| r.distance(roof) > radius) {
            continue;
        }
        group.push(*roof);
        search_groups(&rest[i + 1..], remaining.take(roof.color), radius, group, groups);
        group.pop();
    }
}

/// Render `groups` as a KML document.
///
/// Each group is shown as its roofs, styled by color, followed by a polygon
/// connecting them.
pub fn groups_to_kml(groups: &[Vec<Roof>]) -> String {
    let mut kml = String::new();
    writeln!(kml, "{XML_HEAD}").unwrap();
    writeln!(kml, r#"<kml xmlns="{KML_NAMESPACE}">"#).unwrap();
    kml.push_str("<Document>\n    <name>Roof Groups</name>\n");
    for color in RoofColor::GROUPABLE {
        if let Some(icon_url) = color.icon_url() {
            push_icon_style(&mut kml, &color.style_id(), icon_url);
        }
    }
    push_polygon_style(&mut kml);

    for (g, group) in groups.iter().enumerate() {
        for (r, roof) in group.iter().enumerate() {
            push_point_placemark(
                &mut kml,
                &format!("{} roof {} (Group {})", roof.color.name(), r + 1, g + 1),
                &roof.color.style_id(),
                &format_coord(roof),
            );
        }
        if let Some(first) = group.first() {
            let ring: Vec<String> = group.iter().chain([first]).map(format_coord).collect();
            push_boundary_placemark(&mut kml, g + 1, &ring.join(" "));
        }
    }

    kml.push_str("</Document>\n</kml>");
    kml
}

fn format_coord(roof: &Roof) -> String {
    format!("{},{},0", roof.lon, roof.lat)
}

fn push_polygon_style(kml: &mut String) {
    write!(
        kml,
        r#"    <Style id="{POLYGON_STYLE}">
        <PolyStyle>
            <color>{POLYGON_FILL}</color>
            <outline>1</outline>
        </PolyStyle>
        <LineStyle>
            <color>{POLYGON_LINE}</color>
            <width>{POLYGON_LINE_WIDTH}</width>
        </LineStyle>
    </Style>
"#
    )
    .unwrap();
}

/// Append the boundary _Polygon_ of group number `group` with the closed
/// coordinate `ring`.
fn push_boundary_placemark(kml: &mut String, group: usize, ring: &str) {
    write!(
        kml,
        r#"    <Placemark>
        <name>Group {group} Boundary</name>
        <styleUrl>#{POLYGON_STYLE}</styleUrl>
        <Polygon>
            <outerBoundaryIs>
                <LinearRing>
                    <coordinates>{ring}</coordinates>
                </LinearRing>
            </outerBoundaryIs>
        </Polygon>
    </Placemark>
"#
    )
    .unwrap();
}
