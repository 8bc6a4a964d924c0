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

//! The three roof categories and their pushpin styles.

use std::path::{Path, PathBuf};

use log::info;

use crate::{create_styled_kml, extract_coordinates, Error};

/// URL of a Google Earth pushpin icon in the given color.
macro_rules! pushpin {
    ($color:literal) => {
        concat!(
            "http://maps.google.com/mapfiles/kml/pushpin/",
            $color,
            "-pushpin.png"
        )
    };
}

/// Blue pushpin icon.
pub const BLUE_PUSHPIN: &str = pushpin!("blue");
/// Green pushpin icon, the closest available to turquoise.
pub const GREEN_PUSHPIN: &str = pushpin!("grn");
/// Yellow pushpin icon.
pub const YELLOW_PUSHPIN: &str = pushpin!("ylw");

/// One kind of surveyed roof.
///
/// Ties a source KML file to the output file it is regenerated as and to the
/// style the regenerated placemarks use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Category {
    /// Name of the generated _Document_.
    pub name: &'static str,
    /// Id of the shared _Style_.
    pub style_id: &'static str,
    /// URL of the pushpin icon shown for every placemark.
    pub icon_url: &'static str,
    /// File the coordinates are extracted from.
    pub source: &'static str,
    /// File the styled document is written to.
    pub output: &'static str,
    /// Short label used in progress messages.
    pub label: &'static str,
    /// What a single coordinate marks, for progress messages.
    pub kind: &'static str,
    /// Description of the icon color, for the final summary.
    pub pushpin: &'static str,
}

/// All categories, in processing order.
pub static CATEGORIES: [Category; 3] = [
    Category {
        name: "Blue Kherson",
        style_id: "blueStyle",
        icon_url: BLUE_PUSHPIN,
        source: "Blue Kherson.kml",
        output: "Blue Kherson Fixed.kml",
        label: "Blue",
        kind: "blue roof",
        pushpin: "blue",
    },
    Category {
        name: "Turquoise Kherson",
        style_id: "turquoiseStyle",
        icon_url: GREEN_PUSHPIN,
        source: "Turquoise Kherson.kml",
        output: "Turquoise Kherson Fixed.kml",
        label: "Turquoise",
        kind: "turquoise roof",
        pushpin: "green (closest to turquoise)",
    },
    Category {
        name: "Solar Panels",
        style_id: "solarStyle",
        icon_url: YELLOW_PUSHPIN,
        source: "Solar Panels.kml",
        output: "Solar Kherson Fixed.kml",
        label: "Solar Panels",
        kind: "solar panel",
        pushpin: "yellow",
    },
];

impl Category {
    /// Look up a category by its style id or document name.
    pub fn find(key: &str) -> Option<&'static Category> {
        CATEGORIES
            .iter()
            .find(|c| c.style_id == key || c.name.eq_ignore_ascii_case(key))
    }

    /// Path of the source file inside `dir`.
    pub fn source_path(&self, dir: impl AsRef<Path>) -> PathBuf {
        dir.as_ref().join(self.source)
    }

    /// Path of the output file inside `dir`.
    pub fn output_path(&self, dir: impl AsRef<Path>) -> PathBuf {
        dir.as_ref().join(self.output)
    }

    /// Extract the coordinates from the source file inside `dir`.
    pub fn extract(&self, dir: impl AsRef<Path>) -> Result<Vec<String>, Error> {
        extract_coordinates(self.source_path(dir))
    }

    /// Write `coords` in this category's style to the output file inside
    /// `dir`.
    ///
    /// Returns the number of placemarks written.
    pub fn build(&self, coords: &[impl AsRef<str>], dir: impl AsRef<Path>) -> Result<usize, Error> {
        let count = create_styled_kml(
            coords,
            self.name,
            self.style_id,
            self.icon_url,
            self.output_path(dir),
        )?;
        info!("restyled {count} placemarks as {}", self.style_id);
        Ok(count)
    }

    /// Regenerate the source file inside `dir` as the styled output file.
    pub fn restyle(&self, dir: impl AsRef<Path>) -> Result<usize, Error> {
        let dir = dir.as_ref();
        let coords = self.extract(dir)?;
        self.build(&coords, dir)
    }
}
