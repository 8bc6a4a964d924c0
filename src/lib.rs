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

//! Library for regenerating roof survey [KML](https://developers.google.com/kml)
//! files with consistent pushpin styles.
//!
//! Coordinates are scraped from the `<coordinates>` elements of a source file
//! with [`extract_coordinates`] and written back as styled placemarks by
//! [`create_styled_kml`]. The fixed set of surveyed [`CATEGORIES`] combines
//! both steps in [`Category::restyle`].
//!
//! The restyled files can be searched for nearby roofs of prescribed colors
//! with [`find_roof_groups`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

mod category;
mod extract;
mod groups;
mod style;

pub use category::{Category, BLUE_PUSHPIN, CATEGORIES, GREEN_PUSHPIN, YELLOW_PUSHPIN};
pub use extract::{extract_coordinates, scan_coordinates};
pub use groups::{
    find_roof_groups, groups_to_kml, haversine, parse_roofs, ColorCounts, Roof, RoofColor,
    DEFAULT_RADIUS,
};
pub use style::{create_styled_kml, render_styled_kml};

/// Error returned from the functions of this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading a source file failed.
    #[error("reading {} failed: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    /// Writing an output file failed.
    #[error("writing {} failed: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    /// KML parsing failed.
    #[error("parsing KML failed: {0}")]
    Kml(#[from] kml::Error),
}
