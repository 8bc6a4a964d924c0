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

//! Scanning raw KML text for `<coordinates>` contents.
//!
//! No XML parser is involved. This keeps the scan tolerant of malformed
//! markup, but `<coordinates/>` and `<coordinates attr="…">` are not matched.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use log::debug;
use regex::Regex;

use crate::Error;

/// Matches the text between an opening and a closing `coordinates` tag.
const COORDINATES_PATTERN: &str = r"<coordinates>([^<]+)</coordinates>";

fn coordinates_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(COORDINATES_PATTERN).expect("invalid coordinates pattern"))
}

/// Read the file at `path` and return its coordinate tokens.
///
/// The whole file is read as UTF-8 and passed to [`scan_coordinates`] with
/// `\r\n` and lone `\r` line endings turned into `\n`. A missing file or
/// invalid UTF-8 yields [`Error::Read`].
pub fn extract_coordinates(path: impl AsRef<Path>) -> Result<Vec<String>, Error> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_owned(),
        source,
    })?;

    let coords = scan_coordinates(&normalize_newlines(&text));
    debug!("found {} coordinates in {}", coords.len(), path.display());
    Ok(coords)
}

/// Replace `\r\n` and lone `\r` line endings by `\n`.
fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Return the trimmed contents of all `<coordinates>` elements in `text`.
///
/// Tokens are kept verbatim in document order, including duplicates. Contents
/// consisting only of whitespace are dropped.
///
/// # Example
/// ```
/// # use kml_restyle::scan_coordinates;
/// #
/// let text = "<coordinates> 30.1,46.6,0 </coordinates><coordinates> </coordinates>";
/// assert_eq!(scan_coordinates(text), vec!["30.1,46.6,0"]);
/// ```
pub fn scan_coordinates(text: &str) -> Vec<String> {
    coordinates_regex()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|coord| !coord.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_document_order_and_duplicates() {
        let text = r#"
            <Placemark><Point><coordinates>30.2,46.7,0</coordinates></Point></Placemark>
            <Placemark><Point><coordinates>30.1,46.6,0</coordinates></Point></Placemark>
            <Placemark><Point><coordinates>30.2,46.7,0</coordinates></Point></Placemark>
        "#;
        assert_eq!(
            scan_coordinates(text),
            vec!["30.2,46.7,0", "30.1,46.6,0", "30.2,46.7,0"]
        );
    }

    #[test]
    fn trims_and_drops_blank_content() {
        let text = "<coordinates>\n\t 30.1,46.6,0\n  </coordinates>\
                    <coordinates>   </coordinates>\
                    <coordinates></coordinates>";
        assert_eq!(scan_coordinates(text), vec!["30.1,46.6,0"]);
    }

    #[test]
    fn multiline_content_is_one_token() {
        let text = "<coordinates>\n  30.1,46.6,0\n  30.2,46.7,0\n</coordinates>";
        assert_eq!(scan_coordinates(text), vec!["30.1,46.6,0\n  30.2,46.7,0"]);
    }

    #[test]
    fn line_endings_are_normalized() {
        let text = "<coordinates>\r\n30.1,46.6,0\r\n30.2,46.7,0\r30.3,46.8,0\r\n</coordinates>";
        assert_eq!(
            scan_coordinates(&normalize_newlines(text)),
            vec!["30.1,46.6,0\n30.2,46.7,0\n30.3,46.8,0"]
        );
    }

    #[test]
    fn ignores_qualified_and_self_closing_tags() {
        let text = r#"<coordinates id="a">30.1,46.6,0</coordinates><coordinates/>"#;
        assert!(scan_coordinates(text).is_empty());
    }

    #[test]
    fn tolerates_malformed_markup() {
        let text = "<kml><Document><Placemark><coordinates>30.1,46.6,0</coordinates>";
        assert_eq!(scan_coordinates(text), vec!["30.1,46.6,0"]);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = extract_coordinates("does/not/exist.kml").unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }
}
