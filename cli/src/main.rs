// Copyright 2023, 2024 Viktor Reusch
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

//! This is a very simple command-line interface for restyling the roof
//! surveys.

use std::{path::Path, process::ExitCode};

use kml_restyle::{Error, CATEGORIES};

/// Files are read from and written to the current working directory.
const WORKING_DIR: &str = ".";

/// Currently, this simply restyles all categories without taking arguments.
fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Path::new(WORKING_DIR)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("restyling aborted");
            eprintln!("Restyling failed with: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Extract all categories first, then write all styled files.
fn run(dir: &Path) -> Result<(), Error> {
    let mut extracted = Vec::with_capacity(CATEGORIES.len());
    for category in &CATEGORIES {
        println!("Extracting coordinates from {} KML...", category.label);
        let coords = category.extract(dir)?;
        println!("Found {} {} coordinates", coords.len(), category.kind);
        extracted.push((category, coords));
    }

    let mut written = Vec::with_capacity(extracted.len());
    for (category, coords) in &extracted {
        written.push((category, category.build(coords, dir)?));
    }

    println!("\nFixed KML files created!");
    for (category, count) in written {
        println!("{} - {count} {} pushpins", category.output, category.pushpin);
    }
    println!("\nThese files should display with proper pushpin colors in both Google Earth Web and Pro!");

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const SURVEY: &str = "<coordinates>32.61,46.64,0</coordinates>";

    #[test]
    fn all_sources_are_read_before_writing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Blue Kherson.kml"), SURVEY).unwrap();
        fs::write(dir.path().join("Turquoise Kherson.kml"), SURVEY).unwrap();

        match run(dir.path()) {
            Err(Error::Read { path, .. }) => {
                assert_eq!(path, dir.path().join("Solar Panels.kml"))
            }
            other => panic!("expected a read error, got {other:?}"),
        }
        assert!(!dir.path().join("Blue Kherson Fixed.kml").exists());
        assert!(!dir.path().join("Turquoise Kherson Fixed.kml").exists());
    }

    #[test]
    fn all_categories_are_written() {
        let dir = TempDir::new().unwrap();
        for category in &CATEGORIES {
            fs::write(category.source_path(dir.path()), SURVEY).unwrap();
        }

        run(dir.path()).unwrap();

        for category in &CATEGORIES {
            let fixed = fs::read_to_string(category.output_path(dir.path())).unwrap();
            assert!(fixed.contains(&format!("<styleUrl>#{}</styleUrl>", category.style_id)));
        }
    }
}
