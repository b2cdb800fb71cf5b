#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` to `name` (relative, may contain directories) and returns the path.
    pub fn write(&self, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture directories");
        }
        fs::write(&path, contents).expect("write fixture file");
        path
    }

    /// Lays out the raw tree used by the end-to-end tests under `raw/`.
    pub fn write_raw_tree(&self) {
        self.write(
            "raw/hotels/hotels.csv",
            "Hotel Name, City , Overall Rating (1-10)\nRitz, Paris, 9\n",
        );
        self.write(
            "raw/hotels/bookings.csv",
            "BookingID;HotelID;checkIn\n1;2;2024-01-01\n",
        );
        self.write(
            "raw/reviews/by_city/paris.csv",
            "review_id\treviewText\n1\tgreat\n",
        );
        self.write("raw/reviews/by_city/london.csv", "id|text\n1|ok\n");
        self.write("raw/reviews/summary.csv", "");
        self.write(
            "raw/weather/daily-obs/2024.csv",
            "StationID,Date,TempMax,TempMin,Rain (mm),Wind-Speed,Humidity\n",
        );
        self.write("raw/README.txt", "not csv");
    }
}
