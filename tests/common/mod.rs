use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use bnb_insights::data::loader::DataSources;
use flate2::write::GzEncoder;
use flate2::Compression;

pub const LISTINGS: &str = "\
id,name,neighbourhood,latitude,longitude,price,availability_365
11,Brownstone suite,Back Bay,42.350,-71.080,\"$1,234.50\",120
12,Garden room,Dorchester,42.300,-71.060,$85.00,300
13,Loft,Back Bay,42.351,-71.081,$250.00,45
14,Quiet studio,Fenway,42.340,-71.100,$0.00,0
15,Harbor view,Back Bay,42.352,-71.079,$400.00,365
";

pub const CALENDAR: &str = "\
listing_id,date,available,price
11,2024-01-10,t,\"$1,234.50\"
11,2024-01-11,f,
12,2024-02-01,t,$85.00
12,2025-01-15,t,$85.00
13,2024-07-04,f,
";

pub const NEIGHBOURHOODS: &str = "\
neighbourhood_group,neighbourhood
,Back Bay
,Dorchester
,Fenway
";

pub const BOUNDARIES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": { "neighbourhood": "Back Bay", "neighbourhood_group": null },
      "geometry": {
        "type": "MultiPolygon",
        "coordinates": [[[[-71.09, 42.34], [-71.07, 42.34], [-71.07, 42.36], [-71.09, 42.34]]]]
      }
    }
  ]
}"#;

pub fn write_gz(path: &Path, contents: &str) {
    let mut enc = GzEncoder::new(File::create(path).unwrap(), Compression::default());
    enc.write_all(contents.as_bytes()).unwrap();
    enc.finish().unwrap();
}

/// Write a complete input set into `dir`, with the given listings body.
pub fn write_dataset(dir: &Path, listings: &str, calendar: &str) -> DataSources {
    let sources = DataSources::in_dir(dir);
    write_gz(&sources.listings, listings);
    write_gz(&sources.calendar, calendar);
    fs::write(&sources.neighbourhoods, NEIGHBOURHOODS).unwrap();
    fs::write(&sources.boundaries, BOUNDARIES).unwrap();
    sources
}
