//! Static sheets and geometry cells used across harnesses.
//!
//! Sheets are CSV text exactly as a "publish to the web" export produces it:
//! header row first, quoted cells where needed, `\r\n` line endings on the
//! published copies.

/// The single-row sheet from the end-to-end scenario.
pub const SHEET_ONE_POINT: &str = "name,description,color,lat,lon\nA,d1,red,43.9,12.9\n";

/// A published points sheet: CRLF, an extra column, markup in descriptions.
pub const SHEET_POINTS: &str = "name,description,color,lat,lon,notes\r\n\
Rocca,\"<b>First tower</b><br>Guaita\",red,43.9336,12.4507,x\r\n\
Cesta,Second tower,darkgreen,43.9322,12.4492,\r\n\
Montale,\"Third tower, &amp; smallest\",,43.9313,12.4481,\r\n";

/// Points sheet with rows that cannot be placed.
pub const SHEET_POINTS_WITH_BAD_ROWS: &str = "name,description,color,lat,lon\n\
ok,fine,blue,43.9,12.9\n\
no-lat,missing,red,,12.9\n\
text,words,red,north,12.9\n\
polar,too far,red,95,12.9\n";

/// A shapes sheet covering every geometry cell form.
pub const SHEET_SHAPES: &str = r#"name,description,color,geometry
line,bare line,green,"[[12.91,43.90],[12.93,43.92]]"
area,bare polygon,purple,"[[[12.90,43.90],[12.92,43.90],[12.92,43.92],[12.90,43.90]]]"
tagged,geometry object,,"{""type"":""Point"",""coordinates"":[12.92,43.91]}"
pair,feature collection,blue,"{""type"":""FeatureCollection"",""features"":[{""type"":""Feature"",""geometry"":{""type"":""Point"",""coordinates"":[12.9,43.9]},""properties"":{""name"":""first""}},{""type"":""Feature"",""geometry"":{""type"":""Point"",""coordinates"":[12.95,43.95]}}]}"
"#;

/// Geometry cells paired with the geometry type the normalizer must give
/// their (single) feature.
pub const GEOMETRY_CELLS: &[(&str, &str)] = &[
    ("[1,2]", "Point"),
    ("[[1,2],[3,4]]", "LineString"),
    ("[[[1,2],[3,4],[1,2]]]", "Polygon"),
    ("[[[[1,2],[3,4],[1,2]]]]", "MultiPolygon"),
    (r#"{"type":"Point","coordinates":[1,2]}"#, "Point"),
    (r#"{"type":"MultiLineString","coordinates":[[[1,2],[3,4]]]}"#, "MultiLineString"),
    (
        r#"{"type":"Feature","geometry":{"type":"Polygon","coordinates":[[[1,2],[3,4],[1,2]]]}}"#,
        "Polygon",
    ),
];
