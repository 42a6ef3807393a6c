//! Domain-specific assertion macros for sheetmap harnesses.
//!
//! These wrap `pretty_assertions` and add context-rich failure messages that
//! make it clear *which* feature or panel transition went wrong.

// ---------------------------------------------------------------------------
// Feature assertions
// ---------------------------------------------------------------------------

/// Assert that a normalized feature carries a geometry of the given type.
///
/// ```rust,ignore
/// assert_geometry_type!(features[0], "LineString");
/// ```
#[macro_export]
macro_rules! assert_geometry_type {
    ($feature:expr, $kind:expr) => {{
        let feature: &serde_json::Value = &$feature;
        let expected: &str = $kind;
        if feature["type"] != "Feature" {
            panic!("assert_geometry_type! failed: not a Feature:\n  {}", feature);
        }
        match feature["geometry"]["type"].as_str() {
            Some(actual) if actual == expected => {}
            Some(actual) => panic!(
                "assert_geometry_type! failed:\n  expected: {}\n  actual:   {}\n  feature: {}",
                expected, actual, feature
            ),
            None => panic!(
                "assert_geometry_type! failed: geometry has no type.\n  feature: {}",
                feature
            ),
        }
    }};
}

/// Assert that a feature has a property with an expected value.
#[macro_export]
macro_rules! assert_property {
    ($feature:expr, $key:expr, $value:expr) => {{
        let feature: &serde_json::Value = &$feature;
        let key: &str = $key;
        let expected = serde_json::json!($value);
        match feature["properties"].get(key) {
            Some(actual) if *actual == expected => {}
            Some(actual) => panic!(
                "assert_property! failed:\n  properties[{:?}]\n  expected: {}\n  actual:   {}",
                key, expected, actual
            ),
            None => panic!(
                "assert_property! failed: property {:?} not found.\n  feature: {}",
                key, feature
            ),
        }
    }};
}

// ---------------------------------------------------------------------------
// Panel assertions
// ---------------------------------------------------------------------------

/// Assert that the session's panel is open on `title` with `body`.
#[macro_export]
macro_rules! assert_panel_open {
    ($session:expr, $title:expr, $body:expr) => {{
        let session: &sheetmap_core::MapSession = &$session;
        pretty_assertions::assert_eq!(
            session.panel_state(),
            &sheetmap_core::panel::PanelState::Open($title.to_string()),
            "panel should be open on {:?}",
            $title
        );
        pretty_assertions::assert_eq!(session.panel().body(), $body);
    }};
}

/// Assert that the session's panel is closed.
#[macro_export]
macro_rules! assert_panel_closed {
    ($session:expr) => {{
        let session: &sheetmap_core::MapSession = &$session;
        pretty_assertions::assert_eq!(
            session.panel_state(),
            &sheetmap_core::panel::PanelState::Closed,
            "panel should be closed"
        );
    }};
}
