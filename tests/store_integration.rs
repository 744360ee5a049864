//! Integration tests for metric table persistence and discovery.

use glyphcast::glyph::GlyphDensityMap;
use glyphcast::store::{discover, find, MetricTable, StoreError, TableMeta};
use tempfile::tempdir;

fn sample_table(label: &str, font_name: &str, font_size: u32) -> MetricTable {
    let metrics: GlyphDensityMap = [(' ', 0.0), ('.', 0.05), (':', 0.12), ('@', 0.45)]
        .into_iter()
        .collect();
    let ramp = vec![' ', '.', ':', '@'];
    let lut: Vec<char> = (0..256).map(|v| ramp[v * 3 / 255]).collect();

    MetricTable {
        meta: TableMeta {
            charset_label: label.to_string(),
            font_name: font_name.to_string(),
            font_path: format!("/fonts/{}", font_name),
            font_size,
            canvas_size: 32,
            threshold: 200,
            chars_count: 4,
            created_at: "2026-08-01T12:00:00+00:00".to_string(),
        },
        metrics,
        ramp,
        lut,
    }
}

#[test]
fn test_save_load_round_trip() {
    let dir = tempdir().unwrap();
    let table = sample_table("ascii_punctuation_only", "Mono-Bold.ttf", 16);

    let path = table.save(dir.path()).unwrap();
    assert!(path.exists());
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "ascii_punctuation_only__Mono-Bold_16.json"
    );

    let loaded = MetricTable::load(&path).unwrap();
    assert_eq!(loaded.meta.charset_label, table.meta.charset_label);
    assert_eq!(loaded.meta.font_name, table.meta.font_name);
    assert_eq!(loaded.meta.font_size, 16);
    assert_eq!(loaded.meta.threshold, 200);
    assert_eq!(loaded.metrics, table.metrics);
    assert_eq!(loaded.ramp, table.ramp);
    assert_eq!(loaded.lut, table.lut);
    assert_eq!(loaded.lut.len(), 256);
}

#[test]
fn test_artifact_json_shape() {
    // Renderers only need `lut`; the artifact keeps `metrics` and `ramp`
    // for introspection. Verify the documented top-level keys exist.
    let dir = tempdir().unwrap();
    let path = sample_table("ascii_all", "Mono.ttf", 14).save(dir.path()).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert!(value["meta"]["created_at"].is_string());
    assert_eq!(value["meta"]["chars_count"], 4);
    assert!(value["metrics"].is_object());
    assert_eq!(value["ramp"].as_array().unwrap().len(), 4);
    assert_eq!(value["lut"].as_array().unwrap().len(), 256);
}

#[test]
fn test_discover_maps_labels_to_first_artifact() {
    let dir = tempdir().unwrap();
    sample_table("ascii_all", "Alpha.ttf", 14).save(dir.path()).unwrap();
    sample_table("ascii_all", "Beta.ttf", 16).save(dir.path()).unwrap();
    sample_table("ascii_digits_only", "Alpha.ttf", 14)
        .save(dir.path())
        .unwrap();

    // Noise that discovery must skip.
    std::fs::write(dir.path().join("README.txt"), "not a table").unwrap();
    std::fs::write(dir.path().join("nolabel.json"), "{}").unwrap();

    let mapping = discover(dir.path()).unwrap();
    assert_eq!(mapping.len(), 2);
    // Paths are visited in sorted order, so Alpha wins over Beta.
    assert!(mapping["ascii_all"]
        .file_name()
        .unwrap()
        .to_str()
        .unwrap()
        .contains("Alpha"));
    assert!(mapping.contains_key("ascii_digits_only"));
}

#[test]
fn test_find_unknown_label_errors() {
    let dir = tempdir().unwrap();
    sample_table("ascii_all", "Mono.ttf", 16).save(dir.path()).unwrap();

    let result = find(dir.path(), "ascii_letters_only");
    match result {
        Err(StoreError::NotFound { label, .. }) => {
            assert_eq!(label, "ascii_letters_only");
        }
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_loaded_table_is_render_ready() {
    // A freshly loaded table should drive the transcoder directly.
    use glyphcast::camera::Frame;
    use glyphcast::transcode::{transcode, RenderOptions};

    let dir = tempdir().unwrap();
    let path = sample_table("ascii_punctuation_only", "Mono.ttf", 16)
        .save(dir.path())
        .unwrap();
    let table = MetricTable::load(&path).unwrap();

    let frame = Frame {
        data: vec![128; 64 * 48 * 3],
        width: 64,
        height: 48,
    };
    let grid = transcode(&frame, &table.lut, &RenderOptions::default()).unwrap();
    assert!(!grid.lines.is_empty());
}
