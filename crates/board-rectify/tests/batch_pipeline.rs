use std::path::Path;

use board_rectify::{
    BatchRunner, DirectorySink, DirectorySource, FailureKind, RectifyParams, RunConfig,
    SampleSource,
};
use image::{ImageReader, Rgb, RgbImage};
use serde_json::json;

const CORNERS: [[f64; 2]; 4] = [[0.9, 0.9], [0.9, 0.1], [0.1, 0.9], [0.1, 0.1]];

fn write_sample(dir: &Path, index: usize, color: [u8; 3], corners: &[[f64; 2]]) {
    RgbImage::from_pixel(100, 100, Rgb(color))
        .save(dir.join(format!("{index}.jpg")))
        .expect("write jpg");
    let annotation = json!({
        "config": { "a1": "rook", "h8": null },
        "corners": corners,
    });
    std::fs::write(
        dir.join(format!("{index}.json")),
        serde_json::to_string(&annotation).unwrap(),
    )
    .expect("write json");
}

fn load_rgb(path: &Path) -> RgbImage {
    ImageReader::open(path)
        .expect("open image")
        .decode()
        .expect("decode image")
        .to_rgb8()
}

fn assert_color_close(a: &Rgb<u8>, b: &Rgb<u8>, tol: u8) {
    for c in 0..3 {
        assert!(
            a[c].abs_diff(b[c]) <= tol,
            "colors differ: {:?} vs {:?}",
            a.0,
            b.0
        );
    }
}

#[test]
fn solid_image_center_color_survives_unprojection() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_sample(input.path(), 0, [180, 60, 30], &CORNERS);

    let source = DirectorySource::new(input.path());
    let sink = DirectorySink::new(output.path(), 95);
    let params = RectifyParams {
        growth_factor: 0.0,
        ..Default::default()
    };
    let report = BatchRunner::new(params).run(&source, &sink, 0..1);
    assert!(report.is_clean(), "{:?}", report.failures);

    let out_path = output.path().join("0_unwrapped.jpg");
    assert_eq!(report.processed[0].output, out_path);
    let out = load_rgb(&out_path);
    assert_eq!(out.dimensions(), (416, 416));

    let src = load_rgb(&input.path().join("0.jpg"));
    assert_color_close(out.get_pixel(208, 208), src.get_pixel(50, 50), 4);
}

#[test]
fn missing_annotation_is_skipped_without_aborting() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    for i in 0..5 {
        write_sample(input.path(), i, [40 * i as u8, 90, 140], &CORNERS);
    }
    std::fs::remove_file(input.path().join("2.json")).unwrap();

    let source = DirectorySource::new(input.path());
    let sink = DirectorySink::new(output.path(), 95);
    let report = BatchRunner::new(RectifyParams::default()).run(&source, &sink, 0..5);

    let ok: Vec<usize> = report.processed.iter().map(|p| p.index).collect();
    assert_eq!(ok, vec![0, 1, 3, 4]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].index, 2);
    assert_eq!(report.failures[0].kind, FailureKind::MissingInput);

    for i in [0, 1, 3, 4] {
        assert!(output.path().join(format!("{i}_unwrapped.jpg")).is_file());
    }
    assert!(!output.path().join("2_unwrapped.jpg").exists());
}

#[test]
fn malformed_samples_report_their_kind() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_sample(input.path(), 0, [1, 2, 3], &CORNERS[..3]);
    // TL and BL swapped: bow-tie quad.
    write_sample(
        input.path(),
        1,
        [1, 2, 3],
        &[[0.9, 0.9], [0.9, 0.1], [0.1, 0.1], [0.1, 0.9]],
    );
    std::fs::write(input.path().join("2.json"), "{ not json").unwrap();
    write_sample(input.path(), 3, [1, 2, 3], &CORNERS);
    std::fs::remove_file(input.path().join("3.jpg")).unwrap();

    let source = DirectorySource::new(input.path());
    let sink = DirectorySink::new(output.path(), 95);
    let report = BatchRunner::new(RectifyParams::default()).run(&source, &sink, 0..4);

    let kinds: Vec<(usize, FailureKind)> =
        report.failures.iter().map(|f| (f.index, f.kind)).collect();
    assert_eq!(
        kinds,
        vec![
            (0, FailureKind::InvalidCornerCount),
            (1, FailureKind::DegenerateQuadrilateral),
            (2, FailureKind::IoFailure),
            (3, FailureKind::MissingInput),
        ]
    );
    assert!(report.processed.is_empty());
}

#[test]
fn directory_source_flips_annotation_corners() {
    let input = tempfile::tempdir().unwrap();
    write_sample(
        input.path(),
        0,
        [0, 0, 0],
        &[[0.75, 0.75], [0.75, 0.25], [0.25, 0.75], [0.25, 0.25]],
    );
    let sample = DirectorySource::new(input.path()).load(0).expect("load");
    assert_eq!(sample.corners.top_right.y, 0.25);
    assert_eq!(sample.corners.bottom_right.y, 0.75);
    assert_eq!(sample.image.dimensions(), (100, 100));
}

#[test]
fn count_is_discovered_from_leading_indices() {
    let input = tempfile::tempdir().unwrap();
    for i in 0..3 {
        write_sample(input.path(), i, [0, 0, 0], &CORNERS);
    }
    std::fs::remove_file(input.path().join("1.json")).unwrap();
    write_sample(input.path(), 7, [0, 0, 0], &CORNERS);

    let cfg = RunConfig {
        input_dir: input.path().to_path_buf(),
        ..Default::default()
    };
    assert_eq!(cfg.indices(&cfg.source()), 0..3);
}
