use std::fs;

use cubediff::{
    Cube, CubeData, CubeSource, ElementType, EnviError, Error, HistogramParams, Interleave,
    ParallelStrategy, Shape, difference_envi_files, read_envi, write_envi, write_report,
};
use tempfile::tempdir;

fn sample_cube(layout: Interleave) -> Cube {
    let shape = Shape::new(3, 2, 2);
    // logical value 100 * band + 10 * line + sample, stored in `layout` order
    let data: Vec<i16> = (0..shape.len())
        .map(|pos| {
            let loc = layout.flat_to_location(pos, shape);
            (100 * loc.band + 10 * loc.line + loc.sample) as i16
        })
        .collect();
    Cube::new(layout, shape, data)
        .unwrap()
        .with_scale_factor(10000.0)
        .with_description("synthetic")
}

#[test]
fn write_then_read_preserves_cube() {
    let dir = tempdir().unwrap();
    let cube = sample_cube(Interleave::Bil);
    let header = write_envi(&cube, &dir.path().join("scene.bil")).unwrap();
    assert_eq!(header, dir.path().join("scene.hdr"));

    let loaded = read_envi(&header).unwrap();
    assert_eq!(loaded.shape, cube.shape);
    assert_eq!(loaded.interleave, Interleave::Bil);
    assert_eq!(loaded.scale_factor, Some(10000.0));
    assert_eq!(loaded.description, "synthetic");
    assert_eq!(loaded.data(), cube.data());

    // the data file path finds its header too
    let by_data = read_envi(&dir.path().join("scene.bil")).unwrap();
    assert_eq!(by_data.data(), cube.data());
}

#[test]
fn reads_big_endian_with_header_offset() {
    let dir = tempdir().unwrap();
    let header = "ENVI\nsamples = 2\nlines = 1\nbands = 1\nheader offset = 3\n\
                  data type = 12\ninterleave = bsq\nbyte order = 1\n";
    fs::write(dir.path().join("raw.hdr"), header).unwrap();
    fs::write(dir.path().join("raw.img"), [0xaa, 0xbb, 0xcc, 0x01, 0x02, 0x00, 0x10]).unwrap();

    let cube = read_envi(&dir.path().join("raw.hdr")).unwrap();
    assert_eq!(cube.data(), &CubeData::U16(vec![0x0102, 0x0010]));
    assert_eq!(cube.element_type(), ElementType::U16);
    // no scale factor in the header: guessed from the integer type
    assert_eq!(cube.scale_factor().unwrap(), 10000.0);
    assert_eq!(cube.band_boundary().unwrap(), 2);
}

#[test]
fn truncated_data_is_reported() {
    let dir = tempdir().unwrap();
    let header = "ENVI\nsamples = 4\nlines = 1\nbands = 1\ndata type = 2\ninterleave = bip\n";
    fs::write(dir.path().join("short.hdr"), header).unwrap();
    fs::write(dir.path().join("short.dat"), [0u8; 6]).unwrap();

    let err = read_envi(&dir.path().join("short.hdr")).unwrap_err();
    assert!(matches!(
        err,
        Error::Envi(EnviError::Truncated {
            expected: 8,
            actual: 6
        })
    ));
}

#[test]
fn oversized_dimensions_are_reported() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("huge.img"), [0u8; 4]).unwrap();

    // element count overflows
    let header = "ENVI\nsamples = 4294967296\nlines = 4294967296\nbands = 2\n\
                  data type = 2\ninterleave = bsq\n";
    fs::write(dir.path().join("huge.hdr"), header).unwrap();
    let err = read_envi(&dir.path().join("huge.hdr")).unwrap_err();
    assert!(matches!(err, Error::Envi(EnviError::TooLarge(_))));

    // element count fits, byte count does not
    let header = "ENVI\nsamples = 4611686018427387904\nlines = 1\nbands = 1\n\
                  data type = 5\ninterleave = bsq\n";
    fs::write(dir.path().join("huge.hdr"), header).unwrap();
    let err = read_envi(&dir.path().join("huge.hdr")).unwrap_err();
    assert!(matches!(err, Error::Envi(EnviError::TooLarge(_))));
}

#[test]
fn unknown_interleave_in_header() {
    let dir = tempdir().unwrap();
    let header = "ENVI\nsamples = 1\nlines = 1\nbands = 1\ndata type = 1\ninterleave = tiled\n";
    fs::write(dir.path().join("odd.hdr"), header).unwrap();
    let err = read_envi(&dir.path().join("odd.hdr")).unwrap_err();
    assert!(matches!(err, Error::UnrecognizedInterleave(_)));
}

#[test]
fn non_envi_header_is_rejected() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("x.hdr"), "samples = 1\n").unwrap();
    let err = read_envi(&dir.path().join("x.hdr")).unwrap_err();
    assert!(matches!(err, Error::Envi(EnviError::NotEnvi(_))));
}

#[test]
fn files_in_different_layouts_compare_equal() {
    let dir = tempdir().unwrap();
    let bip = write_envi(&sample_cube(Interleave::Bip), &dir.path().join("a.bip")).unwrap();
    let bsq = write_envi(&sample_cube(Interleave::Bsq), &dir.path().join("b.bsq")).unwrap();

    let params = HistogramParams {
        nbins: 16,
        strategy: ParallelStrategy::Sharded,
        shard_len: 5,
        ..Default::default()
    };
    let comparison = difference_envi_files(&bip, &bsq, &params).unwrap();
    let hist = &comparison.histogram;
    assert_eq!(hist.width(), 2);
    assert_eq!(hist.elements(), 12);
    assert_eq!(hist.bins().column(0).sum(), 12);
    assert_eq!(comparison.first.interleave, Interleave::Bip);
    assert_eq!(comparison.second.interleave, Interleave::Bsq);

    let report = dir.path().join("report.json");
    write_report(&report, &comparison).unwrap();
    let text = fs::read_to_string(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["elements"], 12);
    assert_eq!(value["second"]["element_type"], "i16");
}

#[test]
fn missing_header_is_reported() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("orphan.img"), [0u8; 4]).unwrap();
    let err = read_envi(&dir.path().join("orphan.img")).unwrap_err();
    assert!(matches!(err, Error::Envi(EnviError::HeaderNotFound(_))));
}
