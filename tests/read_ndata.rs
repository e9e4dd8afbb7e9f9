//! Integration tests reading `.ndata` files end to end.

mod common;

use common::{crc32, ndata_bytes, npy, npy_f32, npy_zeros, write_file, write_ndata, zip_bytes};
use nion::ndata::{NDataArchive, DATA_ENTRY, METADATA_ENTRY};
use nion::{DataType, DimensionType, Error, NionReader, ReaderOptions};
use npyz::Order;
use serde_json::json;

#[test]
fn test_read_spectrum() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let values: Vec<f32> = (0..5).map(|v| v as f32 * 10.0).collect();
    let metadata = json!({
        "title": "EELS spectrum",
        "data_source": "Camera",
        "dimensional_calibrations": [{"offset": 0.0, "scale": 1.0, "units": "eV"}]
    });
    let path = write_ndata(dir.path(), "spectrum.ndata", &npy_f32(&[5], &values), &metadata);

    let mut reader = NionReader::open(&path).expect("Failed to open");
    assert!(reader.data().is_none());
    let ds = reader.read().expect("Failed to read");

    assert_eq!(ds.title, "EELS spectrum");
    assert_eq!(ds.source, "Camera");
    assert_eq!(ds.data_type, DataType::Spectrum);
    assert_eq!(ds.shape().sizes(), &[5]);

    let dim = &ds.dimensions[0];
    assert_eq!(dim.name, "energy_loss");
    assert_eq!(dim.dimension_type, DimensionType::Spectral);
    assert_eq!(dim.values, vec![0.0, 1.0, 2.0, 3.0, 4.0]);

    let arr = ds.data.as_array::<f32>().expect("f32 array");
    assert_eq!(arr.iter().copied().collect::<Vec<_>>(), values);

    // Accessors hold the last successful read.
    assert_eq!(reader.data(), Some(&ds.data));
    assert_eq!(reader.original_metadata(), Some(&ds.original_metadata));
}

#[test]
fn test_title_falls_back_to_file_stem() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_ndata(dir.path(), "survey_0042.ndata", &npy_zeros(&[3]), &json!({}));

    let ds = nion::read(&path).expect("Failed to read");
    assert_eq!(ds.title, "survey_0042");
    assert_eq!(ds.source, "NionReader");
    assert_eq!(ds.data_type, DataType::LinePlot);
    assert_eq!(ds.dimensions[0].name, "a");
    assert_eq!(ds.dimensions[0].units, "generic");
}

#[test]
fn test_spatial_and_reciprocal_letters() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let metadata = json!({
        "dimensional_calibrations": [
            {"offset": 0.0, "scale": 0.5, "units": "nm"},
            {"offset": 0.0, "scale": 2.0, "units": "1/nm"}
        ]
    });
    let path = write_ndata(dir.path(), "diffraction.ndata", &npy_zeros(&[4, 6]), &metadata);

    let ds = nion::read(&path).expect("Failed to read");
    assert_eq!(ds.data_type, DataType::Image);
    assert_eq!(ds.dimensions[0].name, "x");
    assert_eq!(ds.dimensions[0].dimension_type, DimensionType::Spatial);
    assert_eq!(ds.dimensions[0].values, vec![0.0, 0.5, 1.0, 1.5]);
    assert_eq!(ds.dimensions[1].name, "u");
    assert_eq!(ds.dimensions[1].dimension_type, DimensionType::Reciprocal);
    assert_eq!(ds.dimensions[1].values.len(), 6);
}

#[test]
fn test_spectrum_image() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let metadata = json!({
        "dimensional_calibrations": [
            {"offset": 0.0, "scale": 1.0, "units": ""},
            {"offset": 0.0, "scale": 1.0, "units": ""},
            {"offset": -50.0, "scale": 0.25, "units": "eV"}
        ]
    });
    let path = write_ndata(dir.path(), "si.ndata", &npy_zeros(&[2, 3, 16]), &metadata);

    let ds = nion::read(&path).expect("Failed to read");
    assert_eq!(ds.data_type, DataType::SpectrumImage);
    assert_eq!(ds.dimensions_of(DimensionType::Frame).count(), 0);
    assert_eq!(ds.dimensions[2].values[0], 12.5);

    // Empty units come back as pixels; nothing else in the metadata moves.
    let cals = ds.original_metadata["dimensional_calibrations"]
        .as_array()
        .expect("calibration list");
    assert_eq!(cals[0]["units"], "pixels");
    assert_eq!(cals[1]["units"], "pixels");
    assert_eq!(cals[2]["units"], "eV");
    assert_eq!(cals[2]["offset"], -50.0);
}

#[test]
fn test_image_stack() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let metadata = json!({
        "dimensional_calibrations": [
            {"offset": 0.0, "scale": 1.0, "units": ""},
            {"offset": 0.0, "scale": 0.1, "units": "nm"},
            {"offset": 0.0, "scale": 0.1, "units": "nm"}
        ]
    });
    let path = write_ndata(dir.path(), "stack.ndata", &npy_zeros(&[10, 4, 4]), &metadata);

    let ds = nion::read(&path).expect("Failed to read");
    assert_eq!(ds.data_type, DataType::ImageStack);

    let frame = &ds.dimensions[0];
    assert_eq!(frame.dimension_type, DimensionType::Frame);
    assert_eq!(frame.name, "frame");
    assert_eq!(frame.quantity, "stack");
    assert_eq!(frame.values.len(), 10);
    assert_eq!(ds.dimensions[1].name, "x");
    assert_eq!(ds.dimensions[2].name, "y");
}

#[test]
fn test_four_dimensions_leave_reader_empty() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_ndata(dir.path(), "4d.ndata", &npy_zeros(&[2, 2, 2, 2]), &json!({}));

    let mut reader = NionReader::open(&path).expect("Failed to open");
    let err = reader.read().unwrap_err();
    assert!(matches!(err.inner(), Error::UnsupportedDimensionality(4)));
    assert!(reader.data().is_none());
    assert!(reader.original_metadata().is_none());
}

#[test]
fn test_not_a_zip() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut bytes = 0xDEADBEEFu32.to_le_bytes().to_vec();
    bytes.extend_from_slice(&[0u8; 64]);
    let path = write_file(dir.path(), "garbage.ndata", &bytes);

    let err = NionReader::open(&path).unwrap_err();
    assert!(matches!(err, Error::InFile { .. }));
    assert!(matches!(
        err.inner(),
        Error::MalformedContainer { offset: 0, signature: 0xDEADBEEF }
    ));
    assert!(err.to_string().contains("garbage.ndata"));
}

#[test]
fn test_truncated_archive() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let bytes = ndata_bytes(&npy_zeros(&[8]), &json!({}));
    let path = write_file(dir.path(), "cut.ndata", &bytes[..bytes.len() - 10]);

    let err = NionReader::open(&path).unwrap_err();
    assert!(matches!(err.inner(), Error::TruncatedContainer { .. }));
}

#[test]
fn test_missing_metadata_entry() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let array = npy_zeros(&[3]);
    let path = write_file(dir.path(), "nometa.ndata", &zip_bytes(&[("data.npy", &array[..])]));

    let mut reader = NionReader::open(&path).expect("Container itself is valid");
    let err = reader.read().unwrap_err();
    assert!(matches!(err.inner(), Error::MissingEntry(name) if name == "metadata.json"));
}

#[test]
fn test_extra_entries_are_ignored() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let array = npy_zeros(&[3]);
    let json = br#"{"title": "with thumbnail"}"#;
    let bytes = zip_bytes(&[
        ("thumbnail.png", &b"\x89PNG"[..]),
        ("metadata.json", &json[..]),
        ("data.npy", &array[..]),
    ]);
    let path = write_file(dir.path(), "extra.ndata", &bytes);

    let ds = nion::read(&path).expect("Failed to read");
    assert_eq!(ds.title, "with thumbnail");
}

#[test]
fn test_archive_index() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let array = npy_zeros(&[4]);
    let metadata = json!({"title": "indexed"});
    let path = write_ndata(dir.path(), "index.ndata", &array, &metadata);
    let bytes = std::fs::read(&path).expect("Failed to read back");

    let mut archive = NDataArchive::open(&path, &ReaderOptions::default()).expect("Failed to scan");
    let index = archive.index();
    assert_eq!(index.len(), 2);
    assert_eq!(index.entry_names(), vec!["data.npy", "metadata.json"]);

    let data = index.entry(DATA_ENTRY).expect("data entry");
    assert_eq!(data.data_pos, 30 + "data.npy".len() as u64);
    assert_eq!(data.data_len, array.len() as u64);
    assert_eq!(data.crc32, crc32(&array));
    assert_eq!(&bytes[data.data_pos as usize..][..array.len()], &array[..]);

    let eocd = index.eocd();
    assert_eq!(eocd.pos as usize, bytes.len() - 22);

    let json = archive.read_entry(METADATA_ENTRY).expect("metadata payload");
    assert_eq!(serde_json::from_slice::<serde_json::Value>(&json).unwrap(), metadata);
}

#[test]
fn test_checksum_verification() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut bytes = ndata_bytes(&npy_f32(&[2], &[1.0, 2.0]), &json!({}));
    // Flip the last byte of the array payload; the header is untouched.
    let array_len = npy_f32(&[2], &[1.0, 2.0]).len();
    bytes[30 + "data.npy".len() + array_len - 1] ^= 0xFF;
    let path = write_file(dir.path(), "corrupt.ndata", &bytes);

    // Without verification the corrupt value is simply decoded.
    let ds = nion::read(&path).expect("Failed to read");
    assert_ne!(ds.data.as_array::<f32>().unwrap()[[1]], 2.0);

    let options = ReaderOptions::default().with_checksums(true);
    let mut reader = NionReader::open_with(&path, options).expect("Failed to open");
    let err = reader.read().unwrap_err();
    assert!(matches!(err.inner(), Error::ChecksumMismatch { name, .. } if name == "data.npy"));
}

#[test]
fn test_mmap_and_buffered_agree() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let values: Vec<f32> = (0..12).map(|v| v as f32).collect();
    let metadata = json!({
        "dimensional_calibrations": [
            {"offset": 0.0, "scale": 1.0, "units": "nm"},
            {"offset": 1.0, "scale": 3.0, "units": "keV"}
        ]
    });
    let path = write_ndata(dir.path(), "both.ndata", &npy_f32(&[3, 4], &values), &metadata);

    let mapped = NionReader::open_with(&path, ReaderOptions::new().with_mmap(true))
        .and_then(|mut r| r.read())
        .expect("mapped read");
    let buffered = NionReader::open_with(&path, ReaderOptions::new().with_mmap(false))
        .and_then(|mut r| r.read())
        .expect("buffered read");

    assert_eq!(mapped.data, buffered.data);
    assert_eq!(mapped.dimensions, buffered.dimensions);
    assert_eq!(mapped.data_type, DataType::SpectrumImage);
    assert_eq!(mapped.dimensions[1].name, "energy");

    let file_len = std::fs::metadata(&path).unwrap().len();
    for use_mmap in [true, false] {
        let archive = NDataArchive::open(&path, &ReaderOptions::new().with_mmap(use_mmap)).unwrap();
        assert_eq!(archive.is_mapped(), use_mmap);
        assert_eq!(archive.file_size(), file_len);
    }
}

#[test]
fn test_fortran_and_big_endian_payloads() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");

    // Column-major 2x3 u16 array holding its own row-major index.
    let column_major = [0u16, 3, 1, 4, 2, 5];
    let path = write_ndata(
        dir.path(),
        "fortran.ndata",
        &npy("<u2", &[2, 3], Order::Fortran, &column_major),
        &json!({}),
    );
    let ds = nion::read(&path).expect("Failed to read");
    let arr = ds.data.as_array::<u16>().expect("u16 array");
    assert_eq!(arr[[0, 2]], 2);
    assert_eq!(arr[[1, 0]], 3);

    let path = write_ndata(dir.path(), "big.ndata", &npy(">f8", &[2], Order::C, &[1.5f64, -2.0]), &json!({}));
    let ds = nion::read(&path).expect("Failed to read");
    let arr = ds.data.as_array::<f64>().expect("f64 array");
    assert_eq!(arr[[0]], 1.5);
    assert_eq!(arr[[1]], -2.0);
}

#[test]
fn test_rereading_is_repeatable() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = write_ndata(dir.path(), "again.ndata", &npy_zeros(&[2, 2]), &json!({"title": "t"}));

    let mut reader = NionReader::open(&path).expect("Failed to open");
    let first = reader.read().expect("first read");
    let second = reader.read().expect("second read");
    assert_eq!(first.data, second.data);
    assert_eq!(first.original_metadata, second.original_metadata);
}

#[test]
fn test_invalid_metadata_is_not_wrapped() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let array = npy_zeros(&[2]);
    let bytes = zip_bytes(&[("data.npy", &array[..]), ("metadata.json", &b"{oops"[..])]);
    let path = write_file(dir.path(), "badjson.ndata", &bytes);

    let err = nion::read(&path).unwrap_err();
    assert!(matches!(err, Error::MetadataParse(_)));
}
