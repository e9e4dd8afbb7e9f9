//! Fixture builders shared by the integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use npyz::{DType, Order, Serialize, TypeStr, WriteOptions, WriterBuilder};
use serde_json::Value;

/// Encode `values` as a `.npy` payload with an explicit descr such as `>f8`.
pub fn npy<T: Serialize>(descr: &str, shape: &[u64], order: Order, values: &[T]) -> Vec<u8> {
    let type_str: TypeStr = descr.parse().expect("valid descr");
    let mut out = Vec::new();
    let mut writer = WriteOptions::<T>::new()
        .dtype(DType::Plain(type_str))
        .shape(shape)
        .order(order)
        .writer(&mut out)
        .begin_nd()
        .expect("Failed to write npy header");
    for value in values {
        writer.push(value).expect("Failed to write npy value");
    }
    writer.finish().expect("Failed to finish npy payload");
    out
}

/// Little-endian `f32` array payload in C order.
pub fn npy_f32(shape: &[u64], values: &[f32]) -> Vec<u8> {
    npy("<f4", shape, Order::C, values)
}

/// Zeroed `f32` payload of the given shape.
pub fn npy_zeros(shape: &[u64]) -> Vec<u8> {
    let n: u64 = shape.iter().product();
    npy_f32(shape, &vec![0.0; n as usize])
}

pub fn crc32(bytes: &[u8]) -> u32 {
    let mut crc = flate2::Crc::new();
    crc.update(bytes);
    crc.sum()
}

/// Store-only ZIP archive with the entries in the given order.
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut offsets = Vec::new();

    for (name, payload) in entries {
        offsets.push(out.len() as u32);
        out.extend_from_slice(&0x04034b50u32.to_le_bytes());
        out.extend_from_slice(&[20, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        out.extend_from_slice(&crc32(payload).to_le_bytes());
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(payload);
    }

    let directory_pos = out.len() as u32;
    for ((name, payload), offset) in entries.iter().zip(&offsets) {
        out.extend_from_slice(&0x02014b50u32.to_le_bytes());
        out.extend_from_slice(&[20, 0, 20, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        out.extend_from_slice(&crc32(payload).to_le_bytes());
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        out.extend_from_slice(&[0; 12]);
        out.extend_from_slice(&offset.to_le_bytes());
        out.extend_from_slice(name.as_bytes());
    }
    let directory_len = out.len() as u32 - directory_pos;

    out.extend_from_slice(&0x06054b50u32.to_le_bytes());
    out.extend_from_slice(&[0, 0, 0, 0]);
    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    out.extend_from_slice(&directory_len.to_le_bytes());
    out.extend_from_slice(&directory_pos.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out
}

/// A `.ndata` archive holding `data.npy` and `metadata.json`.
pub fn ndata_bytes(array: &[u8], metadata: &Value) -> Vec<u8> {
    let json = serde_json::to_vec(metadata).expect("serialize metadata");
    zip_bytes(&[("data.npy", array), ("metadata.json", &json[..])])
}

/// Write raw bytes to `dir/name`.
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("Failed to write fixture");
    path
}

pub fn write_ndata(dir: &Path, name: &str, array: &[u8], metadata: &Value) -> PathBuf {
    write_file(dir, name, &ndata_bytes(array, metadata))
}
