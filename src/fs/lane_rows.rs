use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not read lane rows: {0}")]
    Io(#[from] io::Error),

    #[error("lane rows must be float32: {0}")]
    DType(#[from] npyz::DTypeError),

    #[error("lane rows must be a 2-d array, found shape {0:?}")]
    Shape(Vec<u64>),
}

/// Loads a 2-d `float32` NumPy array as one row of lane values per entry.
pub fn load_lane_rows(path: impl AsRef<Path>) -> Result<Vec<Vec<f32>>, LoadError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let rows = parse_lane_rows(&bytes)?;
    debug!(path = %path.display(), rows = rows.len(), "loaded lane rows");
    Ok(rows)
}

pub fn parse_lane_rows(bytes: &[u8]) -> Result<Vec<Vec<f32>>, LoadError> {
    let npy = npyz::NpyFile::new(bytes)?;
    let (d1, d2) = match npy.shape() {
        &[d1, d2] => (d1 as usize, d2 as usize),
        other => return Err(LoadError::Shape(other.to_vec())),
    };

    let mut iter = npy.data::<f32>()?;
    let mut result = Vec::with_capacity(d1);
    for _ in 0..d1 {
        let mut row = Vec::with_capacity(d2);
        for _ in 0..d2 {
            let value = iter
                .next()
                .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))??;
            row.push(value);
        }
        result.push(row);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A version 1.0 `.npy` image with a little-endian `float32` payload.
    fn npy_bytes(shape: &str, data: &[f32]) -> Vec<u8> {
        let mut header =
            format!("{{'descr': '<f4', 'fortran_order': False, 'shape': {shape}, }}");
        while (10 + header.len() + 1) % 64 != 0 {
            header.push(' ');
        }
        header.push('\n');

        let mut bytes = b"\x93NUMPY\x01\x00".to_vec();
        bytes.extend_from_slice(&(header.len() as u16).to_le_bytes());
        bytes.extend_from_slice(header.as_bytes());
        for value in data {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn test_parse_rows() {
        let bytes = npy_bytes("(2, 3)", &[1.0, 2.0, 3.0, -4.0, f32::INFINITY, 0.5]);
        let rows = parse_lane_rows(&bytes).unwrap();
        assert_eq!(rows, vec![vec![1.0, 2.0, 3.0], vec![-4.0, f32::INFINITY, 0.5]]);
    }

    #[test]
    fn test_rejects_wrong_rank() {
        let bytes = npy_bytes("(4,)", &[1.0, 2.0, 3.0, 4.0]);
        assert!(matches!(parse_lane_rows(&bytes), Err(LoadError::Shape(s)) if s == vec![4]));
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join("lanewise_lane_rows_test.npy");
        std::fs::write(&path, npy_bytes("(1, 2)", &[7.0, 8.0])).unwrap();
        assert_eq!(load_lane_rows(&path).unwrap(), vec![vec![7.0, 8.0]]);
        let _ = std::fs::remove_file(path);

        assert!(matches!(
            load_lane_rows("/definitely/not/here.npy"),
            Err(LoadError::Io(_))
        ));
    }
}
