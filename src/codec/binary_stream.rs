//! Fixed-width scalar I/O shared by the model format.
//!
//! Every value is little-endian: integers are 4-byte two's complement, reals
//! are 8-byte IEEE-754 doubles.

use std::io::{self, Read, Write};

use crate::error::{NnError, Result};

pub fn write_f64<W: Write + ?Sized>(writer: &mut W, value: f64) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

pub fn write_i32<W: Write + ?Sized>(writer: &mut W, value: i32) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

/// Writes a count as a 4-byte integer, rejecting counts the format cannot hold.
pub fn write_count<W: Write + ?Sized>(writer: &mut W, count: usize, what: &str) -> Result<()> {
    let value = i32::try_from(count)
        .map_err(|_| NnError::config(format!("{what} {count} does not fit a 4-byte integer")))?;
    write_i32(writer, value)?;
    Ok(())
}

pub fn read_f64<R: Read + ?Sized>(reader: &mut R, what: &str) -> Result<f64> {
    let mut buf = [0u8; 8];
    read_exact(reader, &mut buf, what)?;
    Ok(f64::from_le_bytes(buf))
}

pub fn read_i32<R: Read + ?Sized>(reader: &mut R, what: &str) -> Result<i32> {
    let mut buf = [0u8; 4];
    read_exact(reader, &mut buf, what)?;
    Ok(i32::from_le_bytes(buf))
}

/// Reads a 4-byte integer that must be non-negative.
pub fn read_count<R: Read + ?Sized>(reader: &mut R, what: &str) -> Result<usize> {
    let value = read_i32(reader, what)?;
    usize::try_from(value).map_err(|_| NnError::decoding(format!("negative {what}: {value}")))
}

fn read_exact<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8], what: &str) -> Result<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => {
            NnError::decoding(format!("stream ended while reading {what}"))
        }
        _ => NnError::Io(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_little_endian() {
        let mut buf = Vec::new();
        write_i32(&mut buf, 1).unwrap();
        write_f64(&mut buf, 1.0).unwrap();
        assert_eq!(&buf[..4], &[1, 0, 0, 0]);
        assert_eq!(&buf[4..], &[0, 0, 0, 0, 0, 0, 0xf0, 0x3f]);
    }

    #[test]
    fn values_read_back() {
        let mut buf = Vec::new();
        write_f64(&mut buf, -0.125).unwrap();
        write_i32(&mut buf, -7).unwrap();
        let mut reader = buf.as_slice();
        assert_eq!(read_f64(&mut reader, "eps").unwrap(), -0.125);
        assert_eq!(read_i32(&mut reader, "N").unwrap(), -7);
    }

    #[test]
    fn short_reads_are_decoding_errors() {
        let mut reader: &[u8] = &[1, 2, 3];
        let err = read_i32(&mut reader, "layer count").unwrap_err();
        assert!(matches!(err, NnError::Decoding(ref m) if m.contains("layer count")));
    }

    #[test]
    fn negative_counts_are_rejected() {
        let mut buf = Vec::new();
        write_i32(&mut buf, -1).unwrap();
        assert!(matches!(
            read_count(&mut buf.as_slice(), "neuron count"),
            Err(NnError::Decoding(_))
        ));
    }
}
