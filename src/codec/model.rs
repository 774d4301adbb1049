//! Binary model format.
//!
//! ```text
//! eps          : f64
//! N            : i32
//! layer_count  : i32
//! per layer:
//!     neuron_count : i32
//!     per neuron:
//!         weight_count : i32
//!         weights      : weight_count × f64
//! ```
//!
//! Scalars use the little-endian layout of [`binary_stream`](super::binary_stream).
//! There is no header or version field and learning rates are not stored.

use std::io::{Read, Write};

use log::debug;

use crate::codec::binary_stream::{read_count, read_f64, write_count, write_f64};
use crate::error::{NnError, Result};
use crate::network::Network;

/// Writes `network` to `writer`. The stream stays owned by the caller and is
/// not flushed.
pub fn encode<W: Write + ?Sized>(network: &Network, writer: &mut W) -> Result<()> {
    write_f64(writer, network.eps())?;
    write_count(writer, network.max_epochs(), "max epochs")?;
    write_count(writer, network.layer_count(), "layer count")?;
    for layer in network.layers() {
        write_count(writer, layer.size(), "neuron count")?;
        for j in 0..layer.size() {
            let weights = layer.neuron_weights(j);
            write_count(writer, weights.len(), "weight count")?;
            for &w in weights {
                write_f64(writer, w)?;
            }
        }
    }
    debug!("encoded network with shape {:?}", network.shape());
    Ok(())
}

/// Reads a network written by [`encode`], giving every layer `learning_rate`.
///
/// The whole stream is read and checked before a network is built, so a
/// truncated or inconsistent stream never yields a partial network.
pub fn decode<R: Read + ?Sized>(reader: &mut R, learning_rate: f64) -> Result<Network> {
    if !(learning_rate.is_finite() && learning_rate > 0.0) {
        return Err(NnError::config(format!(
            "learning rate must be a positive finite number, got {learning_rate}"
        )));
    }

    let eps = read_f64(reader, "eps")?;
    let max_epochs = read_count(reader, "max epochs")?;
    let layer_count = read_count(reader, "layer count")?;
    if layer_count == 0 {
        return Err(NnError::decoding("model declares zero layers"));
    }

    let mut layers = Vec::new();
    for i in 0..layer_count {
        let neuron_count = read_count(reader, "neuron count")?;
        if neuron_count == 0 {
            return Err(NnError::decoding(format!("layer {i} declares zero neurons")));
        }
        let mut rows = Vec::new();
        for j in 0..neuron_count {
            let weight_count = read_count(reader, "weight count")?;
            let mut row = Vec::new();
            for _ in 0..weight_count {
                let w = read_f64(reader, "weight")?;
                if !w.is_finite() {
                    return Err(NnError::decoding(format!(
                        "non-finite weight in neuron {j} of layer {i}"
                    )));
                }
                row.push(w);
            }
            rows.push(row);
        }
        layers.push((learning_rate, rows));
    }

    let network = Network::assemble(layers, eps, max_epochs).map_err(|e| match e {
        NnError::Topology(t) => NnError::decoding(t.to_string()),
        NnError::Configuration(msg) => NnError::Decoding(msg),
        other => other,
    })?;
    debug!("decoded network with shape {:?}", network.shape());
    Ok(network)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::binary_stream::{write_f64, write_i32};

    fn tiny() -> Network {
        Network::from_weights(
            vec![vec![vec![0.5, -0.25, 1.0]], vec![vec![2.0, 0.0], vec![-3.5, 0.125]]],
            0.3,
            0.05,
            42,
        )
        .unwrap()
    }

    #[test]
    fn byte_layout_matches_format() {
        let mut buf = Vec::new();
        encode(&tiny(), &mut buf).unwrap();
        // eps + N + layers + (count + 1 neuron × (count + 3 weights))
        //               + (count + 2 neurons × (count + 2 weights))
        let expected_len = 8 + 4 + 4 + (4 + 4 + 3 * 8) + (4 + 2 * (4 + 2 * 8));
        assert_eq!(buf.len(), expected_len);
        assert_eq!(&buf[..8], &0.05f64.to_le_bytes());
        assert_eq!(&buf[8..12], &42i32.to_le_bytes());
        assert_eq!(&buf[12..16], &2i32.to_le_bytes());
        assert_eq!(&buf[16..20], &1i32.to_le_bytes());
        assert_eq!(&buf[20..24], &3i32.to_le_bytes());
    }

    #[test]
    fn decode_restores_weights_bit_for_bit() {
        let net = tiny();
        let mut buf = Vec::new();
        encode(&net, &mut buf).unwrap();
        let back = decode(&mut buf.as_slice(), 0.3).unwrap();
        assert_eq!(back.weights(), net.weights());
        assert_eq!(back.eps(), 0.05);
        assert_eq!(back.max_epochs(), 42);
    }

    #[test]
    fn every_truncation_fails() {
        let mut buf = Vec::new();
        encode(&tiny(), &mut buf).unwrap();
        for cut in 0..buf.len() {
            let result = decode(&mut &buf[..cut], 0.3);
            assert!(matches!(result, Err(NnError::Decoding(_))), "cut at {cut}");
        }
    }

    #[test]
    fn inconsistent_weight_counts_fail() {
        let mut buf = Vec::new();
        write_f64(&mut buf, 0.0).unwrap();
        write_i32(&mut buf, 1).unwrap();
        write_i32(&mut buf, 2).unwrap();
        // layer 0: one neuron with 3 weights (2 inputs)
        write_i32(&mut buf, 1).unwrap();
        write_i32(&mut buf, 3).unwrap();
        for _ in 0..3 {
            write_f64(&mut buf, 0.1).unwrap();
        }
        // layer 1 claims 3 weights but layer 0 only has 1 neuron
        write_i32(&mut buf, 1).unwrap();
        write_i32(&mut buf, 3).unwrap();
        for _ in 0..3 {
            write_f64(&mut buf, 0.1).unwrap();
        }
        assert!(matches!(decode(&mut buf.as_slice(), 0.3), Err(NnError::Decoding(_))));
    }

    #[test]
    fn zero_layers_and_negative_counts_fail() {
        let mut buf = Vec::new();
        write_f64(&mut buf, 0.0).unwrap();
        write_i32(&mut buf, 1).unwrap();
        write_i32(&mut buf, 0).unwrap();
        assert!(matches!(decode(&mut buf.as_slice(), 0.3), Err(NnError::Decoding(_))));

        let mut buf = Vec::new();
        write_f64(&mut buf, 0.0).unwrap();
        write_i32(&mut buf, -4).unwrap();
        assert!(matches!(decode(&mut buf.as_slice(), 0.3), Err(NnError::Decoding(_))));
    }

    #[test]
    fn negative_eps_fails() {
        let mut buf = Vec::new();
        write_f64(&mut buf, -1.0).unwrap();
        write_i32(&mut buf, 1).unwrap();
        write_i32(&mut buf, 1).unwrap();
        write_i32(&mut buf, 1).unwrap();
        write_i32(&mut buf, 2).unwrap();
        write_f64(&mut buf, 0.1).unwrap();
        write_f64(&mut buf, 0.1).unwrap();
        assert!(matches!(decode(&mut buf.as_slice(), 0.3), Err(NnError::Decoding(_))));
    }

    #[test]
    fn non_finite_weights_fail() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut buf = Vec::new();
            write_f64(&mut buf, 0.0).unwrap();
            write_i32(&mut buf, 1).unwrap();
            write_i32(&mut buf, 1).unwrap();
            write_i32(&mut buf, 1).unwrap();
            write_i32(&mut buf, 2).unwrap();
            write_f64(&mut buf, 0.1).unwrap();
            write_f64(&mut buf, bad).unwrap();
            assert!(matches!(decode(&mut buf.as_slice(), 0.3), Err(NnError::Decoding(_))));
        }
    }

    #[test]
    fn learning_rate_is_checked_before_reading() {
        let mut empty: &[u8] = &[];
        assert!(matches!(decode(&mut empty, 0.0), Err(NnError::Configuration(_))));
    }
}
