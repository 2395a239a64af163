use crate::constants::MAX_TRACK_ID;

/// Decodes one stored byte of the quantized channel to a normalized float.
/// Byte -128 decodes to exactly 0.0 and byte 127 to exactly 1.0.
pub fn dequantize(b: i8) -> f32 {
    (b as f32 + 128.0) / 255.0
}

/// Encodes a normalized float into the quantized channel.
/// The affine map is v * 255 - 128 truncated toward zero and clamped
/// to the signed 8-bit range.
pub fn quantize(v: f32) -> i8 {
    (v * 255.0 - 128.0).clamp(-128.0, 127.0) as i8
}

/// Normalizes a track id for the quantized channel.
pub fn encode_track_id(id: i32) -> f32 {
    id as f32 / MAX_TRACK_ID as f32
}

/// Recovers an integer track id from a normalized value.
/// The decoded value lands at id - id/255, so truncation happens after
/// adding one half; otherwise ids 64..=126 would come back short by one.
pub fn decode_track_id(v: f32) -> i32 {
    (v * MAX_TRACK_ID as f32 + 0.5) as i32
}

/// A numeric sample stored in a detection tensor.
///
/// The two implementations cover the full-precision and the 8-bit
/// quantized tensor flavors. The tracker and counter kernels are written
/// once against this trait; the whole codec lives in the `i8` impl.
pub trait Sample: Copy {
    /// Value written into unused cells of an output tensor.
    const EMPTY: Self;
    fn to_f32(self) -> f32;
    fn from_f32(v: f32) -> Self;
    /// Store a track id into the id row of a tracker output column.
    fn encode_id(id: i32) -> Self;
    /// Recover an integer track id from the id row.
    fn decode_id(self) -> i32;
}

impl Sample for f32 {
    const EMPTY: f32 = 0.0;
    fn to_f32(self) -> f32 {
        self
    }
    fn from_f32(v: f32) -> f32 {
        v
    }
    fn encode_id(id: i32) -> f32 {
        id as f32
    }
    fn decode_id(self) -> i32 {
        self as i32
    }
}

impl Sample for i8 {
    const EMPTY: i8 = -128;
    fn to_f32(self) -> f32 {
        dequantize(self)
    }
    fn from_f32(v: f32) -> i8 {
        quantize(v)
    }
    fn encode_id(id: i32) -> i8 {
        quantize(encode_track_id(id))
    }
    fn decode_id(self) -> i32 {
        decode_track_id(dequantize(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_endpoints() {
        assert_eq!(dequantize(-128), 0.0);
        assert_eq!(dequantize(127), 1.0);
        assert_eq!(quantize(0.0), -128);
        assert_eq!(quantize(1.0), 127);
    }

    #[test]
    fn test_quantize_round_trip_error() {
        // Any normalized value must survive the channel within one step
        for i in 0..=1000 {
            let v = i as f32 / 1000.0;
            let restored = dequantize(quantize(v));
            assert!(
                (v - restored).abs() <= 1.0 / 255.0,
                "value {} came back as {}",
                v,
                restored
            );
        }
    }

    #[test]
    fn test_quantize_out_of_range_clamps() {
        assert_eq!(quantize(-0.5), -128);
        assert_eq!(quantize(1.5), 127);
    }

    #[test]
    fn test_track_id_round_trip_exact() {
        for id in 1..=MAX_TRACK_ID {
            let restored = i8::encode_id(id).decode_id();
            assert_eq!(id, restored, "track id {} came back as {}", id, restored);
        }
    }

    #[test]
    fn test_track_id_f32_path() {
        for id in 1..=MAX_TRACK_ID {
            let restored = f32::encode_id(id).decode_id();
            assert_eq!(id, restored);
        }
    }

    #[test]
    fn test_empty_cell_decodes_to_zero() {
        assert_eq!(<i8 as Sample>::EMPTY.to_f32(), 0.0);
        assert_eq!(<f32 as Sample>::EMPTY.to_f32(), 0.0);
    }
}
