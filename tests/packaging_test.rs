#[cfg(test)]
mod tests {
    use xvcio::enc::{copy_nal_units, NalDescriptor, YuvFrame};
    use xvcio::framing::{self, FramedUnits};
    use xvcio::types::NALUnitType;
    use xvcio::{Encoder, EncoderConfig, NALUnit, XvcError};

    fn concatenate(units: &[NALUnit]) -> Vec<u8> {
        let mut stream = Vec::new();
        for unit in units {
            stream.extend_from_slice(unit.as_bytes());
        }
        stream
    }

    #[test]
    fn test_known_batch_has_the_documented_wire_layout() {
        let descriptors = [
            NalDescriptor {
                payload: b"AB",
                nal_type: NALUnitType::IntraAccessPicture,
                user_data: 100,
            },
            NalDescriptor {
                payload: b"",
                nal_type: NALUnitType::PredictedPicture,
                user_data: 101,
            },
        ];
        let units = copy_nal_units(&descriptors).unwrap();

        assert_eq!(units.len(), 2);
        assert_eq!(units[0].as_bytes(), &[0x02, 0x00, 0x00, 0x00, b'A', b'B']);
        assert_eq!(units[0].nal_type(), NALUnitType::IntraAccessPicture);
        assert_eq!(units[0].user_data(), 100);
        assert_eq!(units[1].as_bytes(), &[0x00, 0x00, 0x00, 0x00]);
        assert_eq!(units[1].nal_type(), NALUnitType::PredictedPicture);
        assert_eq!(units[1].user_data(), 101);

        assert_eq!(
            concatenate(&units),
            vec![0x02, 0x00, 0x00, 0x00, b'A', b'B', 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test_packaged_units_split_back_into_their_payloads() {
        let payloads: Vec<Vec<u8>> = vec![
            vec![0x01; 5],
            Vec::new(),
            (0u8..=255).collect(),
            vec![0xFF; 1000],
        ];
        let descriptors: Vec<NalDescriptor<'_>> = payloads
            .iter()
            .enumerate()
            .map(|(i, payload)| NalDescriptor {
                payload,
                nal_type: NALUnitType::from(i as u32),
                user_data: i as i64,
            })
            .collect();
        let units = copy_nal_units(&descriptors).unwrap();
        let stream = concatenate(&units);

        let split: Vec<&[u8]> = FramedUnits::new(&stream)
            .collect::<xvcio::Result<_>>()
            .unwrap();
        assert_eq!(split.len(), payloads.len());
        for (recovered, original) in split.iter().zip(&payloads) {
            assert_eq!(recovered, &original.as_slice());
        }
    }

    #[test]
    fn test_units_survive_their_source_buffers() {
        let unit = {
            let transient = vec![0xAB_u8; 64];
            NALUnit::from_payload(&transient, NALUnitType::SegmentHeader, 7).unwrap()
        };
        assert_eq!(unit.size(), 64);
        assert_eq!(unit.payload(), &[0xAB; 64][..]);
        assert_eq!(unit.header(), framing::length_header(64));
    }

    #[test]
    fn test_split_reports_truncated_streams() {
        // Header says 4 bytes but only 2 follow.
        let stream = [0x04, 0x00, 0x00, 0x00, 0xAA, 0xBB];
        let outcome: xvcio::Result<Vec<&[u8]>> = FramedUnits::new(&stream).collect();
        assert!(matches!(outcome, Err(XvcError::InvalidData(_))));

        // Trailing partial header.
        let stream = [0x00, 0x00, 0x00, 0x00, 0x01, 0x00];
        let outcome: xvcio::Result<Vec<&[u8]>> = FramedUnits::new(&stream).collect();
        assert!(matches!(outcome, Err(XvcError::InvalidData(_))));
    }

    #[test]
    fn test_encoder_rejects_bad_settings_before_touching_the_engine() {
        // Dimension and format checks run ahead of library loading, so these
        // fail the same way with or without the engine installed.
        assert!(matches!(
            Encoder::new(EncoderConfig::new(0, 240)),
            Err(XvcError::InvalidData(_))
        ));
        assert!(matches!(
            Encoder::new(
                EncoderConfig::new(320, 240)
                    .with_chroma_format(xvcio::types::ChromaFormat::Argb)
            ),
            Err(XvcError::InvalidData(_))
        ));
    }

    #[test]
    fn test_frame_layout_helpers_compose() {
        let y = vec![0u8; 320 * 240];
        let u = vec![0u8; 160 * 120];
        let v = vec![0u8; 160 * 120];
        let frame = YuvFrame {
            planes: [&y, &u, &v],
            strides: [320, 160, 160],
        };
        // A copy of the frame struct borrows the same planes.
        let copy = frame;
        assert_eq!(copy.planes[0].len(), 320 * 240);
        assert_eq!(copy.strides, [320, 160, 160]);
    }

    #[test]
    fn test_handles_are_send() {
        fn assert_send<T: Send>() {}
        assert_send::<xvcio::Encoder>();
        assert_send::<xvcio::Decoder>();
        assert_send::<xvcio::NALUnit>();
        assert_send::<xvcio::DecodedPicture>();
    }
}
