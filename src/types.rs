//! # Shared Engine Types
//!
//! Enumerations mirroring the xvc engine's public constants: return codes,
//! chroma formats, color matrices, and NAL unit categories. Values and names
//! follow the engine headers. Statuses and NAL unit categories keep
//! unrecognized raw values in `Unknown` carrier variants, so engine codes
//! round-trip exactly; chroma formats and color matrices instead fall back to
//! `Undefined`, the engine's own "not specified" value.

use std::fmt;

/// Status codes reported by the encoder side of the engine.
///
/// `Ok` and `NoMoreOutput` are the two non-error statuses; everything else
/// indicates a rejected call or invalid configuration. The raw engine code
/// is available through [`EncoderStatus::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderStatus {
    /// The call succeeded and any produced output is valid.
    Ok,
    /// Flush has drained the encoder; no further output will be produced.
    NoMoreOutput,
    /// An argument to the call was invalid.
    InvalidArgument,
    /// The parameter object was rejected as a whole.
    InvalidParameter,
    /// Configured picture size is too small.
    SizeTooSmall,
    /// Configured chroma format is not supported.
    UnsupportedChromaFormat,
    /// Configured bit depth is outside the supported range.
    BitdepthOutOfRange,
    /// The engine build does not support a bit depth this high.
    CompiledBitdepthTooLow,
    /// Configured framerate is outside the supported range.
    FramerateOutOfRange,
    /// Configured QP is outside the supported range.
    QpOutOfRange,
    /// Configured sub-GOP length is too large.
    SubGopLengthTooLarge,
    /// Deblocking filter settings are inconsistent.
    DeblockingSettingsInvalid,
    /// Too many reference pictures requested.
    TooManyRefPics,
    /// Configured picture size is too large.
    SizeTooLarge,
    /// The requested preset does not exist.
    NoSuchPreset,
    /// A code this binding does not recognize.
    Unknown(i32),
}

impl EncoderStatus {
    pub(crate) fn from_raw(code: i32) -> Self {
        match code {
            0 => Self::Ok,
            1 => Self::NoMoreOutput,
            10 => Self::InvalidArgument,
            20 => Self::InvalidParameter,
            21 => Self::SizeTooSmall,
            22 => Self::UnsupportedChromaFormat,
            23 => Self::BitdepthOutOfRange,
            24 => Self::CompiledBitdepthTooLow,
            25 => Self::FramerateOutOfRange,
            26 => Self::QpOutOfRange,
            27 => Self::SubGopLengthTooLarge,
            28 => Self::DeblockingSettingsInvalid,
            29 => Self::TooManyRefPics,
            30 => Self::SizeTooLarge,
            100 => Self::NoSuchPreset,
            other => Self::Unknown(other),
        }
    }

    /// Raw return code as reported by the engine.
    pub fn code(&self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::NoMoreOutput => 1,
            Self::InvalidArgument => 10,
            Self::InvalidParameter => 20,
            Self::SizeTooSmall => 21,
            Self::UnsupportedChromaFormat => 22,
            Self::BitdepthOutOfRange => 23,
            Self::CompiledBitdepthTooLow => 24,
            Self::FramerateOutOfRange => 25,
            Self::QpOutOfRange => 26,
            Self::SubGopLengthTooLarge => 27,
            Self::DeblockingSettingsInvalid => 28,
            Self::TooManyRefPics => 29,
            Self::SizeTooLarge => 30,
            Self::NoSuchPreset => 100,
            Self::Unknown(code) => *code,
        }
    }

    /// True for `Ok` only; `NoMoreOutput` counts as a distinct success that
    /// exists only for flush.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for EncoderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => f.write_str("XVC_ENC_OK"),
            Self::NoMoreOutput => f.write_str("XVC_ENC_NO_MORE_OUTPUT"),
            Self::InvalidArgument => f.write_str("XVC_ENC_INVALID_ARGUMENT"),
            Self::InvalidParameter => f.write_str("XVC_ENC_INVALID_PARAMETER"),
            Self::SizeTooSmall => f.write_str("XVC_ENC_SIZE_TOO_SMALL"),
            Self::UnsupportedChromaFormat => f.write_str("XVC_ENC_UNSUPPORTED_CHROMA_FORMAT"),
            Self::BitdepthOutOfRange => f.write_str("XVC_ENC_BITDEPTH_OUT_OF_RANGE"),
            Self::CompiledBitdepthTooLow => f.write_str("XVC_ENC_COMPILED_BITDEPTH_TOO_LOW"),
            Self::FramerateOutOfRange => f.write_str("XVC_ENC_FRAMERATE_OUT_OF_RANGE"),
            Self::QpOutOfRange => f.write_str("XVC_ENC_QP_OUT_OF_RANGE"),
            Self::SubGopLengthTooLarge => f.write_str("XVC_ENC_SUB_GOP_LENGTH_TOO_LARGE"),
            Self::DeblockingSettingsInvalid => f.write_str("XVC_ENC_DEBLOCKING_SETTINGS_INVALID"),
            Self::TooManyRefPics => f.write_str("XVC_ENC_TOO_MANY_REF_PICS"),
            Self::SizeTooLarge => f.write_str("XVC_ENC_SIZE_TOO_LARGE"),
            Self::NoSuchPreset => f.write_str("XVC_ENC_NO_SUCH_PRESET"),
            Self::Unknown(code) => write!(f, "unknown error ({})", code),
        }
    }
}

/// Status codes reported by the decoder side of the engine.
///
/// `Ok` is success; `NoDecodedPic` means the decoder has not produced a
/// picture yet and is mapped to `Ok(None)` by
/// [`Decoder::decoded_picture`](crate::dec::Decoder::decoded_picture).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderStatus {
    /// The call succeeded.
    Ok,
    /// No decoded picture is available yet.
    NoDecodedPic,
    /// The bitstream does not conform to the decoder's conformance rules.
    NotConforming,
    /// An argument to the call was invalid.
    InvalidArgument,
    /// The parameter object was rejected as a whole.
    InvalidParameter,
    /// Configured output framerate is outside the supported range.
    FramerateOutOfRange,
    /// Configured output bit depth is outside the supported range.
    BitdepthOutOfRange,
    /// The bitstream was produced by a newer engine than this decoder.
    BitstreamVersionHigherThanDecoder,
    /// No segment header has been decoded yet.
    NoSegmentHeaderDecoded,
    /// The bitstream's bit depth exceeds what this engine build supports.
    BitstreamBitdepthTooHigh,
    /// The bitstream version is older than this decoder supports.
    BitstreamVersionLowerThanSupportedByDecoder,
    /// A code this binding does not recognize.
    Unknown(i32),
}

impl DecoderStatus {
    pub(crate) fn from_raw(code: i32) -> Self {
        match code {
            0 => Self::Ok,
            1 => Self::NoDecodedPic,
            10 => Self::NotConforming,
            20 => Self::InvalidArgument,
            30 => Self::InvalidParameter,
            31 => Self::FramerateOutOfRange,
            32 => Self::BitdepthOutOfRange,
            33 => Self::BitstreamVersionHigherThanDecoder,
            34 => Self::NoSegmentHeaderDecoded,
            35 => Self::BitstreamBitdepthTooHigh,
            36 => Self::BitstreamVersionLowerThanSupportedByDecoder,
            other => Self::Unknown(other),
        }
    }

    /// Raw return code as reported by the engine.
    pub fn code(&self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::NoDecodedPic => 1,
            Self::NotConforming => 10,
            Self::InvalidArgument => 20,
            Self::InvalidParameter => 30,
            Self::FramerateOutOfRange => 31,
            Self::BitdepthOutOfRange => 32,
            Self::BitstreamVersionHigherThanDecoder => 33,
            Self::NoSegmentHeaderDecoded => 34,
            Self::BitstreamBitdepthTooHigh => 35,
            Self::BitstreamVersionLowerThanSupportedByDecoder => 36,
            Self::Unknown(code) => *code,
        }
    }
}

impl fmt::Display for DecoderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => f.write_str("XVC_DEC_OK"),
            Self::NoDecodedPic => f.write_str("XVC_DEC_NO_DECODED_PIC"),
            Self::NotConforming => f.write_str("XVC_DEC_NOT_CONFORMING"),
            Self::InvalidArgument => f.write_str("XVC_DEC_INVALID_ARGUMENT"),
            Self::InvalidParameter => f.write_str("XVC_DEC_INVALID_PARAMETER"),
            Self::FramerateOutOfRange => f.write_str("XVC_DEC_FRAMERATE_OUT_OF_RANGE"),
            Self::BitdepthOutOfRange => f.write_str("XVC_DEC_BITDEPTH_OUT_OF_RANGE"),
            Self::BitstreamVersionHigherThanDecoder => {
                f.write_str("XVC_DEC_BITSTREAM_VERSION_HIGHER_THAN_DECODER")
            }
            Self::NoSegmentHeaderDecoded => f.write_str("XVC_DEC_NO_SEGMENT_HEADER_DECODED"),
            Self::BitstreamBitdepthTooHigh => f.write_str("XVC_DEC_BITSTREAM_BITDEPTH_TOO_HIGH"),
            Self::BitstreamVersionLowerThanSupportedByDecoder => {
                f.write_str("XVC_DEC_BITSTREAM_VERSION_LOWER_THAN_SUPPORTED_BY_DECODER")
            }
            Self::Unknown(code) => write!(f, "unknown error ({})", code),
        }
    }
}

/// Chroma subsampling layout of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromaFormat {
    /// Luma plane only.
    Monochrome,
    /// 4:2:0 subsampling (chroma halved in both dimensions).
    Yuv420,
    /// 4:2:2 subsampling (chroma halved horizontally).
    Yuv422,
    /// 4:4:4, no chroma subsampling.
    Yuv444,
    /// Packed ARGB input.
    Argb,
    /// Not specified; the engine keeps whatever the bitstream carries.
    Undefined,
}

impl ChromaFormat {
    pub(crate) fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Self::Monochrome,
            1 => Self::Yuv420,
            2 => Self::Yuv422,
            3 => Self::Yuv444,
            4 => Self::Argb,
            _ => Self::Undefined,
        }
    }

    pub(crate) fn as_raw(&self) -> i32 {
        match self {
            Self::Monochrome => 0,
            Self::Yuv420 => 1,
            Self::Yuv422 => 2,
            Self::Yuv444 => 3,
            Self::Argb => 4,
            Self::Undefined => 255,
        }
    }
}

impl fmt::Display for ChromaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Monochrome => "monochrome",
            Self::Yuv420 => "420",
            Self::Yuv422 => "422",
            Self::Yuv444 => "444",
            Self::Argb => "argb",
            Self::Undefined => "undefined",
        };
        f.write_str(name)
    }
}

/// Color matrix signalled alongside the pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMatrix {
    /// Not specified.
    Undefined,
    /// ITU-R BT.601.
    Bt601,
    /// ITU-R BT.709.
    Bt709,
    /// ITU-R BT.2020.
    Bt2020,
}

impl ColorMatrix {
    pub(crate) fn from_raw(raw: u32) -> Self {
        match raw {
            1 => Self::Bt601,
            2 => Self::Bt709,
            3 => Self::Bt2020,
            _ => Self::Undefined,
        }
    }

    pub(crate) fn as_raw(&self) -> u32 {
        match self {
            Self::Undefined => 0,
            Self::Bt601 => 1,
            Self::Bt709 => 2,
            Self::Bt2020 => 3,
        }
    }
}

impl fmt::Display for ColorMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Undefined => "undefined",
            Self::Bt601 => "601",
            Self::Bt709 => "709",
            Self::Bt2020 => "2020",
        };
        f.write_str(name)
    }
}

/// Category tag carried by every NAL unit the engine emits.
///
/// The engine reserves values 6 through 10 for future picture types; anything
/// else outside the table survives as `Unknown` with the raw value intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NALUnitType {
    /// Intra picture, not usable as a random access point.
    IntraPicture,
    /// Intra picture at a random access point.
    IntraAccessPicture,
    /// Predicted picture.
    PredictedPicture,
    /// Predicted picture at a random access point.
    PredictedAccessPicture,
    /// Bi-predicted picture.
    BipredictedPicture,
    /// Bi-predicted picture at a random access point.
    BipredictedAccessPicture,
    /// Reserved picture type 6.
    ReservedPictureType6,
    /// Reserved picture type 7.
    ReservedPictureType7,
    /// Reserved picture type 8.
    ReservedPictureType8,
    /// Reserved picture type 9.
    ReservedPictureType9,
    /// Reserved picture type 10.
    ReservedPictureType10,
    /// Segment header.
    SegmentHeader,
    /// Supplemental enhancement information.
    Sei,
    /// Access unit delimiter.
    AccessUnitDelimiter,
    /// End of segment marker.
    EndOfSegment,
    /// A tag value this binding does not recognize.
    Unknown(u32),
}

impl From<u32> for NALUnitType {
    fn from(value: u32) -> Self {
        match value {
            0 => Self::IntraPicture,
            1 => Self::IntraAccessPicture,
            2 => Self::PredictedPicture,
            3 => Self::PredictedAccessPicture,
            4 => Self::BipredictedPicture,
            5 => Self::BipredictedAccessPicture,
            6 => Self::ReservedPictureType6,
            7 => Self::ReservedPictureType7,
            8 => Self::ReservedPictureType8,
            9 => Self::ReservedPictureType9,
            10 => Self::ReservedPictureType10,
            16 => Self::SegmentHeader,
            17 => Self::Sei,
            18 => Self::AccessUnitDelimiter,
            19 => Self::EndOfSegment,
            other => Self::Unknown(other),
        }
    }
}

impl From<NALUnitType> for u32 {
    fn from(value: NALUnitType) -> Self {
        match value {
            NALUnitType::IntraPicture => 0,
            NALUnitType::IntraAccessPicture => 1,
            NALUnitType::PredictedPicture => 2,
            NALUnitType::PredictedAccessPicture => 3,
            NALUnitType::BipredictedPicture => 4,
            NALUnitType::BipredictedAccessPicture => 5,
            NALUnitType::ReservedPictureType6 => 6,
            NALUnitType::ReservedPictureType7 => 7,
            NALUnitType::ReservedPictureType8 => 8,
            NALUnitType::ReservedPictureType9 => 9,
            NALUnitType::ReservedPictureType10 => 10,
            NALUnitType::SegmentHeader => 16,
            NALUnitType::Sei => 17,
            NALUnitType::AccessUnitDelimiter => 18,
            NALUnitType::EndOfSegment => 19,
            NALUnitType::Unknown(other) => other,
        }
    }
}

impl fmt::Display for NALUnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::IntraPicture => "intra_picture",
            Self::IntraAccessPicture => "intra_access_picture",
            Self::PredictedPicture => "predicted_picture",
            Self::PredictedAccessPicture => "predicted_access_picture",
            Self::BipredictedPicture => "bipredicted_picture",
            Self::BipredictedAccessPicture => "bipredicted_access_picture",
            Self::ReservedPictureType6 => "reserved_picture_type6",
            Self::ReservedPictureType7 => "reserved_picture_type7",
            Self::ReservedPictureType8 => "reserved_picture_type8",
            Self::ReservedPictureType9 => "reserved_picture_type9",
            Self::ReservedPictureType10 => "reserved_picture_type10",
            Self::SegmentHeader => "segment_header",
            Self::Sei => "sei",
            Self::AccessUnitDelimiter => "access_unit_delimiter",
            Self::EndOfSegment => "end_of_segment",
            Self::Unknown(code) => return write!(f, "unknown_nal ({})", code),
        };
        f.write_str(name)
    }
}
