// Type and field names match the engine's xvcdec.h exactly; renaming or
// reordering would break the FFI layout.
// Dead code allowed: the API table is complete, entries dispatch on demand.
#![allow(non_camel_case_types, dead_code)]

use std::os::raw::{c_char, c_int};

pub(crate) type xvc_dec_return_code = c_int;
pub(crate) type xvc_dec_chroma_format = c_int;

/// Opaque decoder instance. Only ever handled through a pointer.
#[repr(C)]
pub(crate) struct xvc_decoder {
    _private: [u8; 0],
}

#[repr(C)]
pub(crate) struct xvc_dec_pic_stats {
    pub nal_unit_type: u32,
    pub poc: u32,
    pub doc: u32,
    pub soc: u32,
    pub tid: u32,
    pub width: c_int,
    pub height: c_int,
    pub chroma_format: xvc_dec_chroma_format,
    pub color_matrix: u32,
    pub bitdepth: u32,
    pub bitstream_bitdepth: u32,
    pub framerate: f64,
    pub l0: [i32; 5],
    pub l1: [i32; 5],
}

/// Decoded picture handle. `bytes` points into engine-owned memory refreshed
/// by each `decoder_get_picture` call.
#[repr(C)]
pub(crate) struct xvc_decoded_picture {
    pub bytes: *const c_char,
    pub size: usize,
    pub user_data: i64,
    pub stats: xvc_dec_pic_stats,
    pub planes: [*const u8; 3],
    pub stride: [c_int; 3],
}

#[repr(C)]
pub(crate) struct xvc_decoder_parameters {
    pub output_width: c_int,
    pub output_height: c_int,
    pub output_chroma_format: xvc_dec_chroma_format,
    pub output_color_matrix: u32,
    pub output_bitdepth: u32,
    pub max_framerate: f64,
    pub threads: c_int,
    pub simd_mask: c_int,
}

/// Decoder API table returned by `xvc_decoder_api_get`.
#[repr(C)]
pub(crate) struct xvc_decoder_api {
    pub parameters_create: Option<unsafe extern "C" fn() -> *mut xvc_decoder_parameters>,
    pub parameters_destroy:
        Option<unsafe extern "C" fn(param: *mut xvc_decoder_parameters) -> xvc_dec_return_code>,
    pub parameters_set_default:
        Option<unsafe extern "C" fn(param: *mut xvc_decoder_parameters) -> xvc_dec_return_code>,
    pub parameters_check:
        Option<unsafe extern "C" fn(param: *const xvc_decoder_parameters) -> xvc_dec_return_code>,
    pub decoder_create:
        Option<unsafe extern "C" fn(param: *const xvc_decoder_parameters) -> *mut xvc_decoder>,
    pub decoder_destroy:
        Option<unsafe extern "C" fn(decoder: *mut xvc_decoder) -> xvc_dec_return_code>,
    pub decoder_decode_nal: Option<
        unsafe extern "C" fn(
            decoder: *mut xvc_decoder,
            nal_unit: *const u8,
            nal_unit_size: usize,
            user_data: i64,
        ) -> xvc_dec_return_code,
    >,
    pub decoder_get_picture: Option<
        unsafe extern "C" fn(
            decoder: *mut xvc_decoder,
            out_pic: *mut xvc_decoded_picture,
        ) -> xvc_dec_return_code,
    >,
    pub decoder_flush:
        Option<unsafe extern "C" fn(decoder: *mut xvc_decoder) -> xvc_dec_return_code>,
    pub picture_create:
        Option<unsafe extern "C" fn(decoder: *mut xvc_decoder) -> *mut xvc_decoded_picture>,
    pub picture_destroy:
        Option<unsafe extern "C" fn(picture: *mut xvc_decoded_picture) -> xvc_dec_return_code>,
}
