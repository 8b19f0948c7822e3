//! FFI 接口 - C/C++ 绑定
//! 宿主插件把设计文档序列化成 JSON 传入，得到编译结果 JSON；图片由宿主按 `renditions` 自行栅格化

use crate::config::ExportConfig;
use crate::export::{export_roots, Exporter};
use crate::scene::DesignDocument;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

fn compile_json(design_json: &str, scale: f64, extended: bool) -> Result<String, crate::ExportError> {
    // 不写文件，输出目录只用于通过校验
    let config = ExportConfig::new(".")
        .with_scale(scale)
        .with_extended(extended);
    let exporter = Exporter::new(&config)?;
    let mut document = DesignDocument::from_json(design_json)?;
    let roots = export_roots(&document);
    let output = exporter.compile(&mut document, &roots)?;
    Ok(serde_json::to_string(&output)?)
}

fn into_c_string(text: String) -> *mut c_char {
    match CString::new(text) {
        Ok(s) => s.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// 编译设计文档
///
/// 成功返回 `{"layouts":[...],"renditions":[...],"warnings":[...]}`，失败返回 `{"error":"..."}`。
/// 返回值需用 `lx_string_free` 释放。
#[no_mangle]
pub extern "C" fn lx_compile_layout(design_json: *const c_char, scale: f64, extended: bool) -> *mut c_char {
    if design_json.is_null() {
        return std::ptr::null_mut();
    }
    let input = match unsafe { CStr::from_ptr(design_json) }.to_str() {
        Ok(s) => s,
        Err(_) => return into_c_string(serde_json::json!({ "error": "input is not valid UTF-8" }).to_string()),
    };
    match compile_json(input, scale, extended) {
        Ok(json) => into_c_string(json),
        Err(e) => into_c_string(serde_json::json!({ "error": e.to_string() }).to_string()),
    }
}

/// 释放 `lx_compile_layout` 返回的字符串
#[no_mangle]
pub extern "C" fn lx_string_free(s: *mut c_char) {
    if !s.is_null() {
        unsafe { drop(CString::from_raw(s)); }
    }
}
