//! FFI interface for host interop
//!
//! The host hands over page HTML plus a JSON request and gets a JSON
//! response back. Both returned pointers are owned by Rust and must be
//! released with [`free_extraction_result`]. A null `json_ptr` with a set
//! `error_ptr` is the "no response" condition callers must handle.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};
use crate::page::Page;
use crate::pipeline::{extract_product, ExtractOptions};
use crate::selection::parse_selection;
use crate::site::SiteFamily;

/// Request sent alongside the page HTML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionRequest {
    /// `extractPrice` or `isProductPage`
    pub action: String,
    /// URL the HTML was captured from
    pub url: String,
    #[serde(default)]
    pub options: ExtractOptions,
}

/// Response to `isProductPage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPageStatus {
    pub site: String,
    pub is_product_page: bool,
}

/// Result struct returned to the host
/// Both pointers are owned by Rust and must be freed via free_extraction_result
#[repr(C)]
pub struct ExtractionResultFFI {
    /// JSON-serialized response (null-terminated)
    pub json_ptr: *mut c_char,
    /// Error message if the request failed (null-terminated), or null on success
    pub error_ptr: *mut c_char,
}

/// Answer one request against `html`, returning the response JSON.
pub fn handle_request(html: &str, request_json: &str) -> Result<String> {
    let request: ExtractionRequest = serde_json::from_str(request_json)?;

    match request.action.as_str() {
        "extractPrice" => {
            let page = Page::parse(html, &request.url)?;
            let draft = extract_product(&page, &request.options);
            Ok(serde_json::to_string(&draft)?)
        }
        "isProductPage" => {
            let url = Url::parse(&request.url).map_err(|source| Error::InvalidUrl {
                url: request.url.clone(),
                source,
            })?;
            let family = SiteFamily::from_url(&url);
            let status = ProductPageStatus {
                site: family.label().to_string(),
                is_product_page: family.is_product_page(&url),
            };
            Ok(serde_json::to_string(&status)?)
        }
        other => Err(Error::UnsupportedAction(other.to_string())),
    }
}

/// Run an extraction request against page HTML.
///
/// # Arguments
/// * `html_ptr` - Pointer to HTML content (UTF-8, not necessarily null-terminated)
/// * `html_len` - Length of HTML content in bytes
/// * `request_json` - JSON-serialized ExtractionRequest (null-terminated)
///
/// # Safety
/// - `html_ptr` must point to valid memory of at least `html_len` bytes
/// - `request_json` must be a valid null-terminated C string
/// - Caller must free the result via `free_extraction_result`
#[no_mangle]
pub unsafe extern "C" fn extract_from_html(
    html_ptr: *const c_char,
    html_len: usize,
    request_json: *const c_char,
) -> ExtractionResultFFI {
    let html = match read_html(html_ptr, html_len) {
        Ok(html) => html,
        Err(e) => return make_error_result(&e.to_string()),
    };

    let request = match read_c_str(request_json, "request JSON") {
        Ok(request) => request,
        Err(e) => return make_error_result(&e.to_string()),
    };

    into_ffi_result(handle_request(html, request))
}

/// Split a user selection into title and price.
///
/// # Safety
/// - `text` must be a valid null-terminated C string
/// - Caller must free the result via `free_extraction_result`
#[no_mangle]
pub unsafe extern "C" fn parse_selection_ffi(text: *const c_char) -> ExtractionResultFFI {
    let response = read_c_str(text, "selection text").and_then(|text| {
        let draft = parse_selection(text);
        Ok(serde_json::to_string(&draft)?)
    });
    into_ffi_result(response)
}

/// Free an ExtractionResultFFI returned by this module
///
/// # Safety
/// - `result` must have been returned by `extract_from_html` or `parse_selection_ffi`
/// - Must only be called once per result
#[no_mangle]
pub unsafe extern "C" fn free_extraction_result(result: ExtractionResultFFI) {
    if !result.json_ptr.is_null() {
        drop(CString::from_raw(result.json_ptr));
    }
    if !result.error_ptr.is_null() {
        drop(CString::from_raw(result.error_ptr));
    }
}

unsafe fn read_html<'a>(html_ptr: *const c_char, html_len: usize) -> Result<&'a str> {
    if html_ptr.is_null() || html_len == 0 {
        return Ok("");
    }
    let slice = std::slice::from_raw_parts(html_ptr as *const u8, html_len);
    std::str::from_utf8(slice).map_err(|_| Error::InvalidInput("invalid UTF-8 in HTML content".into()))
}

unsafe fn read_c_str<'a>(ptr: *const c_char, what: &str) -> Result<&'a str> {
    if ptr.is_null() {
        return Err(Error::InvalidInput(format!("{what} is null")));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| Error::InvalidInput(format!("invalid UTF-8 in {what}")))
}

fn into_ffi_result(response: Result<String>) -> ExtractionResultFFI {
    match response {
        Ok(json) => match CString::new(json) {
            Ok(cstr) => ExtractionResultFFI {
                json_ptr: cstr.into_raw(),
                error_ptr: ptr::null_mut(),
            },
            Err(_) => make_error_result("response JSON contains null bytes"),
        },
        Err(e) => {
            tracing::debug!(error = %e, "request failed");
            make_error_result(&e.to_string())
        }
    }
}

fn make_error_result(msg: &str) -> ExtractionResultFFI {
    let error_cstr = CString::new(msg.replace('\0', " ")).unwrap_or_default();
    ExtractionResultFFI {
        json_ptr: ptr::null_mut(),
        error_ptr: error_cstr.into_raw(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <span id="productTitle">Desk Lamp</span>
        <span class="a-price"><span class="a-offscreen">$24.99</span></span>
    "#;

    unsafe fn take(result: ExtractionResultFFI) -> (Option<String>, Option<String>) {
        let json = (!result.json_ptr.is_null())
            .then(|| CStr::from_ptr(result.json_ptr).to_string_lossy().into_owned());
        let error = (!result.error_ptr.is_null())
            .then(|| CStr::from_ptr(result.error_ptr).to_string_lossy().into_owned());
        free_extraction_result(result);
        (json, error)
    }

    #[test]
    fn test_extract_price_round_trip() {
        let request =
            CString::new(r#"{"action":"extractPrice","url":"https://www.amazon.com/dp/B000000042"}"#)
                .unwrap();

        let (json, error) = unsafe {
            take(extract_from_html(
                PAGE.as_ptr() as *const c_char,
                PAGE.len(),
                request.as_ptr(),
            ))
        };

        assert!(error.is_none());
        let draft: serde_json::Value = serde_json::from_str(&json.unwrap()).unwrap();
        assert_eq!(draft["title"], "Desk Lamp");
        assert_eq!(draft["price"], "24.99");
        assert_eq!(draft["site"], "Amazon");
        assert_eq!(draft["asin"], "B000000042");
    }

    #[test]
    fn test_unsupported_action_is_an_error() {
        let err = handle_request("", r#"{"action":"dance","url":"https://x.example/"}"#).unwrap_err();
        assert!(matches!(err, Error::UnsupportedAction(a) if a == "dance"));
    }

    #[test]
    fn test_bad_url_and_bad_json() {
        assert!(matches!(
            handle_request("", r#"{"action":"extractPrice","url":"nope"}"#),
            Err(Error::InvalidUrl { .. })
        ));
        assert!(matches!(handle_request("", "{"), Err(Error::Json(_))));
    }

    #[test]
    fn test_is_product_page() {
        let json = handle_request(
            "",
            r#"{"action":"isProductPage","url":"https://www.walmart.com/ip/fan/123"}"#,
        )
        .unwrap();
        let status: ProductPageStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(
            status,
            ProductPageStatus {
                site: "Walmart".into(),
                is_product_page: true
            }
        );
    }

    #[test]
    fn test_null_request_pointer() {
        let (json, error) = unsafe { take(extract_from_html(ptr::null(), 0, ptr::null())) };
        assert!(json.is_none());
        assert_eq!(error.as_deref(), Some("invalid input: request JSON is null"));
    }

    #[test]
    fn test_parse_selection_ffi() {
        let text = CString::new("Widget\n$19.99").unwrap();
        let (json, error) = unsafe { take(parse_selection_ffi(text.as_ptr())) };
        assert!(error.is_none());

        let parsed: serde_json::Value = serde_json::from_str(&json.unwrap()).unwrap();
        assert_eq!(parsed["title"], "Widget");
        assert_eq!(parsed["price"], "19.99");
    }
}
