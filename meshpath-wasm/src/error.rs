use crate::interop::{new_obj, set_kv};
use meshpath::PathError;
use wasm_bindgen::prelude::*;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

#[inline]
pub fn invalid_id(kind: &str, object: u32, index: u32) -> JsValue {
    let d = new_obj();
    set_kv(&d, "kind", &JsValue::from_str(kind));
    set_kv(&d, "object", &JsValue::from_f64(object as f64));
    set_kv(&d, "index", &JsValue::from_f64(index as f64));
    err("invalid_id", format!("invalid {} id", kind), Some(d.into()))
}

#[inline]
pub fn invalid_path(id: u32) -> JsValue {
    let d = new_obj(); set_kv(&d, "id", &JsValue::from_f64(id as f64));
    err("invalid_id", "invalid path id", Some(d.into()))
}

#[inline]
pub fn invalid_action(got: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "got", &JsValue::from_str(got));
    err(
        "invalid_kind",
        "action must be close, switch_direction, undo, redo, apply or cancel",
        Some(d.into()),
    )
}

#[inline]
pub fn json_parse(e: impl std::fmt::Display) -> JsValue { err("json_parse", e.to_string(), None) }

/// Envelope for a core error, keyed by the broad class of failure.
pub fn path_error(e: &PathError) -> JsValue {
    let code = match e {
        PathError::InvalidMesh(_) => "invalid_mesh",
        PathError::Config(_) => "invalid_config",
        PathError::NotRunning => "not_running",
        _ => "precondition",
    };
    err(code, e.to_string(), None)
}
