use js_sys::{Float32Array, Object, Reflect, Uint32Array};
use meshpath::{Elem, Path};
use wasm_bindgen::JsValue;

pub fn new_obj() -> Object { Object::new() }
pub fn set_kv(obj: &Object, k: &str, v: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(k), v);
}
pub fn arr_u32(slice: &[u32]) -> Uint32Array {
    let arr = Uint32Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice); arr
}
pub fn arr_f32(slice: &[f32]) -> Float32Array {
    let arr = Float32Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice); arr
}

pub fn indices(elems: &[Elem]) -> Uint32Array {
    let idx: Vec<u32> = elems.iter().map(|e| e.index).collect();
    arr_u32(&idx)
}

/// Flat typed arrays for drawing one path: control element indices, every fill element index
/// in slot order, and `anchors.len() + 1` offsets into the fill array.
pub fn path_arrays(path: &Path) -> Object {
    let mut fill_idx = Vec::new();
    let mut offsets = Vec::with_capacity(path.fills().len() + 1);
    offsets.push(0u32);
    for fill in path.fills() {
        fill_idx.extend(fill.elements.iter().map(|e| e.index));
        offsets.push(fill_idx.len() as u32);
    }
    let obj = new_obj();
    set_kv(&obj, "id", &JsValue::from_f64(path.id as f64));
    set_kv(&obj, "object", &JsValue::from_f64(path.object as f64));
    set_kv(&obj, "closed", &JsValue::from_bool(path.closed));
    set_kv(&obj, "anchors", &indices(path.anchors()).into());
    set_kv(&obj, "fills", &arr_u32(&fill_idx).into());
    set_kv(&obj, "fill_offsets", &arr_u32(&offsets).into());
    set_kv(&obj, "transform", &arr_f32(&path.transform).into());
    obj
}
