use crate::PathTool;
use crate::{error, interop};
use meshpath::{Action, Elem, ElemKind, Input, MeshSet, Status, SurfaceMode, ToolConfig};
use serde::Serialize;
use wasm_bindgen::prelude::*;
type JsValue = wasm_bindgen::JsValue;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn to_js<T: Serialize + ?Sized>(v: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(v).map_err(|e| error::err("serialize", e.to_string(), None))
}

fn ok_js<T: Serialize + ?Sized>(v: &T) -> JsValue {
    match to_js(v) {
        Ok(js) => error::ok(js),
        Err(e) => e,
    }
}

fn kind_name(kind: ElemKind) -> &'static str {
    match kind {
        ElemKind::Vert => "vert",
        ElemKind::Edge => "edge",
        ElemKind::Face => "face",
    }
}

fn parse_kind(name: &str) -> Option<ElemKind> {
    match name {
        "vert" => Some(ElemKind::Vert),
        "edge" => Some(ElemKind::Edge),
        "face" => Some(ElemKind::Face),
        _ => None,
    }
}

fn parse_action(name: &str) -> Option<Action> {
    Some(match name {
        "close" => Action::Close,
        "switch_direction" => Action::SwitchDirection,
        "undo" => Action::Undo,
        "redo" => Action::Redo,
        "apply" => Action::Apply,
        "cancel" => Action::Cancel,
        _ => return None,
    })
}

fn json_value(v: JsValue) -> Result<serde_json::Value, JsValue> {
    serde_wasm_bindgen::from_value::<serde_json::Value>(v).map_err(error::json_parse)
}

impl PathTool {
    /// Resolve a host pick. `None` is a press on empty space.
    fn pick(&self, object: u32, index: Option<u32>) -> Result<Option<Elem>, JsValue> {
        let index = match index {
            Some(i) => i,
            None => return Ok(None),
        };
        let kind = self.inner.mode().anchor_kind();
        let elem = Elem { object, kind, index };
        if !self.inner.mesh().contains(elem) {
            return Err(error::invalid_id(kind_name(kind), object, index));
        }
        Ok(Some(elem))
    }

    fn input_res(&mut self, input: Input, object: u32, index: Option<u32>) -> JsValue {
        let pick = match self.pick(object, index) {
            Ok(p) => p,
            Err(e) => return e,
        };
        match self.inner.handle(input, pick) {
            Ok(status) => ok_js(&status),
            Err(e) => error::path_error(&e),
        }
    }
}

#[wasm_bindgen]
impl PathTool {
    /// `mesh` is `{objects: [{positions, faces, transform?}]}`; `config` may be null for the
    /// defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(mesh: JsValue, face_mode: bool, config: JsValue) -> Result<PathTool, JsValue> {
        let mesh = MeshSet::from_json_value(json_value(mesh)?).map_err(|e| error::path_error(&e))?;
        let config = if config.is_null() || config.is_undefined() {
            ToolConfig::default()
        } else {
            ToolConfig::from_json_value(json_value(config)?).map_err(|e| error::path_error(&e))?
        };
        let mode = if face_mode { SurfaceMode::Face } else { SurfaceMode::Edge };
        PathTool::rs_new(mesh, mode, config).map_err(|e| error::path_error(&e))
    }

    // Input
    pub fn start_res(&mut self, object: u32, index: Option<u32>) -> JsValue {
        let pick = match self.pick(object, index) {
            Ok(p) => p,
            Err(e) => return e,
        };
        match self.inner.start(pick) {
            Ok(status) => ok_js(&status),
            Err(e) => error::path_error(&e),
        }
    }
    pub fn press_res(&mut self, object: u32, index: Option<u32>) -> JsValue {
        self.input_res(Input::Press, object, index)
    }
    pub fn press_new_res(&mut self, object: u32, index: Option<u32>) -> JsValue {
        self.input_res(Input::PressNew, object, index)
    }
    pub fn press_remove_res(&mut self, object: u32, index: Option<u32>) -> JsValue {
        self.input_res(Input::PressRemove, object, index)
    }
    pub fn move_res(&mut self, object: u32, index: Option<u32>) -> JsValue {
        self.input_res(Input::Move, object, index)
    }
    pub fn release_res(&mut self) -> JsValue {
        match self.inner.handle(Input::Release, None) {
            Ok(status) => ok_js(&status),
            Err(e) => error::path_error(&e),
        }
    }
    pub fn action_res(&mut self, name: &str) -> JsValue {
        let action = match parse_action(name) {
            Some(a) => a,
            None => return error::invalid_action(name),
        };
        match self.inner.handle(Input::Action(action), None) {
            Ok(status) => ok_js(&status),
            Err(e) => error::path_error(&e),
        }
    }

    // State
    pub fn is_running(&self) -> bool {
        self.inner.is_running()
    }
    pub fn path_count(&self) -> u32 {
        self.inner.registry().len() as u32
    }
    pub fn active_path_id(&self) -> Option<u32> {
        self.inner.active_path().map(|p| p.id)
    }
    pub fn get_paths_res(&self) -> JsValue {
        ok_js(self.inner.registry())
    }
    pub fn get_path_data_res(&self, id: u32) -> JsValue {
        match self.inner.registry().get(id) {
            Some(path) => error::ok(interop::path_arrays(path).into()),
            None => error::invalid_path(id),
        }
    }
    pub fn navigation_element(&self) -> JsValue {
        to_js(&self.inner.navigation_element()).unwrap_or(JsValue::NULL)
    }
    pub fn take_redraw_res(&mut self) -> JsValue {
        ok_js(&self.inner.take_redraw())
    }
    pub fn take_notices_res(&mut self) -> JsValue {
        let messages: Vec<&str> = self.inner.take_notices().into_iter().map(|n| n.message()).collect();
        ok_js(&messages)
    }
    pub fn draw_style_res(&self) -> JsValue {
        ok_js(&self.inner.config().draw)
    }

    // Finalization
    pub fn final_elements_res(&self) -> JsValue {
        ok_js(&self.inner.final_elements())
    }
    pub fn commit_res(&mut self) -> JsValue {
        if !self.inner.is_running() {
            return error::path_error(&meshpath::PathError::NotRunning);
        }
        let fin = self.inner.commit();
        ok_js(&Status::Finished(fin))
    }

    // Mesh attributes
    pub fn get_selected_res(&self, kind: &str) -> JsValue {
        use meshpath::MeshTopology;
        match parse_kind(kind) {
            Some(k) => ok_js(&self.inner.mesh().selected(k)),
            None => error::err("invalid_kind", "kind must be vert, edge or face", None),
        }
    }
    pub fn get_seams_res(&self) -> JsValue {
        ok_js(&self.inner.mesh().seams())
    }
    pub fn get_sharp_res(&self) -> JsValue {
        ok_js(&self.inner.mesh().sharp_edges())
    }
}
