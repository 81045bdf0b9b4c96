use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;
mod logging;

pub use logging::init_logging;

#[wasm_bindgen]
pub struct PathTool { pub(crate) inner: meshpath::Session<meshpath::MeshSet> }

impl PathTool {
    pub fn rs_new(
        mesh: meshpath::MeshSet,
        mode: meshpath::SurfaceMode,
        config: meshpath::ToolConfig,
    ) -> meshpath::Result<PathTool> {
        Ok(PathTool { inner: meshpath::Session::new(mesh, mode, config)? })
    }
    pub fn rs_session(&self) -> &meshpath::Session<meshpath::MeshSet> { &self.inner }
}
