use lotmap::{EditorConfig, EditorSession};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
mod api;
mod error;
mod http;
mod interop;
mod logging;

pub(crate) type Shared = Rc<RefCell<EditorSession>>;

#[wasm_bindgen]
pub struct LotEditor { pub(crate) inner: Shared }

impl LotEditor {
    pub fn rs_new(config: EditorConfig) -> LotEditor {
        LotEditor { inner: Rc::new(RefCell::new(EditorSession::new(config))) }
    }
}
