pub mod api;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod feature;
pub mod form;
pub mod layers;
pub mod model;
pub mod motion;
pub mod render;
pub mod selection;
pub mod session;
pub mod style;
pub mod geometry {
    pub mod bounds;
    pub mod coords;
    pub mod limits;
    pub mod tolerance;
    pub mod translate;
}

pub use clipboard::{next_lot_number, ClipboardPhase, ClipboardSnapshot};
pub use config::EditorConfig;
pub use error::{ApiError, EditorError, FormError, GeometryError};
pub use geometry::coords::{Coordinates, Geometry, GeometryType};
pub use geometry::translate::translate;
pub use model::{LonLat, LotAttributes, LotId, LotStatus, PlotId, ShapeKey, ShapeKind};
pub use render::RenderCommand;
pub use session::{DrawTarget, EditorSession, KeyInput};
