//! Atelier Core Library
//!
//! Card positioning model for the sculpture canvas editor, plus access to the
//! content store that holds sculptures, categories and guestbook entries.

pub mod autosize;
pub mod canvas;
pub mod documents;
pub mod gateway;
pub mod gesture;
pub mod input;
pub mod position;
pub mod snap;
pub mod store;

pub use autosize::{AutosizeTrigger, CanvasAutosizer, required_height};
pub use canvas::Canvas;
pub use documents::{Category, CategoryLayout, Color, GuestEntry, Sculpture, is_hex_color};
pub use gateway::{EditorSession, GatewayError, HttpGateway, PositionSink};
pub use gesture::{CanvasBounds, GestureKind, GestureState};
pub use input::{LayoutEvent, PointerEvent, PointerTarget};
pub use position::{DimensionsUpdate, MIN_WIDTH, Position, PositionedItem};
pub use snap::{GRID_SIZE, SnapMode, snap_value};
pub use store::{ContentStore, FileStore, MemoryStore, SanityConfig, SanityStore, StoreError, StoreResult};
