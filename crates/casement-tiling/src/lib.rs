pub mod arrangement;
pub mod layout;
pub mod tree;
pub mod window;

pub use arrangement::{Arrangement, Orientation, Side, Sizing};
pub use layout::{LayoutEngine, PairBoxes, TreeLayout};
pub use tree::{Detached, KeyChoice, Split, WindowTree};
pub use window::{Lifecycle, PairData, Window, WindowData, WindowId};
