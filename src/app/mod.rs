mod dispatch;
pub mod keys;
mod layout;
mod message;
mod mode;
mod state;

pub use dispatch::App;
pub use layout::{Arrangement, LayoutAssignment, Region, WindowId};
pub use message::{ContentTarget, Msg, Task};
pub use mode::{Mode, Selection};
pub use state::{Preview, State};
