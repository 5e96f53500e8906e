pub mod inspect;
pub mod update;

pub use inspect::{handle_render, handle_show_config, handle_uri};
pub use update::handle_update;
